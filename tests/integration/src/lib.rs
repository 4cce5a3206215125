//! Integration tests for clonesweep.
//!
//! Anvil-dependent tests start a Docker Anvil node through **testcontainers**,
//! so no local `anvil` process is required.
//!
//! ```bash
//! # Run everything (Docker must be available):
//! cargo test -p sweep-integration-tests -- --include-ignored
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy::consensus::TxLegacy;
    use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
    use alloy::providers::Provider;
    use alloy::sol_types::SolError;
    use sweep_core::abi::{ContractCall, ISweepErrors};
    use sweep_core::retry::RetryPolicy;
    use sweep_core::config::SweepSettings;
    use sweep_core::report::ItemOutcome;
    use sweep_core::{
        execute, AssetDescriptor, BatchWithdrawalRequest, Chain, ChainAdapter, ContractRevert,
        NetworkId, Polling, SweepError, TxStatus,
    };
    use sweep_engine::SweepOrchestrator;
    use sweep_evm::tx::sign_legacy;
    use sweep_evm::EvmAdapter;
    use sweep_signer::{LocalSigner, Signer};
    use testcontainers::{
        core::{IntoContainerPort, WaitFor},
        runners::SyncRunner,
        Container, GenericImage, ImageExt,
    };

    /// Anvil default account 0.
    const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// Spins up a Docker Anvil container and returns `(container, rpc_url)`.
    /// The container is dropped (and removed) when it goes out of scope.
    fn start_anvil() -> (Container<GenericImage>, String) {
        let image = GenericImage::new("ghcr.io/foundry-rs/foundry", "latest")
            .with_exposed_port(8545.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Listening on"))
            .with_entrypoint("anvil")
            .with_cmd(vec![
                "--host".to_string(),
                "0.0.0.0".to_string(),
                "--port".to_string(),
                "8545".to_string(),
                "--chain-id".to_string(),
                "31337".to_string(),
            ]);

        let container = image.start().expect("Docker must be available to run Anvil tests");
        let host_port = container.get_host_port_ipv4(8545).expect("failed to get mapped port");
        let url = format!("http://127.0.0.1:{}", host_port);
        (container, url)
    }

    fn signer() -> Arc<LocalSigner> {
        Arc::new(LocalSigner::from_hex(ANVIL_KEY).unwrap())
    }

    async fn connect(url: &str) -> EvmAdapter {
        EvmAdapter::connect(url, signer(), &RetryPolicy::default())
            .await
            .expect("should connect to Anvil")
            .with_polling(Polling {
                interval: Duration::from_millis(200),
                timeout: Duration::from_secs(20),
            })
    }

    /// Contract whose every call reverts with the given 4-byte selector and
    /// no arguments.
    fn always_reverting_initcode(selector: [u8; 4]) -> Vec<u8> {
        // PUSH4 sel, PUSH1 0xe0, SHL, PUSH1 0, MSTORE, PUSH1 4, PUSH1 0, REVERT
        let mut runtime = vec![0x63];
        runtime.extend_from_slice(&selector);
        runtime.extend_from_slice(&[0x60, 0xe0, 0x1b, 0x60, 0x00, 0x52, 0x60, 0x04, 0x60, 0x00, 0xfd]);
        assert_eq!(runtime.len(), 0x10);

        // CODECOPY the runtime that follows this 12-byte prefix, then RETURN it
        let mut init = vec![
            0x60, 0x10, 0x60, 0x0c, 0x60, 0x00, 0x39, 0x60, 0x10, 0x60, 0x00, 0xf3,
        ];
        init.extend_from_slice(&runtime);
        init
    }

    async fn deploy(adapter: &EvmAdapter, signer: &LocalSigner, initcode: Vec<u8>) -> Address {
        let provider = adapter.provider();
        let nonce = provider.get_transaction_count(signer.address()).await.unwrap();
        let gas_price = provider.get_gas_price().await.unwrap();
        let tx = TxLegacy {
            chain_id: Some(adapter.chain_id()),
            nonce,
            gas_price,
            gas_limit: 200_000,
            to: TxKind::Create,
            value: U256::ZERO,
            input: Bytes::from(initcode),
        };
        let signed = sign_legacy(signer, tx).unwrap();
        provider.send_raw_transaction(&signed.raw).await.unwrap();

        for _ in 0..50 {
            if let Some(receipt) = provider.get_transaction_receipt(signed.hash).await.unwrap() {
                return receipt.contract_address.expect("deployment receipt has an address");
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        panic!("deployment {} was not mined", signed.hash);
    }

    #[test]
    fn test_reverting_contract_bytecode_layout() {
        let code = always_reverting_initcode([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(code.len(), 28);
        assert_eq!(&code[13..17], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(*code.last().unwrap(), 0xfd);
    }

    #[test]
    #[ignore]
    fn test_connect_reads_chain_id() {
        let (_anvil, anvil_url) = start_anvil();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let adapter = connect(&anvil_url).await;
            assert_eq!(adapter.chain_id(), 31337, "Anvil default chain ID");
            assert_eq!(
                adapter.sender(),
                "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
            );
        });
    }

    #[test]
    #[ignore]
    fn test_custom_error_revert_is_decoded() {
        let (_anvil, anvil_url) = start_anvil();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let adapter = connect(&anvil_url).await;
            let signer = signer();
            let selector = ISweepErrors::ArrayLengthMismatch::SELECTOR;
            let target = deploy(&adapter, &signer, always_reverting_initcode(selector)).await;

            let nonce_before = adapter
                .provider()
                .get_transaction_count(signer.address())
                .await
                .unwrap();

            let call = ContractCall::WithdrawAssetsFromClones {
                factory: target,
                clones: vec![Address::with_last_byte(1)],
                amounts: vec![U256::from(1)],
                recipient: Address::with_last_byte(2),
                asset: None,
            };
            let err = execute(&adapter, &call, &RetryPolicy::none()).await.unwrap_err();
            match err {
                SweepError::Reverted {
                    tx_hash: None,
                    revert: ContractRevert::Decoded { name, args },
                } => {
                    assert_eq!(name, "ArrayLengthMismatch");
                    assert!(args.is_empty());
                }
                other => panic!("expected decoded revert, got {other:?}"),
            }

            // rejected in simulation, so nothing was broadcast
            let nonce_after = adapter
                .provider()
                .get_transaction_count(signer.address())
                .await
                .unwrap();
            assert_eq!(nonce_before, nonce_after);
        });
    }

    #[test]
    #[ignore]
    fn test_confirmed_hash_polls_idempotently() {
        let (_anvil, anvil_url) = start_anvil();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let adapter = connect(&anvil_url).await;
            let signer = signer();

            // a call to an account without code succeeds
            let call = ContractCall::Withdraw {
                clone: Address::with_last_byte(0x44),
                recipients: vec![Address::with_last_byte(0x55)],
                amounts: vec![U256::from(1)],
            };
            let confirmed = execute(&adapter, &call, &RetryPolicy::default()).await.unwrap();
            let nonce = adapter
                .provider()
                .get_transaction_count(signer.address())
                .await
                .unwrap();

            for _ in 0..3 {
                let again = adapter.await_confirmation(&confirmed.tx_hash).await.unwrap();
                assert_eq!(again, confirmed);
                assert_eq!(
                    adapter.tx_status(&confirmed.tx_hash).await.unwrap(),
                    TxStatus::Confirmed { block: confirmed.block }
                );
            }
            assert_eq!(
                adapter
                    .provider()
                    .get_transaction_count(signer.address())
                    .await
                    .unwrap(),
                nonce
            );
        });
    }

    #[test]
    #[ignore]
    fn test_reverting_factory_fails_every_chunk() {
        let (_anvil, anvil_url) = start_anvil();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let adapter = connect(&anvil_url).await;
            let signer = signer();
            let selector = ISweepErrors::InvalidAddressClone::SELECTOR;
            let factory = deploy(&adapter, &signer, always_reverting_initcode(selector)).await;

            let asset = AssetDescriptor {
                chain: Chain::Eth,
                network: NetworkId::new("anvil"),
                symbol: "USDT".into(),
                contract: Some(Address::with_last_byte(0x77)),
                decimals: 6,
            };
            let request = BatchWithdrawalRequest::new(
                asset,
                (1..=3).map(Address::with_last_byte).collect(),
                vec![U256::from(10), U256::from(20), U256::from(30)],
                Address::with_last_byte(0x99),
            )
            .unwrap();

            let mut settings = SweepSettings::default();
            settings.retry = RetryPolicy::none();
            let orchestrator = SweepOrchestrator::new(&adapter, &settings).with_max_chunk(2);

            let err = orchestrator.sweep(factory, &request).await.unwrap_err();
            let SweepError::BatchFailed(report) = err else {
                panic!("expected BatchFailed, got {err:?}");
            };
            assert_eq!(report.calls_issued, 2);
            assert_eq!(report.entries.len(), 3);
            for entry in &report.entries {
                match &entry.outcome {
                    ItemOutcome::Failed { taxonomy, message, tx_hash } => {
                        assert_eq!(taxonomy, "ContractRevert.Decoded");
                        assert!(message.contains("InvalidAddressClone"), "{message}");
                        assert!(tx_hash.is_none());
                    }
                    other => panic!("unexpected outcome {other:?}"),
                }
            }
        });
    }

    #[test]
    #[ignore]
    fn test_unknown_hash_is_not_found() {
        let (_anvil, anvil_url) = start_anvil();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let adapter = connect(&anvil_url).await;
            let status = adapter.tx_status(&B256::repeat_byte(0x99)).await.unwrap();
            assert_eq!(status, TxStatus::NotFound);
        });
    }
}
