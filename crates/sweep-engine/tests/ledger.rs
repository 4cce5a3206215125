//! Sweep scenarios against an in-memory ledger chain.

use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use sweep_core::abi::{ContractCall, Erc20Layout, TransferMode, ViewCall, ViewResult};
use sweep_core::config::SweepSettings;
use sweep_core::retry::RetryPolicy;
use sweep_core::{
    execute, ChainAdapter, ChainFamily, ContractOps, ContractRevert, ItemOutcome, Polling, Registry, Result,
    SweepError, SweepOutcome, TxHash, TxStatus,
};
use sweep_engine::{AmountMode, RequestBuilder, SweepOrchestrator};
use tokio::sync::Mutex;

const REGISTRY: &str = r#"
networks:
  - chain: ETH
    network: SEPOLIA
    rpc_url: "http://localhost:8545"
    signing_key: "0x0101010101010101010101010101010101010101010101010101010101010101"
    factory: "0x00000000000000000000000000000000000000f0"
    assets:
      ETH: { native: true, decimals: 18 }
      USDT: { address: "0x00000000000000000000000000000000000000a1", decimals: 6 }
"#;

fn token() -> Address {
    Address::with_last_byte(0xa1)
}

fn recipient() -> Address {
    Address::with_last_byte(0xd1)
}

fn clone(i: u8) -> Address {
    Address::with_last_byte(0xc0 + i)
}

fn decoded(name: &str) -> SweepError {
    SweepError::Reverted {
        tx_hash: None,
        revert: ContractRevert::Decoded {
            name: name.into(),
            args: vec![],
        },
    }
}

/// Balances keyed by (asset, holder); `Address::ZERO` is the native asset.
#[derive(Default)]
struct State {
    balances: HashMap<(Address, Address), U256>,
    built: Vec<ContractCall>,
    submitted: u32,
    mined: HashMap<TxHash, u64>,
    block: u64,
    /// (clone, account) -> admin flag.
    admins: HashMap<(Address, Address), bool>,
}

struct LedgerChain {
    state: StdMutex<State>,
    lock: Mutex<()>,
    /// Broadcasts never reach the chain.
    partitioned: bool,
}

impl LedgerChain {
    fn new() -> Self {
        Self {
            state: StdMutex::new(State::default()),
            lock: Mutex::new(()),
            partitioned: false,
        }
    }

    fn fund(&self, asset: Address, holder: Address, amount: u64) {
        *self
            .state
            .lock()
            .unwrap()
            .balances
            .entry((asset, holder))
            .or_default() += U256::from(amount);
    }

    fn balance(&self, asset: Address, holder: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }

    fn built(&self) -> Vec<ContractCall> {
        self.state.lock().unwrap().built.clone()
    }

    /// Moves funds the way the contracts would, or returns the revert.
    fn transfers(state: &State, call: &ContractCall) -> Result<Vec<(Address, Address, Address, U256)>> {
        let mut moves = Vec::new();
        match call {
            ContractCall::Withdraw {
                clone,
                recipients,
                amounts,
            } => {
                for (to, amount) in recipients.iter().zip(amounts) {
                    if to.is_zero() {
                        return Err(decoded("InvalidAddressRecipient"));
                    }
                    moves.push((Address::ZERO, *clone, *to, *amount));
                }
            }
            ContractCall::WithdrawErc20 {
                clone,
                token,
                recipient,
                amount,
                ..
            } => moves.push((*token, *clone, *recipient, *amount)),
            ContractCall::WithdrawManyErc20 {
                clone,
                tokens,
                recipients,
                amounts,
            } => {
                if tokens.len() != amounts.len() || recipients.len() != amounts.len() {
                    return Err(decoded("ArrayLengthMismatch"));
                }
                for ((token, to), amount) in tokens.iter().zip(recipients).zip(amounts) {
                    moves.push((*token, *clone, *to, *amount));
                }
            }
            ContractCall::UniversalTransfer {
                clone,
                token,
                to,
                amount,
                ..
            } => moves.push((*token, *clone, *to, *amount)),
            ContractCall::SetAdmin { .. } | ContractCall::CreateClone { .. } => {}
            ContractCall::WithdrawAssetsFromClones {
                clones,
                amounts,
                recipient,
                asset,
                ..
            } => {
                if clones.len() != amounts.len() {
                    return Err(decoded("ArrayLengthMismatch"));
                }
                for (c, amount) in clones.iter().zip(amounts) {
                    if c.is_zero() {
                        return Err(decoded("InvalidAddressClone"));
                    }
                    moves.push((asset.unwrap_or(Address::ZERO), *c, *recipient, *amount));
                }
            }
            other => {
                return Err(SweepError::NodeRejected(format!(
                    "{} not modelled",
                    other.method()
                )))
            }
        }

        let mut spent: HashMap<(Address, Address), U256> = HashMap::new();
        for (asset, from, _, amount) in &moves {
            let total = spent.entry((*asset, *from)).or_default();
            *total += *amount;
            let held = state.balances.get(&(*asset, *from)).copied().unwrap_or_default();
            if *total > held {
                return Err(decoded("WithdrawFailed"));
            }
        }
        Ok(moves)
    }
}

#[async_trait]
impl ChainAdapter for LedgerChain {
    type Unsigned = ContractCall;
    type Signed = (TxHash, ContractCall);

    fn family(&self) -> ChainFamily {
        ChainFamily::Evm
    }

    fn sender(&self) -> Address {
        Address::with_last_byte(0xee)
    }

    async fn build_call(&self, call: &ContractCall) -> Result<ContractCall> {
        let mut state = self.state.lock().unwrap();
        state.built.push(call.clone());
        // simulation
        Self::transfers(&state, call)?;
        Ok(call.clone())
    }

    fn sign(&self, call: ContractCall) -> Result<(TxHash, ContractCall)> {
        let hash = alloy::primitives::keccak256(call.abi_encode());
        Ok((hash, call))
    }

    fn tx_hash(&self, signed: &(TxHash, ContractCall)) -> TxHash {
        signed.0
    }

    async fn submit(&self, signed: &(TxHash, ContractCall)) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.submitted += 1;
        if self.partitioned {
            return Err(SweepError::TransientTransport("connection reset".into()));
        }
        if state.mined.contains_key(&signed.0) {
            return Ok(signed.0);
        }
        let moves = Self::transfers(&state, &signed.1)?;
        for (asset, from, to, amount) in moves {
            *state.balances.entry((asset, from)).or_default() -= amount;
            *state.balances.entry((asset, to)).or_default() += amount;
        }
        if let ContractCall::SetAdmin {
            clone,
            admins,
            status,
        } = &signed.1
        {
            for admin in admins {
                state.admins.insert((*clone, *admin), *status);
            }
        }
        state.block += 1;
        let block = state.block;
        state.mined.insert(signed.0, block);
        Ok(signed.0)
    }

    async fn tx_status(&self, hash: &TxHash) -> Result<TxStatus> {
        let state = self.state.lock().unwrap();
        Ok(match state.mined.get(hash) {
            Some(block) => TxStatus::Confirmed { block: *block },
            None => TxStatus::NotFound,
        })
    }

    async fn call_view(&self, view: &ViewCall) -> Result<ViewResult> {
        let state = self.state.lock().unwrap();
        Ok(match view {
            ViewCall::IsAdmined { clone, account } => ViewResult::Bool(
                state.admins.get(&(*clone, *account)).copied().unwrap_or(false),
            ),
            ViewCall::PredictAddress { factory, salt } => {
                let digest = alloy::primitives::keccak256([factory.as_slice(), salt.as_slice()].concat());
                ViewResult::Address(Address::from_slice(&digest[12..]))
            }
        })
    }

    fn sender_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.lock)
    }

    fn polling(&self) -> Polling {
        Polling {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(20),
        }
    }
}

fn settings(max_chunk: usize) -> SweepSettings {
    SweepSettings {
        max_chunk,
        retry: RetryPolicy {
            max_attempts: 2,
            initial_delay_ms: 1,
            max_delay_ms: 1,
            multiplier: 1.0,
        },
        ..SweepSettings::default()
    }
}

fn factory() -> Address {
    Address::with_last_byte(0xf0)
}

fn hex(a: Address) -> String {
    a.to_string()
}

#[tokio::test]
async fn native_withdrawal_moves_exact_amount() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    chain.fund(Address::ZERO, clone(1), 1_000);

    let prepared = RequestBuilder::new(&registry)
        .withdrawal(
            "ETH",
            "SEPOLIA",
            "ETH",
            &hex(clone(1)),
            "100",
            &hex(recipient()),
            AmountMode::Atomic,
        )
        .unwrap();
    let call = prepared.intent.to_call(prepared.clone_abi);
    execute(&chain, &call, &RetryPolicy::none()).await.unwrap();

    assert_eq!(
        chain.built(),
        vec![ContractCall::Withdraw {
            clone: clone(1),
            recipients: vec![recipient()],
            amounts: vec![U256::from(100)],
        }]
    );
    assert_eq!(chain.balance(Address::ZERO, recipient()), U256::from(100));
    assert_eq!(chain.balance(Address::ZERO, clone(1)), U256::from(900));
}

#[tokio::test]
async fn token_batch_drains_every_clone() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    for (i, amount) in [(1, 10), (2, 20), (3, 30)] {
        chain.fund(token(), clone(i), amount);
    }

    let clones: Vec<String> = (1..=3).map(|i| hex(clone(i))).collect();
    let amounts: Vec<String> = ["10", "20", "30"].iter().map(|s| s.to_string()).collect();
    let prepared = RequestBuilder::new(&registry)
        .batch(
            "ETH",
            "SEPOLIA",
            "USDT",
            &clones,
            &amounts,
            &hex(recipient()),
            AmountMode::Atomic,
        )
        .unwrap();

    let orchestrator = SweepOrchestrator::new(&chain, &settings(2));
    let report = orchestrator
        .sweep(prepared.factory, &prepared.request)
        .await
        .unwrap();

    assert_eq!(report.outcome(), SweepOutcome::Complete);
    assert_eq!(report.calls_issued, 2);
    assert_eq!(report.swept_total(), U256::from(60));
    assert_eq!(chain.balance(token(), recipient()), U256::from(60));
    for i in 1..=3 {
        assert_eq!(chain.balance(token(), clone(i)), U256::ZERO);
    }
}

#[tokio::test]
async fn mismatched_batch_issues_no_calls() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    for i in 1..=3 {
        chain.fund(token(), clone(i), 10);
    }

    let clones: Vec<String> = (1..=3).map(|i| hex(clone(i))).collect();
    let err = RequestBuilder::new(&registry)
        .batch(
            "ETH",
            "SEPOLIA",
            "USDT",
            &clones,
            &["10".to_string(), "20".to_string()],
            &hex(recipient()),
            AmountMode::Atomic,
        )
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));

    // a hand-built request bypassing the builder is stopped by the orchestrator
    let asset = RequestBuilder::new(&registry)
        .asset(registry.endpoints().first().unwrap(), "USDT")
        .unwrap();
    let malformed = sweep_core::BatchWithdrawalRequest {
        asset,
        clones: (1..=3).map(clone).collect(),
        amounts: vec![U256::from(10), U256::from(20)],
        recipient: recipient(),
    };
    let err = SweepOrchestrator::new(&chain, &settings(50))
        .sweep(factory(), &malformed)
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));
    assert!(chain.built().is_empty());
    assert_eq!(chain.balance(token(), recipient()), U256::ZERO);
    assert_eq!(chain.balance(token(), clone(1)), U256::from(10));
}

#[tokio::test]
async fn zero_clone_address_reverts_without_moving_funds() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    chain.fund(Address::ZERO, clone(1), 50);

    let call = ContractCall::WithdrawAssetsFromClones {
        factory: factory(),
        clones: vec![clone(1), Address::ZERO],
        amounts: vec![U256::from(50), U256::from(1)],
        recipient: recipient(),
        asset: None,
    };
    let err = execute(&chain, &call, &RetryPolicy::none()).await.unwrap_err();
    match &err {
        SweepError::Reverted { tx_hash: None, revert } => {
            assert_eq!(revert.error_name(), Some("InvalidAddressClone"))
        }
        other => panic!("unexpected {other:?}"),
    }

    let asset = RequestBuilder::new(&registry)
        .asset(&registry.endpoints()[0], "ETH")
        .unwrap();
    let request = sweep_core::BatchWithdrawalRequest::new(
        asset,
        vec![clone(1), Address::ZERO],
        vec![U256::from(50), U256::from(1)],
        recipient(),
    )
    .unwrap();
    let err = SweepOrchestrator::new(&chain, &settings(50))
        .sweep(factory(), &request)
        .await
        .unwrap_err();
    match err {
        SweepError::BatchFailed(report) => {
            assert_eq!(report.calls_issued, 1);
            assert_eq!(report.unswept().len(), 2);
            assert!(matches!(
                &report.entries[0].outcome,
                ItemOutcome::Failed { taxonomy, message, tx_hash: None }
                    if taxonomy == "ContractRevert.Decoded" && message.contains("InvalidAddressClone")
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(chain.balance(Address::ZERO, clone(1)), U256::from(50));
    assert_eq!(chain.balance(Address::ZERO, recipient()), U256::ZERO);
    assert_eq!(chain.state.lock().unwrap().submitted, 0);
}

#[tokio::test]
async fn failing_chunk_leaves_earlier_chunks_in_place() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    for i in 1..=5 {
        chain.fund(token(), clone(i), 10);
    }
    let asset = RequestBuilder::new(&registry)
        .asset(&registry.endpoints()[0], "USDT")
        .unwrap();
    // clone 4 is asked for more than it holds
    let request = sweep_core::BatchWithdrawalRequest::new(
        asset,
        (1..=5).map(clone).collect(),
        vec![U256::from(10), U256::from(10), U256::from(10), U256::from(11), U256::from(10)],
        recipient(),
    )
    .unwrap();

    let report = SweepOrchestrator::new(&chain, &settings(2))
        .sweep(factory(), &request)
        .await
        .unwrap();
    assert_eq!(report.calls_issued, 3);
    assert_eq!(report.outcome(), SweepOutcome::Partial);
    assert_eq!(report.unswept(), vec![clone(3), clone(4)]);
    assert_eq!(report.swept_total(), U256::from(30));
    assert_eq!(chain.balance(token(), recipient()), U256::from(30));
    assert_eq!(chain.balance(token(), clone(3)), U256::from(10));
}

#[tokio::test]
async fn call_count_is_ceiling_of_chunks() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let asset = RequestBuilder::new(&registry)
        .asset(&registry.endpoints()[0], "ETH")
        .unwrap();
    for max_chunk in [1usize, 7, 50] {
        for n in [1usize, 6, 7, 8, 50, 51, 120] {
            let chain = LedgerChain::new();
            let clones: Vec<Address> = (0..n)
                .map(|i| Address::left_padding_from(&(i as u64 + 1).to_be_bytes()))
                .collect();
            for c in &clones {
                chain.fund(Address::ZERO, *c, 1);
            }
            let request = sweep_core::BatchWithdrawalRequest::new(
                asset.clone(),
                clones,
                vec![U256::from(1); n],
                recipient(),
            )
            .unwrap();
            let report = SweepOrchestrator::new(&chain, &settings(max_chunk))
                .sweep(factory(), &request)
                .await
                .unwrap();
            assert_eq!(report.calls_issued, n.div_ceil(max_chunk), "n={n} max={max_chunk}");
            assert_eq!(chain.built().len(), n.div_ceil(max_chunk));
        }
    }
}

#[tokio::test]
async fn unreachable_broadcast_is_indeterminate_not_resent() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let mut chain = LedgerChain::new();
    chain.partitioned = true;
    chain.fund(Address::ZERO, clone(1), 5);
    let asset = RequestBuilder::new(&registry)
        .asset(&registry.endpoints()[0], "ETH")
        .unwrap();
    let request =
        sweep_core::BatchWithdrawalRequest::new(asset, vec![clone(1)], vec![U256::from(5)], recipient())
            .unwrap();

    let err = SweepOrchestrator::new(&chain, &settings(50))
        .sweep(factory(), &request)
        .await
        .unwrap_err();
    match err {
        SweepError::BatchFailed(report) => {
            assert!(matches!(report.entries[0].outcome, ItemOutcome::Indeterminate { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    let state = chain.state.lock().unwrap();
    assert_eq!(state.built.len(), 1);
    assert_eq!(state.submitted, 2);
}

#[tokio::test]
async fn passes_run_one_asset_at_a_time() {
    let registry = Registry::from_yaml(REGISTRY).unwrap();
    let chain = LedgerChain::new();
    for i in 1..=3 {
        chain.fund(Address::ZERO, clone(i), 7);
        chain.fund(token(), clone(i), 3);
    }
    let builder = RequestBuilder::new(&registry);
    let endpoint = &registry.endpoints()[0];
    let passes: Vec<_> = ["ETH", "USDT"]
        .iter()
        .map(|symbol| {
            let asset = builder.asset(endpoint, symbol).unwrap();
            let amount = if asset.is_native() { 7 } else { 3 };
            sweep_core::BatchWithdrawalRequest::new(
                asset,
                (1..=3).map(clone).collect(),
                vec![U256::from(amount); 3],
                recipient(),
            )
            .unwrap()
        })
        .collect();

    let results = SweepOrchestrator::new(&chain, &settings(2))
        .sweep_passes(factory(), &passes)
        .await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_ok()));

    let assets: Vec<Option<Address>> = chain
        .built()
        .into_iter()
        .map(|c| match c {
            ContractCall::WithdrawAssetsFromClones { asset, .. } => asset,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(assets, vec![None, None, Some(token()), Some(token())]);
    assert_eq!(chain.balance(Address::ZERO, recipient()), U256::from(21));
    assert_eq!(chain.balance(token(), recipient()), U256::from(9));
}

#[tokio::test]
async fn polling_confirmed_hash_has_no_side_effects() {
    let chain = LedgerChain::new();
    chain.fund(Address::ZERO, clone(1), 10);
    let call = ContractCall::Withdraw {
        clone: clone(1),
        recipients: vec![recipient()],
        amounts: vec![U256::from(10)],
    };
    let confirmed = execute(&chain, &call, &RetryPolicy::none()).await.unwrap();
    for _ in 0..5 {
        assert_eq!(
            chain.tx_status(&confirmed.tx_hash).await.unwrap(),
            TxStatus::Confirmed { block: confirmed.block }
        );
    }
    assert_eq!(chain.state.lock().unwrap().submitted, 1);
    assert_eq!(chain.balance(Address::ZERO, recipient()), U256::from(10));
}

#[tokio::test]
async fn withdraw_native_pays_listed_recipients() {
    let chain = LedgerChain::new();
    chain.fund(Address::ZERO, clone(1), 1_000);

    let confirmed = chain
        .withdraw_native(clone(1), vec![recipient()], vec![U256::from(100)])
        .await
        .unwrap();
    assert_eq!(
        chain.tx_status(&confirmed.tx_hash).await.unwrap(),
        TxStatus::Confirmed { block: confirmed.block }
    );
    assert_eq!(chain.balance(Address::ZERO, recipient()), U256::from(100));
    assert_eq!(chain.balance(Address::ZERO, clone(1)), U256::from(900));

    let err = chain
        .withdraw_native(clone(1), vec![recipient()], vec![U256::from(1), U256::from(2)])
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));
    assert_eq!(chain.built().len(), 1);
    assert_eq!(chain.balance(Address::ZERO, clone(1)), U256::from(900));
}

#[tokio::test]
async fn withdraw_token_supports_both_argument_orders() {
    let chain = LedgerChain::new();
    chain.fund(token(), clone(1), 100);

    for layout in [Erc20Layout::TokenRecipientAmount, Erc20Layout::TokenAmountRecipient] {
        chain
            .withdraw_token(clone(1), token(), recipient(), U256::from(40), layout)
            .await
            .unwrap();
    }

    let built = chain.built();
    assert_eq!(built.len(), 2);
    assert_eq!(built[0].signature(), "withdrawERC20(address,address,uint256)");
    assert_eq!(built[1].signature(), "withdrawERC20(address,uint256,address)");
    assert_ne!(built[0].abi_encode()[..4], built[1].abi_encode()[..4]);
    assert_eq!(chain.balance(token(), recipient()), U256::from(80));
    assert_eq!(chain.balance(token(), clone(1)), U256::from(20));

    let err = chain
        .withdraw_token(
            clone(1),
            token(),
            recipient(),
            U256::from(21),
            Erc20Layout::TokenRecipientAmount,
        )
        .await
        .unwrap_err();
    assert_eq!(err.taxonomy(), "ContractRevert.Decoded");
    assert_eq!(chain.balance(token(), clone(1)), U256::from(20));
}

#[tokio::test]
async fn factory_withdrawal_rejects_zero_clone() {
    let chain = LedgerChain::new();
    chain.fund(token(), clone(1), 10);
    chain.fund(token(), clone(2), 20);

    let err = chain
        .withdraw_many_from_clones(
            factory(),
            vec![clone(1), Address::ZERO],
            vec![U256::from(10), U256::from(20)],
            recipient(),
            Some(token()),
        )
        .await
        .unwrap_err();
    match &err {
        SweepError::Reverted { tx_hash: None, revert } => {
            assert_eq!(revert.error_name(), Some("InvalidAddressClone"))
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(chain.state.lock().unwrap().submitted, 0);
    assert_eq!(chain.balance(token(), clone(1)), U256::from(10));

    chain
        .withdraw_many_from_clones(
            factory(),
            vec![clone(1), clone(2)],
            vec![U256::from(10), U256::from(20)],
            recipient(),
            Some(token()),
        )
        .await
        .unwrap();
    assert_eq!(chain.balance(token(), recipient()), U256::from(30));
}

#[tokio::test]
async fn withdraw_many_erc20_moves_each_token() {
    let other = Address::with_last_byte(0xa2);
    let chain = LedgerChain::new();
    chain.fund(token(), clone(1), 5);
    chain.fund(other, clone(1), 9);

    chain
        .withdraw_many_erc20(
            clone(1),
            vec![token(), other],
            vec![recipient(), recipient()],
            vec![U256::from(5), U256::from(9)],
        )
        .await
        .unwrap();
    assert_eq!(chain.balance(token(), recipient()), U256::from(5));
    assert_eq!(chain.balance(other, recipient()), U256::from(9));

    let err = chain
        .withdraw_many_erc20(clone(1), vec![token()], vec![recipient()], vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));
}

#[tokio::test]
async fn universal_transfer_passes_mode_through() {
    let chain = LedgerChain::new();
    chain.fund(token(), clone(1), 50);

    chain
        .universal_transfer(
            clone(1),
            token(),
            recipient(),
            U256::from(50),
            TransferMode::new(2).unwrap(),
        )
        .await
        .unwrap();
    match &chain.built()[0] {
        ContractCall::UniversalTransfer { mode, .. } => assert_eq!(mode.get(), 2),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(chain.balance(token(), recipient()), U256::from(50));
}

#[tokio::test]
async fn admin_changes_are_visible_through_views() {
    let chain = LedgerChain::new();
    let operator = Address::with_last_byte(0x0a);

    assert!(!chain.is_admined(clone(1), operator).await.unwrap());
    chain.set_admin(clone(1), vec![operator], true).await.unwrap();
    assert!(chain.is_admined(clone(1), operator).await.unwrap());
    chain.set_admin(clone(1), vec![operator], false).await.unwrap();
    assert!(!chain.is_admined(clone(1), operator).await.unwrap());

    let err = chain.set_admin(clone(1), vec![], true).await.unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));
}

#[tokio::test]
async fn predicted_clone_address_is_stable() {
    let chain = LedgerChain::new();
    let salt = sweep_core::abi::salt_from_label("customer-42").unwrap();

    let first = chain.predict_address(factory(), salt).await.unwrap();
    chain.create_clone(factory(), salt).await.unwrap();
    assert_eq!(chain.predict_address(factory(), salt).await.unwrap(), first);
    assert_ne!(first, Address::ZERO);
}
