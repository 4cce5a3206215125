//! High-level withdrawal operations available on every adapter.

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::abi::{ContractCall, Erc20Layout, TransferMode, ViewCall, ViewResult};
use crate::adapter::{execute, ChainAdapter};
use crate::error::{Result, SweepError};
use crate::types::ConfirmedTx;

#[async_trait]
pub trait ContractOps: ChainAdapter {
    /// Runs a prepared call to confirmation with the adapter's retry policy.
    async fn run(&self, call: ContractCall) -> Result<ConfirmedTx> {
        execute(self, &call, &self.retry_policy()).await
    }

    /// `withdraw(address[],uint256[])` on a clone.
    async fn withdraw_native(
        &self,
        clone: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    ) -> Result<ConfirmedTx> {
        self.run(ContractCall::Withdraw {
            clone,
            recipients,
            amounts,
        })
        .await
    }

    /// One of the `withdrawERC20` overloads on a clone.
    async fn withdraw_token(
        &self,
        clone: Address,
        token: Address,
        recipient: Address,
        amount: U256,
        layout: Erc20Layout,
    ) -> Result<ConfirmedTx> {
        self.run(ContractCall::WithdrawErc20 {
            clone,
            token,
            recipient,
            amount,
            layout,
        })
        .await
    }

    async fn withdraw_many_erc20(
        &self,
        clone: Address,
        tokens: Vec<Address>,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    ) -> Result<ConfirmedTx> {
        self.run(ContractCall::WithdrawManyErc20 {
            clone,
            tokens,
            recipients,
            amounts,
        })
        .await
    }

    async fn universal_transfer(
        &self,
        clone: Address,
        token: Address,
        to: Address,
        amount: U256,
        mode: TransferMode,
    ) -> Result<ConfirmedTx> {
        self.run(ContractCall::UniversalTransfer {
            clone,
            token,
            to,
            amount,
            mode,
        })
        .await
    }

    /// Factory-level `withdrawAssetsFromClones`; `asset == None` sweeps the
    /// native currency.
    async fn withdraw_many_from_clones(
        &self,
        factory: Address,
        clones: Vec<Address>,
        amounts: Vec<U256>,
        recipient: Address,
        asset: Option<Address>,
    ) -> Result<ConfirmedTx> {
        self.run(ContractCall::WithdrawAssetsFromClones {
            factory,
            clones,
            amounts,
            recipient,
            asset,
        })
        .await
    }

    async fn create_clone(&self, factory: Address, salt: B256) -> Result<ConfirmedTx> {
        self.run(ContractCall::CreateClone { factory, salt }).await
    }

    async fn set_admin(&self, clone: Address, admins: Vec<Address>, status: bool) -> Result<ConfirmedTx> {
        self.run(ContractCall::SetAdmin {
            clone,
            admins,
            status,
        })
        .await
    }

    async fn predict_address(&self, factory: Address, salt: B256) -> Result<Address> {
        match self.call_view(&ViewCall::PredictAddress { factory, salt }).await? {
            ViewResult::Address(a) => Ok(a),
            other => Err(SweepError::AbiMismatch(format!(
                "predictAddress returned {other:?}"
            ))),
        }
    }

    async fn is_admined(&self, clone: Address, account: Address) -> Result<bool> {
        match self.call_view(&ViewCall::IsAdmined { clone, account }).await? {
            ViewResult::Bool(b) => Ok(b),
            other => Err(SweepError::AbiMismatch(format!("isAdmined returned {other:?}"))),
        }
    }
}

impl<T: ChainAdapter + ?Sized> ContractOps for T {}
