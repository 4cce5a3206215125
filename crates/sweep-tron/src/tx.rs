//! Wire types of the Tron HTTP API and local transaction signing.

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use sweep_core::{Result, SweepError};
use sweep_signer::Signer;

/// Body of `triggersmartcontract` and `triggerconstantcontract`.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRequest {
    pub owner_address: String,
    pub contract_address: String,
    pub function_selector: String,
    pub parameter: String,
    pub call_value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnStatus {
    #[serde(default)]
    pub result: bool,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub result: ReturnStatus,
    pub transaction: Option<TronTransaction>,
    #[serde(default)]
    pub constant_result: Vec<String>,
}

/// A node-built transaction. Fields the adapter does not read are kept
/// verbatim so the broadcast body matches what the node produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TronTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: Value,
    pub raw_data_hex: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signature: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A signed transaction together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTron {
    pub hash: B256,
    pub transaction: TronTransaction,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub result: bool,
    pub code: Option<String>,
    pub message: Option<String>,
    pub txid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceReceipt {
    pub result: Option<String>,
}

/// `gettransactioninfobyid` answer. The node returns `{}` for unknown ids.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInfo {
    pub id: Option<String>,
    #[serde(rename = "blockNumber")]
    pub block_number: Option<u64>,
    pub receipt: Option<ResourceReceipt>,
    #[serde(rename = "contractResult", default)]
    pub contract_result: Vec<String>,
    pub result: Option<String>,
    #[serde(rename = "resMessage")]
    pub res_message: Option<String>,
}

impl TransactionInfo {
    /// Whether the contract call inside the transaction failed.
    pub fn failed(&self) -> bool {
        if self.result.as_deref() == Some("FAILED") {
            return true;
        }
        match self.receipt.as_ref().and_then(|r| r.result.as_deref()) {
            Some(result) => result != "SUCCESS",
            None => false,
        }
    }

    /// Raw revert data from `contractResult`, if any.
    pub fn revert_data(&self) -> Vec<u8> {
        self.contract_result
            .first()
            .and_then(|s| hex::decode(s).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockRawData {
    #[serde(default)]
    pub number: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub raw_data: BlockRawData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NowBlock {
    #[serde(default)]
    pub block_header: BlockHeader,
}

/// `{"value": "<hex id>"}` lookup body.
#[derive(Debug, Clone, Serialize)]
pub struct IdRequest {
    pub value: String,
}

/// Node messages are usually hex-encoded UTF-8.
pub fn decode_message(message: &str) -> String {
    hex::decode(message)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| message.to_string())
}

/// Parses a txID and checks it is the sha256 of `raw_data_hex`.
pub fn verify_tx_id(tx: &TronTransaction) -> Result<B256> {
    let raw = hex::decode(&tx.raw_data_hex)
        .map_err(|e| SweepError::NodeRejected(format!("raw_data_hex is not hex: {e}")))?;
    let expected = B256::from_slice(&Sha256::digest(&raw));
    let claimed: B256 = tx
        .tx_id
        .parse()
        .map_err(|e| SweepError::NodeRejected(format!("invalid txID {}: {e}", tx.tx_id)))?;
    if claimed != expected {
        return Err(SweepError::NodeRejected(format!(
            "txID {claimed} does not match sha256(raw_data_hex) {expected}"
        )));
    }
    Ok(expected)
}

/// Signs the txID and appends the `r‖s‖v` signature.
pub fn sign_transaction(signer: &dyn Signer, mut tx: TronTransaction) -> Result<SignedTron> {
    let hash = verify_tx_id(&tx)?;
    let signature = signer
        .sign_hash(&hash.0)
        .map_err(|e| SweepError::NodeRejected(format!("signing failed: {e}")))?;
    tx.signature.push(hex::encode(signature.to_bytes()));
    Ok(SignedTron {
        hash,
        transaction: tx,
    })
}
