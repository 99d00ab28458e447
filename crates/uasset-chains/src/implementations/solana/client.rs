//! Solana JSON-RPC client seam and its reqwest-backed implementation.

use crate::utils::{with_timeout, RpcError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use solana_sdk::{hash::Hash, message::Message, pubkey::Pubkey};
use std::{
	str::FromStr,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};
use tracing::debug;

/// Parsed fields of an SPL mint account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAccount {
	pub decimals: u8,
	/// Raw supply in base units.
	pub supply: String,
	/// Only present on mints owned by a wrapped-asset program.
	pub underlying_asset: Option<String>,
	pub exchange_rate: Option<String>,
}

/// Fields of a confirmed transaction the gateway reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
	pub slot: u64,
	/// Unix seconds, when the node knows it.
	pub block_time: Option<i64>,
	pub account_keys: Vec<String>,
	/// Whether execution metadata carries an error.
	pub failed: bool,
}

/// The Solana JSON-RPC capabilities the Solana provider needs.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
	/// `getAccountInfo` with `jsonParsed` encoding; `None` when the account
	/// does not exist.
	async fn get_mint(&self, mint: &str) -> Result<Option<MintAccount>, RpcError>;

	/// Raw amount held in the owner's first token account for `mint`; `None`
	/// when the owner has no such account.
	async fn get_token_balance(&self, owner: &str, mint: &str)
		-> Result<Option<String>, RpcError>;

	async fn get_transaction(&self, signature: &str)
		-> Result<Option<ConfirmedTransaction>, RpcError>;

	/// Fee in lamports for a single-signature message paid by `payer`.
	async fn get_fee_per_signature(&self, payer: &str) -> Result<u64, RpcError>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
	result: Option<T>,
	error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
	code: i64,
	message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
	value: T,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
	data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedMintInfo {
	decimals: u8,
	supply: String,
	#[serde(default)]
	underlying_asset: Option<Value>,
	#[serde(default)]
	exchange_rate: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
	account: AccountInfo,
}

#[derive(Debug, Deserialize)]
struct TransactionResult {
	slot: u64,
	#[serde(rename = "blockTime")]
	block_time: Option<i64>,
	meta: Option<TransactionMeta>,
	transaction: EncodedTransaction,
}

#[derive(Debug, Deserialize)]
struct TransactionMeta {
	#[serde(default)]
	err: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct EncodedTransaction {
	message: EncodedMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedMessage {
	account_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LatestBlockhash {
	blockhash: String,
}

/// Unwraps a JSON-RPC 2.0 response body. A `null` result is `Ok(None)`.
fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<Option<T>, RpcError> {
	let response: RpcResponse<T> =
		serde_json::from_value(body).map_err(|e| RpcError::Decode(e.to_string()))?;

	if let Some(error) = response.error {
		return Err(RpcError::Transport(format!(
			"{} (code {})",
			error.message, error.code
		)));
	}
	Ok(response.result)
}

/// Extracts the mint layout from a `jsonParsed` account data field.
fn parse_mint(mint: &str, data: Value) -> Result<MintAccount, RpcError> {
	let parsed = data.get("parsed").ok_or_else(|| {
		RpcError::Decode(format!("Account {} is not a parsed token account", mint))
	})?;

	if parsed.get("type").and_then(Value::as_str) != Some("mint") {
		return Err(RpcError::Decode(format!(
			"Account {} is not an SPL token mint",
			mint
		)));
	}

	let info: ParsedMintInfo = parsed
		.get("info")
		.cloned()
		.map(serde_json::from_value)
		.transpose()
		.map_err(|e| RpcError::Decode(e.to_string()))?
		.ok_or_else(|| RpcError::Decode(format!("Mint {} has no parsed info", mint)))?;

	Ok(MintAccount {
		decimals: info.decimals,
		supply: info.supply,
		underlying_asset: info.underlying_asset.and_then(scalar_to_string),
		exchange_rate: info.exchange_rate.and_then(scalar_to_string),
	})
}

fn scalar_to_string(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Reads `parsed.info.tokenAmount.amount` from a token account.
fn parse_token_amount(data: &Value) -> Result<String, RpcError> {
	data.pointer("/parsed/info/tokenAmount/amount")
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| RpcError::Decode("token account without tokenAmount.amount".to_string()))
}

/// Serializes a legacy message with `payer` as the only signer and no
/// instructions. This is the smallest message `getFeeForMessage` prices.
fn fee_message(payer: &str, blockhash: &str) -> Result<Vec<u8>, RpcError> {
	let payer_key = Pubkey::from_str(payer)
		.map_err(|e| RpcError::Decode(format!("Invalid fee payer {}: {}", payer, e)))?;
	let recent_blockhash = Hash::from_str(blockhash)
		.map_err(|e| RpcError::Decode(format!("Invalid blockhash {}: {}", blockhash, e)))?;

	Ok(Message::new_with_blockhash(&[], Some(&payer_key), &recent_blockhash).serialize())
}

/// [`SolanaRpc`] over HTTP JSON-RPC.
pub struct HttpSolanaClient {
	http: reqwest::Client,
	rpc_url: String,
	timeout: Duration,
	next_id: AtomicU64,
}

impl std::fmt::Debug for HttpSolanaClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpSolanaClient")
			.field("rpc_url", &self.rpc_url)
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl HttpSolanaClient {
	pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, RpcError> {
		reqwest::Url::parse(rpc_url)
			.map_err(|e| RpcError::Transport(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let http = reqwest::Client::builder()
			.build()
			.map_err(|e| RpcError::Transport(e.to_string()))?;

		Ok(Self {
			http,
			rpc_url: rpc_url.to_string(),
			timeout,
			next_id: AtomicU64::new(1),
		})
	}

	pub fn rpc_url(&self) -> &str {
		&self.rpc_url
	}

	async fn request<T: DeserializeOwned>(
		&self,
		method: &str,
		params: Value,
	) -> Result<Option<T>, RpcError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		debug!("{} #{} at {}", method, id, self.rpc_url);

		with_timeout(self.timeout, method, async {
			let response = self
				.http
				.post(&self.rpc_url)
				.json(&body)
				.send()
				.await
				.map_err(|e| RpcError::Transport(e.to_string()))?;

			let status = response.status();
			if !status.is_success() {
				return Err(RpcError::Transport(format!(
					"{} returned HTTP {}",
					method, status
				)));
			}

			let raw: Value = response
				.json()
				.await
				.map_err(|e| RpcError::Decode(e.to_string()))?;
			decode_envelope(raw)
		})
		.await
	}

	/// Like [`Self::request`] for methods whose result is never `null`.
	async fn request_required<T: DeserializeOwned>(
		&self,
		method: &str,
		params: Value,
	) -> Result<T, RpcError> {
		self.request(method, params)
			.await?
			.ok_or_else(|| RpcError::Decode(format!("{} returned no result", method)))
	}
}

#[async_trait]
impl SolanaRpc for HttpSolanaClient {
	async fn get_mint(&self, mint: &str) -> Result<Option<MintAccount>, RpcError> {
		let response: WithContext<Option<AccountInfo>> = self
			.request_required(
				"getAccountInfo",
				json!([mint, { "encoding": "jsonParsed" }]),
			)
			.await?;

		response
			.value
			.map(|account| parse_mint(mint, account.data))
			.transpose()
	}

	async fn get_token_balance(
		&self,
		owner: &str,
		mint: &str,
	) -> Result<Option<String>, RpcError> {
		let response: WithContext<Vec<KeyedAccount>> = self
			.request_required(
				"getTokenAccountsByOwner",
				json!([owner, { "mint": mint }, { "encoding": "jsonParsed" }]),
			)
			.await?;

		response
			.value
			.first()
			.map(|keyed| parse_token_amount(&keyed.account.data))
			.transpose()
	}

	async fn get_transaction(
		&self,
		signature: &str,
	) -> Result<Option<ConfirmedTransaction>, RpcError> {
		let result: Option<TransactionResult> = self
			.request(
				"getTransaction",
				json!([signature, {
					"encoding": "json",
					"commitment": "confirmed",
					"maxSupportedTransactionVersion": 0,
				}]),
			)
			.await?;

		Ok(result.map(|tx| ConfirmedTransaction {
			slot: tx.slot,
			block_time: tx.block_time,
			account_keys: tx.transaction.message.account_keys,
			failed: tx
				.meta
				.and_then(|meta| meta.err)
				.is_some_and(|err| !err.is_null()),
		}))
	}

	async fn get_fee_per_signature(&self, payer: &str) -> Result<u64, RpcError> {
		let latest: WithContext<LatestBlockhash> = self
			.request_required(
				"getLatestBlockhash",
				json!([{ "commitment": "confirmed" }]),
			)
			.await?;

		let message = fee_message(payer, &latest.value.blockhash)?;
		let fee: WithContext<Option<u64>> = self
			.request_required(
				"getFeeForMessage",
				json!([STANDARD.encode(message), { "commitment": "confirmed" }]),
			)
			.await?;

		fee.value.ok_or_else(|| {
			RpcError::Decode(format!(
				"no fee for blockhash {}",
				latest.value.blockhash
			))
		})
	}
}
