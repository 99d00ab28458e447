//! HTTP API for the gateway.
//!
//! Every JSON body returned under `/api/v1/uasset` is a [`ResponseEnvelope`].
//! Request validation happens here, before the query service is called, so a
//! malformed address or hash never reaches a chain node.

use crate::service::QueryService;
use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection, QueryRejection},
		DefaultBodyLimit, Path, Query, State,
	},
	http::{header, HeaderValue, StatusCode},
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use chrono::Utc;
use serde::Serialize;
use std::{any::Any, str::FromStr};
use tokio::net::TcpListener;
use tower_http::{
	catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
	trace::TraceLayer,
};
use tracing::{error, info, warn};
use uasset_types::{
	validation::{is_valid_address, is_valid_hash},
	BlockchainFamily, EstimateGasBody, GasEstimateRequest, HealthResponse, NetworksQuery,
	ResponseEnvelope, ServiceEndpoints, ServiceInfo,
};

/// Prefix of the gateway's query routes.
pub const UASSET_PREFIX: &str = "/api/v1/uasset";

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub service: QueryService,
}

/// Builds the complete router, including middleware.
pub fn create_router(state: AppState, max_request_size: usize) -> Router {
	Router::new()
		.route("/", get(service_info))
		.route("/health", get(health))
		.nest(UASSET_PREFIX, uasset_routes())
		.fallback(not_found)
		.with_state(state)
		.layer(DefaultBodyLimit::max(max_request_size))
		.layer(CatchPanicLayer::custom(handle_panic))
		.layer(SetResponseHeaderLayer::if_not_present(
			header::X_CONTENT_TYPE_OPTIONS,
			HeaderValue::from_static("nosniff"),
		))
		.layer(SetResponseHeaderLayer::if_not_present(
			header::X_FRAME_OPTIONS,
			HeaderValue::from_static("DENY"),
		))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

fn uasset_routes() -> Router<AppState> {
	Router::new()
		.route("/networks", get(list_networks))
		.route("/{network_id}/asset/{contract_address}", get(get_asset))
		.route(
			"/{network_id}/balance/{contract_address}/{wallet_address}",
			get(get_balance),
		)
		.route("/{network_id}/transaction/{hash}", get(get_transaction))
		.route("/{network_id}/estimate-gas", post(estimate_gas))
}

/// Serves the router until `shutdown` resolves.
pub async fn start_http_server<F>(
	router: Router,
	bind_address: &str,
	shutdown: F,
) -> anyhow::Result<()>
where
	F: std::future::Future<Output = ()> + Send + 'static,
{
	let listener = TcpListener::bind(bind_address).await?;
	info!("uAsset gateway listening on {}", listener.local_addr()?);

	axum::serve(listener, router)
		.with_graceful_shutdown(shutdown)
		.await?;

	Ok(())
}

/// 200 for a successful envelope, 400 otherwise.
fn respond<T: Serialize>(envelope: ResponseEnvelope<T>) -> Response {
	let status = if envelope.success {
		StatusCode::OK
	} else {
		StatusCode::BAD_REQUEST
	};
	(status, Json(envelope)).into_response()
}

fn bad_request(message: String) -> Response {
	warn!("Rejected request: {}", message);
	respond(ResponseEnvelope::<()>::err(message))
}

/// Unwraps a path or query extractor, turning its rejection into a 400
/// envelope instead of axum's plain-text body.
fn extracted<T, R: std::fmt::Display>(extraction: Result<T, R>) -> Result<T, Response> {
	extraction.map_err(|rejection| bad_request(format!("Invalid request: {}", rejection)))
}

/// GET /
async fn service_info() -> Json<ServiceInfo> {
	Json(ServiceInfo {
		message: "uAsset Backend API".to_string(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		endpoints: ServiceEndpoints {
			health: "/health".to_string(),
			uasset: UASSET_PREFIX.to_string(),
		},
	})
}

/// GET /health
async fn health() -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "healthy".to_string(),
		timestamp: Utc::now(),
		version: env!("CARGO_PKG_VERSION").to_string(),
	})
}

/// GET /api/v1/uasset/networks
async fn list_networks(
	State(state): State<AppState>,
	query: Result<Query<NetworksQuery>, QueryRejection>,
) -> Response {
	let Query(query) = match extracted(query) {
		Ok(query) => query,
		Err(response) => return response,
	};

	let family = match query.family.as_deref().map(BlockchainFamily::from_str) {
		None => None,
		Some(Ok(family)) => Some(family),
		Some(Err(e)) => return bad_request(e),
	};

	respond(state.service.list_networks(family))
}

/// GET /api/v1/uasset/{network_id}/asset/{contract_address}
async fn get_asset(
	State(state): State<AppState>,
	path: Result<Path<(String, String)>, PathRejection>,
) -> Response {
	let Path((network_id, contract_address)) = match extracted(path) {
		Ok(path) => path,
		Err(response) => return response,
	};

	if !is_valid_address(&contract_address, &network_id) {
		return bad_request(format!(
			"Invalid contract address for network: {}",
			network_id
		));
	}

	respond(
		state
			.service
			.get_asset_info(&network_id, &contract_address)
			.await,
	)
}

/// GET /api/v1/uasset/{network_id}/balance/{contract_address}/{wallet_address}
async fn get_balance(
	State(state): State<AppState>,
	path: Result<Path<(String, String, String)>, PathRejection>,
) -> Response {
	let Path((network_id, contract_address, wallet_address)) = match extracted(path) {
		Ok(path) => path,
		Err(response) => return response,
	};

	if !is_valid_address(&contract_address, &network_id) {
		return bad_request(format!(
			"Invalid contract address for network: {}",
			network_id
		));
	}

	if !is_valid_address(&wallet_address, &network_id) {
		return bad_request(format!(
			"Invalid wallet address for network: {}",
			network_id
		));
	}

	respond(
		state
			.service
			.get_balance(&network_id, &contract_address, &wallet_address)
			.await,
	)
}

/// GET /api/v1/uasset/{network_id}/transaction/{hash}
async fn get_transaction(
	State(state): State<AppState>,
	path: Result<Path<(String, String)>, PathRejection>,
) -> Response {
	let Path((network_id, hash)) = match extracted(path) {
		Ok(path) => path,
		Err(response) => return response,
	};

	if !is_valid_hash(&hash, &network_id) {
		return bad_request(format!(
			"Invalid transaction hash for network: {}",
			network_id
		));
	}

	respond(state.service.get_transaction(&network_id, &hash).await)
}

/// POST /api/v1/uasset/{network_id}/estimate-gas
async fn estimate_gas(
	State(state): State<AppState>,
	path: Result<Path<String>, PathRejection>,
	body: Result<Json<EstimateGasBody>, JsonRejection>,
) -> Response {
	let Path(network_id) = match extracted(path) {
		Ok(path) => path,
		Err(response) => return response,
	};

	// A body sent without a JSON content type (or no body at all) reads as `{}`.
	let body = match body {
		Ok(Json(body)) => body,
		Err(JsonRejection::MissingJsonContentType(_)) => EstimateGasBody::default(),
		Err(rejection) => {
			return bad_request(format!("Invalid request body: {}", rejection.body_text()));
		}
	};

	let non_empty = |field: Option<String>| field.filter(|value| !value.is_empty());
	let fields = (non_empty(body.from), non_empty(body.to), non_empty(body.amount));
	let (from, to, amount) = match fields {
		(Some(from), Some(to), Some(amount)) => (from, to, amount),
		_ => return bad_request("Missing required fields: from, to, amount".to_string()),
	};

	if !is_valid_address(&from, &network_id) {
		return bad_request(format!(
			"Invalid 'from' address for network: {}",
			network_id
		));
	}

	if !is_valid_address(&to, &network_id) {
		return bad_request(format!(
			"Invalid 'to' address for network: {}",
			network_id
		));
	}

	let request = GasEstimateRequest { from, to, amount };
	respond(state.service.estimate_gas(&network_id, &request).await)
}

async fn not_found() -> Response {
	(
		StatusCode::NOT_FOUND,
		Json(ResponseEnvelope::<()>::err("Endpoint not found")),
	)
		.into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
	let detail = if let Some(s) = err.downcast_ref::<String>() {
		s.as_str()
	} else if let Some(s) = err.downcast_ref::<&str>() {
		s
	} else {
		"unknown panic"
	};
	error!("Request handler panicked: {}", detail);

	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ResponseEnvelope::<()>::err("Internal server error")),
	)
		.into_response()
}
