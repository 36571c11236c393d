//! HTTP API server.

use crate::service::{ReplicatorService, ServiceError};
use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post, put},
	Router,
};
use replicator_delivery::DeliveryError;
use replicator_payload::PayloadError;
use replicator_types::{
	ErrorResponse, InvestView, PortfolioRow, RegisterSafeRequest, SessionResponse,
	SubmitOrderRequest, SubmitOrderResponse, TrackedSubmission, TransactionBatchPayload,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

type AppState = Arc<ReplicatorService>;

/// Builds the API router over a shared service.
pub fn router(service: AppState) -> Router {
	Router::new()
		.route("/health", get(health_check))
		.route("/portfolios", get(list_portfolios))
		.route("/invest/{address}", get(invest_view))
		.route("/invest/{address}/order", post(submit_order))
		.route("/safe/{address}/batch", get(safe_batch))
		.route("/session/{owner}", get(get_session))
		.route("/session/{owner}/safe", put(register_safe))
		.route(
			"/submissions/{id}",
			get(get_submission).delete(cancel_submission),
		)
		.with_state(service)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

/// Serves the API until `shutdown` resolves.
pub async fn start_http_server(
	service: AppState,
	shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
	let settings = &service.config().service;
	let bind_address = format!("{}:{}", settings.host, settings.http_port);
	let listener = tokio::net::TcpListener::bind(&bind_address).await?;

	info!("API server listening on {}", bind_address);

	axum::serve(listener, router(service))
		.with_graceful_shutdown(shutdown)
		.await?;

	Ok(())
}

#[derive(Debug, Deserialize)]
struct InvestQuery {
	owner: Option<String>,
}

async fn health_check(State(service): State<AppState>) -> Json<serde_json::Value> {
	Json(serde_json::json!({
		"status": "ok",
		"service": service.config().service.name,
		"chainId": service.config().default_network.to_string(),
		"delivery": service.delivery_enabled(),
	}))
}

async fn list_portfolios(
	State(service): State<AppState>,
) -> Result<Json<Vec<PortfolioRow>>, ServiceError> {
	Ok(Json(service.portfolios().await?))
}

async fn invest_view(
	State(service): State<AppState>,
	Path(address): Path<String>,
	Query(query): Query<InvestQuery>,
) -> Result<Json<InvestView>, ServiceError> {
	Ok(Json(
		service
			.invest_view(&address, query.owner.as_deref())
			.await?,
	))
}

async fn safe_batch(
	State(service): State<AppState>,
	Path(address): Path<String>,
) -> Result<Json<TransactionBatchPayload>, ServiceError> {
	Ok(Json(service.safe_batch(&address)?))
}

async fn register_safe(
	State(service): State<AppState>,
	Path(owner): Path<String>,
	body: Result<Json<RegisterSafeRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ServiceError> {
	let Json(request) = body.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;
	Ok(Json(service.register_safe(&owner, request.safe)?))
}

async fn get_session(
	State(service): State<AppState>,
	Path(owner): Path<String>,
) -> Result<Json<SessionResponse>, ServiceError> {
	Ok(Json(service.session(&owner)?))
}

async fn submit_order(
	State(service): State<AppState>,
	Path(address): Path<String>,
	body: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitOrderResponse>), ServiceError> {
	let Json(request) = body.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;
	let response = service.submit_order(&address, request).await?;
	Ok((StatusCode::ACCEPTED, Json(response)))
}

async fn get_submission(
	State(service): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TrackedSubmission>, ServiceError> {
	Ok(Json(service.submission(&id).await?))
}

async fn cancel_submission(
	State(service): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TrackedSubmission>, ServiceError> {
	Ok(Json(service.cancel_submission(&id)?))
}

impl ServiceError {
	fn status(&self) -> (StatusCode, &'static str) {
		match self {
			ServiceError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
			ServiceError::Payload(PayloadError::InvalidAddress { .. }) => {
				(StatusCode::BAD_REQUEST, "INVALID_ADDRESS")
			}
			ServiceError::Payload(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PAYLOAD_ERROR"),
			ServiceError::Catalog(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CATALOG_ERROR"),
			ServiceError::Delivery(err) => match err {
				DeliveryError::NotFound(_) => (StatusCode::NOT_FOUND, "SUBMISSION_NOT_FOUND"),
				DeliveryError::InvalidTransition { .. } => {
					(StatusCode::CONFLICT, "INVALID_TRANSITION")
				}
				DeliveryError::NotConfigured => {
					(StatusCode::SERVICE_UNAVAILABLE, "DELIVERY_NOT_CONFIGURED")
				}
				DeliveryError::Network(_) | DeliveryError::Rejected(_) => {
					(StatusCode::BAD_GATEWAY, "DELIVERY_ERROR")
				}
			},
		}
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let (status, code) = self.status();
		if status.is_server_error() {
			warn!(error = %self, "request failed");
		}

		let body = ErrorResponse {
			error: code.to_string(),
			message: self.to_string(),
		};
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::{Method, Request};
	use replicator_config::ReplicatorConfig;
	use replicator_delivery::{implementations::mock::MockDelivery, DeliveryInterface};
	use tower::ServiceExt;

	const SAFE: &str = "0x1f9090aaE28b8a3dCeaDf281B0F12828e676c326";

	fn app(delivery: Option<Arc<MockDelivery>>) -> Router {
		let service = ReplicatorService::with_delivery(
			ReplicatorConfig::default(),
			delivery.map(|d| d as Arc<dyn DeliveryInterface>),
		)
		.unwrap();
		router(Arc::new(service))
	}

	async fn send(
		app: &Router,
		method: Method,
		uri: &str,
		body: Option<serde_json::Value>,
	) -> (StatusCode, serde_json::Value) {
		let mut request = Request::builder().method(method).uri(uri);
		let body = match body {
			Some(json) => {
				request = request.header("content-type", "application/json");
				Body::from(json.to_string())
			}
			None => Body::empty(),
		};

		let response = app
			.clone()
			.oneshot(request.body(body).unwrap())
			.await
			.unwrap();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let json = if bytes.is_empty() {
			serde_json::Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, json)
	}

	#[tokio::test]
	async fn test_health() {
		let (status, body) = send(&app(None), Method::GET, "/health", None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["chainId"], "5");
		assert_eq!(body["delivery"], false);
	}

	#[tokio::test]
	async fn test_portfolios_have_links() {
		let (status, body) = send(&app(None), Method::GET, "/portfolios", None).await;
		assert_eq!(status, StatusCode::OK);
		let rows = body.as_array().unwrap();
		assert_eq!(rows.len(), 7);
		assert_eq!(rows[5]["link"], format!("/invest/{}", SAFE));
		assert_eq!(rows[5]["totalAmount"], "$200.00");
	}

	#[tokio::test]
	async fn test_safe_batch() {
		let uri = format!("/safe/{}/batch", SAFE);
		let (status, body) = send(&app(None), Method::GET, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["transactions"].as_array().unwrap().len(), 4);
		assert_eq!(body["transactions"][3]["contractMethod"]["name"], "create");
		assert_eq!(body["transactions"][0]["data"], serde_json::Value::Null);
	}

	#[tokio::test]
	async fn test_malformed_address_is_bad_request() {
		let (status, body) = send(&app(None), Method::GET, "/safe/0x1234/batch", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_ADDRESS");

		let (status, _) = send(&app(None), Method::GET, "/invest/hello", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_invest_view() {
		let uri = format!("/invest/{}", SAFE);
		let (status, body) = send(&app(None), Method::GET, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert!(body["encodedOrder"].as_str().unwrap().starts_with("0x"));
		assert_eq!(body["allocation"].as_array().unwrap().len(), 3);
	}

	#[tokio::test]
	async fn test_session_round_trip() {
		let app = app(None);
		let owner = "0x000000000000000000000000000000000000000a";

		let (status, body) = send(&app, Method::GET, &format!("/session/{}", owner), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["safe"], serde_json::Value::Null);

		let (status, _) = send(
			&app,
			Method::PUT,
			&format!("/session/{}/safe", owner),
			Some(serde_json::json!({ "safe": SAFE })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);

		let (_, body) = send(&app, Method::GET, &format!("/session/{}", owner), None).await;
		assert_eq!(
			body["safe"].as_str().unwrap().to_lowercase(),
			SAFE.to_lowercase()
		);
	}

	#[tokio::test]
	async fn test_register_safe_rejects_bad_body() {
		let (status, body) = send(
			&app(None),
			Method::PUT,
			"/session/0x000000000000000000000000000000000000000a/safe",
			Some(serde_json::json!({ "safe": "nope" })),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_REQUEST");
	}

	#[tokio::test]
	async fn test_order_without_wallet_is_unavailable() {
		let uri = format!("/invest/{}/order", SAFE);
		let (status, body) =
			send(&app(None), Method::POST, &uri, Some(serde_json::json!({}))).await;
		assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(body["error"], "DELIVERY_NOT_CONFIGURED");
	}

	#[tokio::test]
	async fn test_order_lifecycle() {
		let delivery = Arc::new(MockDelivery::accepting());
		let app = app(Some(delivery.clone()));

		let uri = format!("/invest/{}/order", SAFE);
		let (status, body) = send(&app, Method::POST, &uri, Some(serde_json::json!({}))).await;
		assert_eq!(status, StatusCode::ACCEPTED);
		assert_eq!(body["status"]["state"], "pending");
		let id = body["id"].as_str().unwrap().to_string();

		let (status, body) =
			send(&app, Method::GET, &format!("/submissions/{}", id), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["status"]["state"], "pending");

		let (status, _) =
			send(&app, Method::DELETE, &format!("/submissions/{}", id), None).await;
		assert_eq!(status, StatusCode::OK);

		let (status, body) =
			send(&app, Method::GET, &format!("/submissions/{}", id), None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "SUBMISSION_NOT_FOUND");
		assert_eq!(delivery.sent().len(), 1);
	}

	#[tokio::test]
	async fn test_bad_submission_id() {
		let (status, _) = send(&app(None), Method::GET, "/submissions/42", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}
}
