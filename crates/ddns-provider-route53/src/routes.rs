//! Configurator data route
//!
//! `GET /route53/data` runs discovery, stores the result in the host
//! configuration under [`NAMESPACE`](crate::NAMESPACE) and returns it.
//! The host merges this router into its own.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use ddns_core::{ConfigStore, Error, ProfileZoneMap};
use serde::Serialize;
use std::sync::Arc;

use crate::{NAMESPACE, Route53Provider};

/// Path of the configurator data route
pub const DATA_PATH: &str = "/route53/data";

#[derive(Clone)]
struct DataState {
    provider: Arc<Route53Provider>,
    store: Arc<dyn ConfigStore>,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Error returned by the data route
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::ProfilesUnavailable { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Router serving [`DATA_PATH`]
pub fn router(provider: Arc<Route53Provider>, store: Arc<dyn ConfigStore>) -> Router {
    Router::new()
        .route(DATA_PATH, get(get_data))
        .with_state(DataState { provider, store })
}

async fn get_data(State(state): State<DataState>) -> Result<Json<ProfileZoneMap>, ApiError> {
    let data = state.provider.discover().await.map_err(|e| {
        tracing::warn!("Route 53 discovery failed: {}", e);
        e
    })?;

    state
        .store
        .set_plugin(NAMESPACE, serde_json::to_value(&data).map_err(Error::from)?)
        .await?;
    state.store.save().await?;

    tracing::info!("Discovered {} AWS profile(s)", data.len());
    Ok(Json(data))
}
