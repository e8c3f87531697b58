//! Router assembly: item and common routes wrapped in the cross-cutting layers
//! (trusted hosts, CORS, security headers, body limit, tracing).

mod common;
mod items;

pub use common::common_routes;
pub use items::item_routes;

use crate::config::Settings;
use crate::error::ConfigError;
use crate::extractors::{enforce_trusted_host, TrustedHosts};
use crate::state::AppState;
use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Headers set on every response, whatever its status.
pub const SECURITY_HEADERS: &[(HeaderName, &str)] = &[
    (header::STRICT_TRANSPORT_SECURITY, "max-age=31536000; includeSubDomains"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
];

/// Full application router.
pub fn app(state: AppState, settings: &Settings) -> Result<Router, ConfigError> {
    let hosts = Arc::new(TrustedHosts::new(&settings.trusted_hosts));
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(item_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(middleware::from_fn_with_state(hosts, enforce_trusted_host))
        .layer(cors_layer(&settings.cors_origins)?);
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name.clone(),
            HeaderValue::from_static(*value),
        ));
    }
    Ok(router.layer(TraceLayer::new_for_http()))
}

/// `*` allows any origin without credentials; an explicit list allows credentials.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: o.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
