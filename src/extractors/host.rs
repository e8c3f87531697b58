//! Extract the request host and enforce the trusted-host allow-list.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::HOST, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::ErrorBody;

/// Host the client addressed, without port, lowercased. From the `Host` header,
/// falling back to the URI authority (HTTP/2).
#[derive(Clone, Debug)]
pub struct RequestHost(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for RequestHost
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_string()))
            .map(|h| strip_port(h.trim()).to_ascii_lowercase())
            .filter(|h| !h.is_empty());
        Ok(RequestHost(value))
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // [::1]:8000
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Allow-list of host patterns: exact names, `*` for any, `*.domain` for subdomains.
#[derive(Clone, Debug)]
pub struct TrustedHosts {
    patterns: Vec<String>,
    allow_any: bool,
}

impl TrustedHosts {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let allow_any = patterns.iter().any(|p| p == "*");
        Self { patterns, allow_any }
    }

    pub fn allows(&self, host: &str) -> bool {
        if self.allow_any {
            return true;
        }
        self.patterns.iter().any(|pattern| match pattern.strip_prefix("*.") {
            Some(domain) => host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1),
            None => host == pattern,
        })
    }
}

/// Middleware: reject requests whose host is missing or not trusted.
pub async fn enforce_trusted_host(
    State(hosts): State<Arc<TrustedHosts>>,
    RequestHost(host): RequestHost,
    request: Request,
    next: Next,
) -> Response {
    let trusted = hosts.allow_any || host.as_deref().is_some_and(|h| hosts.allows(h));
    if !trusted {
        tracing::warn!(host = ?host, "rejected untrusted host");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                detail: "Invalid host header".into(),
            }),
        )
            .into_response();
    }
    next.run(request).await
}
