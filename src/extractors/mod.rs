mod host;
mod request;

pub use host::{enforce_trusted_host, RequestHost, TrustedHosts};
pub use request::{ItemId, JsonBody, QueryParams};
