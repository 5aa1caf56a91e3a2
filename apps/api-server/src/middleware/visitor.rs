//! Visitor signals for visit counting.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::convert::Infallible;
use std::future::{Ready, ready};

/// Network origin and agent string of the current request.
///
/// The origin is the first `Forwarded`/`X-Forwarded-For` hop when present,
/// otherwise the peer address. Both values are client-controlled.
#[derive(Debug, Clone)]
pub struct VisitorInfo {
    pub network_origin: String,
    pub agent: String,
}

impl FromRequest for VisitorInfo {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let network_origin = req
            .connection_info()
            .realip_remote_addr()
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| "Unknown IP".to_string());

        let agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or("Unknown Agent")
            .to_string();

        ready(Ok(VisitorInfo {
            network_origin,
            agent,
        }))
    }
}
