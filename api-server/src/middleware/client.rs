//! Client identity extraction

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use flowguard_core::constants::ANONYMOUS_CLIENT;

/// Caller identity: first `X-Forwarded-For` entry, else the socket peer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity(pub Option<String>);

impl ClientIdentity {
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(ANONYMOUS_CLIENT)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Self(forwarded.or(peer)))
    }
}
