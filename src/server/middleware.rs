//! Rate limiting middleware.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::convert::{ApiError, too_many_requests};
use crate::{ClientRateLimiter, ImgcacheError};

/// Reject the request with 429 once its client is over quota.
///
/// Clients are identified by the peer address of the connection. Requests
/// without connection info (e.g. routers driven directly in tests) all
/// share the unspecified address.
pub async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check(client_ip(&request)) {
        Ok(()) => next.run(request).await,
        Err(ImgcacheError::RateLimited { retry_after }) => {
            too_many_requests(limiter.message(), retry_after)
        }
        Err(e) => ApiError(e).into_response(),
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        })
}
