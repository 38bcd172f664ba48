//! Per-client throttling middleware for link creation.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::application::services::Throttler;
use crate::error::AppError;
use crate::utils::client_ip::client_ip;

/// Slows down and caps requests per client.
///
/// # Flow
///
/// 1. Identify the client (peer address, or forwarding headers behind a proxy)
/// 2. Hold the request for the slow-down delay, if any
/// 3. Reject with `429 Too Many Requests` and `Retry-After` once the hard cap is hit
/// 4. Continue to the handler
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/newURL", post(new_url_handler))
///     .route_layer(middleware::from_fn_with_state(state.throttler.clone(), throttle::layer));
/// ```
pub async fn layer(
    State(throttler): State<Arc<Throttler>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_ip(&req, throttler.behind_proxy());

    let delay = throttler.slow_down_delay(client);
    if !delay.is_zero() {
        tracing::debug!(client = %client, delay_ms = delay.as_millis() as u64, "Slowing down client");
        tokio::time::sleep(delay).await;
    }

    throttler.admit(client)?;

    Ok(next.run(req).await)
}
