//! Random slowdown middleware, for exercising clients against a slow catalogue.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand_distr::{Distribution, Normal};
use std::time::Duration;
use tracing::debug;

const MEAN_DELAY_MS: f64 = 1000.0;
const DELAY_STD_DEV_MS: f64 = 2000.0;

/// Sleep for a gaussian random delay (negative samples clamp to zero) before
/// handing the request on.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    if let Ok(normal) = Normal::new(MEAN_DELAY_MS, DELAY_STD_DEV_MS) {
        let delay_ms = 0.0f64.max(normal.sample(&mut rand::rng()));
        debug!("Delaying {} by {}ms", request.uri(), delay_ms as u64);
        tokio::time::sleep(Duration::from_millis(delay_ms as u64)).await;
    }
    next.run(request).await
}
