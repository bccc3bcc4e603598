//! Feature modules
//!
//! Each feature is a vertical slice: commands and queries own the business
//! logic, `routes.rs` wires them to HTTP, and everything runs against the
//! repository traits in [`crate::db`] so the slices are testable without a
//! database.

pub mod brands;
pub mod login;
pub mod products;
pub mod shared;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};

use crate::auth::{require_bearer, TokenService};
use crate::db::{BrandRepository, ProductRepository, UserRepository};
use crate::middleware::{
    FixedWindowLayer, FixedWindowPolicy, TokenBucketLayer, TokenBucketPolicy,
};

/// Shared state handed to every feature router
#[derive(Clone)]
pub struct FeatureState {
    pub brands: Arc<dyn BrandRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: TokenService,
}

/// Assemble the `/api/v1` router.
///
/// Brand and product routes sit behind two layers, outermost first: the
/// per-token admission buckets, then the bearer guard. Admission runs before
/// authentication, so an over-budget request is refused with `429` even when
/// its token would not have verified. The login route bypasses both and is
/// metered by the per-IP fixed window instead.
pub fn router(
    state: FeatureState,
    login_window: Arc<FixedWindowPolicy>,
    token_buckets: Arc<TokenBucketPolicy>,
) -> Router {
    let protected = Router::new()
        .nest("/brands", brands::brand_routes())
        .nest("/products", products::product_routes())
        .layer(from_fn_with_state(state.tokens.clone(), require_bearer))
        .layer(TokenBucketLayer::new(token_buckets));

    let public = Router::new()
        .nest("/login", login::login_routes())
        .layer(FixedWindowLayer::new(login_window));

    protected.merge(public).with_state(state)
}
