use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{handlers, middleware::walletone_pay, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let notification_routes = Router::new()
        .route("/walletone/notify", post(handlers::notification::notify))
        .route_layer(middleware::from_fn_with_state(state.clone(), walletone_pay));

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/checkout", post(handlers::checkout::checkout))
        .route("/checkout/form", post(handlers::checkout::checkout_form))
        .merge(notification_routes)
        .with_state(state)
}
