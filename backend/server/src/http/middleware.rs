use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use connector_integration::connectors::walletone::responses::NotificationResponse;
use domain_types::types::FieldMap;

use super::{state::AppState, utils};
use crate::{logger, metrics};

/// Largest notification body accepted from the gateway
const MAX_NOTIFICATION_BODY: usize = 64 * 1024;

/// Guards the notification route: the request only reaches the handler when
/// its signature matches and the order was accepted. The verified fields are
/// placed in the request extensions.
pub async fn walletone_pay(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_NOTIFICATION_BODY).await {
        Ok(bytes) => bytes,
        Err(error) => {
            logger::warn!(%error, "failed to read walletone notification body");
            return utils::notification_reply(&NotificationResponse::retry(
                "Failed to read request body",
            ));
        }
    };

    let fields = utils::form_fields_from_body(&body_bytes).unwrap_or_else(|error| {
        logger::warn!(%error, "walletone notification body is not form encoded");
        FieldMap::new()
    });

    let result =
        metrics::with_latency("notification", || state.walletone.verify_notification(&fields));

    match result {
        Ok(_) => {
            parts.extensions.insert(fields);
            next.run(Request::from_parts(parts, Body::from(body_bytes)))
                .await
        }
        Err(report) => {
            utils::notification_reply(&NotificationResponse::from_error(report.current_context()))
        }
    }
}
