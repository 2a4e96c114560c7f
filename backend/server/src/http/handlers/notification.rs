use axum::{response::Response, Extension};
use connector_integration::connectors::walletone::{constants, responses::NotificationResponse};
use domain_types::types::FieldMap;

use crate::{http::utils, logger};

/// Reached only for notifications the middleware has verified
pub async fn notify(Extension(fields): Extension<FieldMap>) -> Response {
    logger::info!(
        payment_no = fields.get_scalar(constants::WMI_PAYMENT_NO),
        order_id = fields.get_scalar(constants::WMI_ORDER_ID),
        "walletone payment confirmed"
    );
    utils::notification_reply(&NotificationResponse::ok())
}
