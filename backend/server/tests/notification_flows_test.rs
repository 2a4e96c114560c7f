#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::http::StatusCode;
use connector_integration::connectors::walletone::constants;
use domain_types::types::FieldMap;

mod common;

fn accepted_notification() -> FieldMap {
    FieldMap::new()
        .with(constants::WMI_MERCHANT_ID, "100")
        .with(constants::WMI_PAYMENT_NO, "42")
        .with(constants::WMI_PAYMENT_AMOUNT, "10.00")
        .with(constants::WMI_CURRENCY_ID, "643")
        .with(constants::WMI_DESCRIPTION, "Заказ №42")
        .with(constants::WMI_ORDER_STATE, "Accepted")
}

#[tokio::test]
async fn test_signed_notification_is_acknowledged() {
    let body = common::form_body(&common::sign(accepted_notification()));
    let (status, text) =
        common::send(common::router(), common::post_form("/walletone/notify", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "WMI_RESULT=OK");
}

#[tokio::test]
async fn test_tampered_notification_is_retried() {
    let fields = common::sign(accepted_notification())
        .with(constants::WMI_PAYMENT_AMOUNT, "0.01");
    let (status, text) = common::send(
        common::router(),
        common::post_form("/walletone/notify", common::form_body(&fields)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "WMI_RESULT=RETRY&WMI_DESCRIPTION=Signature+is+wrong");
}

#[tokio::test]
async fn test_declined_notification_reports_state() {
    let fields = common::sign(
        accepted_notification().with(constants::WMI_ORDER_STATE, "Declined"),
    );
    let (status, text) = common::send(
        common::router(),
        common::post_form("/walletone/notify", common::form_body(&fields)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "WMI_RESULT=RETRY&WMI_DESCRIPTION=Declined");
}

#[tokio::test]
async fn test_empty_notification_is_retried() {
    let (status, text) = common::send(
        common::router(),
        common::post_form("/walletone/notify", String::new()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "WMI_RESULT=RETRY&WMI_DESCRIPTION=Empty+POST+data+received");
}

#[tokio::test]
async fn test_unsigned_notification_is_retried() {
    let (_, text) = common::send(
        common::router(),
        common::post_form(
            "/walletone/notify",
            common::form_body(&accepted_notification()),
        ),
    )
    .await;

    assert_eq!(
        text,
        "WMI_RESULT=RETRY&WMI_DESCRIPTION=Response+data+does+not+have+signature"
    );
}

#[tokio::test]
async fn test_payment_method_list_posted_with_brackets_verifies() {
    let fields = common::sign(
        accepted_notification().with(constants::WMI_PTENABLED, vec!["WebMoneyRUB", "CreditCardRUB"]),
    );
    let body = fields
        .to_form_pairs()
        .into_iter()
        .map(|(name, value)| {
            let name = if name == constants::WMI_PTENABLED {
                format!("{name}[]")
            } else {
                name
            };
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair(&name, &value)
                .finish()
        })
        .collect::<Vec<_>>()
        .join("&");

    let (_, text) =
        common::send(common::router(), common::post_form("/walletone/notify", body)).await;
    assert_eq!(text, "WMI_RESULT=OK");
}

#[tokio::test]
async fn test_md5_merchant_rejects_sha1_signature() {
    let mut config = common::test_config();
    config.walletone.signature_method = "md5".to_string();
    let body = common::form_body(&common::sign(accepted_notification()));

    let (_, text) = common::send(
        common::router_with(config),
        common::post_form("/walletone/notify", body),
    )
    .await;
    assert_eq!(text, "WMI_RESULT=RETRY&WMI_DESCRIPTION=Signature+is+wrong");
}

#[tokio::test]
async fn test_oversized_notification_is_retried() {
    let body = format!("WMI_DESCRIPTION={}", "a".repeat(128 * 1024));
    let (status, text) =
        common::send(common::router(), common::post_form("/walletone/notify", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text,
        "WMI_RESULT=RETRY&WMI_DESCRIPTION=Failed+to+read+request+body"
    );
}
