#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common_utils::consts;
use connector_integration::connectors::walletone::{constants, signature};
use domain_types::types::{FieldMap, SignatureAlgorithm, WalletOneParams};
use secrecy::SecretString;
use server::{app, configs, logger::config::Log};
use tower::ServiceExt;

pub const SECRET: &str = "s3cret";
pub const MERCHANT_ID: i64 = 100;

pub fn test_config() -> configs::Config {
    configs::Config {
        common: configs::Common {
            environment: consts::Env::Development,
        },
        server: configs::Server {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        metrics: configs::MetricsServer {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        log: Log::default(),
        walletone: WalletOneParams {
            base_url: constants::API_URL.to_string(),
            app_base_url: Some("https://shop.example".to_string()),
            merchant_id: MERCHANT_ID,
            secret: Some(SecretString::new(SECRET.to_string())),
            signature_method: "sha1".to_string(),
            currency: "RUB".to_string(),
            success_url: Some("/payment/success".to_string()),
            fail_url: Some("/payment/fail".to_string()),
        },
    }
}

/// # Panics
///
/// Will panic if the test configuration is rejected
pub fn router() -> Router {
    router_with(test_config())
}

/// # Panics
///
/// Will panic if the given configuration is rejected
pub fn router_with(config: configs::Config) -> Router {
    #[allow(clippy::expect_used)]
    app::Service::new(&config)
        .expect("test configuration should be valid")
        .router()
}

pub fn sign(fields: FieldMap) -> FieldMap {
    let value = signature::generate_signature(
        &fields,
        &SecretString::new(SECRET.to_string()),
        SignatureAlgorithm::Sha1,
    );
    fields.with(constants::WMI_SIGNATURE, value)
}

pub fn form_body(fields: &FieldMap) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.to_form_pairs())
        .finish()
}

/// # Panics
///
/// Will panic if the request cannot be built or the body cannot be read
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    #[allow(clippy::expect_used)]
    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    #[allow(clippy::expect_used)]
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// # Panics
///
/// Will panic if the request cannot be built
pub fn post_form(uri: &str, body: String) -> Request<Body> {
    #[allow(clippy::expect_used)]
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request should build")
}

/// # Panics
///
/// Will panic if the request cannot be built
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    #[allow(clippy::expect_used)]
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}
