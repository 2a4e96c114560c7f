use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use connector_integration::connectors::walletone::transformers::{
    build_auto_submit_html, WalletOneCheckout,
};
use domain_types::{errors::WalletOneError, router_response_types::Method, types::FieldMap};
use serde::{Deserialize, Serialize};

use crate::{
    error::ReportSwitchExt,
    http::{error::HttpError, state::AppState, ValidatedJson},
    metrics,
};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_no: String,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub only: Option<Vec<String>>,
    #[serde(default)]
    pub except: Option<Vec<String>>,
    /// Extra `WMI_*` fields; they never override order or merchant fields
    #[serde(default)]
    pub options: Option<FieldMap>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub method: String,
    pub fields: FieldMap,
}

pub async fn checkout(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, HttpError> {
    let response = signed(|| {
        let checkout = build_checkout(&state, request)?;
        Ok(CheckoutResponse {
            url: state.walletone.checkout_url().to_string(),
            method: Method::Post.to_string(),
            fields: checkout.get_params()?,
        })
    })?;
    Ok(Json(response))
}

pub async fn checkout_form(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<Response, HttpError> {
    let form = signed(|| build_checkout(&state, request)?.redirect_form())?;
    Ok(Html(build_auto_submit_html(&form)).into_response())
}

fn signed<T>(
    handler: impl FnOnce() -> error_stack::Result<T, WalletOneError>,
) -> Result<T, HttpError> {
    let result = metrics::with_latency("checkout", handler);
    match &result {
        Ok(_) => metrics::record_checkout(metrics::OUTCOME_SUCCESS),
        Err(_) => metrics::record_checkout(metrics::OUTCOME_INVALID),
    }
    Ok(result.switch()?)
}

fn build_checkout(
    state: &AppState,
    request: CheckoutRequest,
) -> error_stack::Result<WalletOneCheckout, WalletOneError> {
    let CheckoutRequest {
        payment_no,
        amount,
        description,
        currency,
        only,
        except,
        options,
    } = request;

    let mut checkout = state.walletone.checkout();
    if let Some(currency) = currency {
        checkout = checkout.with_currency(&currency)?;
    }
    if let Some(methods) = only.filter(|methods| !methods.is_empty()) {
        checkout = checkout.only(methods)?;
    }
    if let Some(methods) = except.filter(|methods| !methods.is_empty()) {
        checkout = checkout.except(methods)?;
    }

    tracing::debug!(
        payment_no = %payment_no,
        currency = %checkout.currency(),
        currency_id = checkout.currency().numeric_code(),
        "building walletone checkout"
    );
    Ok(checkout.make(payment_no, amount, description, options.unwrap_or_default()))
}
