use base64::Engine;
use common_utils::types::StringMajorUnit;
use domain_types::{
    errors::{ConfigurationError, WalletOneError},
    router_response_types::{Method, RedirectForm},
    types::{Currency, FieldMap, SignatureAlgorithm, WalletOneParams},
};
use error_stack::ResultExt;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{constants, signature};

type Error = error_stack::Report<WalletOneError>;

// ===== AUTH =====

#[derive(Debug, Clone)]
pub struct WalletOneAuth {
    pub merchant_id: i64,
    pub secret: Option<SecretString>,
    pub signature_method: SignatureAlgorithm,
}

impl TryFrom<&WalletOneParams> for WalletOneAuth {
    type Error = Error;

    fn try_from(params: &WalletOneParams) -> Result<Self, Self::Error> {
        let signature_method = params
            .signature_method
            .parse::<SignatureAlgorithm>()
            .map_err(|_| {
                WalletOneError::from(ConfigurationError::InvalidSignatureMethod(
                    params.signature_method.clone(),
                ))
            })?;

        Ok(Self {
            merchant_id: params.merchant_id,
            secret: params.secret.clone(),
            signature_method,
        })
    }
}

impl WalletOneAuth {
    /// Secret used for signing, if one is configured and non-empty.
    ///
    /// Unlike the gateway's PHP SDK, which signs with an empty string when
    /// no secret is set, checkouts without a secret are left unsigned.
    pub fn signing_secret(&self) -> Option<&SecretString> {
        self.secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().is_empty())
    }
}

// ===== CHECKOUT REQUEST =====

/// Accumulates the outbound checkout fields for a single order.
///
/// Fields already set always win over later merges, matching how the
/// gateway SDK layers order data under merchant settings.
#[derive(Debug, Clone)]
pub struct WalletOneCheckout {
    auth: WalletOneAuth,
    endpoint: String,
    app_base_url: Option<Url>,
    currency: Currency,
    fields: FieldMap,
    payments_allowed: Vec<String>,
    payments_except: Vec<String>,
}

impl WalletOneCheckout {
    pub fn new(params: &WalletOneParams) -> Result<Self, Error> {
        let auth = WalletOneAuth::try_from(params)?;
        let currency = Currency::from_code(&params.currency)?;
        let app_base_url = params
            .app_base_url
            .as_deref()
            .map(parse_base_url)
            .transpose()?;
        let endpoint = if params.base_url.is_empty() {
            constants::API_URL.to_string()
        } else {
            params.base_url.clone()
        };

        let mut fields = FieldMap::new()
            .with(constants::WMI_MERCHANT_ID, auth.merchant_id)
            .with(constants::WMI_CURRENCY_ID, currency.numeric_code());
        if let Some(success_url) = &params.success_url {
            fields.insert(constants::WMI_SUCCESS_URL, success_url);
        }
        if let Some(fail_url) = &params.fail_url {
            fields.insert(constants::WMI_FAIL_URL, fail_url);
        }

        Ok(Self {
            auth,
            endpoint,
            app_base_url,
            currency,
            fields,
            payments_allowed: Vec::new(),
            payments_except: Vec::new(),
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Switches the order currency
    pub fn with_currency(mut self, code: &str) -> Result<Self, Error> {
        let currency = Currency::from_code(code)?;
        self.currency = currency;
        self.fields
            .insert(constants::WMI_CURRENCY_ID, currency.numeric_code());
        Ok(self)
    }

    /// Restricts the hosted page to the given payment methods
    pub fn only(mut self, payment_methods: Vec<String>) -> Result<Self, Error> {
        if !self.payments_except.is_empty() {
            return Err(WalletOneError::from(
                ConfigurationError::ConflictingPaymentMethodFilters {
                    requested: constants::FILTER_ONLY,
                    existing: constants::FILTER_EXCEPT,
                },
            )
            .into());
        }

        self.payments_allowed = payment_methods.clone();
        self.fields = FieldMap::new()
            .with(constants::WMI_PTENABLED, payment_methods)
            .merge_distinct(self.fields);
        Ok(self)
    }

    /// Hides the given payment methods on the hosted page
    pub fn except(mut self, payment_methods: Vec<String>) -> Result<Self, Error> {
        if !self.payments_allowed.is_empty() {
            return Err(WalletOneError::from(
                ConfigurationError::ConflictingPaymentMethodFilters {
                    requested: constants::FILTER_EXCEPT,
                    existing: constants::FILTER_ONLY,
                },
            )
            .into());
        }

        self.payments_except = payment_methods.clone();
        self.fields = FieldMap::new()
            .with(constants::WMI_PTDISABLED, payment_methods)
            .merge_distinct(self.fields);
        Ok(self)
    }

    /// Adds the order itself. `options` may carry any additional `WMI_*`
    /// fields; they never replace order or merchant fields.
    #[must_use]
    pub fn make(
        mut self,
        payment_number: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
        options: FieldMap,
    ) -> Self {
        let payment = FieldMap::new()
            .with(constants::WMI_PAYMENT_NO, payment_number.into())
            .with(constants::WMI_PAYMENT_AMOUNT, amount.to_string())
            .with(constants::WMI_DESCRIPTION, description.into());
        let payment = options.merge_distinct(payment);
        self.fields = payment.merge_distinct(self.fields);
        self
    }

    /// Final outbound fields, formatted and signed
    pub fn get_params(&self) -> Result<FieldMap, Error> {
        let mut parameters = self.fields.clone();

        check_options(&parameters)?;

        if let Some(description) = parameters.get_scalar(constants::WMI_DESCRIPTION) {
            let encoded = format!(
                "{}{}",
                constants::BASE64_PREFIX,
                base64::engine::general_purpose::STANDARD.encode(description)
            );
            parameters.insert(constants::WMI_DESCRIPTION, encoded);
        }
        for field in [constants::WMI_SUCCESS_URL, constants::WMI_FAIL_URL] {
            if let Some(url) = parameters.get_scalar(field) {
                let resolved = self.resolve_url(field, url)?;
                parameters.insert(field, resolved);
            }
        }

        let amount = parameters
            .get_scalar(constants::WMI_PAYMENT_AMOUNT)
            .unwrap_or_default()
            .to_string();
        let formatted = StringMajorUnit::from_major_unit_as_str(&amount)
            .change_context(WalletOneError::from(ConfigurationError::InvalidAmount(
                amount.clone(),
            )))?;
        parameters.insert(constants::WMI_PAYMENT_AMOUNT, formatted.get_amount_as_string());

        if let Some(secret) = self.auth.signing_secret() {
            let signature =
                signature::generate_signature(&parameters, secret, self.auth.signature_method);
            parameters.insert(constants::WMI_SIGNATURE, signature);
        }

        Ok(parameters)
    }

    /// Signed fields wrapped as a browser form posting to the hosted page
    pub fn redirect_form(&self) -> Result<RedirectForm, Error> {
        let parameters = self.get_params()?;
        Ok(RedirectForm::Form {
            endpoint: self.endpoint.clone(),
            method: Method::Post,
            form_fields: parameters.to_form_pairs(),
        })
    }

    fn resolve_url(&self, field: &'static str, value: &str) -> Result<String, Error> {
        if Url::parse(value).is_ok() {
            return Ok(value.to_string());
        }
        match &self.app_base_url {
            Some(base) => base
                .join(value.trim_start_matches('/'))
                .map(String::from)
                .map_err(|error| {
                    WalletOneError::from(ConfigurationError::InvalidUrl {
                        field,
                        reason: error.to_string(),
                    })
                    .into()
                }),
            None => Ok(value.to_string()),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|error| {
        WalletOneError::from(ConfigurationError::InvalidUrl {
            field: "app_base_url",
            reason: error.to_string(),
        })
        .into()
    })
}

fn check_options(parameters: &FieldMap) -> Result<(), Error> {
    let missing: Vec<&'static str> = constants::REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !parameters.contains_key(field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WalletOneError::from(ConfigurationError::MissingRequiredFields { fields: missing }).into())
    }
}

/// Renders a redirect form as a page that submits itself on load
pub fn build_auto_submit_html(form: &RedirectForm) -> String {
    match form {
        RedirectForm::Html { html_data } => html_data.clone(),
        RedirectForm::Form {
            endpoint,
            method,
            form_fields,
        } => {
            let inputs: String = form_fields
                .iter()
                .map(|(name, value)| {
                    format!(
                        "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                        escape_html(name),
                        escape_html(value)
                    )
                })
                .collect();
            format!(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
                 <body onload=\"document.forms[0].submit()\">\n\
                 <form method=\"{method}\" action=\"{}\" accept-charset=\"UTF-8\">\n\
                 {inputs}<noscript><button type=\"submit\">Pay</button></noscript>\n\
                 </form>\n</body>\n</html>\n",
                escape_html(endpoint),
            )
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
