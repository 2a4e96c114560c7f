use std::collections::{btree_map, BTreeMap};

use common_utils::CustomResult;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::errors::{SignatureError, WalletOneError};

/// Suffix PHP-style form encoders append to list-valued keys
const LIST_KEY_SUFFIX: &str = "[]";

/// Value of a single gateway field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Iterates the raw values; a scalar yields exactly one item
    pub fn values(&self) -> std::slice::Iter<'_, String> {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value).iter(),
            Self::List(values) => values.iter(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Named parameters exchanged with the gateway, in either direction.
///
/// Keys are stored exactly as received. Any ordering the gateway cares about
/// is applied by the signer, never by this container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    /// Merges `winner` into `self`. Entries of `winner` take precedence; when
    /// both sides hold a list for the same key, the lists are merged by
    /// position so the longer tail survives.
    #[must_use]
    pub fn merge_distinct(mut self, winner: Self) -> Self {
        for (key, value) in winner.0 {
            let merged = match (self.0.remove(&key), value) {
                (Some(FieldValue::List(base)), FieldValue::List(top)) => {
                    FieldValue::List(merge_lists(base, top))
                }
                (_, value) => value,
            };
            self.0.insert(key, merged);
        }
        self
    }

    /// Builds a map from decoded form pairs. `key[]` entries and repeated
    /// keys are collected into a list in arrival order.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, FieldValue> = BTreeMap::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            let (key, force_list) = match key.strip_suffix(LIST_KEY_SUFFIX) {
                Some(stripped) => (stripped.to_string(), true),
                None => (key, false),
            };
            match fields.entry(key) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(if force_list {
                        FieldValue::List(vec![value])
                    } else {
                        FieldValue::Scalar(value)
                    });
                }
                btree_map::Entry::Occupied(mut entry) => {
                    let mut values = match entry.insert(FieldValue::List(Vec::new())) {
                        FieldValue::List(values) => values,
                        FieldValue::Scalar(first) => vec![first],
                    };
                    values.push(value);
                    entry.insert(FieldValue::List(values));
                }
            }
        }
        Self(fields)
    }

    /// Flattens the map into form pairs; list values repeat their key
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .flat_map(|(key, value)| value.values().map(move |item| (key.clone(), item.clone())))
            .collect()
    }
}

fn merge_lists(mut base: Vec<String>, top: Vec<String>) -> Vec<String> {
    for (index, value) in top.into_iter().enumerate() {
        match base.get_mut(index) {
            Some(slot) => *slot = value,
            None => base.push(value),
        }
    }
    base
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Currencies accepted by the hosted checkout, keyed by ISO 4217 alpha code
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Currency {
    RUB,
    ZAR,
    USD,
    EUR,
    UAH,
    KZT,
    BYR,
    TJS,
    PLN,
}

impl Currency {
    /// Looks up an alpha code. Matching is exact, `"rub"` is not accepted.
    pub fn from_code(code: &str) -> CustomResult<Self, WalletOneError> {
        code.parse::<Self>().map_err(|_| {
            error_stack::Report::new(WalletOneError::UnsupportedCurrency {
                currency: code.to_string(),
            })
        })
    }

    /// ISO 4217 numeric code sent as `WMI_CURRENCY_ID`
    pub fn numeric_code(self) -> u16 {
        match self {
            Self::RUB => 643,
            Self::ZAR => 710,
            Self::USD => 840,
            Self::EUR => 978,
            Self::UAH => 980,
            Self::KZT => 398,
            Self::BYR => 974,
            Self::TJS => 972,
            Self::PLN => 985,
        }
    }
}

/// Digest used to sign gateway payloads
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Md5,
}

impl SignatureAlgorithm {
    /// Resolves a configured selector. Only the exact names `sha1` and `md5`
    /// are recognized.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, SignatureError> {
        match selector {
            None | Some("") => Err(SignatureError::NotConfigured),
            Some(name) => name
                .parse::<Self>()
                .map_err(|_| SignatureError::UnsupportedAlgorithm {
                    algorithm: name.to_string(),
                }),
        }
    }
}

/// State reported by the gateway in `WMI_ORDER_STATE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderState {
    Accepted,
    Other(String),
}

impl OrderState {
    const ACCEPTED: &'static str = "ACCEPTED";

    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(Self::ACCEPTED) {
            Self::Accepted
        } else {
            Self::Other(value.to_string())
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Merchant settings for the WalletOne connector
#[derive(Clone, Deserialize, Debug, Default)]
pub struct WalletOneParams {
    /// Hosted checkout endpoint
    #[serde(default)]
    pub base_url: String,
    /// Public url of the merchant application, used to resolve relative
    /// callback paths
    #[serde(default)]
    pub app_base_url: Option<String>,
    #[serde(default)]
    pub merchant_id: i64,
    #[serde(default)]
    pub secret: Option<SecretString>,
    #[serde(default = "default_signature_method")]
    pub signature_method: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub fail_url: Option<String>,
}

fn default_signature_method() -> String {
    SignatureAlgorithm::default().to_string()
}

fn default_currency() -> String {
    Currency::RUB.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod types_tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn currency_lookup() {
        assert_eq!(Currency::from_code("RUB").unwrap().numeric_code(), 643);
        assert_eq!(Currency::from_code("USD").unwrap().numeric_code(), 840);
        let error = Currency::from_code("GBP").unwrap_err();
        assert_eq!(
            error.current_context(),
            &WalletOneError::UnsupportedCurrency {
                currency: "GBP".to_string()
            }
        );
        assert!(Currency::from_code("rub").is_err());
    }

    #[test]
    fn currency_codes_are_unique() {
        let mut codes: Vec<u16> = Currency::iter().map(Currency::numeric_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Currency::iter().count());
    }

    #[test]
    fn signature_algorithm_selector() {
        assert_eq!(
            SignatureAlgorithm::from_selector(Some("sha1")),
            Ok(SignatureAlgorithm::Sha1)
        );
        assert_eq!(
            SignatureAlgorithm::from_selector(Some("md5")),
            Ok(SignatureAlgorithm::Md5)
        );
        assert_eq!(
            SignatureAlgorithm::from_selector(Some("sha256")),
            Err(SignatureError::UnsupportedAlgorithm {
                algorithm: "sha256".to_string()
            })
        );
        assert_eq!(
            SignatureAlgorithm::from_selector(Some("SHA1")),
            Err(SignatureError::UnsupportedAlgorithm {
                algorithm: "SHA1".to_string()
            })
        );
        assert_eq!(
            SignatureAlgorithm::from_selector(None),
            Err(SignatureError::NotConfigured)
        );
    }

    #[test]
    fn order_state_is_case_insensitive() {
        assert!(OrderState::parse("accepted").is_accepted());
        assert!(OrderState::parse("Accepted").is_accepted());
        assert_eq!(
            OrderState::parse("Declined"),
            OrderState::Other("Declined".to_string())
        );
    }

    #[test]
    fn form_pairs_collect_lists() {
        let fields = FieldMap::from_form_pairs(vec![
            ("WMI_PTENABLED", "WebMoneyRUB"),
            ("WMI_PTENABLED", "QiwiWalletRUB"),
            ("WMI_PTDISABLED[]", "CreditCardRUB"),
            ("WMI_PAYMENT_NO", "42"),
        ]);
        assert_eq!(
            fields.get("WMI_PTENABLED"),
            Some(&FieldValue::from(vec!["WebMoneyRUB", "QiwiWalletRUB"]))
        );
        assert_eq!(
            fields.get("WMI_PTDISABLED"),
            Some(&FieldValue::from(vec!["CreditCardRUB"]))
        );
        assert_eq!(fields.get_scalar("WMI_PAYMENT_NO"), Some("42"));
    }

    #[test]
    fn form_pairs_round_trip_lists() {
        let fields = FieldMap::new()
            .with("WMI_PTENABLED", vec!["A", "B"])
            .with("WMI_PAYMENT_NO", "7");
        let pairs = fields.to_form_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(FieldMap::from_form_pairs(pairs), fields);
    }

    #[test]
    fn merge_distinct_prefers_winner() {
        let options = FieldMap::new()
            .with("WMI_CUSTOMER_EMAIL", "a@example.com")
            .with("WMI_PAYMENT_NO", "override-attempt");
        let order = FieldMap::new().with("WMI_PAYMENT_NO", "1001");
        let merged = options.merge_distinct(order);
        assert_eq!(merged.get_scalar("WMI_PAYMENT_NO"), Some("1001"));
        assert_eq!(merged.get_scalar("WMI_CUSTOMER_EMAIL"), Some("a@example.com"));
    }

    #[test]
    fn merge_distinct_merges_lists_by_position() {
        let base = FieldMap::new().with("WMI_PTENABLED", vec!["new1", "new2", "new3"]);
        let winner = FieldMap::new().with("WMI_PTENABLED", vec!["old1"]);
        let merged = base.merge_distinct(winner);
        assert_eq!(
            merged.get("WMI_PTENABLED"),
            Some(&FieldValue::from(vec!["old1", "new2", "new3"]))
        );
    }

    #[test]
    fn field_map_reads_json_options() {
        let fields: FieldMap = serde_json::from_str(
            r#"{"WMI_CUSTOMER_EMAIL":"a@example.com","WMI_PTENABLED":["A","B"]}"#,
        )
        .unwrap();
        assert_eq!(fields.get_scalar("WMI_CUSTOMER_EMAIL"), Some("a@example.com"));
        assert!(fields.get("WMI_PTENABLED").is_some_and(FieldValue::is_list));
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"WMI_CUSTOMER_EMAIL":"a@example.com","WMI_PTENABLED":["A","B"]}"#
        );
    }

    #[test]
    fn merchant_secret_is_read_but_never_printed() {
        use secrecy::ExposeSecret;

        let params: WalletOneParams =
            serde_json::from_str(r#"{"merchant_id":100,"secret":"s3cret"}"#).unwrap();
        assert_eq!(
            params.secret.as_ref().map(|secret| secret.expose_secret().as_str()),
            Some("s3cret")
        );
        assert!(!format!("{params:?}").contains("s3cret"));
    }
}
