use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Post,
}

/// Browser redirect the merchant application hands to the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectForm {
    Form {
        endpoint: String,
        method: Method,
        /// Ordered form inputs; a name may repeat for list-valued fields
        form_fields: Vec<(String, String)>,
    },
    Html {
        html_data: String,
    },
}
