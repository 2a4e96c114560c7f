//! Constants for the WalletOne connector

// ===== ENDPOINTS =====
pub const API_URL: &str = "https://wl.walletone.com/checkout/checkout/Index";

// ===== FIELD NAMES =====
pub const WMI_MERCHANT_ID: &str = "WMI_MERCHANT_ID";
pub const WMI_CURRENCY_ID: &str = "WMI_CURRENCY_ID";
pub const WMI_SUCCESS_URL: &str = "WMI_SUCCESS_URL";
pub const WMI_FAIL_URL: &str = "WMI_FAIL_URL";
pub const WMI_PAYMENT_NO: &str = "WMI_PAYMENT_NO";
pub const WMI_PAYMENT_AMOUNT: &str = "WMI_PAYMENT_AMOUNT";
pub const WMI_DESCRIPTION: &str = "WMI_DESCRIPTION";
pub const WMI_PTENABLED: &str = "WMI_PTENABLED";
pub const WMI_PTDISABLED: &str = "WMI_PTDISABLED";
pub const WMI_SIGNATURE: &str = "WMI_SIGNATURE";
pub const WMI_ORDER_STATE: &str = "WMI_ORDER_STATE";
pub const WMI_ORDER_ID: &str = "WMI_ORDER_ID";

/// Fields that must be present before the checkout request is signed
pub const REQUIRED_FIELDS: [&str; 6] = [
    WMI_MERCHANT_ID,
    WMI_CURRENCY_ID,
    WMI_SUCCESS_URL,
    WMI_FAIL_URL,
    WMI_PAYMENT_AMOUNT,
    WMI_DESCRIPTION,
];

// ===== ENCODING =====
pub const BASE64_PREFIX: &str = "BASE64:";

// ===== NOTIFICATION RESPONSE =====
pub const WMI_RESULT: &str = "WMI_RESULT";
pub const RESULT_OK: &str = "OK";
pub const RESULT_RETRY: &str = "RETRY";
pub const UNKNOWN_ORDER_STATE: &str = "unknown";
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ===== PAYMENT METHOD FILTERS =====
pub const FILTER_ONLY: &str = "only";
pub const FILTER_EXCEPT: &str = "except";
