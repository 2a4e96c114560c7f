pub mod errors;
pub mod router_response_types;
pub mod types;
