pub mod app;
pub mod configs;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod utils;

/// Name of the crate the macro is expanded in, used as the log target
#[macro_export]
macro_rules! service_name {
    () => {
        env!("CARGO_CRATE_NAME")
    };
}
