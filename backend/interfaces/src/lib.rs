pub mod event_interface;
pub mod verification;
