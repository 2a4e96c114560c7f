pub mod checkout;
pub mod health;
pub mod notification;

pub use checkout::*;
pub use health::*;
pub use notification::*;
