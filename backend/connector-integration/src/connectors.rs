pub mod walletone;
pub use self::walletone::WalletOne;
