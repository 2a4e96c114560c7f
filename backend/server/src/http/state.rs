use std::sync::Arc;

use connector_integration::connectors::WalletOne;

#[derive(Clone, Debug)]
pub struct AppState {
    pub walletone: Arc<WalletOne>,
}

impl AppState {
    pub fn new(walletone: Arc<WalletOne>) -> Self {
        Self { walletone }
    }
}
