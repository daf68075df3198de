//! Services handed to the console screens

pub mod exchange;
pub mod scanner;

use crate::config::AppConfig;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub scanner: scanner::ScannerService,
    pub exchange: exchange::ExchangeService,
}

impl Services {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            scanner: scanner::ScannerService::new(config.scanner.clone()),
            exchange: exchange::ExchangeService::new(config.exchange.clone()),
        }
    }
}
