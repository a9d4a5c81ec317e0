pub mod api;
pub mod config;
pub mod crypto;
pub mod db;
pub mod notifications;
pub mod otp;

pub use db::DbPool;

use config::Config;
use notifications::OtpNotifier;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub otp_notifier: Arc<dyn OtpNotifier>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, otp_notifier: Arc<dyn OtpNotifier>) -> Self {
        Self {
            config,
            db,
            otp_notifier,
        }
    }
}
