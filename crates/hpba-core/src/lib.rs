pub mod app_config;
pub mod auth;
mod collate;
pub mod config;
pub mod error;
pub mod format;
pub mod histogram;
pub mod salon;
pub mod scatter;
pub mod table;
pub mod validate;
pub mod views;

pub use app_config::{AppConfig, Environment};
pub use auth::{decide, AuthErrorFlag, DomainPolicy, GateDecision, Identity};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ValidationError};
pub use histogram::{build_histogram, BinTone, Histogram, PriceBin, BIN_WIDTH};
pub use salon::{AnalyzeRequest, AnalyzeResponse, HistoryDetail, HistoryItem, SalonRecord};
pub use table::{arrange, Arranged, SortDirection, SortKey, SortState};
pub use validate::validate_listing_url;
