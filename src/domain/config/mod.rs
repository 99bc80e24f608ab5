//! Application configuration

pub mod app_config;

pub use app_config::{default_capture_dir, AppConfig, APP_DIR_NAME};
