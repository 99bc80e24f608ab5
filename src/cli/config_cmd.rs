//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::capture::preset::{is_valid_sample_rate, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    match key {
        "data_dir" => config.data_dir = Some(parse_data_dir(value)?),
        "sample_rate" => config.sample_rate = Some(parse_sample_rate(value)?),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value.trim()));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = match key {
        "data_dir" => config.data_dir,
        "sample_rate" => config.sample_rate.map(|r| r.to_string()),
        _ => unreachable!(),
    };

    presenter.output(value.as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value("data_dir", config.data_dir.as_deref().unwrap_or(NOT_SET));
    presenter.key_value(
        "sample_rate",
        &config
            .sample_rate
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_SET.to_string()),
    );
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn parse_data_dir(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::ValidationError {
            key: "data_dir".to_string(),
            message: "Value must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_sample_rate(value: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::ValidationError {
        key: "sample_rate".to_string(),
        message: format!(
            "Value must be an integer between {} and {}",
            MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
        ),
    };

    let rate = value.trim().parse::<u32>().map_err(|_| invalid())?;
    if !is_valid_sample_rate(rate) {
        return Err(invalid());
    }
    Ok(rate)
}
