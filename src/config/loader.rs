//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{StockroomConfig, UploadConfig};
use crate::domain::errors::StockroomError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into StockroomConfig
/// 4. Applies environment variable overrides (STOCKROOM_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use stockroom::config::loader::load_config;
///
/// let config = load_config("stockroom.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<StockroomConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StockroomError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        StockroomError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from `path` if it exists, otherwise starts from defaults
///
/// Environment overrides and validation apply either way, so a bare
/// environment (`STOCKROOM_API_BASE_URL=...`) is enough to run the CLI.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<StockroomConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults with environment overrides"
    );
    let mut config = StockroomConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration from TOML text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<StockroomConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: StockroomConfig = toml::from_str(&contents)
        .map_err(|e| StockroomError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &StockroomConfig) -> Result<()> {
    config.validate().map_err(|e| {
        StockroomError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| StockroomError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(StockroomError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        StockroomError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}

/// Applies environment variable overrides using STOCKROOM_* prefix
///
/// Environment variables follow the pattern: STOCKROOM_<SECTION>_<KEY>
/// For example: STOCKROOM_API_BASE_URL, STOCKROOM_CATALOG_PAGE_SIZE
///
/// Unlike the TOML file, malformed numeric values are reported rather than
/// ignored; a typo in the environment should not silently fall back.
fn apply_env_overrides(config: &mut StockroomConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("STOCKROOM_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("STOCKROOM_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("STOCKROOM_API_TIMEOUT_SECONDS") {
        config.api.timeout_seconds = parse_env("STOCKROOM_API_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("STOCKROOM_API_UPLOAD_TIMEOUT_SECONDS") {
        config.api.upload_timeout_seconds =
            parse_env("STOCKROOM_API_UPLOAD_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("STOCKROOM_API_RETRY_MAX_RETRIES") {
        config.api.retry.max_retries = parse_env("STOCKROOM_API_RETRY_MAX_RETRIES", &val)?;
    }

    // Upload overrides
    if let Ok(val) = std::env::var("STOCKROOM_UPLOAD_MAX_FILE_SIZE") {
        config.upload.max_file_size = parse_env("STOCKROOM_UPLOAD_MAX_FILE_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("STOCKROOM_UPLOAD_ALLOWED_TYPES") {
        config.upload.allowed_types = UploadConfig::parse_allowed_types(&val);
    }
    if let Ok(val) = std::env::var("STOCKROOM_UPLOAD_CHUNK_SIZE_BYTES") {
        config.upload.chunk_size_bytes = parse_env("STOCKROOM_UPLOAD_CHUNK_SIZE_BYTES", &val)?;
    }

    // Catalog overrides
    if let Ok(val) = std::env::var("STOCKROOM_CATALOG_PAGE_SIZE") {
        config.catalog.page_size = parse_env("STOCKROOM_CATALOG_PAGE_SIZE", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("STOCKROOM_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("STOCKROOM_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("STOCKROOM_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
    if let Ok(val) = std::env::var("STOCKROOM_LOGGING_LOCAL_MAX_FILES") {
        config.logging.local_max_files = parse_env("STOCKROOM_LOGGING_LOCAL_MAX_FILES", &val)?;
    }

    Ok(())
}
