//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading happens in four steps: read the TOML file, substitute `${VAR}`
//! placeholders, apply `WARD_*` environment overrides, validate. The server
//! can also start without any file at all, from defaults plus environment;
//! see [`load_config_or_default`].

use super::schema::WardConfig;
use crate::config::secret_string;
use crate::domain::errors::WardError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, TOML parsing
/// fails, an `${VAR}` placeholder references an unset variable, or the
/// resulting configuration fails validation.
///
/// # Examples
///
/// ```no_run
/// use ward::config::loader::load_config;
///
/// let config = load_config("ward.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<WardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    finalize(parse_file(path)?)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// Environment overrides and validation still apply. This is the loading
/// mode the server uses, so that a purely environment-configured deployment
/// needs no file on disk.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<WardConfig> {
    let path = path.as_ref();

    let config = if path.exists() {
        parse_file(path)?
    } else {
        tracing::debug!(
            path = %path.display(),
            "configuration file not found, using defaults and environment"
        );
        WardConfig::default()
    };

    finalize(config)
}

fn parse_file(path: &Path) -> Result<WardConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        WardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    toml::from_str(&contents)
        .map_err(|e| WardError::Configuration(format!("Failed to parse TOML: {}", e)))
}

fn finalize(mut config: WardConfig) -> Result<WardConfig> {
    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        WardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Referencing an unset variable is an
/// error listing every missing name.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
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
        return Err(WardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the WARD_* prefix
///
/// Variables follow the pattern `WARD_<SECTION>_<KEY>`, e.g.
/// `WARD_MONGODB_HOST` or `WARD_SERVER_PORT`. Values that fail to parse
/// keep the previously configured value.
fn apply_env_overrides(config: &mut WardConfig) {
    if let Ok(val) = std::env::var("WARD_ENVIRONMENT") {
        if let Ok(environment) = val.parse() {
            config.environment = environment;
        }
    }

    // Application overrides
    if let Ok(val) = std::env::var("WARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("WARD_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("WARD_SERVER_PORT") {
        if let Ok(port) = val.parse() {
            config.server.port = port;
        }
    }
    if let Ok(val) = std::env::var("WARD_SERVER_CORS_ALLOWED_ORIGINS") {
        config.server.cors_allowed_origins =
            val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // MongoDB overrides
    if let Ok(val) = std::env::var("WARD_MONGODB_HOST") {
        config.mongodb.host = val;
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_PORT") {
        if let Ok(port) = val.parse() {
            config.mongodb.port = port;
        }
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_USERNAME") {
        config.mongodb.username = Some(val);
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_PASSWORD") {
        config.mongodb.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_PATIENTS_COLLECTION") {
        config.mongodb.patients_collection = val;
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_RECORDS_COLLECTION") {
        config.mongodb.records_collection = val;
    }
    if let Ok(val) = std::env::var("WARD_MONGODB_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.mongodb.timeout_seconds = seconds;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("WARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("WARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("WARD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
