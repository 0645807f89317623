use std::env;
use std::path::Path;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub environment: String,
    pub currency: String,
}

impl Config {
    /// Reads an optional dotenv-style file first, then the process environment.
    pub fn load(env_file: Option<&Path>) -> anyhow::Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
                })?;
            }
            None => {
                dotenv::dotenv().ok();
            }
        }

        let config = Config {
            log_level: env::var("LOG_LEVEL").unwrap_or("warn".to_string()),
            environment: env::var("APP_ENV").unwrap_or("development".to_string()),
            currency: env::var("STORE_CURRENCY").unwrap_or("CLP".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.currency.trim().is_empty() {
            return Err(anyhow::anyhow!("STORE_CURRENCY must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!(
                "LOG_LEVEL must be one of {}",
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            environment: "development".to_string(),
            currency: "CLP".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
    }

    #[test]
    fn test_rejects_empty_currency_and_unknown_level() {
        let config = Config {
            currency: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "STORE_CURRENCY=USD").unwrap();
        writeln!(file, "APP_ENV=production").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.currency, "USD");
        assert!(config.is_production());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
