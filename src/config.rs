use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

const APP_DIR: &str = "highlights-pipeline";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where archived payloads and indexed records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Aws,
    Local,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Backend::Aws),
            "local" => Ok(Backend::Local),
            other => Err(AppError::Config(format!("unknown backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    pub rapidapi_key: Option<String>,

    #[serde(default = "default_rapidapi_host")]
    pub rapidapi_host: String,

    /// Run date in `YYYY-MM-DD`; today's local date when unset.
    pub date: Option<String>,

    #[serde(default = "default_league_name")]
    pub league_name: String,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    #[serde(default = "default_bucket_name")]
    pub s3_bucket_name: String,

    #[serde(default = "default_region")]
    pub aws_region: String,

    #[serde(default = "default_table_name")]
    pub dynamodb_table: String,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_local_data_dir")]
    pub local_data_dir: String,
}

fn default_api_url() -> String {
    "https://sport-highlights-api.p.rapidapi.com/basketball/highlights".to_string()
}

fn default_rapidapi_host() -> String {
    "sport-highlights-api.p.rapidapi.com".to_string()
}

fn default_league_name() -> String {
    "NCAA".to_string()
}

fn default_limit() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

fn default_archive_name() -> String {
    "basketball_highlights".to_string()
}

fn default_bucket_name() -> String {
    "sports-highlights".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_table_name() -> String {
    "basketball_highlights".to_string()
}

fn default_local_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            rapidapi_key: None,
            rapidapi_host: default_rapidapi_host(),
            date: None,
            league_name: default_league_name(),
            limit: default_limit(),
            request_timeout_secs: default_request_timeout(),
            archive_name: default_archive_name(),
            s3_bucket_name: default_bucket_name(),
            aws_region: default_region(),
            dynamodb_table: default_table_name(),
            backend: Backend::default(),
            local_data_dir: default_local_data_dir(),
        }
    }
}

/// Validated per-run settings handed to the pipeline stages.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub api_url: Url,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub date: String,
    pub league_name: String,
    pub limit: u32,
    pub request_timeout: Duration,
    pub archive_name: String,
}

impl Config {
    /// Load from an explicit path, or from the default location (writing
    /// defaults there on first run).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = get("RAPIDAPI_KEY") {
            self.rapidapi_key = Some(v);
        }
        if let Some(v) = get("RAPIDAPI_HOST") {
            self.rapidapi_host = v;
        }
        if let Some(v) = get("DATE") {
            self.date = Some(v);
        }
        if let Some(v) = get("LEAGUE_NAME") {
            self.league_name = v;
        }
        if let Some(v) = get("LIMIT") {
            self.limit = v
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("LIMIT must be a positive integer, got '{}'", v)))?;
        }
        if let Some(v) = get("S3_BUCKET_NAME") {
            self.s3_bucket_name = v;
        }
        if let Some(v) = get("AWS_REGION") {
            self.aws_region = v;
        }
        if let Some(v) = get("DYNAMODB_TABLE") {
            self.dynamodb_table = v;
        }
        if let Some(v) = get("HIGHLIGHTS_BACKEND") {
            self.backend = v.parse()?;
        }
        Ok(())
    }

    pub fn run_settings(&self) -> Result<RunSettings> {
        let api_url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Config(format!("invalid api_url '{}': {}", self.api_url, e)))?;

        let rapidapi_key = self
            .rapidapi_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("rapidapi_key is not set".to_string()))?;

        if self.limit == 0 {
            return Err(AppError::Config("limit must be greater than zero".to_string()));
        }

        let date = match &self.date {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| AppError::Config(format!("date must be YYYY-MM-DD, got '{}'", raw)))?,
            None => Local::now().date_naive(),
        };

        Ok(RunSettings {
            api_url,
            rapidapi_key,
            rapidapi_host: self.rapidapi_host.clone(),
            date: date.format(DATE_FORMAT).to_string(),
            league_name: self.league_name.clone(),
            limit: self.limit,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            archive_name: self.archive_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> Config {
        Config {
            rapidapi_key: Some("secret".to_string()),
            date: Some("2023-12-01".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str(r#"rapidapi_key = "abc""#).unwrap();
        assert_eq!(config.rapidapi_key.as_deref(), Some("abc"));
        assert_eq!(config.limit, 10);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.archive_name, "basketball_highlights");
        assert_eq!(config.backend, Backend::Aws);
    }

    #[test]
    fn backend_parses_from_toml() {
        let config: Config = toml::from_str(r#"backend = "local""#).unwrap();
        assert_eq!(config.backend, Backend::Local);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("S3_BUCKET_NAME", "other-bucket"),
            ("AWS_REGION", "eu-west-1"),
            ("LIMIT", "25"),
            ("HIGHLIGHTS_BACKEND", "local"),
            ("LEAGUE_NAME", ""),
        ]
        .into_iter()
        .collect();

        let mut config = configured();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.s3_bucket_name, "other-bucket");
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.limit, 25);
        assert_eq!(config.backend, Backend::Local);
        // Blank values are ignored
        assert_eq!(config.league_name, "NCAA");
    }

    #[test]
    fn invalid_limit_override_is_rejected() {
        let mut config = configured();
        let err = config
            .apply_overrides(|k| (k == "LIMIT").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn run_settings_validates_inputs() {
        let settings = configured().run_settings().unwrap();
        assert_eq!(settings.date, "2023-12-01");
        assert_eq!(settings.request_timeout, Duration::from_secs(120));

        let no_key = Config { rapidapi_key: None, ..configured() };
        assert!(no_key.run_settings().is_err());

        let bad_date = Config { date: Some("12/01/2023".to_string()), ..configured() };
        assert!(bad_date.run_settings().is_err());

        let bad_url = Config { api_url: "not a url".to_string(), ..configured() };
        assert!(bad_url.run_settings().is_err());

        let zero_limit = Config { limit: 0, ..configured() };
        assert!(zero_limit.run_settings().is_err());
    }

    #[test]
    fn unset_date_resolves_to_today() {
        let config = Config { date: None, ..configured() };
        let settings = config.run_settings().unwrap();
        assert_eq!(settings.date, Local::now().date_naive().format(DATE_FORMAT).to_string());
    }
}
