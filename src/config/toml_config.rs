use crate::adapters::directions::{DEFAULT_DIRECTIONS_ENDPOINT, DEFAULT_PROFILE};
use crate::adapters::geocoder::DEFAULT_GEOCODER_ENDPOINT;
use crate::core::calendar::offset_from_hours;
use crate::core::dispatch::DEFAULT_COMPANY_NAME;
use crate::domain::model::{Coordinate, DistanceUnit};
use crate::utils::error::{Result, RouteError};
use crate::utils::validation::{
    validate_email, validate_latitude, validate_longitude, validate_non_empty_string,
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use chrono::FixedOffset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default)]
    pub depot: DepotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    pub directions: Option<DirectionsConfig>,
    pub notifier: Option<NotifierConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    /// 未設定則使用本機時區判斷「今天」。固定的整點偏移，不隨日光節約時間變動
    pub utc_offset_hours: Option<i32>,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            latitude: 30.2127,
            longitude: -85.8350,
            distance_unit: DistanceUnit::Miles,
            utc_offset_hours: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            user_agent: "pool-route".to_string(),
            timeout_seconds: Some(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    #[serde(default = "default_directions_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    pub timeout_seconds: Option<u64>,
}

fn default_directions_endpoint() -> String {
    DEFAULT_DIRECTIONS_ENDPOINT.to_string()
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub endpoint: String,
    pub api_key: String,
    pub sender: String,
    pub timeout_seconds: Option<u64>,
}

const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

fn timeout(seconds: Option<u64>) -> Duration {
    Duration::from_secs(seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RouteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORS_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RouteError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if let Some(field) = missing.into_iter().next() {
            return Err(RouteError::MissingConfigError { field });
        }
        Ok(result.to_string())
    }

    pub fn depot(&self) -> Coordinate {
        Coordinate::new(self.depot.latitude, self.depot.longitude)
    }

    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.depot.utc_offset_hours.and_then(offset_from_hours)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        timeout(self.geocoder.timeout_seconds)
    }
}

impl DirectionsConfig {
    pub fn timeout(&self) -> Duration {
        timeout(self.timeout_seconds)
    }
}

impl NotifierConfig {
    pub fn timeout(&self) -> Duration {
        timeout(self.timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("company.name", &self.company.name)?;

        validate_latitude("depot.latitude", self.depot.latitude)?;
        validate_longitude("depot.longitude", self.depot.longitude)?;
        if let Some(hours) = self.depot.utc_offset_hours {
            validate_range("depot.utc_offset_hours", hours, -12, 14)?;
        }

        validate_path("storage.data_dir", &self.storage.data_dir)?;

        validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        if let Some(seconds) = self.geocoder.timeout_seconds {
            validate_positive_number("geocoder.timeout_seconds", seconds, 1)?;
        }

        if let Some(directions) = &self.directions {
            validate_url("directions.endpoint", &directions.endpoint)?;
            validate_non_empty_string("directions.api_key", &directions.api_key)?;
            validate_non_empty_string("directions.profile", &directions.profile)?;
        }

        if let Some(notifier) = &self.notifier {
            validate_url("notifier.endpoint", &notifier.endpoint)?;
            validate_non_empty_string("notifier.api_key", &notifier.api_key)?;
            validate_email("notifier.sender", &notifier.sender)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[company]
name = "Bayco Pools"

[depot]
latitude = 30.2127
longitude = -85.8350
distance_unit = "kilometers"
utc_offset_hours = -5

[storage]
data_dir = "/var/lib/pool-route"

[geocoder]
endpoint = "https://nominatim.openstreetmap.org"
user_agent = "bayco_pools_app"
timeout_seconds = 10

[directions]
api_key = "ors-key"

[notifier]
endpoint = "https://mail.example.com/v1/send"
api_key = "mail-key"
sender = "crew@baycopools.example"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.depot(), Coordinate::new(30.2127, -85.835));
        assert_eq!(config.depot.distance_unit, DistanceUnit::Kilometers);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -5 * 3600);
        let directions = config.directions.as_ref().unwrap();
        assert_eq!(directions.endpoint, DEFAULT_DIRECTIONS_ENDPOINT);
        assert_eq!(directions.profile, "driving-car");
        assert_eq!(directions.timeout(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.company.name, "Bayco Pools");
        assert_eq!(config.depot(), Coordinate::new(30.2127, -85.835));
        assert_eq!(config.depot.distance_unit, DistanceUnit::Miles);
        assert!(config.directions.is_none());
        assert!(config.notifier.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("POOL_ROUTE_TEST_ORS_KEY", "secret-from-env");

        let config = AppConfig::from_toml_str(
            r#"
[directions]
api_key = "${POOL_ROUTE_TEST_ORS_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.directions.unwrap().api_key, "secret-from-env");

        std::env::remove_var("POOL_ROUTE_TEST_ORS_KEY");
    }

    #[test]
    fn test_missing_env_var_is_reported() {
        let err = AppConfig::from_toml_str(
            r#"
[notifier]
endpoint = "https://mail.example.com"
api_key = "${POOL_ROUTE_TEST_DEFINITELY_UNSET}"
sender = "crew@example.com"
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RouteError::MissingConfigError { ref field } if field == "POOL_ROUTE_TEST_DEFINITELY_UNSET")
        );
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[depot]
latitude = 95.0
longitude = -85.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[geocoder]
endpoint = "invalid-url"
user_agent = "x"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(AppConfig::from_toml_str("[users]\nadmin = \"x\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./roster\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.data_dir, "./roster");

        let missing = temp_file.path().with_extension("absent");
        let defaults = AppConfig::load_or_default(missing).unwrap();
        assert_eq!(defaults.storage.data_dir, "./data");
    }
}
