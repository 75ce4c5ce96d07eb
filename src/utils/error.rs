use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    ApiStatusError { status: u16, url: String },

    #[error("Service report for {customer} was not accepted by the email service")]
    ReportRejected { customer: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data error: {message}")]
    DataError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RouteError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RouteError::InvalidArgument { .. }
            | RouteError::ValidationError { .. }
            | RouteError::NotFound { .. } => ErrorCategory::Input,
            RouteError::ApiError(_)
            | RouteError::ApiStatusError { .. }
            | RouteError::ReportRejected { .. } => ErrorCategory::Network,
            RouteError::CsvError(_)
            | RouteError::SerializationError(_)
            | RouteError::DataError { .. } => ErrorCategory::Data,
            RouteError::ConfigError { .. }
            | RouteError::ConfigValidationError { .. }
            | RouteError::InvalidConfigValueError { .. }
            | RouteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RouteError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            // 外部服務通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RouteError::InvalidArgument { .. } => {
                "Use a full weekday name between Monday and Friday"
            }
            RouteError::ApiError(_) => "Check the network connection and try again",
            RouteError::ApiStatusError { .. } => {
                "Verify the API endpoint and key in the configuration file"
            }
            RouteError::ReportRejected { .. } => {
                "Check the notifier sender and API key, then run `finish` again"
            }
            RouteError::CsvError(_) | RouteError::DataError { .. } => {
                "Inspect customers.csv for malformed rows"
            }
            RouteError::SerializationError(_) => "The service returned an unexpected payload",
            RouteError::IoError(_) => "Check that the data directory exists and is writable",
            RouteError::ConfigError { .. }
            | RouteError::ConfigValidationError { .. }
            | RouteError::InvalidConfigValueError { .. }
            | RouteError::MissingConfigError { .. } => {
                "Review pool-route.toml and the referenced environment variables"
            }
            RouteError::ValidationError { .. } => "Fill in every required field",
            RouteError::NotFound { .. } => "Run `pool-route clients list` to see known customers",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RouteError::InvalidArgument { message } => message.clone(),
            RouteError::ApiError(_) | RouteError::ApiStatusError { .. } => {
                format!("An external service could not be reached: {}", self)
            }
            RouteError::NotFound { message } => message.clone(),
            RouteError::ValidationError { message } => message.clone(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
