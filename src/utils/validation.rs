use crate::utils::error::{Result, RouteError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> RouteError {
    RouteError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 與任何值比較皆為 false，須另外擋下
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_latitude(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, -90.0, 90.0)
}

pub fn validate_longitude(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, -180.0, 180.0)
}

/// 只檢查基本格式，實際投遞交給寄信服務
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(invalid(field_name, value, "Not a valid email address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("geocoder.endpoint", "https://nominatim.openstreetmap.org").is_ok());
        assert!(validate_url("geocoder.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("geocoder.endpoint", "").is_err());
        assert!(validate_url("geocoder.endpoint", "invalid-url").is_err());
        assert!(validate_url("geocoder.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude("depot.latitude", 30.2127).is_ok());
        assert!(validate_latitude("depot.latitude", 90.5).is_err());
        assert!(validate_latitude("depot.latitude", f64::NAN).is_err());
        assert!(validate_longitude("depot.longitude", -85.835).is_ok());
        assert!(validate_longitude("depot.longitude", -180.1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "owner@example.com").is_ok());
        assert!(validate_email("email", "owner@localhost").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "no-at-sign").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "Smith").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("geocoder.timeout_seconds", 10, 1).is_ok());
        assert!(validate_positive_number("geocoder.timeout_seconds", 0, 1).is_err());
    }
}
