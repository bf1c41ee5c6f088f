use url::Url;

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }
}

/// Validate a URL submitted for monitoring: http(s) with a host.
pub fn validate_site_url(target: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("URL cannot be empty");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none_or(str::is_empty) {
                return ValidationResult::err("URL must have a valid host");
            }

            ValidationResult::ok()
        }
        Err(e) => {
            if !target.contains("://") {
                ValidationResult::err("URL must include scheme (http:// or https://)")
            } else {
                ValidationResult::err(format!("Invalid URL: {e}"))
            }
        }
    }
}

/// Validate the monitor cycle interval
pub fn validate_interval(interval_seconds: u64) -> ValidationResult {
    const MIN_INTERVAL: u64 = 10;
    const MAX_INTERVAL: u64 = 86400;

    if interval_seconds < MIN_INTERVAL {
        return ValidationResult::err(format!(
            "Interval too short: {interval_seconds} seconds (minimum: {MIN_INTERVAL})"
        ));
    }

    if interval_seconds > MAX_INTERVAL {
        return ValidationResult::err("Interval too long (max 24 hours)");
    }

    ValidationResult::ok()
}

/// Validate the per-probe timeout
pub fn validate_timeout(timeout_seconds: u64) -> ValidationResult {
    const MAX_TIMEOUT: u64 = 300;

    if timeout_seconds == 0 {
        return ValidationResult::err("Timeout must be at least 1 second");
    }

    if timeout_seconds > MAX_TIMEOUT {
        return ValidationResult::err(format!(
            "Timeout too long: {timeout_seconds} seconds (maximum: {MAX_TIMEOUT})"
        ));
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_url_validation() {
        assert!(validate_site_url("http://example.com").is_valid);
        assert!(validate_site_url("https://example.com").is_valid);
        assert!(validate_site_url("http://192.168.1.1").is_valid);
        assert!(validate_site_url("http://example.com:8080/path").is_valid);

        assert!(!validate_site_url("").is_valid);
        assert!(!validate_site_url("   ").is_valid);
        assert!(!validate_site_url("example.com").is_valid);
        assert!(!validate_site_url("ftp://example.com").is_valid);
    }

    #[test]
    fn test_missing_scheme_message() {
        let result = validate_site_url("example.com");
        assert_eq!(
            result.error.as_deref(),
            Some("URL must include scheme (http:// or https://)")
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn test_interval_validation() {
        assert!(validate_interval(10).is_valid);
        assert!(validate_interval(30).is_valid);
        assert!(validate_interval(86400).is_valid);

        assert!(!validate_interval(5).is_valid);
        assert!(!validate_interval(100_000).is_valid);
    }

    #[test]
    fn test_timeout_validation() {
        assert!(validate_timeout(1).is_valid);
        assert!(validate_timeout(10).is_valid);
        assert!(!validate_timeout(0).is_valid);
        assert!(!validate_timeout(301).is_valid);
    }
}
