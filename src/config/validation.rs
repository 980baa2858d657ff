use crate::url::normalize_root;
use crate::{ConfigError, UrlError};
use url::Url;

/// Validates the worker count
pub fn validate_crawlers(crawlers: usize) -> Result<(), ConfigError> {
    if crawlers < 1 {
        return Err(ConfigError::Validation(
            "need at least one crawler".to_string(),
        ));
    }
    Ok(())
}

/// Parses and validates the root URL
pub fn validate_root(root: &str) -> Result<Url, ConfigError> {
    normalize_root(root).map_err(|e| match e {
        UrlError::InvalidScheme(scheme) => ConfigError::InvalidUrl(format!(
            "root URL must use http or https, got '{}'",
            scheme
        )),
        other => ConfigError::InvalidUrl(format!("parsing root URL: {}", other)),
    })
}

/// Validates the excluded URL prefixes
///
/// An empty prefix would match every link, which is never what was meant.
pub fn validate_excludes(prefixes: &[String]) -> Result<(), ConfigError> {
    if prefixes.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "excluded prefixes cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the excluded scheme list
fn validate_scheme(scheme: &str) -> Result<(), ConfigError> {
    if scheme.is_empty() || !scheme.ends_with(':') {
        return Err(ConfigError::Validation(format!(
            "excluded scheme must end with ':', got '{}'",
            scheme
        )));
    }
    Ok(())
}

/// Validates every entry of the excluded scheme list
pub fn validate_schemes(schemes: &[String]) -> Result<(), ConfigError> {
    schemes.iter().try_for_each(|s| validate_scheme(s))
}
