//! Configuration validation with detailed error reporting.
//!
//! Each validator returns a [`ValidationError`] naming the offending
//! field, a human-readable message, and a suggestion when an obvious fix
//! exists.

use url::Url;

use crate::error::ValidationError;

/// Validate the backend origin. Must be an absolute `http`/`https` URL
/// with a host and no query or fragment.
pub fn validate_backend(backend: &str) -> Result<(), ValidationError> {
    let error = |message: String, suggestion: Option<String>| ValidationError {
        field: "backend".into(),
        message,
        suggestion,
    };

    if backend.is_empty() {
        return Err(error("backend URL cannot be empty".into(), None));
    }

    let parsed = Url::parse(backend).map_err(|_| {
        let suggestion =
            (!backend.contains("://")).then(|| format!("did you mean 'http://{backend}'?"));
        error(format!("'{backend}' is not a valid URL"), suggestion)
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(error(
            format!("unsupported scheme '{scheme}' (expected http or https)"),
            None,
        ));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(error(format!("'{backend}' has no host"), None));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(error(
            "backend URL cannot carry a query string or fragment".into(),
            None,
        ));
    }
    Ok(())
}

/// Validate the local relay prefix. `/` relays every path; anything else
/// must be a literal path without route-pattern syntax.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    let error = |message: String, suggestion: Option<String>| ValidationError {
        field: "prefix".into(),
        message,
        suggestion,
    };

    if !prefix.starts_with('/') {
        return Err(error(
            "prefix must start with '/'".into(),
            Some(format!("did you mean '/{prefix}'?")),
        ));
    }
    if prefix.contains(['{', '}', '?', '#']) {
        return Err(error(
            format!("'{prefix}' contains characters not allowed in a prefix"),
            None,
        ));
    }
    if prefix
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(error(
            format!("'{prefix}' contains a route parameter or wildcard"),
            None,
        ));
    }
    Ok(())
}
