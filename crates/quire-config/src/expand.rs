//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! A bare `$name` outside braces is kept literally.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Strings without `${` are returned unchanged. A reference to an unset
/// variable without a default is reported against `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('}') else {
            return Err(unset(field, tail));
        };

        // Only the braced reference reaches shellexpand
        let reference = &tail[..=end];
        let expanded =
            shellexpand::env_with_context_no_errors(reference, |var| std::env::var(var).ok());
        if unresolved_var(&expanded).is_some() {
            return Err(unset(field, reference));
        }
        out.push_str(&expanded);
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn unset(field: &str, reference: &str) -> ConfigError {
    let var = unresolved_var(reference).unwrap_or(reference);
    ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{var}}} not set"),
    }
}

/// Name of the first `${VAR}` reference left in an expanded string.
fn unresolved_var(expanded: &str) -> Option<&str> {
    let start = expanded.find("${")? + 2;
    let rest = &expanded[start..];
    let end = rest.find(['}', ':']).unwrap_or(rest.len());
    Some(&rest[..end])
}
