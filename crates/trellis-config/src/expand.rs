//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}`, `${VAR:-default}` and a leading `~` in `value`.
///
/// `field` names the configuration key and is only used for error reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value.as_deref() {
        *value = Some(expand_env(v, field)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_literal_unchanged() {
        assert_eq!(expand_env("kramdown", "converters.kramdown").unwrap(), "kramdown");
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TRELLIS_EXPAND_UNSET");
        }

        let value = expand_env("${TRELLIS_EXPAND_UNSET:-/opt/tm}/bin/Markdown.pl", "x").unwrap();

        assert_eq!(value, "/opt/tm/bin/Markdown.pl");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TRELLIS_EXPAND_MISSING");
        }

        let err = expand_env("${TRELLIS_EXPAND_MISSING}/x", "converters.haml").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("converters.haml"), "{msg}");
        assert!(msg.contains("TRELLIS_EXPAND_MISSING"), "{msg}");
    }
}
