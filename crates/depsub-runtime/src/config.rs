//! Process environment configuration.

use std::env;

/// Environment variable controlling the default interception flag of the
/// global registry.
pub const INTERCEPT_ENV_VAR: &str = "DEPSUB_INTERCEPT";

/// Read the interception flag from the environment.
///
/// Accepted truthy literals are `1` and `true` (case-insensitive);
/// anything else, or an unset variable, leaves interception disabled. The
/// global registry reads this exactly once, at first touch.
#[must_use]
pub fn intercept_from_env() -> bool {
    env::var(INTERCEPT_ENV_VAR)
        .map(|raw| parse_flag(&raw))
        .unwrap_or(false)
}

/// Parse one boolean-like literal.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_literals() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" true "));
    }

    #[test]
    fn everything_else_is_false() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
