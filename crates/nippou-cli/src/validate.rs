use crate::output::CliError;
use chrono::NaiveDate;

pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
            code,
        }
    }

    pub fn to_cli_error(&self) -> CliError {
        CliError::with_details(
            format!("invalid {} '{}': {}", self.field, self.value, self.reason),
            self.suggestion.clone(),
            self.code,
        )
    }
}

/// Display names for categories and items.
pub fn validate_name(s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::new(
            "name",
            s,
            "must not be empty",
            "provide a non-empty name",
            "invalid_name",
        ));
    }
    if s.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            s,
            format!("must be <= {MAX_NAME_LEN} characters"),
            "shorten the name",
            "invalid_name",
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "name",
            s,
            "must not contain control characters",
            "remove control characters from the name",
            "invalid_name",
        ));
    }
    Ok(())
}

/// 1-based positions passed to `--to`.
pub fn validate_position(pos: usize) -> Result<usize, ValidationError> {
    if pos == 0 {
        return Err(ValidationError::new(
            "position",
            "0",
            "positions start at 1",
            "use --to 1 for the first position",
            "invalid_position",
        ));
    }
    Ok(pos - 1)
}

/// Count suffixes only make sense on count items.
pub fn validate_suffix(kind: &str, suffix: Option<&str>) -> Result<(), ValidationError> {
    match suffix {
        Some(s) if !kind.eq_ignore_ascii_case("count") => Err(ValidationError::new(
            "suffix",
            s,
            format!("only count items take a suffix (type is {kind})"),
            "drop --suffix or use --type count",
            "invalid_suffix",
        )),
        _ => Ok(()),
    }
}

/// clap value parser for `--date`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{s}' (expected YYYY-MM-DD): {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("お仕事").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("tab\there").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(validate_position(1).expect("valid"), 0);
        assert_eq!(validate_position(4).expect("valid"), 3);
        let err = validate_position(0).expect_err("zero");
        assert_eq!(err.code, "invalid_position");
    }

    #[test]
    fn suffix_requires_count() {
        assert!(validate_suffix("count", Some("回")).is_ok());
        assert!(validate_suffix("check", None).is_ok());
        assert!(validate_suffix("streak", Some("日")).is_err());
    }

    #[test]
    fn dates() {
        assert_eq!(
            parse_date("2024-01-15"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid"))
        );
        assert!(parse_date("2024/01/15").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn cli_error_shape() {
        let err = validate_name("").expect_err("empty").to_cli_error();
        assert!(err.message.starts_with("invalid name"));
        assert_eq!(err.error_code.as_deref(), Some("invalid_name"));
    }
}
