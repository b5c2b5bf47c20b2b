//! Validated user input for write operations.
//!
//! Everything the user types is checked here, before any request is built.

use gaugewatch_types::Severity;
use thiserror::Error;

/// Input rejected locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: &'static str, input: String },

    #[error("at least one of upper or lower threshold is required")]
    NoThreshold,

    #[error("upper threshold {upper} must be greater than lower threshold {lower}")]
    InvertedBounds { upper: f64, lower: f64 },

    #[error("unknown severity '{0}' (expected low, medium, high or critical)")]
    UnknownSeverity(String),
}

/// Parse a required numeric field.
pub fn parse_number(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            input: trimmed.to_string(),
        })
}

/// Parse an optional numeric field; blank input means "not set".
pub fn parse_optional_number(
    field: &'static str,
    input: Option<&str>,
) -> Result<Option<f64>, ValidationError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_number(field, text).map(Some),
    }
}

/// A new or edited alert, ready to send upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    /// `None` creates a global rule (formula schema only).
    pub monitor_id: Option<String>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub severity: Severity,
    pub enabled: bool,
}

impl AlertDraft {
    /// Validate raw form input.
    pub fn from_input(
        monitor_id: Option<&str>,
        upper: Option<&str>,
        lower: Option<&str>,
        severity: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let monitor_id = match monitor_id.map(str::trim) {
            Some("") => return Err(ValidationError::Required { field: "monitor" }),
            Some(id) => Some(id.to_string()),
            None => None,
        };
        let upper = parse_optional_number("upper threshold", upper)?;
        let lower = parse_optional_number("lower threshold", lower)?;
        let severity = match severity.map(str::trim) {
            None | Some("") => Severity::Medium,
            Some(s) => s
                .parse()
                .map_err(|_| ValidationError::UnknownSeverity(s.to_string()))?,
        };

        let draft = Self {
            monitor_id,
            upper,
            lower,
            severity,
            enabled: true,
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Check the bounds make sense together.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.upper, self.lower) {
            (None, None) => Err(ValidationError::NoThreshold),
            (Some(upper), Some(lower)) if upper <= lower => {
                Err(ValidationError::InvertedBounds { upper, lower })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("value", " 42.5 "), Ok(42.5));
        assert_eq!(
            parse_number("value", ""),
            Err(ValidationError::Required { field: "value" })
        );
        assert!(matches!(
            parse_number("value", "abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(parse_number("value", "NaN").is_err());
        assert!(parse_number("value", "inf").is_err());
    }

    #[test]
    fn test_draft_defaults() {
        let draft = AlertDraft::from_input(Some("m1"), Some("100"), None, None).unwrap();
        assert_eq!(draft.monitor_id.as_deref(), Some("m1"));
        assert_eq!(draft.upper, Some(100.0));
        assert_eq!(draft.lower, None);
        assert_eq!(draft.severity, Severity::Medium);
        assert!(draft.enabled);
    }

    #[test]
    fn test_draft_zero_threshold_is_kept() {
        let draft = AlertDraft::from_input(None, None, Some("0"), Some("critical")).unwrap();
        assert_eq!(draft.lower, Some(0.0));
        assert_eq!(draft.severity, Severity::Critical);
    }

    #[test]
    fn test_draft_rejections() {
        assert_eq!(
            AlertDraft::from_input(Some("m1"), None, Some(" "), None),
            Err(ValidationError::NoThreshold)
        );
        assert_eq!(
            AlertDraft::from_input(Some(""), Some("1"), None, None),
            Err(ValidationError::Required { field: "monitor" })
        );
        assert_eq!(
            AlertDraft::from_input(Some("m1"), Some("5"), Some("10"), None),
            Err(ValidationError::InvertedBounds {
                upper: 5.0,
                lower: 10.0
            })
        );
        assert!(matches!(
            AlertDraft::from_input(Some("m1"), Some("1"), None, Some("urgent")),
            Err(ValidationError::UnknownSeverity(_))
        ));
        assert!(matches!(
            AlertDraft::from_input(Some("m1"), Some("ten"), None, None),
            Err(ValidationError::NotANumber { .. })
        ));
    }
}
