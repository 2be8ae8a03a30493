//! Field checks shared by the record services.

use chrono::NaiveDateTime;

use super::floating_time::parse_floating;
use super::models::RecordValidationError;

const MAX_TEXT_LEN: usize = 256;
const MAX_BODY_LEN: usize = 50_000;

/// Trimmed, non-empty, bounded text
pub fn required_text(value: &str, field: &'static str) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(RecordValidationError::FieldTooLong(field));
    }
    Ok(trimmed.to_string())
}

/// Trimmed, non-empty long-form text such as a post body
pub fn required_body(value: &str, field: &'static str) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    if trimmed.chars().count() > MAX_BODY_LEN {
        return Err(RecordValidationError::FieldTooLong(field));
    }
    Ok(trimmed.to_string())
}

/// Trimmed tags with blanks dropped, order kept
pub fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Blank collapses to `None`
pub fn optional_text(value: Option<String>, field: &'static str) -> Result<Option<String>, RecordValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => required_text(&text, field).map(Some),
        _ => Ok(None),
    }
}

pub fn required_date(value: &str, field: &'static str) -> Result<NaiveDateTime, RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    parse_floating(value).ok_or_else(|| RecordValidationError::InvalidDate(value.to_string()))
}

/// Blank collapses to `None`; anything else must parse
pub fn optional_date(value: Option<&str>) -> Result<Option<NaiveDateTime>, RecordValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_floating(text)
            .map(Some)
            .ok_or_else(|| RecordValidationError::InvalidDate(text.to_string())),
    }
}

pub fn positive_amount(amount: f64) -> Result<f64, RecordValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(RecordValidationError::NonPositiveAmount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  Read  ", "name"), Ok("Read".to_string()));
        assert_eq!(required_text("   ", "name"), Err(RecordValidationError::MissingField("name")));
        assert_eq!(
            required_text(&"x".repeat(300), "name"),
            Err(RecordValidationError::FieldTooLong("name"))
        );
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(optional_text(Some(" ".to_string()), "description"), Ok(None));
        assert_eq!(optional_text(None, "description"), Ok(None));
        assert_eq!(optional_date(Some("")), Ok(None));
        assert!(optional_date(Some("2024-01-15")).unwrap().is_some());
        assert!(optional_date(Some("soon")).is_err());
    }

    #[test]
    fn test_required_body_allows_long_text() {
        let essay = "word ".repeat(1000);
        assert_eq!(required_body(&essay, "Content"), Ok(essay.trim().to_string()));
        assert_eq!(required_body("\n ", "Content"), Err(RecordValidationError::MissingField("Content")));
        assert_eq!(
            required_body(&"x".repeat(MAX_BODY_LEN + 1), "Content"),
            Err(RecordValidationError::FieldTooLong("Content"))
        );
    }

    #[test]
    fn test_clean_tags() {
        let tags = vec![" rust ".to_string(), "".to_string(), "notes".to_string()];
        assert_eq!(clean_tags(tags), vec!["rust".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(positive_amount(12.5), Ok(12.5));
        assert_eq!(positive_amount(0.0), Err(RecordValidationError::NonPositiveAmount));
        assert_eq!(positive_amount(-3.0), Err(RecordValidationError::NonPositiveAmount));
        assert_eq!(positive_amount(f64::NAN), Err(RecordValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_required_date() {
        assert!(required_date("2024-01-15T23:30:00-05:00", "date").is_ok());
        assert_eq!(required_date("", "date"), Err(RecordValidationError::MissingField("date")));
        assert!(matches!(required_date("tomorrow", "date"), Err(RecordValidationError::InvalidDate(_))));
    }
}
