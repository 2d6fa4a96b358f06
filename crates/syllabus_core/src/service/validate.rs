//! Field validation shared by the services.

use crate::service::{ServiceError, ServiceResult};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static SUBJECT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,6}-?[0-9]{1,4}$").expect("valid subject code regex"));
static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})/([0-9]{4})$").expect("valid academic year regex"));

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(field: &'static str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text value; blank input becomes `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Lowercases and checks the `local@domain.tld` shape.
pub(crate) fn email(field: &'static str, value: &str) -> ServiceResult<String> {
    let normalized = required(field, value)?.to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(ServiceError::validation(
            field,
            format!("`{normalized}` is not an email address"),
        ));
    }
    Ok(normalized)
}

/// Uppercases and checks the catalogue code shape (`CS-101`, `MATH12`).
pub(crate) fn subject_code(field: &'static str, value: &str) -> ServiceResult<String> {
    let normalized = required(field, value)?.to_uppercase();
    if !SUBJECT_CODE_RE.is_match(&normalized) {
        return Err(ServiceError::validation(
            field,
            format!("`{normalized}` does not match letters followed by digits, e.g. CS-101"),
        ));
    }
    Ok(normalized)
}

pub(crate) fn in_range(field: &'static str, value: u32, min: u32, max: u32) -> ServiceResult<u32> {
    if !(min..=max).contains(&value) {
        return Err(ServiceError::validation(
            field,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    Ok(value)
}

/// Accepts `YYYY/YYYY` where the second year follows the first.
pub(crate) fn academic_year(field: &'static str, value: &str) -> ServiceResult<String> {
    let normalized = required(field, value)?;
    let consecutive = ACADEMIC_YEAR_RE
        .captures(&normalized)
        .and_then(|caps| {
            let start = caps.get(1)?.as_str().parse::<u32>().ok()?;
            let end = caps.get(2)?.as_str().parse::<u32>().ok()?;
            Some(end == start + 1)
        })
        .unwrap_or(false);
    if !consecutive {
        return Err(ServiceError::validation(
            field,
            format!("`{normalized}` is not an academic year like 2025/2026"),
        ));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::{academic_year, email, in_range, optional, required, subject_code};

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Ana ").unwrap(), "Ana");
        assert!(required("name", " \t").is_err());
    }

    #[test]
    fn optional_drops_blank_values() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" dr ")).as_deref(), Some("dr"));
        assert_eq!(optional(None), None);
    }

    #[test]
    fn email_is_lowercased_and_checked() {
        assert_eq!(
            email("email", " Ana.Kovac@Uni.Example ").unwrap(),
            "ana.kovac@uni.example"
        );
        assert!(email("email", "ana@localhost").is_err());
        assert!(email("email", "ana at uni.example").is_err());
    }

    #[test]
    fn subject_code_accepts_catalogue_shapes() {
        assert_eq!(subject_code("code", "cs-101").unwrap(), "CS-101");
        assert_eq!(subject_code("code", "MATH12").unwrap(), "MATH12");
        assert!(subject_code("code", "101-CS").is_err());
        assert!(subject_code("code", "C-1").is_err());
    }

    #[test]
    fn academic_year_requires_consecutive_years() {
        assert!(academic_year("academic_year", "2025/2026").is_ok());
        assert!(academic_year("academic_year", "2025/2027").is_err());
        assert!(academic_year("academic_year", "2025-2026").is_err());
    }

    #[test]
    fn in_range_is_inclusive() {
        assert_eq!(in_range("semester", 1, 1, 12).unwrap(), 1);
        assert_eq!(in_range("semester", 12, 1, 12).unwrap(), 12);
        assert!(in_range("semester", 0, 1, 12).is_err());
    }
}
