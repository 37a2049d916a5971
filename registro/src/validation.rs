//! Field validation for employee intake.
//!
//! Pure predicates plus a collector that checks a whole payload and returns
//! every problem at once, so the form can display all errors and nothing is
//! persisted while any remain. The predicates are only called for non-empty
//! values; an absent optional field is always acceptable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::employees::EmployeeCreate;

/// The 27 Brazilian state (UF) codes offered by the intake form.
pub const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Roles suggested by the intake form. The field itself is free text.
pub const SUGGESTED_ROLES: [&str; 12] = [
    "Analista",
    "Desenvolvedor",
    "Gerente",
    "Coordenador",
    "Assistente",
    "Diretor",
    "Supervisor",
    "Técnico",
    "Estagiário",
    "Consultor",
    "Especialista",
    "Outro",
];

static POSTAL_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("valid regex"));

/// Earliest accepted birth date.
static MIN_BIRTH_DATE: Lazy<chrono::NaiveDate> =
    Lazy::new(|| chrono::NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid date"));

/// A single field-level validation failure, reported inline per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// True iff `value` matches `DDDDD-DDD` or `DDDDDDDD`.
pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE_RE.is_match(value)
}

/// True iff `value` contains at least 10 digit characters once everything
/// else (spaces, parentheses, dashes) is stripped.
pub fn is_valid_phone(value: &str) -> bool {
    value.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

/// Check a whole payload, collecting every failure instead of stopping at the
/// first. An empty vec means the payload may be persisted. Expects the payload
/// to already be normalized (trimmed, empty strings mapped to `None`).
pub fn validate(payload: &EmployeeCreate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if payload.full_name.trim().is_empty() {
        errors.push(FieldError::new("full_name", "full name is required"));
    }

    if let Some(postal_code) = payload.postal_code.as_deref()
        && !is_valid_postal_code(postal_code)
    {
        errors.push(FieldError::new("postal_code", "postal code must match the 12345-678 format"));
    }

    if let Some(phone) = payload.phone.as_deref()
        && !is_valid_phone(phone)
    {
        errors.push(FieldError::new("phone", "phone must contain at least 10 digits"));
    }

    if let Some(state) = payload.state.as_deref()
        && !STATE_CODES.contains(&state)
    {
        errors.push(FieldError::new("state", format!("'{state}' is not a known state code")));
    }

    if let Some(birth_date) = payload.birth_date {
        let today = chrono::Utc::now().date_naive();
        if birth_date < *MIN_BIRTH_DATE || birth_date > today {
            errors.push(FieldError::new("birth_date", "birth date must be between 1900-01-01 and today"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn postal_code_accepts_both_forms() {
        assert!(is_valid_postal_code("12345-678"));
        assert!(is_valid_postal_code("12345678"));
    }

    #[test]
    fn postal_code_rejects_malformed_values() {
        assert!(!is_valid_postal_code("1234-567"));
        assert!(!is_valid_postal_code("123456789"));
        assert!(!is_valid_postal_code("abcde-fgh"));
        assert!(!is_valid_postal_code("12345 678"));
        assert!(!is_valid_postal_code(""));
    }

    #[test]
    fn phone_counts_digits_only() {
        assert!(is_valid_phone("(11) 99999-9999")); // 11 digits
        assert!(is_valid_phone("1199999999")); // exactly 10
        assert!(!is_valid_phone("11999"));
        assert!(!is_valid_phone("telefone"));
    }

    fn valid_payload() -> EmployeeCreate {
        EmployeeCreate {
            full_name: "Maria Souza".to_string(),
            address: None,
            neighborhood: None,
            city: Some("Campinas".to_string()),
            state: Some("SP".to_string()),
            postal_code: Some("13083-970".to_string()),
            phone: Some("(19) 99999-0000".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12),
            role: Some("Analista".to_string()),
        }
    }

    #[test]
    fn valid_payload_has_no_errors() {
        assert!(validate(&valid_payload()).is_empty());
    }

    #[test]
    fn all_failures_are_collected() {
        let payload = EmployeeCreate {
            full_name: "   ".to_string(),
            postal_code: Some("99".to_string()),
            phone: Some("123".to_string()),
            state: Some("XX".to_string()),
            ..valid_payload()
        };
        let errors = validate(&payload);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["full_name", "postal_code", "phone", "state"]);
    }

    #[test]
    fn birth_date_bounds() {
        let mut payload = valid_payload();
        payload.birth_date = NaiveDate::from_ymd_opt(1899, 12, 31);
        assert_eq!(validate(&payload).len(), 1);

        payload.birth_date = Some(chrono::Utc::now().date_naive() + chrono::Days::new(1));
        assert_eq!(validate(&payload).len(), 1);

        payload.birth_date = NaiveDate::from_ymd_opt(1900, 1, 1);
        assert!(validate(&payload).is_empty());
    }
}
