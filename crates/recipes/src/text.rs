use foodgram_core::{DomainError, DomainResult};

/// Upper bound for short text fields (names, units, slugs).
pub(crate) const MAX_SHORT_TEXT: usize = 200;

/// Reject blank values and values longer than `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
