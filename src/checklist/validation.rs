use super::types::SymptomDescriptor;
use std::collections::HashSet;

/// Validate a checklist loaded from configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_checklist(items: &[SymptomDescriptor]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push("checklist: must contain at least one entry".to_string());
    }

    let mut seen = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let title = item.title.trim();
        if title.is_empty() {
            errors.push(format!("checklist[{}].title: must not be empty", i));
            continue;
        }
        // Titles identify rows in the UI, so compare case-insensitively
        if !seen.insert(title.to_lowercase()) {
            errors.push(format!("checklist[{}].title: duplicate entry '{}'", i, title));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
