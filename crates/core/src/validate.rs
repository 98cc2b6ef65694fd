#![forbid(unsafe_code)]

use serde::Deserialize;
use time::Date;
use time::macros::format_description;

use crate::model::{Priority, Status, allowed_priorities, allowed_statuses};
use crate::patch::Patch;

/// Raw task payload as deserialized from an untyped external source.
///
/// Priority and status are carried as raw strings so membership failures
/// surface as accumulated violation messages instead of a deserialization
/// error. `due_date` is tri-state: absent, explicit null, or a date string.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Patch<String>,
}

/// Create requires a title; update treats every field as an optional
/// overwrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadMode {
    Create,
    Update,
}

/// Checks a raw payload against the field-level rules.
///
/// Every rule is applied independently and all violations are collected; an
/// empty list means the payload is acceptable to hand to the store. Strings
/// are judged after trimming, matching what the store persists.
pub fn validate(payload: &TaskPayload, mode: PayloadMode) -> Vec<String> {
    let mut errors = Vec::new();

    match &payload.title {
        None if mode == PayloadMode::Create => {
            errors.push("Title is required.".to_string());
        }
        None => {}
        Some(title) => {
            if title.trim().is_empty() {
                errors.push("Title must not be empty.".to_string());
            }
        }
    }

    if let Some(priority) = payload.priority.as_deref() {
        let priority = priority.trim();
        if !priority.is_empty() && Priority::parse(priority).is_none() {
            errors.push(format!("Priority must be one of: {}.", allowed_priorities()));
        }
    }

    if let Some(status) = payload.status.as_deref() {
        let status = status.trim();
        if !status.is_empty() && Status::parse(status).is_none() {
            errors.push(format!("Status must be one of: {}.", allowed_statuses()));
        }
    }

    if let Patch::Set(due_date) = payload.due_date.as_ref() {
        if !is_valid_date(due_date.trim()) {
            errors.push("Due date must be a valid date (YYYY-MM-DD).".to_string());
        }
    }

    errors
}

fn is_valid_date(value: &str) -> bool {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> TaskPayload {
        TaskPayload {
            title: Some("Implement CI pipeline".to_string()),
            ..TaskPayload::default()
        }
    }

    #[test]
    fn valid_create_payload_passes() {
        assert!(validate(&payload(), PayloadMode::Create).is_empty());
    }

    #[test]
    fn create_requires_title() {
        let errors = validate(&TaskPayload::default(), PayloadMode::Create);
        assert_eq!(errors, vec!["Title is required.".to_string()]);
    }

    #[test]
    fn update_allows_absent_title() {
        assert!(validate(&TaskPayload::default(), PayloadMode::Update).is_empty());
    }

    #[test]
    fn whitespace_title_is_rejected_in_both_modes() {
        let mut raw = payload();
        raw.title = Some("   ".to_string());
        for mode in [PayloadMode::Create, PayloadMode::Update] {
            let errors = validate(&raw, mode);
            assert_eq!(errors, vec!["Title must not be empty.".to_string()]);
        }
    }

    #[test]
    fn unknown_priority_names_the_allowed_set() {
        let mut raw = payload();
        raw.priority = Some("urgent".to_string());
        let errors = validate(&raw, PayloadMode::Create);
        assert_eq!(
            errors,
            vec!["Priority must be one of: low, medium, high, critical.".to_string()]
        );
    }

    #[test]
    fn unknown_status_names_the_allowed_set() {
        let mut raw = payload();
        raw.status = Some("done".to_string());
        let errors = validate(&raw, PayloadMode::Update);
        assert_eq!(
            errors,
            vec!["Status must be one of: pending, in_progress, completed, archived.".to_string()]
        );
    }

    #[test]
    fn due_date_null_and_absent_are_acceptable() {
        let mut raw = payload();
        raw.due_date = Patch::Clear;
        assert!(validate(&raw, PayloadMode::Update).is_empty());
        raw.due_date = Patch::Unset;
        assert!(validate(&raw, PayloadMode::Update).is_empty());
    }

    #[test]
    fn unparsable_due_date_is_a_violation() {
        for bad in ["not-a-date", "2025-02-30", "2025/12/01", ""] {
            let mut raw = payload();
            raw.due_date = Patch::Set(bad.to_string());
            let errors = validate(&raw, PayloadMode::Create);
            assert_eq!(
                errors,
                vec!["Due date must be a valid date (YYYY-MM-DD).".to_string()],
                "expected a violation for {bad:?}"
            );
        }
    }

    #[test]
    fn violations_accumulate_instead_of_short_circuiting() {
        let raw = TaskPayload {
            title: Some(" ".to_string()),
            priority: Some("urgent".to_string()),
            status: Some("done".to_string()),
            due_date: Patch::Set("nope".to_string()),
            ..TaskPayload::default()
        };
        let errors = validate(&raw, PayloadMode::Create);
        assert_eq!(errors.len(), 4);
    }
}
