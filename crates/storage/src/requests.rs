#![forbid(unsafe_code)]

use tp_core::{Patch, Priority, Status, TaskPayload};

/// Validated input for `TaskStore::create`. Omitted fields fall back to the
/// declared defaults at insertion time.
#[derive(Clone, Debug, Default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<String>,
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    /// Builds a create request from an already-validated payload, trimming
    /// every string destined for storage.
    pub fn from_payload(payload: TaskPayload) -> Self {
        Self {
            title: payload.title.as_deref().unwrap_or_default().trim().to_string(),
            description: payload.description.map(|value| value.trim().to_string()),
            priority: payload.priority.as_deref().map(str::trim).and_then(Priority::parse),
            status: payload.status.as_deref().map(str::trim).and_then(Status::parse),
            category: payload
                .category
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            due_date: match payload.due_date {
                Patch::Set(value) => Some(value.trim().to_string()),
                Patch::Clear | Patch::Unset => None,
            },
        }
    }
}

/// Validated input for `TaskStore::update`. `None` leaves a field untouched;
/// `due_date` carries the full tri-state (unset / clear / set).
#[derive(Clone, Debug, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<String>,
    pub due_date: Patch<String>,
}

impl UpdateTaskRequest {
    pub fn from_payload(payload: TaskPayload) -> Self {
        Self {
            title: payload.title.map(|value| value.trim().to_string()),
            description: payload.description.map(|value| value.trim().to_string()),
            priority: payload.priority.as_deref().map(str::trim).and_then(Priority::parse),
            status: payload.status.as_deref().map(str::trim).and_then(Status::parse),
            category: payload
                .category
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            due_date: payload.due_date.map(|value| value.trim().to_string()),
        }
    }
}
