//! Print endpoints
//!
//! `POST /print` takes the HTML form, `POST /api/print` takes JSON. Both
//! build a [`TaskRecord`] and hand it to the printer.

use axum::{
    Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    response::{Html, IntoResponse, Response},
};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;

use super::error::{ApiError, ApiResult};
use super::pages;
use crate::core::ServerState;
use crate::printing::{Priority, TaskRecord, ValidationError};
use crate::utils::parse_timestamp;

/// Task fields as they arrive from a form or JSON body
#[derive(Debug, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "description")]
    pub notes: Option<String>,
    #[serde(default, alias = "due_by")]
    pub due_at: Option<String>,
    #[serde(default, alias = "created_on")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TaskInput {
    /// Validate and convert into a printable record
    pub fn into_record(self, tz: Tz) -> Result<TaskRecord, ValidationError> {
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) => Some(p.parse::<Priority>()?),
        };

        let record = TaskRecord {
            title: self.title.trim().to_string(),
            notes: self.notes.unwrap_or_default(),
            due_at: parse_optional(self.due_at.as_deref(), tz)?,
            created_at: parse_optional(self.created_at.as_deref(), tz)?,
            priority,
        };
        record.validate()?;
        Ok(record)
    }
}

fn parse_optional(
    value: Option<&str>,
    tz: Tz,
) -> Result<Option<chrono::NaiveDateTime>, ValidationError> {
    match value {
        Some(v) => parse_timestamp(v, tz),
        None => Ok(None),
    }
}

/// POST /api/print
pub async fn print_json(
    State(state): State<ServerState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let task = input.into_record(state.display_timezone)?;
    state.print_task(&task).await?;

    tracing::info!(title = %task.title, priority = %task.resolved_priority(), "Task card printed");
    Ok(Json(json!({ "status": "success" })))
}

/// POST /print
pub async fn print_form(
    State(state): State<ServerState>,
    payload: Result<Form<TaskInput>, FormRejection>,
) -> Response {
    let result = async {
        let Form(input) = payload.map_err(|rejection| ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        })?;

        let task = input.into_record(state.display_timezone)?;
        state.print_task(&task).await?;
        Ok::<_, ApiError>(task)
    }
    .await;

    match result {
        Ok(task) => {
            tracing::info!(title = %task.title, priority = %task.resolved_priority(), "Task card printed");
            Html(pages::confirmation(&task)).into_response()
        }
        Err(err) => {
            err.log();
            (err.status_code(), Html(pages::error_page(&err.detail()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_aliases_from_json() {
        let input: TaskInput = serde_json::from_str(
            r#"{
                "title": "  Ship it ",
                "description": "Before Friday",
                "created_on": "2024-03-01T09:00",
                "due_by": "2024-03-05T14:30:00",
                "priority": "high"
            }"#,
        )
        .unwrap();

        let task = input.into_record(Tz::UTC).unwrap();
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.notes, "Before Friday");
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(
            task.due_at,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0)
        );
        assert!(task.created_at.is_some());
    }

    #[test]
    fn test_blank_optional_fields() {
        let input = TaskInput {
            title: "Buy milk".into(),
            due_at: Some(String::new()),
            priority: Some(" ".into()),
            ..Default::default()
        };

        let task = input.into_record(Tz::UTC).unwrap();
        assert_eq!(task.due_at, None);
        assert_eq!(task.priority, None);
        assert_eq!(task.resolved_priority(), Priority::Medium);
    }

    #[test]
    fn test_invalid_fields() {
        let missing_title = TaskInput::default();
        assert_eq!(
            missing_title.into_record(Tz::UTC).unwrap_err(),
            ValidationError::EmptyTitle
        );

        let bad_date = TaskInput {
            title: "x".into(),
            due_at: Some("tomorrow".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_date.into_record(Tz::UTC),
            Err(ValidationError::InvalidTimestamp(_))
        ));

        let bad_priority = TaskInput {
            title: "x".into(),
            priority: Some("urgent".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_priority.into_record(Tz::UTC),
            Err(ValidationError::UnknownPriority(_))
        ));
    }
}
