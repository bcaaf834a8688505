use serde::Serialize;
use serde_json::Value;

use super::{
    ValidationError,
    fields::{FieldReader, MSG_BLANK, parse_bool, text},
};
use crate::db::entities::todo;

pub const TITLE_MAX_CHARS: usize = 255;

fn title(value: &Value) -> Result<String, String> {
    let raw = text(value)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MSG_BLANK.to_string());
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(format!(
            "Ensure this field has no more than {TITLE_MAX_CHARS} characters."
        ));
    }
    Ok(trimmed.to_string())
}

fn description(value: &Value) -> Result<String, String> {
    text(value)
}

/// Body of `POST /todos/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCreate {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TodoCreate {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(payload)?;
        let title = reader.required("title", title);
        let description = reader.required("description", description);
        let completed = reader.optional("completed", parse_bool);

        match (title, description) {
            (Some(title), Some(description)) if reader.is_valid() => Ok(Self {
                title,
                description,
                completed: completed.unwrap_or(false),
            }),
            _ => Err(reader.into_error()),
        }
    }
}

/// Body of `PUT /todos/{id}/`. Every column is overwritten; `completed`
/// falls back to `false` like on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoReplace {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TodoReplace {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let TodoCreate {
            title,
            description,
            completed,
        } = TodoCreate::from_json(payload)?;
        Ok(Self {
            title,
            description,
            completed,
        })
    }
}

/// Body of `PATCH /todos/{id}/`. Absent keys leave the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(payload)?;
        let patch = Self {
            title: reader.optional("title", title),
            description: reader.optional("description", description),
            completed: reader.optional("completed", parse_bool),
        };

        if !reader.is_valid() {
            return Err(reader.into_error());
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

/// List response. Page fields appear only when the caller asked for a page.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T: Serialize> {
    pub count: u64,
    #[serde(flatten)]
    pub page: Option<PageInfo>,
    pub results: Vec<T>,
}

impl<T: Serialize> ListEnvelope<T> {
    pub fn all(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            page: None,
            results,
        }
    }

    pub fn paged(count: u64, page: PageInfo, results: Vec<T>) -> Self {
        Self {
            count,
            page: Some(page),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_defaults_completed_to_false() {
        let input = TodoCreate::from_json(&json!({
            "title": "Buy milk",
            "description": "2%",
        }))
        .expect("valid payload");

        assert_eq!(
            input,
            TodoCreate {
                title: "Buy milk".to_string(),
                description: "2%".to_string(),
                completed: false,
            }
        );
    }

    #[test]
    fn create_ignores_caller_supplied_id() {
        let input = TodoCreate::from_json(&json!({
            "id": 42,
            "title": "Buy milk",
            "description": "2%",
            "completed": true,
        }))
        .expect("valid payload");

        assert!(input.completed);
        assert_eq!(input.title, "Buy milk");
    }

    #[test]
    fn create_reports_every_failing_field() {
        let err = TodoCreate::from_json(&json!({ "completed": "sometimes" }))
            .expect_err("payload should be rejected");

        let fields: Vec<_> = err.errors.fields().collect();
        assert_eq!(fields, vec!["completed", "description", "title"]);
        assert_eq!(
            err.errors.get("title"),
            Some(&["This field is required.".to_string()][..])
        );
    }

    #[test]
    fn title_is_trimmed_and_must_not_be_blank() {
        let input = TodoCreate::from_json(&json!({ "title": "  Walk dog ", "description": "" }))
            .expect("valid payload");
        assert_eq!(input.title, "Walk dog");
        assert_eq!(input.description, "");

        let err = TodoCreate::from_json(&json!({ "title": "   ", "description": "x" }))
            .expect_err("blank title should be rejected");
        assert_eq!(
            err.errors.get("title"),
            Some(&["This field may not be blank.".to_string()][..])
        );
    }

    #[test]
    fn title_length_is_bounded() {
        let long = "a".repeat(TITLE_MAX_CHARS + 1);
        let err = TodoCreate::from_json(&json!({ "title": long, "description": "x" }))
            .expect_err("long title should be rejected");

        assert_eq!(
            err.errors.get("title"),
            Some(&["Ensure this field has no more than 255 characters.".to_string()][..])
        );

        let exact = "é".repeat(TITLE_MAX_CHARS);
        assert!(TodoCreate::from_json(&json!({ "title": exact, "description": "x" })).is_ok());
    }

    #[test]
    fn replace_requires_title_and_description() {
        let err = TodoReplace::from_json(&json!({ "completed": true }))
            .expect_err("partial body should be rejected");

        assert!(err.errors.get("title").is_some());
        assert!(err.errors.get("description").is_some());
        assert!(err.errors.get("completed").is_none());
    }

    #[test]
    fn patch_keeps_only_supplied_keys() {
        let patch = TodoPatch::from_json(&json!({ "completed": true })).expect("valid patch");

        assert_eq!(
            patch,
            TodoPatch {
                title: None,
                description: None,
                completed: Some(true),
            }
        );
        assert!(TodoPatch::from_json(&json!({})).expect("empty patch").is_empty());
    }

    #[test]
    fn patch_keeps_falsy_values() {
        let patch = TodoPatch::from_json(&json!({ "description": "", "completed": false }))
            .expect("valid patch");

        assert_eq!(patch.description.as_deref(), Some(""));
        assert_eq!(patch.completed, Some(false));
    }

    #[test]
    fn patch_rejects_null_and_wrong_types() {
        let err = TodoPatch::from_json(&json!({ "title": null, "completed": [] }))
            .expect_err("patch should be rejected");

        assert_eq!(
            err.errors.get("title"),
            Some(&["This field may not be null.".to_string()][..])
        );
        assert_eq!(
            err.errors.get("completed"),
            Some(&["Must be a valid boolean.".to_string()][..])
        );
    }

    #[test]
    fn envelope_omits_page_fields_unless_paged() {
        let all = serde_json::to_value(ListEnvelope::all(vec![1, 2])).expect("serialize");
        assert_eq!(all, json!({ "count": 2, "results": [1, 2] }));

        let paged = serde_json::to_value(ListEnvelope::paged(
            5,
            PageInfo {
                page: 1,
                page_size: 2,
                has_next: true,
            },
            vec![1, 2],
        ))
        .expect("serialize");
        assert_eq!(
            paged,
            json!({ "count": 5, "page": 1, "page_size": 2, "has_next": true, "results": [1, 2] })
        );
    }
}
