//! Request validation and response shaping for the todo resource.
//!
//! Inputs arrive as raw JSON and are checked field by field so that a single
//! response can report every problem at once.

mod fields;
mod todo;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

pub use fields::{FieldReader, parse_bool, parse_bool_str};
pub use todo::{ListEnvelope, PageInfo, TodoCreate, TodoPatch, TodoReplace, TodoResponse};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name to the list of messages collected for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

#[derive(Debug, Clone, Error)]
#[error("Validation failed")]
pub struct ValidationError {
    pub errors: FieldErrors,
}

impl ValidationError {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self { errors }
    }
}
