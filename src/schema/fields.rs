use serde_json::{Map, Value};

use super::{FieldErrors, NON_FIELD_ERRORS, ValidationError};

pub(crate) const MSG_REQUIRED: &str = "This field is required.";
pub(crate) const MSG_NULL: &str = "This field may not be null.";
pub(crate) const MSG_NOT_STRING: &str = "Not a valid string.";
pub(crate) const MSG_BLANK: &str = "This field may not be blank.";
pub(crate) const MSG_NOT_BOOL: &str = "Must be a valid boolean.";

/// Parser for one field value. `null` never reaches it.
pub type FieldParser<T> = fn(&Value) -> Result<T, String>;

/// Walks a JSON object and records an error per failing field.
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Value) -> Result<Self, ValidationError> {
        match payload {
            Value::Object(object) => Ok(Self {
                object,
                errors: FieldErrors::new(),
            }),
            other => Err(ValidationError::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            )),
        }
    }

    /// Missing keys are an error.
    pub fn required<T>(&mut self, field: &'static str, parse: FieldParser<T>) -> Option<T> {
        let object = self.object;
        match object.get(field) {
            None => {
                self.errors.add(field, MSG_REQUIRED);
                None
            }
            Some(value) => self.parse(field, value, parse),
        }
    }

    /// Missing keys yield `None` without an error.
    pub fn optional<T>(&mut self, field: &'static str, parse: FieldParser<T>) -> Option<T> {
        let object = self.object;
        let value = object.get(field)?;
        self.parse(field, value, parse)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.errors)
    }

    fn parse<T>(&mut self, field: &'static str, value: &Value, parse: FieldParser<T>) -> Option<T> {
        if value.is_null() {
            self.errors.add(field, MSG_NULL);
            return None;
        }
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                self.errors.add(field, message);
                None
            }
        }
    }
}

pub(crate) fn text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MSG_NOT_STRING.to_string())
}

/// Accepts JSON booleans, 0/1 and the usual truthy/falsy words.
pub fn parse_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(MSG_NOT_BOOL.to_string()),
        },
        Value::String(raw) => parse_bool_str(raw).ok_or_else(|| MSG_NOT_BOOL.to_string()),
        _ => Err(MSG_NOT_BOOL.to_string()),
    }
}

pub fn parse_bool_str(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_non_object_payload() {
        let payload = json!(["title"]);

        let err = match FieldReader::new(&payload) {
            Ok(_) => panic!("array payload should be rejected"),
            Err(err) => err,
        };

        assert_eq!(
            err.errors.get(NON_FIELD_ERRORS),
            Some(&["Invalid data. Expected a dictionary, but got list.".to_string()][..])
        );
    }

    #[test]
    fn null_is_reported_separately_from_type_errors() {
        let payload = json!({ "title": null, "description": 3 });
        let mut reader = FieldReader::new(&payload).expect("object payload");

        assert!(reader.required("title", text).is_none());
        assert!(reader.required("description", text).is_none());

        let err = reader.into_error();
        assert_eq!(err.errors.get("title"), Some(&[MSG_NULL.to_string()][..]));
        assert_eq!(
            err.errors.get("description"),
            Some(&[MSG_NOT_STRING.to_string()][..])
        );
    }

    #[test]
    fn optional_absent_field_is_not_an_error() {
        let payload = json!({});
        let mut reader = FieldReader::new(&payload).expect("object payload");

        assert_eq!(reader.optional("completed", parse_bool), None);
        assert!(reader.is_valid());
    }

    #[test]
    fn bool_coercion() {
        assert_eq!(parse_bool(&json!(true)), Ok(true));
        assert_eq!(parse_bool(&json!(0)), Ok(false));
        assert_eq!(parse_bool(&json!("Yes")), Ok(true));
        assert_eq!(parse_bool(&json!(" off ")), Ok(false));
        assert!(parse_bool(&json!(2)).is_err());
        assert!(parse_bool(&json!("maybe")).is_err());
        assert!(parse_bool(&json!([true])).is_err());
    }
}
