//! Wire (JSON) representation of a product.
//!
//! Conversion is explicit and field by field: each key is looked up, type
//! checked, and turned into its domain type, in the order `name`,
//! `description`, `price`. The first failure wins.

use serde_json::{Map, Value};

use catalog_core::{ValidationError, ValidationResult};

use crate::price::Price;

/// Wire keys.
pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_PRICE: &str = "price";

/// Shape-checked fields of a wire object (no length checks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WireFields {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) price: Price,
}

impl WireFields {
    pub(crate) fn parse(data: &Value) -> ValidationResult<Self> {
        let object = data.as_object().ok_or_else(|| {
            ValidationError::bad_body(format!("(expected a JSON object, got {})", kind(data)))
        })?;

        Ok(Self {
            name: name(object)?,
            description: description(object)?,
            price: price(object)?,
        })
    }
}

fn name(object: &Map<String, Value>) -> ValidationResult<String> {
    match object.get(FIELD_NAME) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(FIELD_NAME)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::invalid_type(FIELD_NAME, "a string")),
    }
}

fn description(object: &Map<String, Value>) -> ValidationResult<Option<String>> {
    match object.get(FIELD_DESCRIPTION) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid_type(FIELD_DESCRIPTION, "a string or null")),
    }
}

fn price(object: &Map<String, Value>) -> ValidationResult<Price> {
    match object.get(FIELD_PRICE) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(FIELD_PRICE)),
        Some(Value::Number(n)) => Price::from_json_number(n),
        // Prices leave the service as strings, so accept them back the same way.
        Some(Value::String(s)) => Price::parse(s),
        Some(_) => Err(ValidationError::invalid_type(FIELD_PRICE, "a number or numeric string")),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
