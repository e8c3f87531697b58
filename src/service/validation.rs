//! Request body validation into typed item payloads.

use crate::error::AppError;
use crate::model::{ItemFields, ItemPatch, NewItem};
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Require a JSON object body.
    pub fn object(body: Value) -> Result<Map<String, Value>, AppError> {
        match body {
            Value::Object(m) => Ok(m),
            _ => Err(AppError::BadRequest("body must be a JSON object".into())),
        }
    }

    /// Validate a create body. `id` is optional; `0` counts as absent.
    pub fn new_item(body: &Map<String, Value>) -> Result<NewItem, AppError> {
        let id = match body.get("id") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_i64() {
                Some(0) => None,
                Some(n) => Some(n),
                None => return Err(AppError::Validation("id must be an integer".into())),
            },
        };
        Ok(NewItem {
            id,
            fields: Self::fields(body)?,
        })
    }

    /// Validate a full-replace body: every required field must be present. Any `id` is ignored.
    pub fn fields(body: &Map<String, Value>) -> Result<ItemFields, AppError> {
        let name = match body.get("name") {
            None | Some(Value::Null) => return Err(AppError::Validation("name is required".into())),
            Some(v) => parse_name(v)?,
        };
        let price = match body.get("price") {
            None | Some(Value::Null) => return Err(AppError::Validation("price is required".into())),
            Some(v) => parse_price(v)?,
        };
        let description = match body.get("description") {
            None => None,
            Some(v) => parse_description(v)?,
        };
        Ok(ItemFields {
            name,
            description,
            price,
        })
    }

    /// Validate only the fields present (partial update). Any `id` is ignored.
    pub fn patch(body: &Map<String, Value>) -> Result<ItemPatch, AppError> {
        Ok(ItemPatch {
            name: body.get("name").map(parse_name).transpose()?,
            description: body.get("description").map(parse_description).transpose()?,
            price: body.get("price").map(parse_price).transpose()?,
        })
    }
}

fn parse_name(v: &Value) -> Result<String, AppError> {
    let s = v
        .as_str()
        .ok_or_else(|| AppError::Validation("name must be a string".into()))?;
    if s.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    Ok(s.to_string())
}

fn parse_description(v: &Value) -> Result<Option<String>, AppError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(AppError::Validation("description must be a string or null".into())),
    }
}

fn parse_price(v: &Value) -> Result<f64, AppError> {
    v.as_f64()
        .ok_or_else(|| AppError::Validation("price must be a number".into()))
}
