// Turns raw store documents into plain traffic records
use crate::application::traffic_repository::Document;
use crate::domain::traffic::{TrafficRecord, BOOKKEEPING_FIELDS};
use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Number, Value};
use thiserror::Error;

const ID_FIELD: &str = "_id";

#[derive(Debug, Error, PartialEq)]
pub enum SerializationError {
    #[error("document has no _id")]
    MissingId,
    #[error("document _id is empty")]
    EmptyId,
    #[error("document _id is not a scalar: {0}")]
    UnsupportedId(String),
    #[error("field {field} has an unreadable value: {reason}")]
    Field { field: String, reason: String },
}

pub fn normalize_document(mut doc: Document) -> Result<TrafficRecord, SerializationError> {
    for field in BOOKKEEPING_FIELDS {
        doc.remove(field);
    }

    let raw_id = doc.remove(ID_FIELD).ok_or(SerializationError::MissingId)?;
    let id = id_to_string(raw_id)?;

    let mut plain = Map::with_capacity(doc.len() + 1);
    for (field, value) in doc {
        let value = plain_value(value).map_err(|reason| SerializationError::Field {
            field: field.clone(),
            reason,
        })?;
        plain.insert(field, value);
    }
    plain.insert(ID_FIELD.to_string(), Value::String(id));

    serde_json::from_value(Value::Object(plain)).map_err(|e| SerializationError::Field {
        field: "record".to_string(),
        reason: e.to_string(),
    })
}

fn id_to_string(raw: Value) -> Result<String, SerializationError> {
    let id = match raw {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Object(mut wrapper) => match wrapper.remove("$oid") {
            Some(Value::String(s)) => s,
            _ => {
                return Err(SerializationError::UnsupportedId(
                    Value::Object(wrapper).to_string(),
                ));
            }
        },
        other => return Err(SerializationError::UnsupportedId(other.to_string())),
    };

    if id.is_empty() {
        return Err(SerializationError::EmptyId);
    }
    Ok(id)
}

/// Unwraps extended-JSON scalar wrappers so only plain JSON is left.
fn plain_value(value: Value) -> Result<Value, String> {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, inner)) = map.iter().next() {
                    if key.starts_with('$') {
                        return unwrap_scalar(key, inner);
                    }
                }
            }
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, plain_value(v)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(plain_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

fn unwrap_scalar(key: &str, inner: &Value) -> Result<Value, String> {
    match (key, inner) {
        ("$oid", Value::String(s)) => Ok(Value::String(s.clone())),
        ("$date", Value::String(s)) => Ok(Value::String(s.clone())),
        ("$date", Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("bad $date millis {n}"))
            .and_then(millis_to_rfc3339),
        ("$date", Value::Object(nested)) => match nested.get("$numberLong") {
            Some(Value::String(s)) => s
                .parse::<i64>()
                .map_err(|e| format!("bad $date millis {s}: {e}"))
                .and_then(millis_to_rfc3339),
            _ => Err(format!("bad $date {inner}")),
        },
        ("$numberInt" | "$numberLong", Value::String(s)) => s
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|e| format!("bad {key} {s}: {e}")),
        ("$numberDouble", Value::String(s)) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("bad $numberDouble {s}")),
        _ => Err(format!("unsupported extended JSON {key}")),
    }
}

fn millis_to_rfc3339(millis: i64) -> Result<Value, String> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
        .ok_or_else(|| format!("$date out of range: {millis}"))
}
