use crate::error::LoadError;
use crate::ir::Person;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Parses an exported people list.
///
/// Accepts either a bare array of person records or an object carrying them
/// under `people`. Any other top-level shape is rejected.
pub fn parse_people(input: &str) -> Result<Vec<Person>, LoadError> {
    let value: Value = serde_json::from_str(input)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("people") {
            Some(list @ Value::Array(_)) => list,
            Some(other) => return Err(LoadError::Shape { found: kind_of(&other) }),
            None => return Err(LoadError::Shape { found: "object" }),
        },
        other => return Err(LoadError::Shape { found: kind_of(&other) }),
    };
    let people: Vec<Person> = serde_json::from_value(list)?;
    log::debug!(count = people.len(); "Parsed people list");
    Ok(people)
}

/// Reads people from `path`, or stdin when the path is absent or `-`.
pub fn read_people(path: Option<&Path>) -> Result<Vec<Person>, LoadError> {
    let content = match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| LoadError::Io {
                    path: "<stdin>".into(),
                    source,
                })?;
            buf
        }
    };
    parse_people(&content)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
