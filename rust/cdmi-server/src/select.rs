use serde_json::{Map, Value};

use crate::{CdmiError, parse_bounds, slice_value};

/// Extract the field specifier list from a raw query string.
///
/// Every request parameter name is read as a semicolon-separated specifier
/// list; when several parameters are present the last one wins, and a
/// request without parameters asks for the full representation.
pub fn fields_from_query(query: Option<&str>) -> Option<Vec<String>> {
    let query = query?;
    let mut specifiers = None;

    for parameter in query.split('&') {
        if parameter.is_empty() {
            continue;
        }

        let name = parameter
            .split_once('=')
            .map(|(name, _)| name)
            .unwrap_or(parameter);

        specifiers = Some(name.split(';').map(str::to_string).collect());
    }

    specifiers
}

/// Shrink a full JSON representation down to the requested fields.
///
/// The selector is pure: the source mapping is never mutated and the
/// result is built fresh. Specifier forms:
///
/// - `name` copies a top-level field verbatim;
/// - `name:prefix` (where `name` is a sub-mapping) copies only the
///   sub-keys starting with `prefix`, accumulating across repeated
///   specifiers for the same `name` and omitting the field entirely when
///   nothing matches;
/// - `children:a` and `children:a-b` select by ordinal, 0-based and
///   inclusive;
/// - `value:a-b` selects an inclusive byte range of the payload;
/// - any other `:`-carrying specifier is a bad prefix.
///
/// Whenever the result carries both `childrenrange` and a `children`
/// listing, `childrenrange` is rewritten to describe the returned slice
/// rather than the original listing.
pub fn select_fields(
    source: &Map<String, Value>,
    specifiers: &[String],
) -> Result<Map<String, Value>, CdmiError> {
    let mut selected = Map::new();

    for specifier in specifiers {
        match specifier.split_once(':') {
            None => {
                let value = source.get(specifier).ok_or(CdmiError::BadField)?;
                selected.insert(specifier.clone(), value.clone());
            }
            Some((name, argument)) => {
                let value = source.get(name).ok_or(CdmiError::BadField)?;

                match value {
                    Value::Object(mapping) => {
                        let mut filtered = match selected.get(name) {
                            Some(Value::Object(accumulated)) => accumulated.clone(),
                            _ => Map::new(),
                        };

                        for (key, entry) in mapping {
                            if key.starts_with(argument) {
                                filtered.insert(key.clone(), entry.clone());
                            }
                        }

                        if !filtered.is_empty() {
                            selected.insert(name.to_string(), Value::Object(filtered));
                        }
                    }
                    _ if name == "children" => {
                        let children = value.as_array().ok_or(CdmiError::BadField)?;
                        let (start, end) = if argument.contains('-') {
                            parse_bounds(argument)?
                        } else {
                            let index = argument
                                .trim()
                                .parse()
                                .map_err(|_| CdmiError::BadRange)?;
                            (index, index)
                        };

                        if start > end || end >= children.len() {
                            return Err(CdmiError::BadRange);
                        }

                        selected.insert(
                            "children".to_string(),
                            Value::Array(children[start..=end].to_vec()),
                        );
                    }
                    _ if name == "value" => {
                        let payload = value.as_str().ok_or(CdmiError::BadField)?;
                        selected.insert(
                            "value".to_string(),
                            Value::String(slice_value(payload, argument)?),
                        );
                    }
                    _ => return Err(CdmiError::BadPrefix),
                }
            }
        }
    }

    if selected.contains_key("childrenrange") {
        if let Some(Value::Array(children)) = selected.get("children") {
            let range = format!("0-{}", children.len() as i64 - 1);
            selected.insert("childrenrange".to_string(), Value::String(range));
        }
    }

    Ok(selected)
}
