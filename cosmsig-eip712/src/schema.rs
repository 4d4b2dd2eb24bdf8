//! EIP-712 type inference from JSON messages.
//!
//! Amino-JSON messages carry no type information, so the schema is inferred
//! from the values themselves: booleans become `bool`, numbers `int64`,
//! strings `string`, objects nested struct types and arrays take the type of
//! their first element. Keys are visited in sorted order so the same message
//! always yields the same schema.

use serde_json::{Map, Value};

use crate::projector::ProjectionError;
use crate::typed_data::{TypedField, Types};

/// Prefix of every message type name.
pub const TYPE_PREFIX: &str = "Type";

/// Path of a message root while walking nested fields.
const ROOT_PREFIX: &str = "_";

/// Upper bound on same-named but differently shaped type definitions.
pub const MAX_DUPLICATE_TYPE_DEFS: usize = 1000;

/// Empty arrays carry no element type; they are declared as strings.
const EMPTY_ARRAY_TYPE: &str = "string[]";

/// Turns a dotted path into a Solidity identifier.
///
/// Splits on every character that is not alphanumeric and capitalizes the
/// first letter of each part: `TypeMsgSend_.value.amount` becomes
/// `TypeMsgSendValueAmount`.
#[must_use]
pub fn sanitize_type_name(raw: &str) -> String {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}

/// EIP-712 type of a JSON primitive, or `None` for objects, arrays and null.
#[must_use]
pub const fn primitive_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Bool(_) => Some("bool"),
        Value::Number(_) => Some("int64"),
        Value::String(_) => Some("string"),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Root type name of a message, from the last `/` segment of its Amino tag.
///
/// `cosmos-sdk/MsgSend` becomes `TypeMsgSend`.
///
/// # Errors
///
/// Returns [`ProjectionError::MalformedMessageType`] if `type` is missing,
/// not a string or empty.
pub fn message_root_type(msg: &Map<String, Value>, index: usize) -> Result<String, ProjectionError> {
    let tag = msg
        .get("type")
        .and_then(Value::as_str)
        .filter(|tag| !tag.is_empty())
        .ok_or(ProjectionError::MalformedMessageType { index })?;
    let name = tag.rsplit('/').next().unwrap_or(tag);
    Ok(format!("{TYPE_PREFIX}{name}"))
}

/// Adds the types of one message and returns its struct type name.
///
/// Nested objects are named after their path below `root_type`, e.g.
/// `TypeMsgSendValue`. Identical shapes reuse an existing name; a differing
/// shape under the same name takes the next free numeric suffix.
///
/// # Errors
///
/// Returns [`ProjectionError::TooManyDuplicateTypes`] if no suffix below
/// [`MAX_DUPLICATE_TYPE_DEFS`] is free.
pub fn add_message_types(
    types: &mut Types,
    root_type: &str,
    msg: &Map<String, Value>,
) -> Result<String, ProjectionError> {
    add_object_types(types, root_type, ROOT_PREFIX, msg)
}

fn type_def_for_prefix(prefix: &str, root_type: &str) -> String {
    if prefix == ROOT_PREFIX {
        root_type.to_owned()
    } else {
        sanitize_type_name(&format!("{root_type}{prefix}"))
    }
}

fn sorted_entries(object: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = object.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
}

fn add_object_types(
    types: &mut Types,
    root_type: &str,
    prefix: &str,
    payload: &Map<String, Value>,
) -> Result<String, ProjectionError> {
    let mut fields = Vec::new();

    for (name, value) in sorted_entries(payload) {
        let (value, is_array) = match value {
            Value::Array(items) => match items.first() {
                Some(first) => (first, true),
                None => {
                    fields.push(TypedField::new(name.as_str(), EMPTY_ARRAY_TYPE));
                    continue;
                }
            },
            other => (other, false),
        };
        let suffix = if is_array { "[]" } else { "" };

        if let Some(primitive) = primitive_type(value) {
            fields.push(TypedField::new(name.as_str(), format!("{primitive}{suffix}")));
            continue;
        }

        // Nested arrays cannot be expressed; they are skipped together with nulls.
        if let Value::Object(object) = value {
            let field_prefix = format!("{prefix}.{name}");
            let type_def = add_object_types(types, root_type, &field_prefix, object)?;
            let type_def = sanitize_type_name(&type_def);
            fields.push(TypedField::new(name.as_str(), format!("{type_def}{suffix}")));
        }
    }

    add_types_to_root(types, &type_def_for_prefix(prefix, root_type), fields)
}

/// Inserts a struct type under `type_def` plus the first free or matching
/// numeric suffix and returns the name used.
///
/// # Errors
///
/// Returns [`ProjectionError::TooManyDuplicateTypes`] when every suffix up to
/// [`MAX_DUPLICATE_TYPE_DEFS`] holds a different definition.
pub fn add_types_to_root(
    types: &mut Types,
    type_def: &str,
    fields: Vec<TypedField>,
) -> Result<String, ProjectionError> {
    for index in 0..MAX_DUPLICATE_TYPE_DEFS {
        let indexed = format!("{type_def}{index}");
        match types.get(&indexed) {
            Some(existing) if *existing == fields => return Ok(indexed),
            Some(_) => {}
            None => {
                types.insert(indexed.clone(), fields);
                return Ok(indexed);
            }
        }
    }
    Err(ProjectionError::TooManyDuplicateTypes {
        type_name: type_def.to_owned(),
    })
}

/// Adds the legacy value schema of a message under `type_name`.
///
/// Unlike [`add_message_types`], nested struct names carry no index: a nested
/// object at `amount` is always `TypeAmount`. A second, different definition
/// under an existing name is an error.
///
/// # Errors
///
/// Returns [`ProjectionError::ConflictingType`] on a conflicting redefinition.
pub fn add_legacy_value_types(
    types: &mut Types,
    type_name: &str,
    value: &Map<String, Value>,
) -> Result<(), ProjectionError> {
    let fields = legacy_object_fields(types, "", value)?;
    insert_unique(types, type_name, fields)
}

/// Folds the shape of `value` into `shape`.
///
/// Legacy messages share one type, but a single value may leave an optional
/// field out or carry an empty array. Merging every value fills those gaps:
/// missing keys are added, nulls and empty arrays take the other side's
/// shape, and nested objects and first array elements merge recursively.
pub fn merge_legacy_shape(shape: &mut Value, value: &Value) {
    match (shape, value) {
        (Value::Object(shape), Value::Object(value)) => {
            for (key, field) in value {
                match shape.get_mut(key) {
                    Some(existing) => merge_legacy_shape(existing, field),
                    None => {
                        shape.insert(key.clone(), field.clone());
                    }
                }
            }
        }
        (Value::Array(shape), Value::Array(value)) => match (shape.first_mut(), value.first()) {
            (Some(first), Some(other)) => merge_legacy_shape(first, other),
            (None, Some(other)) => shape.push(other.clone()),
            _ => {}
        },
        (shape, value) if shape.is_null() => *shape = value.clone(),
        _ => {}
    }
}

fn legacy_object_fields(
    types: &mut Types,
    path: &str,
    object: &Map<String, Value>,
) -> Result<Vec<TypedField>, ProjectionError> {
    let mut fields = Vec::new();

    for (name, value) in sorted_entries(object) {
        let (value, suffix) = match value {
            Value::Array(items) => match items.first() {
                Some(first) => (first, "[]"),
                None => {
                    fields.push(TypedField::new(name.as_str(), EMPTY_ARRAY_TYPE));
                    continue;
                }
            },
            other => (other, ""),
        };

        if let Some(primitive) = primitive_type(value) {
            fields.push(TypedField::new(name.as_str(), format!("{primitive}{suffix}")));
            continue;
        }

        if let Value::Object(nested) = value {
            let nested_path = format!("{path}.{name}");
            let type_name = format!("{TYPE_PREFIX}{}", sanitize_type_name(&nested_path));
            let nested_fields = legacy_object_fields(types, &nested_path, nested)?;
            insert_unique(types, &type_name, nested_fields)?;
            fields.push(TypedField::new(name.as_str(), format!("{type_name}{suffix}")));
        }
    }

    Ok(fields)
}

fn insert_unique(
    types: &mut Types,
    type_name: &str,
    fields: Vec<TypedField>,
) -> Result<(), ProjectionError> {
    match types.get(type_name) {
        Some(existing) if *existing != fields => Err(ProjectionError::ConflictingType {
            type_name: type_name.to_owned(),
        }),
        Some(_) => Ok(()),
        None => {
            types.insert(type_name.to_owned(), fields);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_sanitize_type_name() {
        assert_eq!(sanitize_type_name("TypeMsgSend_.value"), "TypeMsgSendValue");
        assert_eq!(
            sanitize_type_name("TypeMsgSend_.value.from_address"),
            "TypeMsgSendValueFromAddress"
        );
        assert_eq!(sanitize_type_name(".amount"), "Amount");
        assert_eq!(sanitize_type_name("TypeMsgSendValue0"), "TypeMsgSendValue0");
    }

    #[test]
    fn test_message_root_type() {
        let msg = object(json!({"type": "cosmos-sdk/MsgSend", "value": {}}));
        assert_eq!(message_root_type(&msg, 0).unwrap(), "TypeMsgSend");
        let msg = object(json!({"type": "MsgPlain"}));
        assert_eq!(message_root_type(&msg, 0).unwrap(), "TypeMsgPlain");
        let msg = object(json!({"type": 7}));
        assert!(matches!(
            message_root_type(&msg, 3),
            Err(ProjectionError::MalformedMessageType { index: 3 })
        ));
    }

    #[test]
    fn test_send_message_schema() {
        let mut types = Types::new();
        let msg = object(json!({
            "type": "cosmos-sdk/MsgSend",
            "value": {
                "to_address": "0xb",
                "from_address": "0xa",
                "amount": [{"denom": "aevmos", "amount": "1"}],
            }
        }));
        let name = add_message_types(&mut types, "TypeMsgSend", &msg).unwrap();
        assert_eq!(name, "TypeMsgSend0");
        assert_eq!(
            types["TypeMsgSend0"],
            vec![
                TypedField::new("type", "string"),
                TypedField::new("value", "TypeMsgSendValue0"),
            ]
        );
        assert_eq!(
            types["TypeMsgSendValue0"],
            vec![
                TypedField::new("amount", "TypeMsgSendValueAmount0[]"),
                TypedField::new("from_address", "string"),
                TypedField::new("to_address", "string"),
            ]
        );
        assert_eq!(
            types["TypeMsgSendValueAmount0"],
            vec![
                TypedField::new("amount", "string"),
                TypedField::new("denom", "string"),
            ]
        );
    }

    #[test]
    fn test_primitive_and_edge_values() {
        let mut types = Types::new();
        let msg = object(json!({
            "type": "x/MsgEdge",
            "value": {
                "flag": true,
                "count": 3,
                "tags": ["a", "b"],
                "empty": [],
                "nothing": null,
                "matrix": [[1, 2]],
            }
        }));
        add_message_types(&mut types, "TypeMsgEdge", &msg).unwrap();
        assert_eq!(
            types["TypeMsgEdgeValue0"],
            vec![
                TypedField::new("count", "int64"),
                TypedField::new("empty", "string[]"),
                TypedField::new("flag", "bool"),
                TypedField::new("tags", "string[]"),
            ]
        );
    }

    #[test]
    fn test_identical_shapes_share_a_name() {
        let mut types = Types::new();
        let a = object(json!({"type": "t/MsgA", "value": {"x": "1"}}));
        let b = object(json!({"type": "t/MsgA", "value": {"x": "2"}}));
        assert_eq!(add_message_types(&mut types, "TypeMsgA", &a).unwrap(), "TypeMsgA0");
        assert_eq!(add_message_types(&mut types, "TypeMsgA", &b).unwrap(), "TypeMsgA0");
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_differing_shapes_take_next_index() {
        let mut types = Types::new();
        let a = object(json!({"type": "t/MsgA", "value": {"x": "1"}}));
        let b = object(json!({"type": "t/MsgA", "value": {"x": 1}}));
        add_message_types(&mut types, "TypeMsgA", &a).unwrap();
        assert_eq!(add_message_types(&mut types, "TypeMsgA", &b).unwrap(), "TypeMsgA1");
        assert_eq!(types["TypeMsgA1"][1], TypedField::new("value", "TypeMsgAValue1"));
    }

    #[test]
    fn test_duplicate_limit() {
        let mut types = Types::new();
        for index in 0..MAX_DUPLICATE_TYPE_DEFS {
            types.insert(format!("TypeFull{index}"), vec![]);
        }
        let err = add_types_to_root(&mut types, "TypeFull", vec![TypedField::new("a", "bool")])
            .unwrap_err();
        assert!(matches!(err, ProjectionError::TooManyDuplicateTypes { .. }));
    }

    #[test]
    fn test_legacy_value_schema() {
        let mut types = Types::new();
        let value = object(json!({
            "delegator_address": "0xa",
            "validator_address": "evmosvaloper1",
            "amount": {"denom": "aevmos", "amount": "1"},
        }));
        add_legacy_value_types(&mut types, "MsgValue", &value).unwrap();
        assert_eq!(
            types["MsgValue"],
            vec![
                TypedField::new("amount", "TypeAmount"),
                TypedField::new("delegator_address", "string"),
                TypedField::new("validator_address", "string"),
            ]
        );
        assert_eq!(
            types["TypeAmount"],
            vec![
                TypedField::new("amount", "string"),
                TypedField::new("denom", "string"),
            ]
        );
    }

    #[test]
    fn test_merge_fills_empty_and_missing_fields() {
        let mut shape = json!({"amount": [], "from_address": "0xa", "memo": null});
        merge_legacy_shape(
            &mut shape,
            &json!({"amount": [{"denom": "aevmos", "amount": "1"}], "memo": "m", "extra": true}),
        );
        assert_eq!(
            shape,
            json!({
                "amount": [{"denom": "aevmos", "amount": "1"}],
                "from_address": "0xa",
                "memo": "m",
                "extra": true,
            })
        );

        let mut shape = json!({"amount": {"denom": "aevmos"}});
        merge_legacy_shape(&mut shape, &json!({"amount": {"amount": "2"}}));
        assert_eq!(shape, json!({"amount": {"denom": "aevmos", "amount": "2"}}));
    }

    #[test]
    fn test_legacy_nested_path_names() {
        let mut types = Types::new();
        let value = object(json!({"outer": {"inner_field": {"x": "1"}}}));
        add_legacy_value_types(&mut types, "MsgValue", &value).unwrap();
        assert!(types.contains_key("TypeOuter"));
        assert!(types.contains_key("TypeOuterInnerField"));
    }

    #[test]
    fn test_legacy_conflicting_definition() {
        let mut types = Types::new();
        types.insert("TypeAmount".into(), vec![TypedField::new("denom", "string")]);
        let value = object(json!({"amount": [{"denom": "a", "amount": "1"}]}));
        assert!(matches!(
            add_legacy_value_types(&mut types, "MsgValue", &value),
            Err(ProjectionError::ConflictingType { type_name }) if type_name == "TypeAmount"
        ));
    }
}
