use cosmsig::ValidationMode;
use serde_json::{Map, Value};

use super::{ProjectionError, ProjectionInput, Projector, parse_object};
use crate::schema::{add_message_types, message_root_type};
use crate::typed_data::{DOMAIN_TYPE, TypedData, TypedDataDomain, TypedField, Types};

const TX_TYPE: &str = "Tx";

/// Projects each message under its own `msg{i}` field with an inferred schema.
///
/// The domain carries only the chain id.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentProjector;

impl CurrentProjector {
    fn root_types() -> Types {
        let mut types = Types::new();
        types.insert(
            DOMAIN_TYPE.into(),
            vec![TypedField::new("chainId", "uint256")],
        );
        types.insert(
            TX_TYPE.into(),
            vec![
                TypedField::new("account_number", "string"),
                TypedField::new("chain_id", "string"),
                TypedField::new("fee", "Fee"),
                TypedField::new("memo", "string"),
                TypedField::new("sequence", "string"),
            ],
        );
        types.insert(
            "Fee".into(),
            vec![
                TypedField::new("amount", "Coin[]"),
                TypedField::new("gas", "string"),
            ],
        );
        types.insert(
            "Coin".into(),
            vec![
                TypedField::new("denom", "string"),
                TypedField::new("amount", "string"),
            ],
        );
        types
    }
}

/// Moves every entry of `msgs` to a top-level `msg{i}` field and returns the
/// message count.
fn flatten_messages(payload: &mut Map<String, Value>) -> Result<usize, ProjectionError> {
    let Some(Value::Array(msgs)) = payload.remove("msgs") else {
        return Err(ProjectionError::MissingMessages);
    };

    let count = msgs.len();
    for (index, msg) in msgs.into_iter().enumerate() {
        if !msg.is_object() {
            return Err(ProjectionError::MessageNotObject { index });
        }
        let field = format!("msg{index}");
        if payload.contains_key(&field) {
            return Err(ProjectionError::DuplicateMessageField { field });
        }
        payload.insert(field, msg);
    }
    Ok(count)
}

impl Projector for CurrentProjector {
    fn name(&self) -> &'static str {
        "current"
    }

    fn validation_mode(&self) -> ValidationMode {
        ValidationMode::Current
    }

    fn project(&self, input: &ProjectionInput<'_>) -> Result<TypedData, ProjectionError> {
        let mut payload = parse_object(input.sign_bytes)?;
        let count = flatten_messages(&mut payload)?;

        let mut types = Self::root_types();
        for index in 0..count {
            let field = format!("msg{index}");
            let Some(Value::Object(msg)) = payload.get(&field) else {
                return Err(ProjectionError::MessageNotObject { index });
            };
            let root_type = message_root_type(msg, index)?;
            let type_def = add_message_types(&mut types, &root_type, msg)?;
            types
                .entry(TX_TYPE.to_owned())
                .or_default()
                .push(TypedField::new(field, type_def));
        }

        let typed = TypedData {
            types,
            primary_type: TX_TYPE.into(),
            domain: TypedDataDomain {
                chain_id: Some(input.chain_id.as_u256()),
                ..TypedDataDomain::default()
            },
            message: payload,
        };
        debug_assert!(typed.is_valid());
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::fixtures::{ALICE, send, sign_bytes, sign_doc};
    use cosmsig::ChainDomainId;
    use serde_json::json;

    fn project(bytes: &[u8]) -> Result<TypedData, ProjectionError> {
        let doc = sign_doc(vec![send(ALICE, "1")]);
        CurrentProjector.project(&ProjectionInput {
            chain_id: ChainDomainId::from(9000),
            sign_bytes: bytes,
            primary_msg: doc.msgs[0].payload(),
            fee_delegation: None,
        })
    }

    #[test]
    fn test_projects_single_send() {
        let bytes = sign_bytes(&sign_doc(vec![send(ALICE, "1")]));
        let typed = project(&bytes).unwrap();

        assert_eq!(typed.primary_type, "Tx");
        assert_eq!(typed.domain.type_fields(), typed.types[DOMAIN_TYPE]);
        assert_eq!(
            typed.types["Tx"].last(),
            Some(&TypedField::new("msg0", "TypeMsgSend0"))
        );
        assert!(typed.message.get("msgs").is_none());
        assert_eq!(typed.message["msg0"]["type"], "cosmos-sdk/MsgSend");
        assert!(typed.eip712_bytes().is_ok());
    }

    #[test]
    fn test_same_shape_messages_share_type() {
        let bytes = sign_bytes(&sign_doc(vec![send(ALICE, "1"), send(ALICE, "2")]));
        let typed = project(&bytes).unwrap();
        let tx = &typed.types["Tx"];
        assert_eq!(tx[5], TypedField::new("msg0", "TypeMsgSend0"));
        assert_eq!(tx[6], TypedField::new("msg1", "TypeMsgSend0"));
        assert!(!typed.types.contains_key("TypeMsgSend1"));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let bytes = sign_bytes(&sign_doc(vec![send(ALICE, "1"), send(ALICE, "2")]));
        let a = project(&bytes).unwrap();
        let b = project(&bytes).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.signing_hash().unwrap(), b.signing_hash().unwrap());
    }

    #[test]
    fn test_rejects_existing_msg_key() {
        let bytes = serde_json::to_vec(&json!({
            "account_number": "0", "chain_id": "evmos_9000-1",
            "fee": {"amount": [], "gas": "1"}, "memo": "", "sequence": "0",
            "msg0": "taken",
            "msgs": [{"type": "cosmos-sdk/MsgSend", "value": {}}],
        }))
        .unwrap();
        assert!(matches!(
            project(&bytes),
            Err(ProjectionError::DuplicateMessageField { field }) if field == "msg0"
        ));
    }

    #[test]
    fn test_rejects_missing_msgs() {
        let bytes = br#"{"account_number":"0","fee":{"amount":[],"gas":"1"}}"#;
        assert!(matches!(project(bytes), Err(ProjectionError::MissingMessages)));
    }

    #[test]
    fn test_rejects_untyped_message() {
        let bytes = br#"{"msgs":[{"value":{}}]}"#;
        assert!(matches!(
            project(bytes),
            Err(ProjectionError::MalformedMessageType { index: 0 })
        ));
    }

    #[test]
    fn test_domain_has_only_chain_id() {
        let bytes = sign_bytes(&sign_doc(vec![send(ALICE, "1")]));
        let typed = project(&bytes).unwrap();
        let json = serde_json::to_value(&typed).unwrap();
        assert_eq!(json["domain"], json!({"chainId": "0x2328"}));
    }
}
