use cosmsig::ValidationMode;
use serde_json::Value;

use super::{ProjectionError, ProjectionInput, Projector, parse_object};
use crate::schema::{add_legacy_value_types, merge_legacy_shape};
use crate::typed_data::{DOMAIN_TYPE, TypedData, TypedDataDomain, TypedField, Types};

const DOMAIN_NAME: &str = "Cosmos Web3";
const DOMAIN_VERSION: &str = "1.0.0";
const DOMAIN_VERIFYING_CONTRACT: &str = "cosmos";
const DOMAIN_SALT: &str = "0";

const MSG_VALUE_TYPE: &str = "MsgValue";

/// Projects the deprecated shape: every message shares the `Msg`/`MsgValue`
/// schema merged from the values of all messages, and the fee records its
/// payer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyProjector;

impl LegacyProjector {
    fn domain(input: &ProjectionInput<'_>) -> TypedDataDomain {
        TypedDataDomain {
            name: Some(DOMAIN_NAME.into()),
            version: Some(DOMAIN_VERSION.into()),
            chain_id: Some(input.chain_id.as_u256()),
            verifying_contract: Some(DOMAIN_VERIFYING_CONTRACT.into()),
            salt: Some(DOMAIN_SALT.into()),
        }
    }

    fn root_types(domain: &TypedDataDomain) -> Types {
        let mut types = Types::new();
        types.insert(DOMAIN_TYPE.into(), domain.type_fields());
        types.insert(
            "Tx".into(),
            vec![
                TypedField::new("account_number", "string"),
                TypedField::new("chain_id", "string"),
                TypedField::new("fee", "Fee"),
                TypedField::new("memo", "string"),
                TypedField::new("msgs", "Msg[]"),
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
        types.insert(
            "Msg".into(),
            vec![
                TypedField::new("type", "string"),
                TypedField::new("value", MSG_VALUE_TYPE),
            ],
        );
        types
    }
}

impl Projector for LegacyProjector {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn validation_mode(&self) -> ValidationMode {
        ValidationMode::Legacy
    }

    fn project(&self, input: &ProjectionInput<'_>) -> Result<TypedData, ProjectionError> {
        let mut payload = parse_object(input.sign_bytes)?;
        let domain = Self::domain(input);
        let mut types = Self::root_types(&domain);

        let mut shape = input.primary_msg.legacy_value()?;
        if let Some(Value::Array(msgs)) = payload.get("msgs") {
            for value in msgs.iter().filter_map(|msg| msg.get("value")) {
                merge_legacy_shape(&mut shape, value);
            }
        }
        let Value::Object(value) = shape else {
            return Err(ProjectionError::NotAnObject {
                what: "message value",
            });
        };
        add_legacy_value_types(&mut types, MSG_VALUE_TYPE, &value)?;

        if let Some(delegation) = input.fee_delegation {
            let Some(Value::Object(fee)) = payload.get_mut("fee") else {
                return Err(ProjectionError::MissingFee);
            };
            fee.insert(
                "feePayer".into(),
                Value::String(delegation.fee_payer.to_checksum(None)),
            );
            types.insert(
                "Fee".into(),
                vec![
                    TypedField::new("feePayer", "string"),
                    TypedField::new("amount", "Coin[]"),
                    TypedField::new("gas", "string"),
                ],
            );
        }

        let typed = TypedData {
            types,
            primary_type: "Tx".into(),
            domain,
            message: payload,
        };
        debug_assert!(typed.is_valid());
        Ok(typed)
    }
}
