//! Account validation responses

use tracing::instrument;

use super::fields::{first_node, first_text};
use super::root_map;
use crate::error::Result;
use crate::node::{Node, NodeMap};

const VALID: &[&str] = &["valid", "isValid", "VALID"];
const ERROR_CD: &[&str] = &["error_cd", "errorCode", "ERROR_CD"];
const ERROR_MESSAGE: &[&str] = &["error_message", "errorMessage", "ERROR_MESSAGE"];
const CUSTOMER: &[&str] = &["customer", "Customer"];

/// Normalized account validation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    /// The vendor flag read `"Y"`
    pub valid: bool,
    pub error_cd: String,
    pub error_message: String,
    /// Customer record, an empty map when absent
    pub customer: Node,
    /// Full parsed response
    pub raw: NodeMap,
}

impl ValidationResult {
    /// Fields written ahead of the raw response when serialized
    pub const CANONICAL_FIELDS: [&'static str; 4] =
        ["valid", "error_cd", "error_message", "customer"];

    /// Normalize a parsed response. Fields are read from its `validation`
    /// section only.
    pub fn from_node(node: &Node) -> Self {
        let raw = root_map(node);
        let empty = NodeMap::new();
        let validation = raw
            .get("validation")
            .and_then(Node::as_map)
            .unwrap_or(&empty);

        Self {
            valid: first_text(validation, VALID) == "Y",
            error_cd: first_text(validation, ERROR_CD),
            error_message: first_text(validation, ERROR_MESSAGE),
            customer: first_node(validation, CUSTOMER).cloned().unwrap_or_default(),
            raw,
        }
    }

    /// Raw response field by key
    pub fn extra(&self, key: &str) -> Option<&Node> {
        self.raw.get(key)
    }
}

/// Parse and normalize an account validation response
#[instrument(level = "debug", skip_all)]
pub fn parse_validation(xml: &str) -> Result<ValidationResult> {
    crate::parse(xml).map(|node| ValidationResult::from_node(&node))
}

#[cfg(feature = "serde")]
impl serde::Serialize for ValidationResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("valid", &self.valid)?;
        map.serialize_entry("error_cd", &self.error_cd)?;
        map.serialize_entry("error_message", &self.error_message)?;
        map.serialize_entry("customer", &self.customer)?;
        super::serialize_extras(&mut map, &self.raw, &Self::CANONICAL_FIELDS)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account() -> Result<()> {
        let result = parse_validation(
            "<response><validation><valid>Y</valid><customer><name>Pat</name></customer></validation></response>",
        )?;
        assert!(result.valid);
        assert_eq!(result.error_cd, "");
        assert_eq!(
            result.customer.get("name").and_then(Node::as_text),
            Some("Pat")
        );
        Ok(())
    }

    #[test]
    fn test_flag_must_be_exactly_y() -> Result<()> {
        for flag in ["N", "y", "yes", ""] {
            let xml = format!("<r><validation><valid>{flag}</valid></validation></r>");
            assert!(!parse_validation(&xml)?.valid, "flag {flag:?}");
        }
        Ok(())
    }

    #[test]
    fn test_alternate_spellings() -> Result<()> {
        let result = parse_validation(
            "<r><validation><isValid>N</isValid><errorCode>E42</errorCode><errorMessage>Bad account</errorMessage></validation></r>",
        )?;
        assert!(!result.valid);
        assert_eq!(result.error_cd, "E42");
        assert_eq!(result.error_message, "Bad account");
        Ok(())
    }

    #[test]
    fn test_missing_validation_section_defaults() -> Result<()> {
        let result = parse_validation("<r><valid>Y</valid><status>ok</status></r>")?;
        assert!(!result.valid);
        assert_eq!(result.error_cd, "");
        assert_eq!(result.error_message, "");
        assert_eq!(result.customer, Node::Map(NodeMap::new()));
        assert_eq!(result.extra("status"), Some(&Node::from("ok")));
        Ok(())
    }

    #[test]
    fn test_text_root_degrades() {
        let result = ValidationResult::from_node(&Node::from("OK"));
        assert!(!result.valid);
        assert!(result.raw.is_empty());
    }
}
