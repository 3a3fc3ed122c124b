//! Enrollment confirmation responses

use tracing::instrument;

use super::fields::{first_text, section};
use super::root_map;
use crate::error::Result;
use crate::node::{Node, NodeMap};

const CONFIRMATION_NO: &[&str] = &["confirmation_no", "confirmationNo", "CONFIRMATION_NO"];
const CA_NO: &[&str] = &["caNo", "CA_NO", "ca_no"];
const STATUS: &[&str] = &["status", "Status"];
const ERROR_CD: &[&str] = &["error_cd", "errorCode", "ERROR_CD"];
const ERROR_MESSAGE: &[&str] = &["error_message", "errorMessage", "ERROR_MESSAGE"];

/// Normalized enrollment confirmation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnrollmentResult {
    /// Derived: status is "success" or an identifier came back
    pub success: bool,
    pub confirmation_no: String,
    pub ca_no: String,
    pub error_cd: String,
    pub error_message: String,
    pub raw: NodeMap,
}

impl EnrollmentResult {
    pub const CANONICAL_FIELDS: [&'static str; 5] =
        ["success", "confirmation_no", "caNo", "error_cd", "error_message"];

    /// Normalize a parsed response, reading the `enrollment` section when
    /// present and the root otherwise
    pub fn from_node(node: &Node) -> Self {
        let raw = root_map(node);
        let fields = section(&raw, "enrollment", &raw);

        let status = first_text(fields, STATUS);
        let confirmation_no = first_text(fields, CONFIRMATION_NO);
        let ca_no = first_text(fields, CA_NO);
        let success = status.trim().eq_ignore_ascii_case("success")
            || !confirmation_no.is_empty()
            || !ca_no.is_empty();

        Self {
            success,
            confirmation_no,
            ca_no,
            error_cd: first_text(fields, ERROR_CD),
            error_message: first_text(fields, ERROR_MESSAGE),
            raw,
        }
    }

    pub fn extra(&self, key: &str) -> Option<&Node> {
        self.raw.get(key)
    }
}

/// Parse and normalize an enrollment response
#[instrument(level = "debug", skip_all)]
pub fn parse_enrollment(xml: &str) -> Result<EnrollmentResult> {
    crate::parse(xml).map(|node| EnrollmentResult::from_node(&node))
}

#[cfg(feature = "serde")]
impl serde::Serialize for EnrollmentResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.success)?;
        map.serialize_entry("confirmation_no", &self.confirmation_no)?;
        map.serialize_entry("caNo", &self.ca_no)?;
        map.serialize_entry("error_cd", &self.error_cd)?;
        map.serialize_entry("error_message", &self.error_message)?;
        super::serialize_extras(&mut map, &self.raw, &Self::CANONICAL_FIELDS)?;
        map.end()
    }
}
