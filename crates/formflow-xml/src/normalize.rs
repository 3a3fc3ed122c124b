//! Normalizers for vendor responses
//!
//! Each normalizer maps a parsed [`Node`](crate::Node) into a fixed-shape
//! result. They never fail: missing or oddly shaped fields fall back to
//! empty strings, `false`, or empty collections. The complete parsed root
//! stays reachable through `raw`, and serializing a result writes the
//! canonical fields followed by every raw field they do not shadow.

pub mod enrollment;
pub mod fields;
pub mod scheduling;
pub mod validation;

pub use enrollment::{parse_enrollment, EnrollmentResult};
pub use scheduling::{parse_scheduling, SchedulingResult, Slot};
pub use validation::{parse_validation, ValidationResult};

use crate::node::{Node, NodeMap};

/// Root map of a parsed response, or an empty map when the document
/// collapsed to text
pub(crate) fn root_map(node: &Node) -> NodeMap {
    match node {
        Node::Map(map) => map.clone(),
        Node::Text(_) | Node::List(_) => {
            tracing::trace!("response root is not a map; using empty raw fields");
            NodeMap::new()
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) fn serialize_extras<M: serde::ser::SerializeMap>(
    map: &mut M,
    raw: &NodeMap,
    canonical: &[&str],
) -> Result<(), M::Error> {
    for (key, value) in raw {
        if !canonical.contains(&key.as_str()) {
            map.serialize_entry(key, value)?;
        }
    }
    Ok(())
}
