//! Scheduling slot responses

use tracing::{instrument, trace};

use super::fields::{first_node, first_text, section};
use super::root_map;
use crate::error::Result;
use crate::node::{Node, NodeMap};

const FSR: &[&str] = &["fsr", "FSR"];
const CA_NO: &[&str] = &["caNo", "CA_NO"];
const DATE: &[&str] = &["date", "@date", "Date"];
const TIME: &[&str] = &["time", "@time", "Time"];
const AVAILABLE: &[&str] = &["available", "@available", "Available"];

/// Availability values that mark a slot closed. Anything else, including
/// a missing flag, leaves the slot open.
const CLOSED_MARKERS: &[&str] = &["closed", "n", "no", "false", "0"];

/// Attributes of the `available` element that carry its state
const STATUS_ATTRIBUTES: &[&str] = &["status", "state", "value", "available"];

/// One appointment window
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Slot {
    pub date: String,
    pub time: String,
    pub available: bool,
}

impl Slot {
    /// Normalize a single `slot` node
    pub fn from_node(node: &Node) -> Self {
        match node {
            Node::Map(map) => Self {
                date: first_text(map, DATE),
                time: first_text(map, TIME),
                available: is_available(first_node(map, AVAILABLE)),
            },
            Node::Text(text) => Self {
                date: text.clone(),
                time: String::new(),
                available: true,
            },
            Node::List(_) => Self {
                date: node.text().unwrap_or_default().to_string(),
                time: String::new(),
                available: true,
            },
        }
    }
}

fn is_available(flag: Option<&Node>) -> bool {
    let Some(flag) = flag else {
        return true;
    };

    // <available status="closed"/> marks closure through a status-style
    // attribute; other attributes such as count="0" are metadata.
    let status = flag.as_map().into_iter().flat_map(|map| {
        map.attributes()
            .filter(|(name, _)| {
                STATUS_ATTRIBUTES
                    .iter()
                    .any(|attr| name.eq_ignore_ascii_case(attr))
            })
            .filter_map(|(_, value)| value.as_text())
    });
    let mut values = flag.text().into_iter().chain(status);
    !values.any(|value| {
        let value = value.trim();
        CLOSED_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
    })
}

/// Normalized scheduling availability
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchedulingResult {
    pub fsr: String,
    pub ca_no: String,
    /// Always a list, even when the vendor sent a single slot
    pub slots: Vec<Slot>,
    pub raw: NodeMap,
}

impl SchedulingResult {
    pub const CANONICAL_FIELDS: [&'static str; 3] = ["fsr", "caNo", "slots"];

    /// Normalize a parsed response, reading the `scheduling` section when
    /// present and the root otherwise
    pub fn from_node(node: &Node) -> Self {
        let raw = root_map(node);
        let fields = section(&raw, "scheduling", &raw);

        let slots: Vec<Slot> = fields
            .get("slots")
            .and_then(|slots| slots.get("slot"))
            .map(Node::as_list)
            .unwrap_or_default()
            .iter()
            .map(Slot::from_node)
            .collect();
        trace!(count = slots.len(), "slots normalized");

        Self {
            fsr: first_text(fields, FSR),
            ca_no: first_text(fields, CA_NO),
            slots,
            raw,
        }
    }

    /// Slots the customer can still book
    pub fn available_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.available)
    }

    pub fn extra(&self, key: &str) -> Option<&Node> {
        self.raw.get(key)
    }
}

/// Parse and normalize a scheduling response
#[instrument(level = "debug", skip_all)]
pub fn parse_scheduling(xml: &str) -> Result<SchedulingResult> {
    crate::parse(xml).map(|node| SchedulingResult::from_node(&node))
}

#[cfg(feature = "serde")]
impl serde::Serialize for SchedulingResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("fsr", &self.fsr)?;
        map.serialize_entry("caNo", &self.ca_no)?;
        map.serialize_entry("slots", &self.slots)?;
        super::serialize_extras(&mut map, &self.raw, &Self::CANONICAL_FIELDS)?;
        map.end()
    }
}
