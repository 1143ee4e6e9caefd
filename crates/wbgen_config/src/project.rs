//! Project description types: which slaves are attached to the bus and how.
//!
//! Unlike catalog records, slave records reject unknown keys: a misspelled
//! `irq` or `base_address` would otherwise silently drop a setting.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// The top-level project description.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Slaves in declaration order; the order determines computed addresses
    /// and multiplexer priority.
    #[serde(default)]
    pub slaves: Vec<SlaveConfig>,
}

/// One slave instantiation request.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlaveConfig {
    /// The instance name used in the generated module and header.
    #[serde(rename = "name")]
    pub instance_name: String,
    /// Name of the catalog entry this slave instantiates.
    #[serde(rename = "type")]
    pub catalog_type: String,
    /// Fixed base address literal (e.g. `32'h30000000` or `0x30000000`).
    #[serde(
        rename = "base_address",
        default,
        deserialize_with = "deserialize_address_literal"
    )]
    pub fixed_base_address: Option<String>,
    /// First pin of each external interface, keyed by interface name.
    #[serde(rename = "io_pins", default)]
    pub pin_mapping: BTreeMap<String, PinValue>,
    /// Index on the interrupt bus, if the slave raises interrupts.
    #[serde(rename = "irq", default)]
    pub interrupt_line: Option<i64>,
}

/// A pin number as written in the project file.
///
/// Project files are hand-written, so `5`, `"5"`, and `5.0` are all accepted
/// here; conversion to an index happens during resolution.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PinValue {
    /// An integer literal.
    Integer(i64),
    /// A floating-point literal.
    Float(f64),
    /// A quoted value.
    Text(String),
}

impl PinValue {
    /// Converts the value to an integer, if it denotes one.
    ///
    /// Text is trimmed and may carry a sign or `_` separators. Floats must be
    /// integral.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            PinValue::Integer(value) => Some(*value),
            PinValue::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(*value as i64)
            }
            PinValue::Float(_) => None,
            PinValue::Text(text) => {
                let cleaned: String = text.trim().chars().filter(|&c| c != '_').collect();
                cleaned.parse().ok()
            }
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinValue::Integer(value) => write!(f, "{value}"),
            PinValue::Float(value) => write!(f, "{value}"),
            PinValue::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

/// Deserializes an address that may be written as a string or a bare integer.
///
/// YAML turns an unquoted `0x30000000` into an integer; it is kept as its
/// decimal text so the literal stays valid in both output languages.
fn deserialize_address_literal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AddressLiteral;

    impl<'de> Visitor<'de> for AddressLiteral {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an address string or a non-negative integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v)
                .map(|v| Some(v.to_string()))
                .map_err(|_| E::custom(format!("negative base address {v}")))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(AddressLiteral)
        }
    }

    deserializer.deserialize_any(AddressLiteral)
}
