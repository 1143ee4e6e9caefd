//! The IP catalog: reusable slave block definitions.
//!
//! Catalog files are shared between projects and carry metadata this tool
//! does not model (register maps, clocking notes, ...). Keys outside the
//! modeled fields are ignored rather than rejected. For external interfaces
//! that means only `name`, `port`, `direction`, `width`, `description`, and
//! `output_control` are read.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Pin direction of an external interface, as seen from the slave.
///
/// Parsed case-insensitively. Any other text is kept as
/// [`Direction::Unknown`] so the resolver can report which slave uses it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Direction {
    /// The slave reads the pins.
    Input,
    /// The slave drives the pins.
    Output,
    /// An unrecognized direction string.
    Unknown(String),
}

impl From<String> for Direction {
    fn from(text: String) -> Self {
        match text.to_ascii_lowercase().as_str() {
            "input" => Direction::Input,
            "output" => Direction::Output,
            _ => Direction::Unknown(text),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
            Direction::Unknown(text) => write!(f, "{text}"),
        }
    }
}

/// One named external-pin group a catalog entry exposes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawInterfaceSpec")]
pub struct InterfaceSpec {
    /// Key used to look up the pin mapping supplied by a project slave.
    pub name: String,
    /// The port identifier on the generated instance.
    pub port_name: String,
    /// Whether the slave reads or drives the pins.
    pub direction: Direction,
    /// The direction exactly as the catalog spells it, e.g. `Output`.
    pub direction_label: String,
    /// Number of consecutive pins, at least 1.
    pub width: u32,
    /// Free-form description.
    pub description: Option<String>,
    /// For outputs: the pins carry output-enable control rather than data.
    pub output_controlled: bool,
}

#[derive(Deserialize)]
struct RawInterfaceSpec {
    name: String,
    port: String,
    direction: String,
    width: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    output_control: bool,
}

impl From<RawInterfaceSpec> for InterfaceSpec {
    fn from(raw: RawInterfaceSpec) -> Self {
        Self {
            name: raw.name,
            port_name: raw.port,
            direction: Direction::from(raw.direction.clone()),
            direction_label: raw.direction,
            width: raw.width,
            description: raw.description,
            output_controlled: raw.output_control,
        }
    }
}

/// A per-bus resource cost as written in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CostValue {
    /// A non-negative integer count.
    Count(u64),
    /// Anything else; treated as zero when summing.
    Invalid(String),
}

impl CostValue {
    fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(count) => CostValue::Count(count),
                None => CostValue::Invalid(n.to_string()),
            },
            serde_json::Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse()
                    .map(CostValue::Count)
                    .unwrap_or_else(|_| CostValue::Invalid(s.clone()))
            }
            serde_json::Value::String(s) => CostValue::Invalid(s.clone()),
            other => CostValue::Invalid(other.to_string()),
        }
    }

    /// Returns the count, or 0 if the value is not numeric.
    pub fn count_or_zero(&self) -> u64 {
        match self {
            CostValue::Count(count) => *count,
            CostValue::Invalid(_) => 0,
        }
    }
}

impl fmt::Display for CostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostValue::Count(count) => write!(f, "{count}"),
            CostValue::Invalid(text) => write!(f, "{text}"),
        }
    }
}

/// One `(bus kind, cost)` entry of a catalog block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceCost {
    /// The bus kind the cost applies to (e.g. `"WB"`).
    pub bus: String,
    /// The declared cost.
    pub value: CostValue,
}

/// One reusable IP block definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique name of the block; project slaves refer to it as their `type`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Bus kinds the block can attach to, as written in the catalog.
    pub supported_buses: Vec<String>,
    /// Declared resource costs in catalog order.
    pub resource_cost: Vec<ResourceCost>,
    /// External pin groups in catalog order.
    pub external_interfaces: Vec<InterfaceSpec>,
    /// The block declares an interrupt descriptor.
    pub interrupt_capable: bool,
    /// The block declares at least one FIFO.
    pub fifo_capable: bool,
}

impl CatalogEntry {
    /// Returns `true` if any supported bus matches `kind`, ignoring ASCII case.
    pub fn supports_bus(&self, kind: &str) -> bool {
        self.supported_buses
            .iter()
            .any(|bus| bus.eq_ignore_ascii_case(kind))
    }

    /// Returns the first declared cost for the bus kind `bus` (exact match).
    pub fn cost_for(&self, bus: &str) -> Option<&CostValue> {
        self.resource_cost
            .iter()
            .find(|entry| entry.bus == bus)
            .map(|entry| &entry.value)
    }
}

/// A validated catalog indexed by entry name.
///
/// When two entries share a name the later definition replaces the earlier
/// one in place, so [`names`](Self::names) keeps first-appearance order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from entries, validating each one.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Catalog::default();
        for (position, entry) in entries.into_iter().enumerate() {
            validate_entry(position, &entry)?;
            match catalog.index.get(&entry.name) {
                Some(&slot) => {
                    tracing::debug!(name = %entry.name, "catalog entry redefined, keeping the later one");
                    catalog.entries[slot] = entry;
                }
                None => {
                    catalog
                        .index
                        .insert(entry.name.clone(), catalog.entries.len());
                    catalog.entries.push(entry);
                }
            }
        }
        Ok(catalog)
    }

    /// Looks up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Returns entry names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns the number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entry(position: usize, entry: &CatalogEntry) -> Result<(), ConfigError> {
    if entry.name.is_empty() {
        return Err(ConfigError::MissingField(format!(
            "slaves[{position}].info.name"
        )));
    }
    for iface in &entry.external_interfaces {
        if iface.width == 0 {
            return Err(ConfigError::ValidationError(format!(
                "interface `{}` of `{}` has zero width",
                iface.name, entry.name
            )));
        }
    }
    Ok(())
}

/// The catalog document as it appears on disk.
#[derive(Debug, Deserialize)]
pub(crate) struct RawLibrary {
    #[serde(default)]
    slaves: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    info: RawInfo,
    #[serde(default)]
    external_interface: Vec<InterfaceSpec>,
    #[serde(default)]
    flags: Option<serde_json::Value>,
    #[serde(default)]
    fifos: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    name: String,
    #[serde(default = "default_description")]
    description: String,
    #[serde(default)]
    bus: Vec<String>,
    #[serde(default)]
    cell_count: Vec<BTreeMap<String, serde_json::Value>>,
}

impl Default for RawInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: default_description(),
            bus: Vec::new(),
            cell_count: Vec::new(),
        }
    }
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl RawLibrary {
    pub(crate) fn into_catalog(self) -> Result<Catalog, ConfigError> {
        Catalog::from_entries(self.slaves.into_iter().map(RawEntry::into_entry))
    }
}

impl RawEntry {
    fn into_entry(self) -> CatalogEntry {
        let resource_cost = self
            .info
            .cell_count
            .iter()
            .flat_map(|costs| costs.iter())
            .map(|(bus, value)| ResourceCost {
                bus: bus.clone(),
                value: CostValue::from_json(value),
            })
            .collect();
        let fifo_capable = self
            .fifos
            .as_ref()
            .and_then(|f| f.as_array())
            .is_some_and(|fifos| !fifos.is_empty());

        CatalogEntry {
            name: self.info.name,
            description: self.info.description,
            supported_buses: self.info.bus,
            resource_cost,
            external_interfaces: self.external_interface,
            interrupt_capable: self.flags.is_some(),
            fifo_capable,
        }
    }
}
