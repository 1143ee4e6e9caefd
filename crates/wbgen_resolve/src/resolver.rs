//! Slave binding and the resolution pass.
//!
//! Slaves are processed in declaration order. For each slave the checks run
//! in a fixed sequence: catalog binding, bus capability and cost, interrupt
//! capability then range, address allocation, pin table conversion, and
//! finally each external interface in catalog order.

use crate::address::{parse_address_literal, AddressMap, BaseAddress, SLAVE_REGION_SIZE};
use crate::codes;
use crate::error::ResolveError;
use crate::pins::{PinClaimPolicy, PinPlan, PinRange, PinRole, IO_PIN_COUNT};
use std::collections::BTreeMap;
use wbgen_config::{Catalog, CatalogEntry, Direction, InterfaceSpec, SlaveConfig};
use wbgen_diagnostics::DiagnosticSink;

/// Number of lines on the user interrupt bus.
pub const IRQ_LINE_COUNT: u8 = 3;

const WISHBONE_BUS: &str = "WB";
const GENERIC_BUS: &str = "GENERIC";

/// Options controlling resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Precedence rule for pins claimed by more than one interface.
    pub pin_policy: PinClaimPolicy,
}

/// An external interface with its resolved pin range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedInterface {
    /// The interface as declared in the catalog.
    pub spec: InterfaceSpec,
    /// The pins the interface occupies.
    pub pins: PinRange,
    /// How those pins are driven.
    pub role: PinRole,
}

/// A slave after binding, address allocation, and pin resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSlave {
    /// The instance name.
    pub instance_name: String,
    /// The bound catalog entry name.
    pub catalog_type: String,
    /// The resolved base address.
    pub base_address: BaseAddress,
    /// The full converted pin table, including keys no interface uses.
    pub pin_mapping: BTreeMap<String, i64>,
    /// Line on the interrupt bus, if any.
    pub interrupt_line: Option<u8>,
    /// The slave's Wishbone resource cost.
    pub resource_cost: u64,
    /// External interfaces in catalog order.
    pub interfaces: Vec<ResolvedInterface>,
}

/// The result of resolving a whole bus description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedBus {
    /// Slaves in declaration order.
    pub slaves: Vec<ResolvedSlave>,
    /// The final pin plan.
    pub pins: PinPlan,
    /// Sum of all slaves' resource costs.
    pub total_cost: u64,
}

/// Resolves `slaves` against `catalog`.
///
/// Returns the first violated constraint as an error. Non-fatal findings are
/// emitted to `sink`.
pub fn resolve(
    catalog: &Catalog,
    slaves: &[SlaveConfig],
    options: &ResolveOptions,
    sink: &DiagnosticSink,
) -> Result<ResolvedBus, ResolveError> {
    let mut resolver = Resolver {
        catalog,
        options,
        sink,
        addresses: AddressMap::new(),
        pins: PinPlan::new(),
    };

    let mut resolved = Vec::with_capacity(slaves.len());
    for (index, slave) in slaves.iter().enumerate() {
        resolved.push(resolver.resolve_slave(index, slave)?);
    }

    let total_cost = resolved.iter().map(|s| s.resource_cost).sum();
    tracing::info!(
        slaves = resolved.len(),
        total_cost,
        pins_claimed = resolver.pins.claimed_count(),
        "bus resolved"
    );

    Ok(ResolvedBus {
        slaves: resolved,
        pins: resolver.pins,
        total_cost,
    })
}

struct Resolver<'a> {
    catalog: &'a Catalog,
    options: &'a ResolveOptions,
    sink: &'a DiagnosticSink,
    addresses: AddressMap,
    pins: PinPlan,
}

impl Resolver<'_> {
    fn resolve_slave(
        &mut self,
        index: usize,
        slave: &SlaveConfig,
    ) -> Result<ResolvedSlave, ResolveError> {
        let name = slave.instance_name.as_str();
        let catalog = self.catalog;
        let entry = catalog
            .get(&slave.catalog_type)
            .ok_or_else(|| ResolveError::UnknownSlaveType {
                slave: name.to_string(),
                catalog_type: slave.catalog_type.clone(),
            })?;

        let resource_cost = self.resource_cost(slave, entry);
        let interrupt_line = check_interrupt(slave, entry)?;
        let base_address = self.allocate_address(index, slave)?;
        let pin_mapping = convert_pin_table(slave)?;

        let mut interfaces = Vec::with_capacity(entry.external_interfaces.len());
        for iface in &entry.external_interfaces {
            interfaces.push(self.resolve_interface(name, iface, &pin_mapping)?);
        }

        tracing::debug!(
            slave = name,
            catalog_type = %slave.catalog_type,
            base = %base_address.literal,
            cost = resource_cost,
            interfaces = interfaces.len(),
            "slave resolved"
        );

        Ok(ResolvedSlave {
            instance_name: name.to_string(),
            catalog_type: slave.catalog_type.clone(),
            base_address,
            pin_mapping,
            interrupt_line,
            resource_cost,
            interfaces,
        })
    }

    fn resource_cost(&self, slave: &SlaveConfig, entry: &CatalogEntry) -> u64 {
        if !entry.supports_bus(WISHBONE_BUS) && !entry.supports_bus(GENERIC_BUS) {
            self.sink.emit(codes::warning_unsupported_bus(
                &slave.instance_name,
                &entry.name,
                &entry.supported_buses,
            ));
            return 0;
        }
        entry
            .cost_for(WISHBONE_BUS)
            .map_or(0, |cost| cost.count_or_zero())
    }

    fn allocate_address(
        &mut self,
        index: usize,
        slave: &SlaveConfig,
    ) -> Result<BaseAddress, ResolveError> {
        let name = &slave.instance_name;
        let base = match &slave.fixed_base_address {
            Some(literal) => {
                let value = parse_address_literal(literal).ok_or_else(|| {
                    ResolveError::InvalidBaseAddress {
                        slave: name.clone(),
                        literal: literal.clone(),
                        reason: "is not a numeric address literal".to_string(),
                    }
                })?;
                BaseAddress {
                    literal: literal.clone(),
                    value,
                }
            }
            None => BaseAddress::computed(index),
        };

        if !base.fits_bus() {
            return Err(ResolveError::InvalidBaseAddress {
                slave: name.clone(),
                literal: base.literal,
                reason: "leaves no room for a 0x10000-byte region in the 32-bit address space"
                    .to_string(),
            });
        }

        self.addresses
            .insert(base.value, SLAVE_REGION_SIZE, name)
            .map_err(|(other, other_base)| ResolveError::AddressOverlap {
                slave: name.clone(),
                base: base.value,
                other,
                other_base,
            })?;
        Ok(base)
    }

    fn resolve_interface(
        &mut self,
        slave: &str,
        iface: &InterfaceSpec,
        pin_mapping: &BTreeMap<String, i64>,
    ) -> Result<ResolvedInterface, ResolveError> {
        let start = *pin_mapping
            .get(&iface.name)
            .ok_or_else(|| ResolveError::MissingPinMapping {
                slave: slave.to_string(),
                interface: iface.name.clone(),
            })?;
        if start < 0 {
            return Err(ResolveError::InvalidPinValue {
                slave: slave.to_string(),
                interface: iface.name.clone(),
                value: start,
            });
        }

        let last = start.saturating_add(i64::from(iface.width) - 1);
        if last >= i64::from(IO_PIN_COUNT) {
            return Err(ResolveError::PinRangeOutOfBounds {
                slave: slave.to_string(),
                interface: iface.name.clone(),
                first: start,
                last,
            });
        }

        let role = match (&iface.direction, iface.output_controlled) {
            (Direction::Input, _) => PinRole::InputPassthrough,
            (Direction::Output, false) => PinRole::OutputDriven,
            (Direction::Output, true) => PinRole::OutputEnableControlled,
            (Direction::Unknown(direction), _) => {
                return Err(ResolveError::UnknownDirection {
                    slave: slave.to_string(),
                    interface: iface.name.clone(),
                    direction: direction.clone(),
                });
            }
        };

        // start is in 0..IO_PIN_COUNT here
        let pins = PinRange::new(start as u32, iface.width);
        self.pins
            .claim(pins, role, slave, &iface.name, self.options.pin_policy)?;
        tracing::debug!(
            slave,
            interface = %iface.name,
            first = pins.start,
            width = pins.width(),
            %role,
            "pins claimed"
        );

        Ok(ResolvedInterface {
            spec: iface.clone(),
            pins,
            role,
        })
    }
}

fn check_interrupt(slave: &SlaveConfig, entry: &CatalogEntry) -> Result<Option<u8>, ResolveError> {
    let Some(line) = slave.interrupt_line else {
        return Ok(None);
    };
    if !entry.interrupt_capable {
        return Err(ResolveError::InterruptNotSupported {
            slave: slave.instance_name.clone(),
            catalog_type: entry.name.clone(),
        });
    }
    match u8::try_from(line) {
        Ok(line) if line < IRQ_LINE_COUNT => Ok(Some(line)),
        _ => Err(ResolveError::InterruptOutOfRange {
            slave: slave.instance_name.clone(),
            line,
        }),
    }
}

fn convert_pin_table(slave: &SlaveConfig) -> Result<BTreeMap<String, i64>, ResolveError> {
    slave
        .pin_mapping
        .iter()
        .map(|(key, value)| {
            value
                .to_integer()
                .map(|pin| (key.clone(), pin))
                .ok_or_else(|| ResolveError::IoPinConversionError {
                    slave: slave.instance_name.clone(),
                    key: key.clone(),
                    value: value.to_string(),
                })
        })
        .collect()
}
