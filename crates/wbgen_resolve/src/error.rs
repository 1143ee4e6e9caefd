//! Fatal resolution errors.
//!
//! Every variant names the offending slave instance and the violated
//! constraint. [`ResolveError::to_diagnostic`] converts an error into the
//! diagnostic shown to the user.

use crate::codes;
use crate::pins::IO_PIN_COUNT;
use wbgen_diagnostics::{Diagnostic, DiagnosticCode};

/// Errors that abort resolution of a bus description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The slave's `type` does not name a catalog entry.
    #[error("slave `{slave}`: type `{catalog_type}` not found in the IP library")]
    UnknownSlaveType {
        /// The slave instance name.
        slave: String,
        /// The missing catalog type.
        catalog_type: String,
    },

    /// The slave requests an interrupt but its block has no interrupt support.
    #[error("slave `{slave}`: IRQ requested but IP `{catalog_type}` does not support interrupts")]
    InterruptNotSupported {
        /// The slave instance name.
        slave: String,
        /// The slave's catalog type.
        catalog_type: String,
    },

    /// The interrupt line is outside the interrupt bus.
    #[error("slave `{slave}`: IRQ {line} out of range (0-2)")]
    InterruptOutOfRange {
        /// The slave instance name.
        slave: String,
        /// The requested line.
        line: i64,
    },

    /// An interface of the slave's block has no entry in `io_pins`.
    #[error("slave `{slave}`: external interface `{interface}` has no mapping in io_pins")]
    MissingPinMapping {
        /// The slave instance name.
        slave: String,
        /// The unmapped interface.
        interface: String,
    },

    /// An interface is mapped to a negative pin.
    #[error("slave `{slave}`: I/O pin {value} for interface `{interface}` must be a non-negative integer")]
    InvalidPinValue {
        /// The slave instance name.
        slave: String,
        /// The interface whose mapping is invalid.
        interface: String,
        /// The mapped value.
        value: i64,
    },

    /// An interface's pin range leaves the physical pin space.
    #[error("slave `{slave}`: I/O pins {first} to {last} for interface `{interface}` are out of range (0-37)")]
    PinRangeOutOfBounds {
        /// The slave instance name.
        slave: String,
        /// The interface whose range is out of bounds.
        interface: String,
        /// First pin of the range.
        first: i64,
        /// Last pin of the range (inclusive).
        last: i64,
    },

    /// An interface declares a direction other than input or output.
    #[error("slave `{slave}`: unknown direction `{direction}` for interface `{interface}`")]
    UnknownDirection {
        /// The slave instance name.
        slave: String,
        /// The interface with the bad direction.
        interface: String,
        /// The direction text from the catalog.
        direction: String,
    },

    /// A value in the slave's pin table is not an integer.
    #[error("slave `{slave}`: io_pins entry `{key}` = {value} is not an integer")]
    IoPinConversionError {
        /// The slave instance name.
        slave: String,
        /// The pin table key.
        key: String,
        /// The offending value as written.
        value: String,
    },

    /// A pin is claimed by a second interface under the exclusive policy.
    #[error("slave `{slave}`: pin {pin} of interface `{interface}` is already used by interface `{owner_interface}` of slave `{owner_slave}`")]
    PinConflict {
        /// The slave making the second claim.
        slave: String,
        /// The interface making the second claim.
        interface: String,
        /// The contested pin.
        pin: u32,
        /// The slave holding the first claim.
        owner_slave: String,
        /// The interface holding the first claim.
        owner_interface: String,
    },

    /// The slave's address region overlaps another slave's.
    #[error("slave `{slave}`: address region at {base:#010X} overlaps slave `{other}` at {other_base:#010X}")]
    AddressOverlap {
        /// The slave being placed.
        slave: String,
        /// Its base address.
        base: u64,
        /// The slave already occupying the region.
        other: String,
        /// The other slave's base address.
        other_base: u64,
    },

    /// A fixed base address cannot be parsed or does not fit the bus.
    #[error("slave `{slave}`: base address `{literal}` {reason}")]
    InvalidBaseAddress {
        /// The slave instance name.
        slave: String,
        /// The literal as written.
        literal: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ResolveError {
    /// Returns the name of the slave the error is about.
    pub fn slave(&self) -> &str {
        match self {
            ResolveError::UnknownSlaveType { slave, .. }
            | ResolveError::InterruptNotSupported { slave, .. }
            | ResolveError::InterruptOutOfRange { slave, .. }
            | ResolveError::MissingPinMapping { slave, .. }
            | ResolveError::InvalidPinValue { slave, .. }
            | ResolveError::PinRangeOutOfBounds { slave, .. }
            | ResolveError::UnknownDirection { slave, .. }
            | ResolveError::IoPinConversionError { slave, .. }
            | ResolveError::PinConflict { slave, .. }
            | ResolveError::AddressOverlap { slave, .. }
            | ResolveError::InvalidBaseAddress { slave, .. } => slave,
        }
    }

    /// Returns the diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ResolveError::UnknownSlaveType { .. } => codes::E100,
            ResolveError::InterruptNotSupported { .. } => codes::E101,
            ResolveError::InterruptOutOfRange { .. } => codes::E102,
            ResolveError::MissingPinMapping { .. } => codes::E103,
            ResolveError::InvalidPinValue { .. } => codes::E104,
            ResolveError::PinRangeOutOfBounds { .. } => codes::E105,
            ResolveError::UnknownDirection { .. } => codes::E106,
            ResolveError::IoPinConversionError { .. } => codes::E107,
            ResolveError::PinConflict { .. } => codes::E108,
            ResolveError::AddressOverlap { .. } => codes::E109,
            ResolveError::InvalidBaseAddress { .. } => codes::E110,
        }
    }

    /// Converts the error into a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string())
            .with_subject(format!("slave `{}`", self.slave()));
        match self {
            ResolveError::UnknownSlaveType { .. } => {
                diag.with_help("run `wbgen list` to see the available slave types")
            }
            ResolveError::InterruptNotSupported { .. } => {
                diag.with_help("remove `irq` or pick an IP with a `flags` block")
            }
            ResolveError::InterruptOutOfRange { .. } => {
                diag.with_note("the user interrupt bus has three lines")
            }
            ResolveError::PinRangeOutOfBounds { .. } => diag.with_help(format!(
                "physical pins are numbered 0 to {}",
                IO_PIN_COUNT - 1
            )),
            ResolveError::PinConflict { .. } => diag.with_help(
                "give each interface its own pins, or pass `--pin-policy legacy` to let the first claim win",
            ),
            ResolveError::AddressOverlap { .. } => {
                diag.with_note("each slave occupies a 0x10000-byte region")
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wbgen_diagnostics::Severity;

    #[test]
    fn display_names_slave() {
        let err = ResolveError::UnknownSlaveType {
            slave: "spi0".to_string(),
            catalog_type: "spi".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "slave `spi0`: type `spi` not found in the IP library"
        );
        assert_eq!(err.slave(), "spi0");
    }

    #[test]
    fn display_pin_range() {
        let err = ResolveError::PinRangeOutOfBounds {
            slave: "uart0".to_string(),
            interface: "tx".to_string(),
            first: 38,
            last: 38,
        };
        assert_eq!(
            err.to_string(),
            "slave `uart0`: I/O pins 38 to 38 for interface `tx` are out of range (0-37)"
        );
    }

    #[test]
    fn display_address_overlap_hex() {
        let err = ResolveError::AddressOverlap {
            slave: "b".to_string(),
            base: 0x1000_8000,
            other: "a".to_string(),
            other_base: 0x1000_0000,
        };
        assert_eq!(
            err.to_string(),
            "slave `b`: address region at 0x10008000 overlaps slave `a` at 0x10000000"
        );
    }

    #[test]
    fn diagnostic_conversion() {
        let err = ResolveError::InterruptOutOfRange {
            slave: "t0".to_string(),
            line: 3,
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, codes::E102);
        assert_eq!(diag.subject.as_deref(), Some("slave `t0`"));
        assert_eq!(diag.message, "slave `t0`: IRQ 3 out of range (0-2)");
        assert_eq!(diag.notes.len(), 1);
    }
}
