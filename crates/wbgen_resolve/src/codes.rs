//! Diagnostic codes for resolution errors and warnings.
//!
//! Error codes `E100`--`E110` cover fatal binding, pin, interrupt, and address
//! failures. Warning code `W100` covers slaves whose catalog entry does not
//! support the Wishbone bus.

use wbgen_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Slave type not found in the catalog.
pub const E100: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// Interrupt requested on a block without interrupt support.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// Interrupt line outside the interrupt bus.
pub const E102: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);

/// External interface without a pin mapping.
pub const E103: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);

/// Negative pin number.
pub const E104: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);

/// Pin range outside the physical pin space.
pub const E105: DiagnosticCode = DiagnosticCode::new(Category::Error, 105);

/// Interface direction is neither input nor output.
pub const E106: DiagnosticCode = DiagnosticCode::new(Category::Error, 106);

/// Pin table value that is not an integer.
pub const E107: DiagnosticCode = DiagnosticCode::new(Category::Error, 107);

/// Pin claimed by more than one interface.
pub const E108: DiagnosticCode = DiagnosticCode::new(Category::Error, 108);

/// Address regions overlap.
pub const E109: DiagnosticCode = DiagnosticCode::new(Category::Error, 109);

/// Fixed base address that cannot be used.
pub const E110: DiagnosticCode = DiagnosticCode::new(Category::Error, 110);

/// Catalog entry does not support the Wishbone bus; cost counted as zero.
pub const W100: DiagnosticCode = DiagnosticCode::new(Category::Warning, 100);

/// Creates the warning for a slave whose block lacks Wishbone support.
pub fn warning_unsupported_bus(slave: &str, catalog_type: &str, buses: &[String]) -> Diagnostic {
    let declared = if buses.is_empty() {
        "none".to_string()
    } else {
        buses.join(", ")
    };
    Diagnostic::warning(
        W100,
        format!("IP `{catalog_type}` does not support the WB bus; using 0 cell count"),
    )
    .with_subject(format!("slave `{slave}`"))
    .with_note(format!("declared buses: {declared}"))
}
