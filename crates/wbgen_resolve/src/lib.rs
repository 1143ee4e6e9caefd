//! Binding, address allocation, and pin resolution for Wishbone slaves.
//!
//! [`resolve`] turns a [`Catalog`](wbgen_config::Catalog) and the project's
//! slave list into a [`ResolvedBus`]: one [`ResolvedSlave`] per configured
//! slave in declaration order, the final [`PinPlan`], and the total resource
//! cost. Resolution is fail-fast: the first violated constraint is returned as
//! a [`ResolveError`] and nothing is produced. Non-fatal findings are emitted
//! into a [`DiagnosticSink`](wbgen_diagnostics::DiagnosticSink).

#![warn(missing_docs)]

pub mod address;
pub mod codes;
pub mod error;
pub mod pins;
pub mod resolver;

pub use address::{parse_address_literal, AddressMap, BaseAddress, SLAVE_BASE_START, SLAVE_REGION_SIZE};
pub use error::ResolveError;
pub use pins::{PinClaim, PinClaimPolicy, PinPlan, PinRange, PinRole, IO_PIN_COUNT};
pub use resolver::{
    resolve, ResolveOptions, ResolvedBus, ResolvedInterface, ResolvedSlave, IRQ_LINE_COUNT,
};
