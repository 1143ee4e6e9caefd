//! Text emitters for a resolved Wishbone bus.
//!
//! Two artifacts are produced from a [`ResolvedBus`](wbgen_resolve::ResolvedBus):
//! the Verilog interconnect (the `wb_bus` module plus the
//! `user_project_wrapper` top level) and a C header with one base-address
//! macro per slave. Both emitters are pure and deterministic; writing the
//! text to disk is left to the caller.
//!
//! # Usage
//!
//! ```ignore
//! let paths = ArtifactPaths::for_project(Path::new("soc.yaml"), None);
//! let artifacts = render_artifacts(&bus, &paths.header_name());
//! ```

#![warn(missing_docs)]

pub mod header;
pub mod paths;
pub mod verilog;
mod writer;

#[cfg(test)]
mod fixtures;

pub use header::{c_address_literal, emit_header, header_guard};
pub use paths::ArtifactPaths;
pub use verilog::{emit_bus_module, emit_verilog, emit_wrapper};

use wbgen_resolve::ResolvedBus;

/// Both rendered artifacts for one bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// The Verilog interconnect and wrapper.
    pub verilog: String,
    /// The C header.
    pub header: String,
}

/// Renders both artifacts for `bus`; `header_name` is the header's file name
/// and determines its inclusion guard.
pub fn render_artifacts(bus: &ResolvedBus, header_name: &str) -> Artifacts {
    let verilog = emit_verilog(bus);
    let header = emit_header(&bus.slaves, header_name);
    tracing::debug!(
        verilog_bytes = verilog.len(),
        header_bytes = header.len(),
        "artifacts rendered"
    );
    Artifacts { verilog, header }
}
