//! Conformance test helpers for wbgen.
//!
//! Provides a sample IP catalog and pipeline functions that take a project
//! description through load, resolve, and emit, returning structured results
//! for assertion in integration tests.

#![warn(missing_docs)]

use wbgen_config::{
    load_catalog_from_str, load_project_from_str, Catalog, ProjectConfig, ProjectFormat,
};
use wbgen_diagnostics::{Diagnostic, DiagnosticSink};
use wbgen_emit::{render_artifacts, Artifacts};
use wbgen_resolve::{resolve, ResolveError, ResolveOptions, ResolvedBus};

/// A small IP catalog covering every interface kind.
///
/// - `uart`: WB, cost 120, input `rx` and output `tx`, interrupt capable.
/// - `gpio`: WB, cost 300, 8-pin data output `out` and 8-pin output-enable
///   control `oe`.
/// - `spi_master`: generic bus, cost `"210"` as a string, four single-pin
///   interfaces, FIFOs.
/// - `timer`: WB, no cost entry, no pins, interrupt capable.
/// - `ahb_dma`: AHB only, so it binds with zero cost and a warning.
pub const SAMPLE_CATALOG: &str = r#"{
    "slaves": [
        {
            "info": {
                "name": "uart",
                "description": "UART with programmable baud rate",
                "bus": ["WB"],
                "cell_count": [{ "WB": 120 }]
            },
            "external_interface": [
                { "name": "rx", "port": "rx_i", "direction": "input", "width": 1 },
                { "name": "tx", "port": "tx_o", "direction": "output", "width": 1 }
            ],
            "flags": [{ "name": "rx_ready", "bit": 0 }]
        },
        {
            "info": { "name": "gpio", "bus": ["WB"], "cell_count": [{ "WB": 300 }] },
            "external_interface": [
                { "name": "out", "port": "gpio_o", "direction": "output", "width": 8 },
                { "name": "oe", "port": "gpio_oe", "direction": "output", "width": 8, "output_control": true }
            ]
        },
        {
            "info": { "name": "spi_master", "bus": ["GENERIC"], "cell_count": [{ "WB": "210" }] },
            "external_interface": [
                { "name": "sclk", "port": "sclk_o", "direction": "output", "width": 1 },
                { "name": "mosi", "port": "mosi_o", "direction": "output", "width": 1 },
                { "name": "miso", "port": "miso_i", "direction": "input", "width": 1 },
                { "name": "csb", "port": "csb_o", "direction": "output", "width": 1 }
            ],
            "fifos": [{ "name": "tx_fifo", "depth": 16 }]
        },
        {
            "info": { "name": "timer", "bus": ["WB"] },
            "flags": []
        },
        {
            "info": { "name": "ahb_dma", "bus": ["AHB"], "cell_count": [{ "WB": 999 }] }
        }
    ]
}"#;

/// Result of running the load → resolve → emit pipeline.
pub struct PipelineResult {
    /// The resolved bus, if resolution succeeded.
    pub bus: Option<ResolvedBus>,
    /// The rendered artifacts, if resolution succeeded.
    pub artifacts: Option<Artifacts>,
    /// The resolution error, if any.
    pub error: Option<ResolveError>,
    /// All diagnostics, including the error's diagnostic.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
    /// Whether any error-severity diagnostic was emitted.
    pub has_errors: bool,
}

impl PipelineResult {
    /// Returns the artifacts, panicking with the error if resolution failed.
    pub fn expect_artifacts(&self) -> &Artifacts {
        match (&self.artifacts, &self.error) {
            (Some(artifacts), _) => artifacts,
            (None, Some(err)) => panic!("pipeline failed: {err}"),
            (None, None) => panic!("pipeline produced nothing"),
        }
    }

    /// Returns the resolved bus, panicking with the error if resolution failed.
    pub fn expect_bus(&self) -> &ResolvedBus {
        match (&self.bus, &self.error) {
            (Some(bus), _) => bus,
            (None, Some(err)) => panic!("pipeline failed: {err}"),
            (None, None) => panic!("pipeline produced nothing"),
        }
    }

    /// Returns the error, panicking if resolution succeeded.
    pub fn expect_error(&self) -> &ResolveError {
        self.error
            .as_ref()
            .unwrap_or_else(|| panic!("pipeline succeeded unexpectedly"))
    }
}

/// Loads [`SAMPLE_CATALOG`].
pub fn sample_catalog() -> Catalog {
    load_catalog_from_str(SAMPLE_CATALOG, "<sample catalog>").unwrap()
}

/// Parses a YAML project description.
pub fn make_project(yaml: &str) -> ProjectConfig {
    load_project_from_str(yaml, ProjectFormat::Yaml, "<project>").unwrap()
}

/// Runs the pipeline on a YAML project against [`SAMPLE_CATALOG`] with
/// default options.
pub fn full_pipeline(project_yaml: &str) -> PipelineResult {
    run_pipeline(&sample_catalog(), &make_project(project_yaml), ResolveOptions::default())
}

/// Runs the pipeline with explicit options.
pub fn full_pipeline_with_options(project_yaml: &str, options: ResolveOptions) -> PipelineResult {
    run_pipeline(&sample_catalog(), &make_project(project_yaml), options)
}

/// Runs the pipeline on already-loaded inputs.
pub fn run_pipeline(
    catalog: &Catalog,
    project: &ProjectConfig,
    options: ResolveOptions,
) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let (bus, artifacts, error) = match resolve(catalog, &project.slaves, &options, &sink) {
        Ok(bus) => {
            let artifacts = render_artifacts(&bus, "bus.h");
            (Some(bus), Some(artifacts), None)
        }
        Err(err) => {
            sink.emit(err.to_diagnostic());
            (None, None, Some(err))
        }
    };

    let warning_count = sink.warning_count();
    PipelineResult {
        bus,
        artifacts,
        error,
        diagnostics: sink.take_all(),
        warning_count,
        has_errors: sink.has_errors(),
    }
}
