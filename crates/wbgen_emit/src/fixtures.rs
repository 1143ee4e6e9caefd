//! Shared catalog and project fixtures for emitter tests.

use wbgen_config::{load_catalog_from_str, load_project_from_str, ProjectFormat};
use wbgen_diagnostics::DiagnosticSink;
use wbgen_resolve::{resolve, ResolveOptions, ResolvedBus};

pub(crate) const CATALOG: &str = r#"{
    "slaves": [
        {
            "info": { "name": "uart", "bus": ["WB"], "cell_count": [{ "WB": 120 }] },
            "external_interface": [
                { "name": "rx", "port": "rx_i", "direction": "input", "width": 1 },
                { "name": "tx", "port": "tx_o", "direction": "output", "width": 1 }
            ],
            "flags": []
        },
        {
            "info": { "name": "gpio", "bus": ["WB"], "cell_count": [{ "WB": 300 }] },
            "external_interface": [
                { "name": "out", "port": "gpio_o", "direction": "output", "width": 4 },
                { "name": "oe", "port": "gpio_oe", "direction": "output", "width": 4, "output_control": true }
            ]
        },
        {
            "info": { "name": "timer", "bus": ["WB"], "cell_count": [{ "WB": 50 }] }
        }
    ]
}"#;

pub(crate) fn resolve_fixture(project: &str) -> ResolvedBus {
    resolve_fixture_with(project, ResolveOptions::default())
}

pub(crate) fn resolve_fixture_with(project: &str, options: ResolveOptions) -> ResolvedBus {
    let catalog = load_catalog_from_str(CATALOG, "<catalog>").unwrap();
    let project = load_project_from_str(project, ProjectFormat::Yaml, "<project>").unwrap();
    resolve(&catalog, &project.slaves, &options, &DiagnosticSink::new()).unwrap()
}
