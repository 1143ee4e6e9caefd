//! On-disk workflows: project files in each supported format, catalog files,
//! and artifact naming.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wbgen_config::{load_catalog, load_project, CatalogSource};
use wbgen_conformance::{run_pipeline, SAMPLE_CATALOG};
use wbgen_emit::{render_artifacts, ArtifactPaths};
use wbgen_resolve::ResolveOptions;

const YAML: &str = r#"
slaves:
  - name: uart0
    type: uart
    io_pins:
      rx: 5
      tx: 6
    irq: 0
  - name: gpio0
    type: gpio
    base_address: "32'h3000_0000"
    io_pins:
      out: 8
      oe: 16
"#;

const TOML: &str = r#"
[[slaves]]
name = "uart0"
type = "uart"
irq = 0
io_pins = { rx = 5, tx = 6 }

[[slaves]]
name = "gpio0"
type = "gpio"
base_address = "32'h3000_0000"
io_pins = { out = 8, oe = 16 }
"#;

const JSON: &str = r#"{
    "slaves": [
        { "name": "uart0", "type": "uart", "irq": 0, "io_pins": { "rx": 5, "tx": 6 } },
        { "name": "gpio0", "type": "gpio", "base_address": "32'h3000_0000",
          "io_pins": { "out": 8, "oe": 16 } }
    ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn formats_produce_identical_artifacts() {
    let dir = TempDir::new().unwrap();
    let lib = write(dir.path(), "ip-lib.json", SAMPLE_CATALOG);
    let catalog = load_catalog(&CatalogSource::parse(&lib.display().to_string())).unwrap();

    let outputs: Vec<_> = [("soc.yaml", YAML), ("soc.toml", TOML), ("soc.json", JSON)]
        .into_iter()
        .map(|(name, content)| {
            let project = load_project(&write(dir.path(), name, content)).unwrap();
            run_pipeline(&catalog, &project, ResolveOptions::default())
                .expect_artifacts()
                .clone()
        })
        .collect();

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0], outputs[2]);
}

#[test]
fn catalog_source_prefers_existing_file() {
    let dir = TempDir::new().unwrap();
    let lib = write(dir.path(), "ip-lib.json", SAMPLE_CATALOG);
    let source = CatalogSource::parse(&lib.display().to_string());
    assert!(matches!(source, CatalogSource::Path(_)));
    assert_eq!(load_catalog(&source).unwrap().len(), 5);
}

#[test]
fn unknown_project_key_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "typo.yaml",
        "slaves:\n  - { name: uart0, type: uart, irqs: 1 }\n",
    );
    assert!(load_project(&path).is_err());
}

#[test]
fn header_guard_matches_artifact_name() {
    let dir = TempDir::new().unwrap();
    let catalog = load_catalog(&CatalogSource::parse(
        &write(dir.path(), "lib.json", SAMPLE_CATALOG)
            .display()
            .to_string(),
    ))
    .unwrap();
    let project_path = write(dir.path(), "caravel_soc.yml", YAML);
    let project = load_project(&project_path).unwrap();

    let bus = run_pipeline(&catalog, &project, ResolveOptions::default());
    let paths = ArtifactPaths::for_project(&project_path, None);
    assert_eq!(paths.verilog, dir.path().join("caravel_soc.v"));

    let artifacts = render_artifacts(bus.expect_bus(), &paths.header_name());
    assert!(artifacts.header.starts_with("#ifndef __CARAVEL_SOC_H__\n"));
    assert!(artifacts.header.ends_with("#endif // __CARAVEL_SOC_H__\n"));
}
