//! `wbgen generate`: bus description to Verilog interconnect and C header.
//!
//! 1. Load the bus description (YAML, TOML, or JSON by extension)
//! 2. Load the IP library from a path or URL
//! 3. Resolve slaves, addresses, and pins
//! 4. Render both artifacts in memory
//! 5. Write them next to the bus description (or into `--output-dir`)
//!
//! Any failure before step 5 leaves the filesystem untouched, and step 5
//! writes both files or neither.

use std::fs;
use std::path::{Path, PathBuf};

use wbgen_config::{load_catalog, load_project, CatalogSource};
use wbgen_diagnostics::DiagnosticSink;
use wbgen_emit::{render_artifacts, ArtifactPaths, Artifacts};
use wbgen_resolve::{resolve, ResolveOptions};

use crate::report::{config_error_diagnostic, print_diagnostics};
use crate::{GenerateArgs, GlobalArgs, ReportFormat};

/// Runs the `wbgen generate` command.
///
/// Returns exit code 0 when both artifacts were written, 1 when the inputs
/// were rejected.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sink = DiagnosticSink::new();
    let finish = |sink: &DiagnosticSink| {
        print_diagnostics(&sink.take_all(), args.format, global.color, global.quiet);
        i32::from(sink.has_errors())
    };

    let project = match load_project(&args.bus) {
        Ok(project) => project,
        Err(e) => {
            sink.emit(config_error_diagnostic(&e));
            return Ok(finish(&sink));
        }
    };

    let source = CatalogSource::parse(&args.ip_library);
    let catalog = match load_catalog(&source) {
        Ok(catalog) => catalog,
        Err(e) => {
            sink.emit(config_error_diagnostic(&e));
            return Ok(finish(&sink));
        }
    };

    let options = ResolveOptions {
        pin_policy: args.pin_policy.into(),
    };
    let bus = match resolve(&catalog, &project.slaves, &options, &sink) {
        Ok(bus) => bus,
        Err(e) => {
            tracing::debug!(slave = e.slave(), code = %e.code(), "resolution failed");
            sink.emit(e.to_diagnostic());
            return Ok(finish(&sink));
        }
    };

    let paths = ArtifactPaths::for_project(&args.bus, args.output_dir.as_deref());
    let artifacts = render_artifacts(&bus, &paths.header_name());
    let status = finish(&sink);

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)
            .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    }
    write_artifacts(&paths, &artifacts)?;
    tracing::info!(verilog = %paths.verilog.display(), header = %paths.header.display(), "artifacts written");

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Generated {}", paths.verilog.display());
        eprintln!("   Generated {}", paths.header.display());
        eprintln!(
            "   Result: {} slave(s), total WB cell count {}",
            bus.slaves.len(),
            bus.total_cost
        );
    }

    Ok(status)
}

/// Writes both artifacts, or neither.
///
/// Each file is first written under a `.tmp` sibling name and then renamed
/// into place. On any failure the staged files are removed, and a Verilog
/// file already renamed is removed again.
fn write_artifacts(paths: &ArtifactPaths, artifacts: &Artifacts) -> Result<(), String> {
    let staged_verilog = staging_path(&paths.verilog);
    let staged_header = staging_path(&paths.header);
    let cleanup = || {
        let _ = fs::remove_file(&staged_verilog);
        let _ = fs::remove_file(&staged_header);
    };

    let staged = fs::write(&staged_verilog, &artifacts.verilog)
        .map_err(|e| format!("failed to write {}: {e}", paths.verilog.display()))
        .and_then(|()| {
            fs::write(&staged_header, &artifacts.header)
                .map_err(|e| format!("failed to write {}: {e}", paths.header.display()))
        });
    if let Err(e) = staged {
        cleanup();
        return Err(e);
    }

    if let Err(e) = fs::rename(&staged_verilog, &paths.verilog) {
        cleanup();
        return Err(format!("failed to write {}: {e}", paths.verilog.display()));
    }
    if let Err(e) = fs::rename(&staged_header, &paths.header) {
        cleanup();
        let _ = fs::remove_file(&paths.verilog);
        return Err(format!("failed to write {}: {e}", paths.header.display()));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
