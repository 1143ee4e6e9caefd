//! `wbgen info`: describe one slave type from an IP library.

use wbgen_config::{load_catalog, CatalogEntry, CatalogSource};
use wbgen_diagnostics::Diagnostic;
use wbgen_resolve::codes;

use crate::report::{config_error_diagnostic, print_diagnostics};
use crate::{GlobalArgs, InfoArgs, ReportFormat};

/// Runs the `wbgen info` command.
///
/// Returns exit code 1 if the library cannot be loaded or does not contain
/// the requested type.
pub fn run(args: &InfoArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let failure = match load_catalog(&CatalogSource::parse(&args.ip_library)) {
        Ok(catalog) => match catalog.get(&args.slave_type) {
            Some(entry) => {
                print!("{}", describe_entry(entry, args.full));
                return Ok(0);
            }
            None => Diagnostic::error(
                codes::E100,
                format!("slave type `{}` not found in the IP library", args.slave_type),
            )
            .with_help("run `wbgen list` to see the available slave types"),
        },
        Err(e) => config_error_diagnostic(&e),
    };

    print_diagnostics(&[failure], ReportFormat::Text, global.color, global.quiet);
    Ok(1)
}

/// Formats the summary printed for `entry`.
pub fn describe_entry(entry: &CatalogEntry, full: bool) -> String {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let cell_count = entry
        .cost_for("WB")
        .map_or_else(|| "N/A".to_string(), |cost| cost.to_string());
    let interfaces = if entry.external_interfaces.is_empty() {
        "None".to_string()
    } else {
        entry
            .external_interfaces
            .iter()
            .map(|iface| format!("{} ({})", iface.name, iface.direction_label))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!("Information for {}:\n", entry.name);
    out.push_str(&format!("  Cell count: {cell_count}\n"));
    out.push_str(&format!(
        "  Interrupts Supported: {}\n",
        yes_no(entry.interrupt_capable)
    ));
    out.push_str(&format!("  FIFO Usage: {}\n", yes_no(entry.fifo_capable)));
    out.push_str(&format!("  External Interfaces: {interfaces}\n"));
    if full {
        out.push_str(&format!("  Description: {}\n", entry.description));
    }
    out
}
