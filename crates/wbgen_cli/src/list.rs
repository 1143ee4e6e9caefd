//! `wbgen list`: print the slave types in an IP library.

use wbgen_config::{load_catalog, Catalog, CatalogSource};

use crate::report::{config_error_diagnostic, print_diagnostics};
use crate::{GlobalArgs, ReportFormat};

/// Runs the `wbgen list` command.
pub fn run(ip_library: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let catalog = match load_catalog(&CatalogSource::parse(ip_library)) {
        Ok(catalog) => catalog,
        Err(e) => {
            print_diagnostics(
                &[config_error_diagnostic(&e)],
                ReportFormat::Text,
                global.color,
                global.quiet,
            );
            return Ok(1);
        }
    };

    if !global.quiet {
        eprintln!("   Available slave types in the IP library:");
    }
    print!("{}", format_listing(&catalog));
    Ok(0)
}

fn format_listing(catalog: &Catalog) -> String {
    catalog.names().map(|name| format!("  - {name}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wbgen_config::load_catalog_from_str;

    #[test]
    fn listing_keeps_catalog_order() {
        let catalog = load_catalog_from_str(
            r#"{ "slaves": [
                { "info": { "name": "uart" } },
                { "info": { "name": "gpio" } },
                { "info": { "name": "uart", "description": "v2" } }
            ] }"#,
            "<test>",
        )
        .unwrap();
        assert_eq!(format_listing(&catalog), "  - uart\n  - gpio\n");
    }

    #[test]
    fn missing_library_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        let global = GlobalArgs {
            quiet: true,
            color: false,
        };
        assert_eq!(run(&missing.display().to_string(), &global).unwrap(), 1);
    }
}
