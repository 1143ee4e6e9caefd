//! Diagnostic reporting for the CLI.
//!
//! Loader errors are turned into `C`-category diagnostics here; resolver
//! errors carry their own codes. Everything the user sees about a failed or
//! suspicious run goes through [`print_diagnostics`].

use wbgen_config::ConfigError;
use wbgen_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, TerminalRenderer,
};

use crate::ReportFormat;

/// A file could not be read.
pub const C001: DiagnosticCode = DiagnosticCode::new(Category::Config, 1);
/// The IP library could not be downloaded.
pub const C002: DiagnosticCode = DiagnosticCode::new(Category::Config, 2);
/// A file could not be parsed.
pub const C003: DiagnosticCode = DiagnosticCode::new(Category::Config, 3);
/// A required field is missing.
pub const C004: DiagnosticCode = DiagnosticCode::new(Category::Config, 4);
/// A value failed validation.
pub const C005: DiagnosticCode = DiagnosticCode::new(Category::Config, 5);

/// Converts a loader error into a diagnostic.
pub fn config_error_diagnostic(err: &ConfigError) -> Diagnostic {
    let code = match err {
        ConfigError::IoError { .. } => C001,
        ConfigError::FetchError { .. } => C002,
        ConfigError::ParseError { .. } => C003,
        ConfigError::MissingField(_) => C004,
        ConfigError::ValidationError(_) => C005,
    };
    let diag = Diagnostic::error(code, err.to_string());
    match err {
        ConfigError::FetchError { .. } => {
            diag.with_help("pass a local IP library path, or set WBGEN_IP_LIBRARY")
        }
        _ => diag,
    }
}

/// Prints `diagnostics` to stderr (text) or stdout (JSON).
///
/// In quiet mode text output is limited to errors. JSON output always
/// carries every diagnostic.
pub fn print_diagnostics(diagnostics: &[Diagnostic], format: ReportFormat, color: bool, quiet: bool) {
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(color);
            for diag in diagnostics {
                if quiet && !diag.severity.is_error() {
                    continue;
                }
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}
