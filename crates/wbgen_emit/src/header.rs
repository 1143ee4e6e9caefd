//! C header emission.
//!
//! The header defines `<NAME>_BASE` for every slave, with the base address
//! rewritten as a C literal, inside an inclusion guard derived from the
//! header's file name.

use crate::writer::CodeWriter;
use wbgen_resolve::{parse_address_literal, ResolvedSlave};

/// Renders the header for `slaves`.
pub fn emit_header(slaves: &[ResolvedSlave], header_name: &str) -> String {
    let guard = header_guard(header_name);
    let mut w = CodeWriter::new();
    w.line(0, format!("#ifndef {guard}"));
    w.line(0, format!("#define {guard}"));
    w.blank();
    for slave in slaves {
        w.line(
            0,
            format!(
                "#define {}_BASE {}",
                slave.instance_name.to_uppercase(),
                c_address_literal(&slave.base_address.literal)
            ),
        );
    }
    w.blank();
    w.line(0, format!("#endif // {guard}"));
    w.finish()
}

/// Returns the inclusion guard for a header file name.
///
/// Only the final path component is used: `out/soc.h` gives `__SOC_H__`.
pub fn header_guard(header_name: &str) -> String {
    let base = header_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(header_name);
    format!("__{}__", base.replace('.', "_").to_uppercase())
}

/// Converts an address literal to C syntax.
///
/// `32'h`/`32'H` literals keep their digits behind a `0x` prefix and `0x`
/// literals are kept as written. Other plain integer literals (decimal,
/// `0X`, `0o`, `0b`) become lower-case hex; a decimal with a leading zero
/// is not one of them. Anything else, including other
/// Verilog sized literals, is returned unchanged.
pub fn c_address_literal(literal: &str) -> String {
    if let Some(digits) = literal
        .strip_prefix("32'h")
        .or_else(|| literal.strip_prefix("32'H"))
    {
        return format!("0x{digits}");
    }
    if literal.starts_with("0x") {
        return literal.to_string();
    }
    if literal.contains('\'') {
        return literal.to_string();
    }
    match parse_address_literal(literal) {
        Some(value) => format!("{value:#x}"),
        None => literal.to_string(),
    }
}
