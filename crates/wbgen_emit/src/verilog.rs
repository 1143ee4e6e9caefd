//! Verilog emission: the `wb_bus` interconnect and the platform wrapper.
//!
//! The interconnect decodes one chip select per slave from the bus address,
//! instantiates each slave as `<type>_WB`, multiplexes read data and
//! acknowledge by chip-select priority (declaration order), and drives the
//! output enables of the multiplexed I/O pins according to the pin plan.

use crate::writer::CodeWriter;
use wbgen_resolve::{PinRole, ResolvedBus, ResolvedSlave, IO_PIN_COUNT, IRQ_LINE_COUNT};

/// Renders the `wb_bus` module followed by `user_project_wrapper`.
pub fn emit_verilog(bus: &ResolvedBus) -> String {
    let mut text = emit_bus_module(bus);
    text.push('\n');
    text.push_str(&emit_wrapper());
    text
}

/// Renders the `wb_bus` interconnect module.
pub fn emit_bus_module(bus: &ResolvedBus) -> String {
    let mut w = CodeWriter::new();
    let io_msb = IO_PIN_COUNT - 1;
    let irq_msb = IRQ_LINE_COUNT - 1;

    w.line(0, "// Wishbone bus interconnect generated by wbgen. Do not edit.");
    w.blank();
    w.line(0, "module wb_bus (");
    w.comma_list(
        1,
        [
            "input         wb_clk".to_string(),
            "input         wb_rst".to_string(),
            "input  [31:0] wb_adr".to_string(),
            "input  [31:0] wb_dat_i".to_string(),
            "output [31:0] wb_dat_o".to_string(),
            "input         wb_we".to_string(),
            "input         wb_stb".to_string(),
            "input         wb_cyc".to_string(),
            "output        wb_ack".to_string(),
            format!("input  [{io_msb}:0] io_in"),
            format!("output [{io_msb}:0] io_out"),
            format!("output [{io_msb}:0] io_oen"),
            format!("output [{irq_msb}:0]  user_irq"),
        ],
    );
    w.line(0, ");");
    w.blank();
    w.line(1, "localparam SLAVE_ADDR_SIZE = 32'h0001_0000;");
    w.line(
        1,
        format!("localparam TOTAL_WB_CELL_COUNT = {};", bus.total_cost),
    );
    w.blank();

    for (idx, slave) in bus.slaves.iter().enumerate() {
        w.line(1, format!("// Slave {idx}: {}", slave.instance_name));
        w.line(1, format!("wire [31:0] slave{idx}_dat;"));
        w.line(1, format!("wire        slave{idx}_ack;"));
        w.line(1, format!("wire        cs{idx};"));
        w.blank();
    }

    for (idx, slave) in bus.slaves.iter().enumerate() {
        let base = &slave.base_address.literal;
        w.line(
            1,
            format!(
                "assign cs{idx} = ((wb_adr >= {base}) && (wb_adr < ({base} + SLAVE_ADDR_SIZE))) ? 1'b1 : 1'b0;"
            ),
        );
    }
    if !bus.slaves.is_empty() {
        w.blank();
    }

    for (idx, slave) in bus.slaves.iter().enumerate() {
        write_instance(&mut w, idx, slave);
    }

    write_mux(&mut w, bus.slaves.len());
    write_pin_drives(&mut w, bus);

    w.line(0, "endmodule");
    w.finish()
}

fn write_instance(w: &mut CodeWriter, idx: usize, slave: &ResolvedSlave) {
    let mut ports = vec![
        ".clk_i(wb_clk)".to_string(),
        ".rst_i(wb_rst)".to_string(),
        ".adr_i(wb_adr)".to_string(),
        format!(".dat_o(slave{idx}_dat)"),
        ".dat_i(wb_dat_i)".to_string(),
        ".we_i(wb_we)".to_string(),
        format!(".stb_i(wb_stb & cs{idx})"),
        format!(".cyc_i(wb_cyc & cs{idx})"),
        format!(".ack_o(slave{idx}_ack)"),
    ];
    for iface in &slave.interfaces {
        let net = match iface.role {
            PinRole::InputPassthrough => "io_in",
            PinRole::OutputDriven => "io_out",
            PinRole::OutputEnableControlled => "io_oen",
        };
        ports.push(format!(
            ".{}({net}[{}:{}])",
            iface.spec.port_name, iface.pins.end, iface.pins.start
        ));
    }
    if let Some(line) = slave.interrupt_line {
        ports.push(format!(".IRQ(user_irq[{line}])"));
    }

    w.line(
        1,
        format!("{}_WB {} (", slave.catalog_type, slave.instance_name),
    );
    w.comma_list(2, ports);
    w.line(1, ");");
    w.blank();
}

fn write_mux(w: &mut CodeWriter, slave_count: usize) {
    w.line(1, "// Read-data and acknowledge multiplexer");
    w.line(1, "reg [31:0] selected_dat;");
    w.line(1, "reg        selected_ack;");
    w.line(1, "always @(*) begin");
    for idx in 0..slave_count {
        let keyword = if idx == 0 { "if" } else { "else if" };
        w.line(2, format!("{keyword} (cs{idx}) begin"));
        w.line(3, format!("selected_dat = slave{idx}_dat;"));
        w.line(3, format!("selected_ack = slave{idx}_ack;"));
        w.line(2, "end");
    }
    if slave_count == 0 {
        w.line(2, "selected_dat = 32'h0;");
        w.line(2, "selected_ack = 1'b0;");
    } else {
        w.line(2, "else begin");
        w.line(3, "selected_dat = 32'h0;");
        w.line(3, "selected_ack = 1'b0;");
        w.line(2, "end");
    }
    w.line(1, "end");
    w.blank();
    w.line(1, "assign wb_dat_o = selected_dat;");
    w.line(1, "assign wb_ack = selected_ack;");
    w.blank();
}

fn write_pin_drives(w: &mut CodeWriter, bus: &ResolvedBus) {
    for (pin, claim) in bus.pins.iter() {
        match claim.map(|c| c.role) {
            None => {
                w.line(1, format!("assign io_oen[{pin}] = 1'b1;"));
                w.line(1, format!("assign io_out[{pin}] = 1'b0;"));
            }
            Some(PinRole::InputPassthrough) => {
                w.line(1, format!("assign io_oen[{pin}] = 1'b0;"));
            }
            Some(PinRole::OutputDriven) => {
                w.line(1, format!("assign io_oen[{pin}] = 1'b1;"));
            }
            // driven by the owning slave through its io_oen port
            Some(PinRole::OutputEnableControlled) => {}
        }
    }
    w.blank();
}

/// Renders the fixed `user_project_wrapper` top level that instantiates
/// `wb_bus` once.
pub fn emit_wrapper() -> String {
    let mut w = CodeWriter::new();
    let irq_msb = IRQ_LINE_COUNT - 1;

    w.line(0, "module user_project_wrapper #(");
    w.line(1, "parameter BITS = 32");
    w.line(0, ") (");
    w.line(0, "`ifdef USE_POWER_PINS");
    for rail in [
        "vdda1", "vdda2", "vssa1", "vssa2", "vccd1", "vccd2", "vssd1", "vssd2",
    ] {
        w.line(1, format!("inout {rail},"));
    }
    w.line(0, "`endif");
    w.comma_list(
        1,
        [
            "input wb_clk_i".to_string(),
            "input wb_rst_i".to_string(),
            "input wbs_stb_i".to_string(),
            "input wbs_cyc_i".to_string(),
            "input wbs_we_i".to_string(),
            "input [3:0] wbs_sel_i".to_string(),
            "input [31:0] wbs_dat_i".to_string(),
            "input [31:0] wbs_adr_i".to_string(),
            "output wbs_ack_o".to_string(),
            "output [31:0] wbs_dat_o".to_string(),
            "input  [127:0] la_data_in".to_string(),
            "output [127:0] la_data_out".to_string(),
            "input  [127:0] la_oenb".to_string(),
            "input  [`MPRJ_IO_PADS-1:0] io_in".to_string(),
            "output [`MPRJ_IO_PADS-1:0] io_out".to_string(),
            "output [`MPRJ_IO_PADS-1:0] io_oeb".to_string(),
            "inout  [`MPRJ_IO_PADS-10:0] analog_io".to_string(),
            "input  user_clock2".to_string(),
            format!("output [{irq_msb}:0] user_irq"),
        ],
    );
    w.line(0, ");");
    w.line(1, "wire [`MPRJ_IO_PADS-1:0] internal_io_oen;");
    w.blank();
    w.line(1, "wb_bus u_wb_bus (");
    w.comma_list(
        2,
        [
            ".wb_clk(wb_clk_i)",
            ".wb_rst(wb_rst_i)",
            ".wb_adr(wbs_adr_i)",
            ".wb_dat_i(wbs_dat_i)",
            ".wb_dat_o(wbs_dat_o)",
            ".wb_we(wbs_we_i)",
            ".wb_stb(wbs_stb_i)",
            ".wb_cyc(wbs_cyc_i)",
            ".wb_ack(wbs_ack_o)",
            ".io_in(io_in)",
            ".io_out(io_out)",
            ".io_oen(internal_io_oen)",
            ".user_irq(user_irq)",
        ],
    );
    w.line(1, ");");
    w.blank();
    w.line(1, "assign io_oeb = ~internal_io_oen;");
    w.line(0, "endmodule");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{resolve_fixture, resolve_fixture_with};
    use wbgen_resolve::{PinClaimPolicy, ResolveOptions};

    const UART_ONLY: &str = r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 5, tx: 6 }
"#;

    #[test]
    fn uart_instance() {
        let text = emit_bus_module(&resolve_fixture(UART_ONLY));
        assert!(text.contains("localparam TOTAL_WB_CELL_COUNT = 120;"));
        assert!(text.contains(
            "assign cs0 = ((wb_adr >= 32'h10000000) && (wb_adr < (32'h10000000 + SLAVE_ADDR_SIZE))) ? 1'b1 : 1'b0;"
        ));
        assert!(text.contains("    uart_WB uart0 (\n        .clk_i(wb_clk),\n"));
        assert!(text.contains("        .rx_i(io_in[5:5]),\n        .tx_o(io_out[6:6])\n    );"));
        assert!(text.contains("        .stb_i(wb_stb & cs0),"));
    }

    #[test]
    fn pin_drive_statements() {
        let text = emit_bus_module(&resolve_fixture(UART_ONLY));
        assert!(text.contains("assign io_oen[5] = 1'b0;"));
        assert!(text.contains("assign io_oen[6] = 1'b1;"));
        assert!(!text.contains("assign io_out[5]"));
        assert!(!text.contains("assign io_out[6]"));
        assert!(text.contains("assign io_oen[0] = 1'b1;\n    assign io_out[0] = 1'b0;"));
        assert!(text.contains("assign io_out[37] = 1'b0;"));
        // 36 unclaimed pins, two claimed
        assert_eq!(text.matches("assign io_oen[").count(), 38);
        assert_eq!(text.matches("assign io_out[").count(), 36);
    }

    #[test]
    fn output_enable_control_pins() {
        let project = r#"
slaves:
  - name: gpio0
    type: gpio
    io_pins: { out: 8, oe: 12 }
"#;
        let text = emit_bus_module(&resolve_fixture(project));
        assert!(text.contains(".gpio_o(io_out[11:8])"));
        assert!(text.contains(".gpio_oe(io_oen[15:12])"));
        for pin in 12..16 {
            assert!(!text.contains(&format!("assign io_oen[{pin}]")));
            assert!(!text.contains(&format!("assign io_out[{pin}]")));
        }
    }

    #[test]
    fn interrupt_routing() {
        let project = r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 5, tx: 6 }
    irq: 2
"#;
        let text = emit_bus_module(&resolve_fixture(project));
        assert!(text.contains("        .tx_o(io_out[6:6]),\n        .IRQ(user_irq[2])\n    );"));
    }

    #[test]
    fn one_chip_select_per_slave() {
        let project = r#"
slaves:
  - { name: t0, type: timer }
  - { name: t1, type: timer }
  - { name: t2, type: timer, base_address: "32'h3000_0000" }
"#;
        let text = emit_bus_module(&resolve_fixture(project));
        assert_eq!(text.matches("assign cs").count(), 3);
        assert!(text.contains("(wb_adr >= 32'h10010000)"));
        assert!(text.contains("(wb_adr >= 32'h3000_0000)"));
        assert!(text.contains("        if (cs0) begin"));
        assert!(text.contains("        else if (cs1) begin"));
        assert!(text.contains("        else if (cs2) begin"));
        assert!(text.contains("    timer_WB t2 ("));
    }

    #[test]
    fn empty_bus_mux_defaults() {
        let text = emit_bus_module(&resolve_fixture("slaves: []\n"));
        assert!(!text.contains("assign cs"));
        assert!(!text.contains("if (cs"));
        assert!(text.contains(
            "    always @(*) begin\n        selected_dat = 32'h0;\n        selected_ack = 1'b0;\n    end\n"
        ));
        assert!(text.contains("localparam TOTAL_WB_CELL_COUNT = 0;"));
        assert_eq!(text.matches("assign io_out[").count(), 38);
    }

    #[test]
    fn legacy_policy_shared_pin() {
        let project = r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 5, tx: 6 }
  - name: gpio0
    type: gpio
    io_pins: { out: 20, oe: 4 }
"#;
        let options = ResolveOptions {
            pin_policy: PinClaimPolicy::Legacy,
        };
        let text = emit_bus_module(&resolve_fixture_with(project, options));
        // control claims win on pins 4..7
        for pin in 4..8 {
            assert!(!text.contains(&format!("assign io_oen[{pin}]")));
        }
    }

    #[test]
    fn module_structure() {
        let text = emit_verilog(&resolve_fixture(UART_ONLY));
        assert!(text.starts_with("// Wishbone bus interconnect generated by wbgen."));
        assert_eq!(text.matches("endmodule").count(), 2);
        assert!(text.contains("module wb_bus (\n    input         wb_clk,\n"));
        assert!(text.contains("    output [2:0]  user_irq\n);"));
        assert!(text.ends_with("endmodule\n"));
    }

    #[test]
    fn wrapper_surface() {
        let text = emit_wrapper();
        assert!(text.starts_with("module user_project_wrapper #(\n    parameter BITS = 32\n) (\n`ifdef USE_POWER_PINS\n    inout vdda1,\n"));
        assert!(text.contains("    inout vssd2,\n`endif\n    input wb_clk_i,\n"));
        assert!(text.contains("    input  [`MPRJ_IO_PADS-1:0] io_in,"));
        assert!(text.contains("    output [2:0] user_irq\n);"));
        assert!(text.contains("    wb_bus u_wb_bus (\n"));
        assert!(text.contains("        .io_oen(internal_io_oen),\n        .user_irq(user_irq)\n    );"));
        assert!(text.contains("assign io_oeb = ~internal_io_oen;"));
    }

    #[test]
    fn deterministic() {
        let bus = resolve_fixture(UART_ONLY);
        assert_eq!(emit_verilog(&bus), emit_verilog(&bus));
        assert_eq!(emit_verilog(&bus), emit_verilog(&resolve_fixture(UART_ONLY)));
    }
}
