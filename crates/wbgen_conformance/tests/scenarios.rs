//! End-to-end scenarios: one project description in, artifacts or a single
//! error out.

use wbgen_conformance::{full_pipeline, full_pipeline_with_options};
use wbgen_resolve::{PinClaimPolicy, PinRole, ResolveError, ResolveOptions};

#[test]
fn single_uart() {
    let result = full_pipeline(
        r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 5, tx: 6 }
"#,
    );
    let bus = result.expect_bus();
    assert_eq!(bus.slaves[0].base_address.value, 0x1000_0000);
    assert_eq!(bus.total_cost, 120);
    assert_eq!(bus.pins.role(5), Some(PinRole::InputPassthrough));
    assert_eq!(bus.pins.role(6), Some(PinRole::OutputDriven));

    let artifacts = result.expect_artifacts();
    assert!(artifacts.header.contains("#define UART0_BASE 0x10000000\n"));
    assert!(artifacts
        .verilog
        .contains("localparam TOTAL_WB_CELL_COUNT = 120;"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn uart_tx_beyond_last_pin() {
    let result = full_pipeline(
        r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 37, tx: 38 }
"#,
    );
    assert!(matches!(
        result.expect_error(),
        ResolveError::PinRangeOutOfBounds { interface, .. } if interface == "tx"
    ));
    assert!(result.artifacts.is_none());
    assert!(result.has_errors);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code.to_string(), "E105");
}

#[test]
fn unknown_type_produces_nothing() {
    let result = full_pipeline(
        r#"
slaves:
  - { name: uart0, type: uart, io_pins: { rx: 1, tx: 2 } }
  - { name: eth0, type: ethernet }
"#,
    );
    assert!(matches!(
        result.expect_error(),
        ResolveError::UnknownSlaveType { slave, .. } if slave == "eth0"
    ));
    assert!(result.bus.is_none());
    assert!(result.artifacts.is_none());
}

#[test]
fn interrupt_line_three_rejected() {
    let result = full_pipeline(
        r#"
slaves:
  - { name: t0, type: timer, irq: 3 }
"#,
    );
    assert!(matches!(
        result.expect_error(),
        ResolveError::InterruptOutOfRange { line: 3, .. }
    ));
}

#[test]
fn interrupt_on_incapable_block() {
    let result = full_pipeline(
        r#"
slaves:
  - { name: gpio0, type: gpio, io_pins: { out: 0, oe: 8 }, irq: 0 }
"#,
    );
    assert!(matches!(
        result.expect_error(),
        ResolveError::InterruptNotSupported { .. }
    ));
}

#[test]
fn mixed_soc() {
    let result = full_pipeline(
        r#"
slaves:
  - name: uart0
    type: uart
    io_pins: { rx: 5, tx: 6 }
    irq: 0
  - name: gpio0
    type: gpio
    io_pins: { out: 8, oe: 16 }
  - name: spi0
    type: spi_master
    base_address: "32'h3000_0000"
    io_pins: { sclk: 24, mosi: 25, miso: 26, csb: "27" }
  - name: timer0
    type: timer
    irq: 1
"#,
    );
    let bus = result.expect_bus();
    assert_eq!(bus.total_cost, 120 + 300 + 210);
    assert_eq!(bus.slaves[1].base_address.value, 0x1001_0000);
    assert_eq!(bus.slaves[2].base_address.literal, "32'h3000_0000");
    assert_eq!(bus.slaves[3].base_address.value, 0x1003_0000);
    assert_eq!(bus.pins.role(16), Some(PinRole::OutputEnableControlled));
    assert_eq!(bus.pins.role(26), Some(PinRole::InputPassthrough));

    let artifacts = result.expect_artifacts();
    assert!(artifacts.verilog.contains(".gpio_oe(io_oen[23:16])"));
    assert!(artifacts.verilog.contains(".IRQ(user_irq[1])"));
    assert!(artifacts.verilog.contains("spi_master_WB spi0 ("));
    assert!(artifacts.header.contains("#define SPI0_BASE 0x3000_0000\n"));
    assert!(artifacts.header.contains("#define TIMER0_BASE 0x10030000\n"));
}

#[test]
fn non_wishbone_block_warns() {
    let result = full_pipeline(
        r#"
slaves:
  - { name: dma0, type: ahb_dma }
  - { name: uart0, type: uart, io_pins: { rx: 0, tx: 1 } }
"#,
    );
    assert_eq!(result.expect_bus().total_cost, 120);
    assert_eq!(result.warning_count, 1);
    assert!(!result.has_errors);
    assert_eq!(result.diagnostics[0].code.to_string(), "W100");
    assert!(result
        .expect_artifacts()
        .verilog
        .contains("ahb_dma_WB dma0 ("));
}

#[test]
fn shared_pin_policies() {
    let project = r#"
slaves:
  - { name: uart0, type: uart, io_pins: { rx: 5, tx: 6 } }
  - { name: gpio0, type: gpio, io_pins: { out: 10, oe: 0 } }
"#;
    let exclusive = full_pipeline(project);
    assert!(matches!(
        exclusive.expect_error(),
        ResolveError::PinConflict { pin: 5, owner_interface, .. } if owner_interface == "rx"
    ));

    let legacy = full_pipeline_with_options(
        project,
        ResolveOptions {
            pin_policy: PinClaimPolicy::Legacy,
        },
    );
    let bus = legacy.expect_bus();
    assert_eq!(bus.pins.role(5), Some(PinRole::OutputEnableControlled));
    assert_eq!(bus.pins.role(6), Some(PinRole::OutputEnableControlled));
}

#[test]
fn fixed_base_overlapping_computed() {
    let result = full_pipeline(
        r#"
slaves:
  - { name: t0, type: timer }
  - { name: t1, type: timer, base_address: "0x1000FFFF" }
"#,
    );
    assert!(matches!(
        result.expect_error(),
        ResolveError::AddressOverlap { other, .. } if other == "t0"
    ));
}
