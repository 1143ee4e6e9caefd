//! Slave address allocation.
//!
//! Each slave owns a `0x10000`-byte region. Slaves without a fixed address are
//! placed at `0x10000000 + index * 0x10000`, where `index` counts every slave
//! in declaration order. All regions, fixed or computed, pass through an
//! [`AddressMap`] that rejects overlaps.

use std::collections::BTreeMap;

/// Size in bytes of each slave's address region.
pub const SLAVE_REGION_SIZE: u64 = 0x1_0000;

/// Base address of the first computed slave region.
pub const SLAVE_BASE_START: u64 = 0x1000_0000;

/// One past the highest byte address on the 32-bit bus.
const ADDRESS_SPACE_END: u64 = 1 << 32;

/// A resolved base address: the literal used in the structural artifact plus
/// its numeric value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseAddress {
    /// The literal as written for a fixed address, or `32'hXXXXXXXX` for a
    /// computed one.
    pub literal: String,
    /// The numeric address.
    pub value: u64,
}

impl BaseAddress {
    /// Returns the computed base address for the slave at `index`.
    pub fn computed(index: usize) -> Self {
        let value = SLAVE_BASE_START + index as u64 * SLAVE_REGION_SIZE;
        Self {
            literal: format!("32'h{value:X}"),
            value,
        }
    }

    /// Returns the exclusive end of the region starting at this address.
    pub fn region_end(&self) -> u64 {
        self.value.saturating_add(SLAVE_REGION_SIZE)
    }

    /// Returns `true` if the whole region lies on the 32-bit bus.
    pub fn fits_bus(&self) -> bool {
        self.region_end() <= ADDRESS_SPACE_END
    }
}

/// Parses an address literal into its value.
///
/// Accepts Verilog-style sized or unsized literals (`32'h1000_0000`,
/// `'d4096`, `32'b1010`) and base-prefixed or decimal integers (`0x30000000`,
/// `0o17`, `0b11`, `268435456`). Underscores are ignored. A decimal with a
/// leading zero (`010`) is rejected unless it is all zeros. Returns `None` for
/// anything else or on overflow.
pub fn parse_address_literal(text: &str) -> Option<u64> {
    let cleaned: String = text.trim().chars().filter(|&c| c != '_').collect();

    if let Some((width, rest)) = cleaned.split_once('\'') {
        if !width.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let rest = rest.strip_prefix(['s', 'S']).unwrap_or(rest);
        let mut chars = rest.chars();
        let radix = match chars.next()?.to_ascii_lowercase() {
            'h' => 16,
            'd' => 10,
            'o' => 8,
            'b' => 2,
            _ => return None,
        };
        return parse_digits(chars.as_str(), radix);
    }

    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        parse_digits(hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        parse_digits(oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        parse_digits(bin, 2)
    } else if lower.len() > 1 && lower.starts_with('0') && lower.bytes().any(|b| b != b'0') {
        // `010` is neither decimal nor octal
        None
    } else {
        parse_digits(&lower, 10)
    }
}

fn parse_digits(digits: &str, radix: u32) -> Option<u64> {
    // from_str_radix accepts a leading sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// An interval set of occupied address regions.
#[derive(Debug, Default)]
pub struct AddressMap {
    // start -> (exclusive end, owner)
    regions: BTreeMap<u64, (u64, String)>,
}

impl AddressMap {
    /// Creates an empty address map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `[start, start + size)` for `owner`.
    ///
    /// On overlap, returns the owner and start of an existing region that
    /// intersects the requested one.
    pub fn insert(&mut self, start: u64, size: u64, owner: &str) -> Result<(), (String, u64)> {
        let end = start + size;

        if let Some((&prev_start, (prev_end, prev_owner))) = self.regions.range(..=start).next_back()
        {
            if *prev_end > start {
                return Err((prev_owner.clone(), prev_start));
            }
        }
        if let Some((&next_start, (_, next_owner))) = self.regions.range(start..).next() {
            if next_start < end {
                return Err((next_owner.clone(), next_start));
            }
        }

        self.regions.insert(start, (end, owner.to_string()));
        Ok(())
    }
}
