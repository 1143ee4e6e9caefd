//! The physical pin plan.
//!
//! A [`PinPlan`] records, for each of the [`IO_PIN_COUNT`] multiplexed pins,
//! which slave interface claims it and in what role. How a second claim on the
//! same pin is handled is decided by the [`PinClaimPolicy`].

use crate::error::ResolveError;
use std::fmt;

/// Number of multiplexed physical I/O pins.
pub const IO_PIN_COUNT: u32 = 38;

/// How a claimed pin is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinRole {
    /// The pad is an input; its value is read from `io_in`.
    InputPassthrough,
    /// The pad is an output driven from `io_out`.
    OutputDriven,
    /// The slave drives the pad's output enable itself through `io_oen`.
    OutputEnableControlled,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRole::InputPassthrough => write!(f, "input"),
            PinRole::OutputDriven => write!(f, "output"),
            PinRole::OutputEnableControlled => write!(f, "output-enable"),
        }
    }
}

/// An inclusive range of pin indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinRange {
    /// First pin.
    pub start: u32,
    /// Last pin (inclusive).
    pub end: u32,
}

impl PinRange {
    /// Returns the range of `width` pins starting at `start`.
    ///
    /// `width` must be at least 1.
    pub fn new(start: u32, width: u32) -> Self {
        Self {
            start,
            end: start + width.saturating_sub(1),
        }
    }

    /// Returns the number of pins in the range.
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Iterates the pin indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// The claim one interface holds on a pin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinClaim {
    /// How the pin is driven.
    pub role: PinRole,
    /// The owning slave instance.
    pub slave: String,
    /// The owning interface of that slave.
    pub interface: String,
}

/// Precedence rule for pins claimed by more than one interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinClaimPolicy {
    /// A second claim on any pin is a [`ResolveError::PinConflict`].
    #[default]
    Exclusive,
    /// Input and data-output claims keep the first claimant; output-enable
    /// control claims replace whatever was there.
    Legacy,
}

/// Per-pin claims for the whole configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinPlan {
    claims: Vec<Option<PinClaim>>,
}

impl Default for PinPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl PinPlan {
    /// Creates a plan with every pin unclaimed.
    pub fn new() -> Self {
        Self {
            claims: vec![None; IO_PIN_COUNT as usize],
        }
    }

    /// Claims every pin in `range` for `slave`'s `interface` with `role`.
    ///
    /// The range must already lie within the pin space. Under
    /// [`PinClaimPolicy::Exclusive`] the first pin already claimed aborts the
    /// claim; pins before it keep the new claim, which is harmless since
    /// resolution stops on the error.
    pub fn claim(
        &mut self,
        range: PinRange,
        role: PinRole,
        slave: &str,
        interface: &str,
        policy: PinClaimPolicy,
    ) -> Result<(), ResolveError> {
        for pin in range.iter() {
            let slot = &mut self.claims[pin as usize];
            let new_claim = || PinClaim {
                role,
                slave: slave.to_string(),
                interface: interface.to_string(),
            };
            match (slot.as_ref(), policy) {
                (None, _) => *slot = Some(new_claim()),
                (Some(owner), PinClaimPolicy::Exclusive) => {
                    return Err(ResolveError::PinConflict {
                        slave: slave.to_string(),
                        interface: interface.to_string(),
                        pin,
                        owner_slave: owner.slave.clone(),
                        owner_interface: owner.interface.clone(),
                    });
                }
                (Some(_), PinClaimPolicy::Legacy) => {
                    if role == PinRole::OutputEnableControlled {
                        *slot = Some(new_claim());
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the claim on `pin`, if any.
    pub fn claim_at(&self, pin: u32) -> Option<&PinClaim> {
        self.claims.get(pin as usize).and_then(Option::as_ref)
    }

    /// Returns the role of `pin`, or `None` if it is unclaimed.
    pub fn role(&self, pin: u32) -> Option<PinRole> {
        self.claim_at(pin).map(|claim| claim.role)
    }

    /// Iterates `(pin, claim)` for every pin in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<&PinClaim>)> {
        self.claims
            .iter()
            .enumerate()
            .map(|(pin, claim)| (pin as u32, claim.as_ref()))
    }

    /// Returns the number of claimed pins.
    pub fn claimed_count(&self) -> usize {
        self.claims.iter().filter(|claim| claim.is_some()).count()
    }
}
