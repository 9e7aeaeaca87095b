//! Exact monetary amounts.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MINOR_PER_MAJOR: u64 = 100;

/// Non-negative amount in the smallest currency unit (hundredths).
///
/// Text form is `units[.d[d]]`. [`FromStr`] accepts at most two fractional
/// digits so that every typed value is represented exactly;
/// [`Money::parse_rounded`] is the lenient form used for stored records.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole currency units, e.g. `Money::from_major(2)` is `2.00`.
    pub const fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Parse any finite, non-negative decimal in floating-point syntax
    /// (`19.999`, `1e+06`) and round it to the nearest hundredth.
    ///
    /// Text with at most two fractional digits goes through the exact
    /// parser first, so it never picks up float error.
    pub fn parse_rounded(s: &str) -> Result<Self, DomainError> {
        if let Ok(exact) = s.parse::<Money>() {
            return Ok(exact);
        }

        let s = s.trim();
        let value: f64 = s
            .parse()
            .map_err(|_| DomainError::invalid_amount(format!("{s:?} is not a number")))?;
        if !value.is_finite() || (value.is_sign_negative() && value != 0.0) {
            return Err(DomainError::invalid_amount(format!(
                "{s:?} is not a finite non-negative number"
            )));
        }

        let minor = (value * MINOR_PER_MAJOR as f64).round();
        if minor >= u64::MAX as f64 {
            return Err(DomainError::invalid_amount(format!("{s:?} is too large")));
        }
        Ok(Self(minor as u64))
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(u64::from(quantity)).map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = format!("{}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR);
        f.pad(&text)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_amount(format!("{s:?} is not a non-negative number")));
        }
        if s.contains('.') && frac.is_empty() {
            return Err(DomainError::invalid_amount(format!("{s:?} has an empty fraction")));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_amount(format!(
                "{s:?} must have at most two fractional digits"
            )));
        }

        let major: u64 = whole
            .parse()
            .map_err(|e| DomainError::invalid_amount(format!("{s:?}: {e}")))?;
        let minor_frac = match frac.len() {
            0 => 0,
            1 => u64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => u64::from(frac.as_bytes()[0] - b'0') * 10 + u64::from(frac.as_bytes()[1] - b'0'),
        };

        major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor_frac))
            .map(Self)
            .ok_or_else(|| DomainError::invalid_amount(format!("{s:?} is too large")))
    }
}
