use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";

const PAISA_PER_RUPEE: i64 = 100;

//--------------------------------------       Paisa        ---------------------------------------------------------
/// An amount of money in minor currency units (1/100 of a rupee).
///
/// The gateway speaks in minor units, the ledger in rupees. Keeping the ledger amount as an integer count of paisa
/// means the conversion between the two is exact: `Paisa(150_000)` *is* `1500.00` rupees.
///
/// In JSON, a `Paisa` is written as a decimal rupee string with two fractional digits (`"1500.00"`). It can be read
/// from either a decimal string or a JSON number of rupees.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Paisa(i64);

op!(binary Paisa, Add, add);
op!(binary Paisa, Sub, sub);
op!(inplace Paisa, AddAssign, add_assign);

impl Sum for Paisa {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Value cannot be represented in paisa: {0}")]
pub struct PaisaConversionError(String);

impl From<i64> for Paisa {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Paisa {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees * PAISA_PER_RUPEE)
    }

    /// Converts a fractional rupee amount, rounding to the nearest paisa.
    pub fn try_from_rupees(rupees: f64) -> Result<Self, PaisaConversionError> {
        Self::try_from_minor_units(rupees * PAISA_PER_RUPEE as f64)
            .map_err(|_| PaisaConversionError(format!("{rupees} rupees")))
    }

    /// Rounds a (possibly fractional) minor-unit amount to the nearest whole paisa.
    pub fn try_from_minor_units(paisa: f64) -> Result<Self, PaisaConversionError> {
        if !paisa.is_finite() {
            return Err(PaisaConversionError(format!("{paisa} is not a finite amount")));
        }
        let rounded = paisa.round();
        if rounded.abs() >= i64::MAX as f64 {
            return Err(PaisaConversionError(format!("{paisa} is out of range")));
        }
        Ok(Self(rounded as i64))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The whole-rupee part and the remaining paisa, both as absolute values.
    fn split(&self) -> (u64, u64) {
        let abs = self.0.unsigned_abs();
        (abs / PAISA_PER_RUPEE as u64, abs % PAISA_PER_RUPEE as u64)
    }
}

impl Display for Paisa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rupees, paisa) = self.split();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{rupees}.{paisa:02}")
    }
}

impl FromStr for Paisa {
    type Err = PaisaConversionError;

    /// Parses a decimal rupee amount such as `"300"`, `"1500.5"` or `"-12.25"`. More than two fractional digits is an
    /// error rather than a silent rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PaisaConversionError(format!("'{s}' is not a valid rupee amount"));
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(err());
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let whole = whole.parse::<i64>().map_err(|_| err())?;
        let frac = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse::<i64>().map_err(|_| err())?,
        };
        let value = whole.checked_mul(PAISA_PER_RUPEE).and_then(|v| v.checked_add(frac)).ok_or_else(err)?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Serialize for Paisa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RupeeRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Paisa {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RupeeRepr::deserialize(deserializer)? {
            RupeeRepr::Number(n) => Paisa::try_from_rupees(n).map_err(de::Error::custom),
            RupeeRepr::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
