//! Exact decimal prices.
//!
//! Prices travel to the platform as decimal strings. Keeping the mantissa as
//! an integer with an explicit scale means `0.00005` is sent as `"0.00005"`
//! and never as the nearest binary float.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price: '{0}'")]
    Invalid(String),

    #[error("price '{0}' has too many digits")]
    Overflow(String),
}

/// Non-negative decimal amount: `units / 10^scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Price {
    units: u128,
    scale: u32,
}

impl Price {
    pub const ZERO: Price = Price { units: 0, scale: 0 };

    /// Build from an integer mantissa and a decimal scale (`Price::new(5, 5)` is 0.00005)
    pub fn new(units: u128, scale: u32) -> Self {
        Price { units, scale }.normalized()
    }

    pub fn units(&self) -> u128 {
        self.units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn normalized(mut self) -> Self {
        while self.scale > 0 && self.units % 10 == 0 {
            self.units /= 10;
            self.scale -= 1;
        }
        if self.units == 0 {
            self.scale = 0;
        }
        self
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (trimmed, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(PriceError::Invalid(s.to_string()));
        }

        let digits = format!("{}{}", int_part, frac_part);
        let units = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u128>()
                .map_err(|_| PriceError::Overflow(s.to_string()))?
        };
        let scale =
            u32::try_from(frac_part.len()).map_err(|_| PriceError::Overflow(s.to_string()))?;

        Ok(Price { units, scale }.normalized())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }

        let digits = format!("{:0>width$}", self.units, width = self.scale as usize + 1);
        let split = digits.len() - self.scale as usize;
        write!(f, "{}.{}", &digits[..split], &digits[split..])
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PriceVisitor;

        impl<'de> serde::de::Visitor<'de> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal price as string or number")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Price::new(u128::from(v), 0))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // Display of f64 is the shortest string that round-trips
                v.to_string().parse().map_err(serde::de::Error::custom)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // Unset prices come back as ""
                if v.trim().is_empty() {
                    return Ok(Price::ZERO);
                }
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
