//!
//! # Amount
//!
//! Exact, non-negative token amounts. Premine totals routinely exceed the
//! 53-bit range that JSON consumers can represent as numbers, so amounts are
//! carried as [`BigUint`] and travel through JSON as decimal strings.
//!

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::errors::ConsensusError;

#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    /// Subtraction that refuses to go below zero.
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.0 >= other.0 {
            Some(Amount(&self.0 - &other.0))
        } else {
            None
        }
    }

    /// Splits the amount into `parts` shares of `self / parts`, with the
    /// division remainder added to the last share. The shares always sum to
    /// `self` exactly.
    pub fn split(&self, parts: u32) -> Vec<Amount> {
        if parts == 0 {
            return Vec::new();
        }
        let share = &self.0 / parts;
        let remainder = &self.0 % parts;
        let mut shares = vec![Amount(share.clone()); parts as usize];
        if let Some(last) = shares.last_mut() {
            last.0 = share + remainder;
        }
        shares
    }

    /// Canonical byte form: one length byte followed by the big-endian
    /// magnitude. Zero is encoded as a lone `0x00`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConsensusError> {
        let magnitude = if self.is_zero() { Vec::new() } else { self.0.to_bytes_be() };
        let len = u8::try_from(magnitude.len()).map_err(|_| ConsensusError::FieldOverflow("amount"))?;
        let mut out = Vec::with_capacity(1 + magnitude.len());
        out.push(len);
        out.extend_from_slice(&magnitude);
        Ok(out)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for Amount {
    type Err = ConsensusError;

    /// Accepts plain decimal digits only; signs, fractions and exponents are
    /// rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConsensusError::InvalidAmount(s.to_string()));
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Amount)
            .ok_or_else(|| ConsensusError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |mut acc, a| {
            acc += a;
            acc
        })
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                u64::try_from(v).map(Amount::from).map_err(|_| E::custom(format!("negative amount {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_beyond_u64() {
        let big: Amount = "340282366920938463463374607431768211457".parse().unwrap();
        assert_eq!(big.to_string(), "340282366920938463463374607431768211457");
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        for bad in ["", "-1", "1.5", "1e9", "12a", "+3"] {
            assert!(bad.parse::<Amount>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_split_keeps_exact_sum() {
        let premine: Amount = "12500000000000001".parse().unwrap();
        for parts in [1u32, 3, 25, 51, 100] {
            let shares = premine.split(parts);
            assert_eq!(shares.len(), parts as usize);
            assert_eq!(shares.iter().sum::<Amount>(), premine);
        }
        let shares = Amount::from(10).split(3);
        assert_eq!(shares, vec![Amount::from(3), Amount::from(3), Amount::from(4)]);
    }

    #[test]
    fn test_bytes() {
        assert_eq!(Amount::zero().to_bytes().unwrap(), vec![0]);
        assert_eq!(Amount::from(0x0102).to_bytes().unwrap(), vec![2, 1, 2]);
    }

    #[test]
    fn test_json_forms() {
        let a: Amount = serde_json::from_str("\"100\"").unwrap();
        let b: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"100\"");
        assert!(serde_json::from_str::<Amount>("-5").is_err());
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(Amount::from(5).checked_sub(&Amount::from(3)), Some(Amount::from(2)));
        assert_eq!(Amount::from(3).checked_sub(&Amount::from(5)), None);
    }
}
