//! Outer-totalistic birth/survival rules in B/S notation.

use life_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which live-neighbor counts cause a birth and which let a cell survive.
///
/// Each field is a bitmask over counts 0..=8. Births are only ever evaluated
/// for positions adjacent to a live cell, so a birth on zero neighbors is not
/// representable and is rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rule {
    birth: u16,
    survival: u16,
}

impl Rule {
    /// Conway's Game of Life, B3/S23
    pub const fn conway() -> Self {
        Self {
            birth: 1 << 3,
            survival: (1 << 2) | (1 << 3),
        }
    }

    pub fn is_born(&self, live_neighbors: usize) -> bool {
        live_neighbors <= 8 && self.birth & (1 << live_neighbors) != 0
    }

    pub fn survives(&self, live_neighbors: usize) -> bool {
        live_neighbors <= 8 && self.survival & (1 << live_neighbors) != 0
    }

    fn parse_counts(digits: &str, notation: &str) -> Result<u16> {
        let mut mask = 0u16;
        for ch in digits.chars() {
            let count = ch
                .to_digit(10)
                .filter(|&n| n <= 8)
                .ok_or_else(|| {
                    Error::Validation(format!("invalid neighbor count '{}' in rule '{}'", ch, notation))
                })?;
            mask |= 1 << count;
        }
        Ok(mask)
    }

    fn fmt_counts(mask: u16, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in 0..=8 {
            if mask & (1 << n) != 0 {
                write!(f, "{}", n)?;
            }
        }
        Ok(())
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let notation = s.trim();
        let mut birth = None;
        let mut survival = None;

        for part in notation.split('/') {
            let mut chars = part.chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survival,
                _ => {
                    return Err(Error::Validation(format!(
                        "rule '{}' must look like B3/S23",
                        notation
                    )))
                }
            };

            if slot.is_some() {
                return Err(Error::Validation(format!(
                    "rule '{}' repeats a section",
                    notation
                )));
            }
            *slot = Some(Self::parse_counts(chars.as_str(), notation)?);
        }

        let (Some(birth), Some(survival)) = (birth, survival) else {
            return Err(Error::Validation(format!(
                "rule '{}' needs both a B and an S section",
                notation
            )));
        };

        if birth & 1 != 0 {
            return Err(Error::Validation(format!(
                "rule '{}' cannot give birth on zero neighbors",
                notation
            )));
        }

        Ok(Self { birth, survival })
    }
}

impl TryFrom<String> for Rule {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        Self::fmt_counts(self.birth, f)?;
        write!(f, "/S")?;
        Self::fmt_counts(self.survival, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conway_rule() {
        let rule = Rule::conway();
        assert!(rule.is_born(3));
        assert!(!rule.is_born(2));
        assert!(!rule.is_born(6));
        assert!(rule.survives(2));
        assert!(rule.survives(3));
        assert!(!rule.survives(1));
        assert!(!rule.survives(4));
        assert!(!rule.survives(9));
    }

    #[test]
    fn test_parse_notation() {
        assert_eq!("B3/S23".parse::<Rule>().unwrap(), Rule::conway());
        assert_eq!("s23/b3".parse::<Rule>().unwrap(), Rule::conway());

        let high_life: Rule = "B36/S23".parse().unwrap();
        assert!(high_life.is_born(6));
        assert_eq!(high_life.to_string(), "B36/S23");

        let seeds: Rule = "B2/S".parse().unwrap();
        assert!(seeds.is_born(2));
        assert!((0..=8).all(|n| !seeds.survives(n)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "B3", "S23", "B3/S23/B3", "B9/S23", "B3/X23", "Bx/S2", "B03/S23"] {
            assert!(
                matches!(bad.parse::<Rule>(), Err(Error::Validation(_))),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn test_rule_serializes_as_notation() {
        let json = serde_json::to_string(&Rule::conway()).unwrap();
        assert_eq!(json, "\"B3/S23\"");
        let back: Rule = serde_json::from_str("\"B36/S23\"").unwrap();
        assert_eq!(back.to_string(), "B36/S23");
        assert!(serde_json::from_str::<Rule>("\"B0/S8\"").is_err());
    }
}
