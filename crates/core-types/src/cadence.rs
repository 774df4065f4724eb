use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The interval between scheduled rebalances, in hours.
///
/// Zero hours is the idealized "continuous" benchmark: a rebalance on every
/// tick with no transaction costs applied. Cadences order by their hour
/// count, which places the continuous benchmark first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Cadence {
    hours: u32,
}

impl Cadence {
    pub const CONTINUOUS: Cadence = Cadence { hours: 0 };

    pub fn from_hours(hours: u32) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn is_continuous(&self) -> bool {
        self.hours == 0
    }

    /// Human label: `continuous`, `1h`, `12h`, `1d`, `3d`, `1w`, ...
    /// Day and week labels are used only for exact multiples.
    pub fn label(&self) -> String {
        match self.hours {
            0 => "continuous".to_string(),
            h if h % (24 * 7) == 0 => format!("{}w", h / (24 * 7)),
            h if h % 24 == 0 => format!("{}d", h / 24),
            h => format!("{h}h"),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Cadence {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("continuous") {
            return Ok(Cadence::CONTINUOUS);
        }

        let (digits, unit_hours) = match s.as_bytes().last() {
            Some(b'h') | Some(b'H') => (&s[..s.len() - 1], 1u32),
            Some(b'd') | Some(b'D') => (&s[..s.len() - 1], 24u32),
            Some(b'w') | Some(b'W') => (&s[..s.len() - 1], 24 * 7),
            _ => (s, 1u32),
        };

        let count: u32 = digits.parse().map_err(|_| {
            CoreError::InvalidInput(
                "cadence".to_string(),
                format!("'{s}' is not a cadence (expected e.g. 4h, 2d, 1w, continuous)"),
            )
        })?;

        let hours = count.checked_mul(unit_hours).ok_or_else(|| {
            CoreError::InvalidInput(
                "cadence".to_string(),
                format!("'{s}' exceeds the supported cadence range"),
            )
        })?;

        Ok(Cadence::from_hours(hours))
    }
}

impl TryFrom<String> for Cadence {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cadence> for String {
    fn from(value: Cadence) -> Self {
        value.label()
    }
}
