//! Station types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {input:?}: {reason}")]
pub struct InvalidStationCode {
    input: String,
    reason: &'static str,
}

/// A valid 3-letter telecode used by the booking service to identify a station.
///
/// Codes are always 3 uppercase ASCII letters (`BJP`, `SHH`, ...). Any
/// `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use ticket_watch::domain::StationCode;
///
/// let bjp = StationCode::parse("BJP").unwrap();
/// assert_eq!(bjp.as_str(), "BJP");
///
/// assert!(StationCode::parse("bjp").is_err());
/// assert!(StationCode::parse("BJ").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 3]);

impl StationCode {
    /// Parse a station code. The input must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station known to the booking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Display name, e.g. "北京南".
    pub name: String,
    /// Stable key used in queries and ticket records.
    pub code: StationCode,
    /// Romanized name, informational only.
    pub pinyin: String,
    /// Short alias used for pattern matching, e.g. "bjn".
    pub abbrev: String,
}

impl Station {
    pub fn new(
        name: impl Into<String>,
        code: StationCode,
        pinyin: impl Into<String>,
        abbrev: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            pinyin: pinyin.into(),
            abbrev: abbrev.into(),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]{}({}|{})",
            self.code, self.name, self.pinyin, self.abbrev
        )
    }
}
