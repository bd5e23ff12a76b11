//! In-memory station table and name resolution.

use regex_lite::Regex;
use tracing::debug;

use crate::domain::{Station, StationCode};

use super::error::StationError;

/// Picks one station out of several that matched a pattern.
///
/// Returning `None`, or an index past the end of `candidates`, leaves the
/// pattern unresolved.
pub trait StationChooser {
    fn choose(&self, pattern: &str, candidates: &[&Station]) -> Option<usize>;
}

/// Chooser that never picks, so any ambiguous pattern is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl StationChooser for NonInteractive {
    fn choose(&self, _pattern: &str, _candidates: &[&Station]) -> Option<usize> {
        None
    }
}

/// Read-only table of every station known to the booking service.
///
/// Built once at start-up and passed around by reference.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
}

impl StationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Look up a station by code.
    ///
    /// Codes should be unique; if the source data repeats one, the last
    /// entry wins.
    pub fn find_by_code(&self, code: StationCode) -> Option<&Station> {
        self.stations.iter().rev().find(|s| s.code == code)
    }

    /// Display name for `code`, or the code itself if it is unknown.
    pub fn name_of<'a>(&'a self, code: &'a StationCode) -> &'a str {
        self.find_by_code(*code).map_or(code.as_str(), |s| s.name.as_str())
    }

    /// Every station whose name or abbreviation matches `pattern` as a
    /// regular expression. An empty result is not an error.
    pub fn find_by_pattern(&self, pattern: &str) -> Result<Vec<&Station>, StationError> {
        let re = Regex::new(pattern).map_err(|e| StationError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(self
            .stations
            .iter()
            .filter(|s| re.is_match(&s.name) || re.is_match(&s.abbrev))
            .collect())
    }

    /// Resolve free-text input to a single station.
    ///
    /// One match resolves directly. Several matches are handed to `chooser`.
    pub fn resolve(
        &self,
        pattern: &str,
        chooser: &impl StationChooser,
    ) -> Result<&Station, StationError> {
        let candidates = self.find_by_pattern(pattern)?;

        match candidates.as_slice() {
            [] => Err(StationError::NotFound(pattern.to_string())),
            [only] => Ok(*only),
            many => {
                debug!(pattern, matches = many.len(), "ambiguous station pattern");
                chooser
                    .choose(pattern, many)
                    .and_then(|i| many.get(i).copied())
                    .ok_or_else(|| StationError::Unresolved {
                        pattern: pattern.to_string(),
                        count: many.len(),
                    })
            }
        }
    }
}

impl FromIterator<Station> for StationDirectory {
    fn from_iter<I: IntoIterator<Item = Station>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
