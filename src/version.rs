use crate::errors::{PatchError, Result};
use log::warn;
use std::fmt;
use std::str::FromStr;

/// A CSV version as passed on the command line, e.g. `v1.2.3`.
///
/// The first character is a prefix that appears in resource names but not
/// in `spec.version`. Whatever follows it is expected to be semver; when it
/// isn't a warning is logged and the value is used anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvVersion {
    full: String,
}

impl CsvVersion {
    /// The version exactly as given, prefix included.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// The version with its prefix character removed.
    pub fn bare(&self) -> &str {
        let mut chars = self.full.chars();
        chars.next();
        chars.as_str()
    }
}

impl FromStr for CsvVersion {
    type Err = PatchError;

    fn from_str(value: &str) -> Result<Self> {
        let mut chars = value.chars();
        match chars.next() {
            None => {
                return Err(PatchError::InvalidVersion {
                    version: value.to_string(),
                    reason: "version is empty",
                })
            }
            Some(prefix) if prefix.is_ascii_digit() => {
                return Err(PatchError::InvalidVersion {
                    version: value.to_string(),
                    reason: "expected a prefix character such as `v` before the version number",
                })
            }
            Some(_) => {}
        }

        let bare = chars.as_str();
        if bare.is_empty() {
            return Err(PatchError::InvalidVersion {
                version: value.to_string(),
                reason: "nothing follows the prefix",
            });
        }
        if let Err(e) = semver::Version::parse(bare) {
            warn!("Version {} is not semantic versioning: {}", value, e);
        }

        Ok(CsvVersion {
            full: value.to_string(),
        })
    }
}

impl fmt::Display for CsvVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}
