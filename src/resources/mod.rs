//! Link entities and the symlink primitives they are built on.
pub mod link;
pub mod symlink;

pub use link::Link;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Live state of a link's target path.
///
/// # Examples
///
/// ```
/// use dotfiles_link::resources::LinkStatus;
///
/// let status: LinkStatus = "Linked".parse().unwrap();
/// assert_eq!(status, LinkStatus::Linked);
/// assert_eq!(status.symbol(), '✓');
/// assert_eq!(status.to_string(), "linked");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Nothing occupies the target path.
    NoLink,
    /// Something other than the correct symlink occupies the target path.
    Invalid,
    /// The target path is a symlink to the source file.
    Linked,
}

impl LinkStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::NoLink, Self::Invalid, Self::Linked];

    /// Single-character marker shown by `list`.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::NoLink => ' ',
            Self::Invalid => '×',
            Self::Linked => '✓',
        }
    }

    /// ANSI SGR colour code for the marker.
    #[must_use]
    pub const fn color(self) -> u8 {
        match self {
            Self::NoLink => 94,
            Self::Invalid => 91,
            Self::Linked => 92,
        }
    }

    /// Upper-case name (`NOLINK`, `INVALID`, `LINKED`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoLink => "NOLINK",
            Self::Invalid => "INVALID",
            Self::Linked => "LINKED",
        }
    }

    /// `[symbol]`, coloured.
    #[must_use]
    pub fn colored_marker(self) -> String {
        format!("\x1b[{}m[{}]\x1b[0m", self.color(), self.symbol())
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoLink => "nolink",
            Self::Invalid => "invalid",
            Self::Linked => "linked",
        })
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown link status '{0}' (expected nolink, invalid or linked)")]
pub struct ParseLinkStatusError(String);

impl FromStr for LinkStatus {
    type Err = ParseLinkStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.to_string() == lower)
            .ok_or_else(|| ParseLinkStatusError(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_colors() {
        assert_eq!(LinkStatus::NoLink.symbol(), ' ');
        assert_eq!(LinkStatus::Invalid.symbol(), '×');
        assert_eq!(LinkStatus::Linked.symbol(), '✓');
        assert_eq!(LinkStatus::NoLink.color(), 94);
        assert_eq!(LinkStatus::Invalid.color(), 91);
        assert_eq!(LinkStatus::Linked.color(), 92);
    }

    #[test]
    fn colored_marker_wraps_symbol() {
        assert_eq!(LinkStatus::Invalid.colored_marker(), "\x1b[91m[×]\x1b[0m");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("NOLINK".parse::<LinkStatus>().unwrap(), LinkStatus::NoLink);
        assert_eq!("invalid".parse::<LinkStatus>().unwrap(), LinkStatus::Invalid);
        let err = "broken".parse::<LinkStatus>().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::NoLink).unwrap(),
            "\"nolink\""
        );
    }
}
