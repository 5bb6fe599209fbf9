//! Runtime preference snapshot consumed by the event selector.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::event::ResponseStatus;
use super::worksite::WorkSite;
use crate::display::algebra::PrioritySide;
use crate::error::ConfigError;

/// Which attendance responses make an event eligible for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseState {
    /// Every event, whatever the response.
    All,
    /// Only events the user accepted.
    Accepted,
    /// Anything the user has not declined.
    #[default]
    NotRejected,
}

impl ResponseState {
    pub fn admits(self, status: ResponseStatus) -> bool {
        match self {
            Self::All => true,
            Self::Accepted => status == ResponseStatus::Accepted,
            Self::NotRejected => status != ResponseStatus::Declined,
        }
    }
}

impl FromStr for ResponseState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "accepted" => Ok(Self::Accepted),
            "notRejected" => Ok(Self::NotRejected),
            other => Err(ConfigError::InvalidResponseState(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    /// Exact titles to ignore.
    pub excludes: BTreeSet<String>,
    /// Title prefixes to ignore.
    pub exclude_prefixes: Vec<String>,
    pub response_state: ResponseState,
    /// Display only while at one of these sites.  Empty = anywhere.
    pub working_locations: Vec<WorkSite>,
    /// Show up to two events instead of one.
    pub multi_event: bool,
    pub priority_flash_side: PrioritySide,
}

impl UserPreferences {
    /// Whether `title` is excluded exactly or by prefix.
    pub fn excludes_title(&self, title: &str) -> bool {
        self.excludes.contains(title)
            || self
                .exclude_prefixes
                .iter()
                .any(|prefix| title.starts_with(prefix.as_str()))
    }

    /// Events with no self-attendee record are always admitted.
    pub fn admits_response(&self, status: Option<ResponseStatus>) -> bool {
        status.is_none_or(|s| self.response_state.admits(s))
    }

    /// How many events the selector may admit.
    pub fn event_limit(&self) -> usize {
        if self.multi_event { 2 } else { 1 }
    }
}
