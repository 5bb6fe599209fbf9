//! User configuration.
//!
//! [`IndicatorConfig`] is the on-disk shape (camelCase JSON).  It is
//! validated once and then turned into the runtime types the core consumes:
//! [`UserPreferences`] for the selector and [`ActiveSchedule`] for the poller.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::app::poller::ActiveSchedule;
use crate::calendar::{ResponseState, UserPreferences, WorkSite};
use crate::display::PrioritySide;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndicatorConfig {
    /// Calendar ids to poll.
    pub calendars: Vec<String>,
    /// Event titles to ignore.
    pub excludes: Vec<String>,
    /// Event title prefixes to ignore.
    pub exclude_prefixes: Vec<String>,
    /// `"all"`, `"accepted"` or `"notRejected"`.
    pub response_state: String,
    /// Device reopen failures tolerated before giving up.
    pub device_failure_retries: u32,
    pub poll_interval_secs: u64,
    pub multi_event: bool,
    /// 0 = none, 1 = side 1, 2 = side 2.
    pub priority_flash_side: u8,
    /// `"home"`, `"office:<name>"` or `"custom:<name>"`.
    pub working_locations: Vec<String>,
    /// `HH:MM`; no polling before this time.
    pub start_time: Option<String>,
    /// `HH:MM`; no polling after this time.
    pub end_time: Option<String>,
    /// Weekday names on which the light stays off.
    pub skip_days: Vec<String>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            calendars: vec!["primary".to_owned()],
            excludes: Vec::new(),
            exclude_prefixes: Vec::new(),
            response_state: "notRejected".to_owned(),
            device_failure_retries: 10,
            poll_interval_secs: 30,
            multi_event: false,
            priority_flash_side: 0,
            working_locations: Vec::new(),
            start_time: None,
            end_time: None,
            skip_days: Vec::new(),
        }
    }
}

impl IndicatorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.calendars.is_empty() {
            return Err(ConfigError::ValidationFailed("calendars: at least one required"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("pollIntervalSecs: must be > 0"));
        }
        if self.device_failure_retries == 0 {
            return Err(ConfigError::ValidationFailed("deviceFailureRetries: must be > 0"));
        }
        if PrioritySide::from_index(self.priority_flash_side).is_none() {
            return Err(ConfigError::ValidationFailed("priorityFlashSide: must be 0, 1 or 2"));
        }
        self.response_state.parse::<ResponseState>()?;
        parse_time(self.start_time.as_deref())?;
        parse_time(self.end_time.as_deref())?;
        parse_weekdays(&self.skip_days)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn to_preferences(&self) -> Result<UserPreferences> {
        let priority_flash_side = PrioritySide::from_index(self.priority_flash_side).ok_or(
            ConfigError::ValidationFailed("priorityFlashSide: must be 0, 1 or 2"),
        )?;
        Ok(UserPreferences {
            excludes: self.excludes.iter().cloned().collect::<BTreeSet<_>>(),
            exclude_prefixes: self.exclude_prefixes.clone(),
            response_state: self.response_state.parse()?,
            working_locations: self
                .working_locations
                .iter()
                .map(|site| WorkSite::parse(site))
                .collect(),
            multi_event: self.multi_event,
            priority_flash_side,
        })
    }

    pub fn to_schedule(&self) -> Result<ActiveSchedule> {
        Ok(ActiveSchedule::new(
            parse_weekdays(&self.skip_days)?,
            parse_time(self.start_time.as_deref())?,
            parse_time(self.end_time.as_deref())?,
        ))
    }
}

fn parse_time(text: Option<&str>) -> core::result::Result<Option<NaiveTime>, ConfigError> {
    text.map(|t| {
        NaiveTime::parse_from_str(t, "%H:%M").map_err(|_| ConfigError::InvalidTime(t.to_owned()))
    })
    .transpose()
}

fn parse_weekdays(names: &[String]) -> core::result::Result<Vec<Weekday>, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<Weekday>()
                .map_err(|_| ConfigError::InvalidWeekday(name.clone()))
        })
        .collect()
}
