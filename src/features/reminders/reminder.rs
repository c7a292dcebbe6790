use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clock::{to_datetime, unix_now};

/// A scheduled notification tied to the message that created it.
///
/// Times are Unix seconds. `end_time` is fixed when the reminder is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Originating message, if the reminder came from one
    #[serde(rename = "id")]
    pub message_id: Option<u64>,
    pub channel_id: u64,
    pub end_time: f64,
    /// Requested length in seconds
    pub duration: f64,
    pub text: Option<String>,
    pub jump_url: Option<String>,
}

impl Reminder {
    /// Create a reminder that fires `duration` seconds from now.
    pub fn new(
        message_id: Option<u64>,
        channel_id: u64,
        duration: f64,
        jump_url: Option<String>,
        text: Option<String>,
    ) -> Self {
        Self::starting_at(unix_now(), message_id, channel_id, duration, jump_url, text)
    }

    /// Create a reminder that fires `duration` seconds after `start`.
    pub fn starting_at(
        start: f64,
        message_id: Option<u64>,
        channel_id: u64,
        duration: f64,
        jump_url: Option<String>,
        text: Option<String>,
    ) -> Self {
        Reminder {
            message_id,
            channel_id,
            end_time: start + duration,
            duration,
            text,
            jump_url,
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.end_time <= now
    }

    /// Seconds left until the reminder fires, never negative.
    pub fn remaining(&self, now: f64) -> f64 {
        (self.end_time - now).max(0.0)
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.end_time)
    }
}
