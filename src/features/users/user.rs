use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::leveling::Progress;
use crate::features::reminders::Reminder;

/// A community member's stored profile.
///
/// Keys missing from older store files fall back to their defaults. The
/// runtime fields at the bottom are never written to disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Carried as the map key in the store file
    #[serde(skip)]
    pub id: u64,
    pub xp: u64,
    /// When the user was put in quarantine, if they are in it
    pub quarantine: Option<f64>,
    pub reminders: Vec<Reminder>,
    pub tokens: BTreeMap<String, i64>,
    pub token_dig_timeout: f64,
    pub games_timeout: f64,

    /// Last time a zero-message reward was granted
    #[serde(skip)]
    pub last_sent_zero: f64,
    /// Whether a verification challenge is in flight
    #[serde(skip)]
    pub verifying: bool,
}

impl User {
    pub fn new(id: u64) -> Self {
        User {
            id,
            ..Default::default()
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::from_xp(self.xp)
    }

    pub fn level(&self) -> u32 {
        self.progress().level
    }

    pub fn is_quarantined(&self) -> bool {
        self.quarantine.is_some()
    }

    pub fn token_count(&self, kind: &str) -> i64 {
        self.tokens.get(kind).copied().unwrap_or(0)
    }
}
