//! # Feature: User Store
//!
//! Owns every user profile and keeps the JSON store file in sync with it.
//! The file is the source of truth: it is read once on load and rewritten in
//! full after every mutation. Writes go to a temporary sibling file that is
//! then renamed over the store, so a crash mid-write leaves the previous
//! version intact.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Atomic write-then-rename commits
//! - 1.1.0: Level-up detection only reports increases and always persists
//! - 1.0.0: Initial release with XP, reminders and zero-message cooldown

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::clock::unix_now;
use crate::features::reminders::Reminder;
use crate::features::users::User;

/// Minimum gap between two zero-message rewards for the same user
pub const ZERO_COOLDOWN_SECS: f64 = 120.0;

#[derive(Deserialize)]
struct StoreFile {
    #[serde(default)]
    users: BTreeMap<u64, User>,
}

#[derive(Serialize)]
struct StoreRef<'a> {
    users: &'a BTreeMap<u64, User>,
}

#[derive(Debug)]
pub struct Manager {
    users_file: PathBuf,
    users: BTreeMap<u64, User>,
}

impl Manager {
    /// Open the store at `users_file`, creating it if needed.
    pub fn open(users_file: impl Into<PathBuf>) -> Result<Self> {
        let mut manager = Manager {
            users_file: users_file.into(),
            users: BTreeMap::new(),
        };
        manager.reload()?;
        Ok(manager)
    }

    pub fn users_file(&self) -> &Path {
        &self.users_file
    }

    /// Path the store is moved to when it cannot be read.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.users_file.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Fresh `<store>.<uuid>.tmp` sibling that a commit writes before renaming.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.users_file.as_os_str());
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        PathBuf::from(name)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Re-read the store file, replacing everything held in memory.
    ///
    /// An unreadable or malformed file is moved to [`Manager::backup_path`]
    /// and replaced with an empty store.
    pub fn reload(&mut self) -> Result<()> {
        let data = match fs::read_to_string(&self.users_file) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No user store at {}, starting empty", self.users_file.display());
                return self.reset();
            }
            Err(e) => {
                warn!("Could not read user store {}: {e}", self.users_file.display());
                return self.recover_corrupt();
            }
        };

        let store: StoreFile = match serde_json::from_str(&data) {
            Ok(store) => store,
            Err(e) => {
                warn!("Could not parse user store {}: {e}", self.users_file.display());
                return self.recover_corrupt();
            }
        };

        self.users = store
            .users
            .into_iter()
            .map(|(id, mut user)| {
                user.id = id;
                (id, user)
            })
            .collect();

        info!(
            "Loaded {} users from {}",
            self.users.len(),
            self.users_file.display()
        );

        self.commit()
    }

    /// Drop every user and persist the empty store.
    pub fn reset(&mut self) -> Result<()> {
        self.users.clear();
        self.commit()
    }

    fn recover_corrupt(&mut self) -> Result<()> {
        warn!("User store is unusable, starting over with an empty one");

        if self.users_file.exists() {
            let backup = self.backup_path();
            fs::rename(&self.users_file, &backup).with_context(|| {
                format!(
                    "moving unusable user store {} to {}",
                    self.users_file.display(),
                    backup.display()
                )
            })?;
            warn!("Moved user store to {}", backup.display());
        }

        self.reset()
    }

    /// Write every user to the store file.
    pub fn commit(&self) -> Result<()> {
        let mut payload = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut payload, formatter);
        StoreRef { users: &self.users }
            .serialize(&mut serializer)
            .context("encoding user store")?;

        if let Some(parent) = self.users_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating store directory {}", parent.display()))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &payload)
            .with_context(|| format!("writing user store to {}", temp_path.display()))?;

        if let Err(e) = fs::rename(&temp_path, &self.users_file) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| {
                format!("replacing user store {}", self.users_file.display())
            });
        }

        debug!(
            "Committed {} users to {}",
            self.users.len(),
            self.users_file.display()
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Make sure a record exists for `id`. Does not persist.
    pub fn check_user(&mut self, id: u64) {
        self.users.entry(id).or_insert_with(|| User::new(id));
    }

    /// Get a user, creating a default record if there is none yet.
    pub fn get_user(&mut self, id: u64) -> &User {
        self.get_user_mut(id)
    }

    /// Mutable access without persisting. Follow up with [`Manager::commit`]
    /// or use [`Manager::update_user`].
    pub fn get_user_mut(&mut self, id: u64) -> &mut User {
        self.users.entry(id).or_insert_with(|| User::new(id))
    }

    /// Look a user up without creating one.
    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Sum of every user's experience points, saturating at `u64::MAX`.
    pub fn get_all_xp(&self) -> u64 {
        self.users
            .values()
            .fold(0u64, |total, user| total.saturating_add(user.xp))
    }

    /// Apply `f` to a user and persist.
    pub fn update_user<T, F>(&mut self, id: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut User) -> T,
    {
        let result = f(self.get_user_mut(id));
        self.commit()?;
        Ok(result)
    }

    // ------------------------------------------------------------------------
    // Experience
    // ------------------------------------------------------------------------

    /// Add (or with a negative `delta`, remove) experience points.
    ///
    /// Returns the new level if the user levelled up.
    pub fn add_xp(&mut self, user_id: u64, delta: i64) -> Result<Option<u32>> {
        let user = self.get_user_mut(user_id);
        let new_xp = user.xp.saturating_add_signed(delta);
        self.apply_xp(user_id, new_xp)
    }

    /// Overwrite a user's experience points.
    ///
    /// Returns the new level if the user levelled up.
    pub fn set_xp(&mut self, user_id: u64, xp: u64) -> Result<Option<u32>> {
        self.apply_xp(user_id, xp)
    }

    fn apply_xp(&mut self, user_id: u64, xp: u64) -> Result<Option<u32>> {
        let user = self.get_user_mut(user_id);
        let old_level = user.level();
        user.xp = xp;
        let new_level = user.level();

        self.commit()?;

        if new_level > old_level {
            info!("User {user_id} reached level {new_level}");
            Ok(Some(new_level))
        } else {
            Ok(None)
        }
    }

    /// Zero-message cooldown gate. Returns true, and restarts the cooldown,
    /// if the user has not been rewarded in the last [`ZERO_COOLDOWN_SECS`].
    pub fn check_user_zero(&mut self, user_id: u64) -> bool {
        self.check_user_zero_at(user_id, unix_now())
    }

    pub fn check_user_zero_at(&mut self, user_id: u64, now: f64) -> bool {
        let user = self.get_user_mut(user_id);
        if now - user.last_sent_zero > ZERO_COOLDOWN_SECS {
            user.last_sent_zero = now;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------------

    /// Append a reminder and return its index in the user's list.
    pub fn add_reminder(&mut self, user_id: u64, reminder: Reminder) -> Result<usize> {
        let reminders = &mut self.get_user_mut(user_id).reminders;
        reminders.push(reminder);
        let index = reminders.len() - 1;
        self.commit()?;
        Ok(index)
    }

    /// Remove the reminder at `index`. Unknown users and bad indices are
    /// errors and leave the store untouched.
    pub fn remove_reminder(&mut self, user_id: u64, index: usize) -> Result<Reminder> {
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("Unknown user {user_id}"))?;

        if index >= user.reminders.len() {
            return Err(anyhow!(
                "User {user_id} has no reminder #{index} ({} total)",
                user.reminders.len()
            ));
        }

        let reminder = user.reminders.remove(index);
        self.commit()?;
        Ok(reminder)
    }

    /// Reminders that are due at `now`, as `(user_id, index)` pairs.
    ///
    /// Indices for the same user come highest first, so removing the pairs
    /// in order never shifts one that has not been removed yet.
    pub fn due_reminders(&self, now: f64) -> Vec<(u64, usize)> {
        self.users
            .iter()
            .flat_map(|(&id, user)| {
                user.reminders
                    .iter()
                    .enumerate()
                    .rev()
                    .filter(move |(_, r)| r.is_due(now))
                    .map(move |(index, _)| (id, index))
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Verification and tokens
    // ------------------------------------------------------------------------

    pub fn set_quarantine(&mut self, user_id: u64, since: Option<f64>) -> Result<()> {
        self.get_user_mut(user_id).quarantine = since;
        self.commit()
    }

    /// Runtime-only flag; not persisted.
    pub fn set_verifying(&mut self, user_id: u64, verifying: bool) {
        self.get_user_mut(user_id).verifying = verifying;
    }

    /// Adjust a token counter, clamping at zero. Returns the new count.
    pub fn add_tokens(&mut self, user_id: u64, kind: &str, delta: i64) -> Result<i64> {
        let tokens = &mut self.get_user_mut(user_id).tokens;
        let count = tokens.entry(kind.to_string()).or_insert(0);
        *count = count.saturating_add(delta).max(0);
        let count = *count;
        self.commit()?;
        Ok(count)
    }
}
