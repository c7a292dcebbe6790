//! # Profile viewer
//!
//! Prints a user's level, progress, and reminders from the user store, or
//! store-wide totals when no user id is given.
//!
//! Usage: `cargo run --bin profile -- [USER_ID]`

use anyhow::{anyhow, Result};
use dotenvy::dotenv;

use odbs::core::{unix_now, Config};
use odbs::features::reminders::{format_duration, format_duration_short};
use odbs::features::users::Manager;

fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let mut manager = Manager::open(&config.users_file)?;

    let Some(arg) = std::env::args().nth(1) else {
        println!("Users:    {}", manager.user_count());
        println!("Total XP: {}", manager.get_all_xp());
        return Ok(());
    };

    let user_id: u64 = arg
        .parse()
        .map_err(|e| anyhow!("USER_ID must be a numeric id: {e}"))?;

    let now = unix_now();
    let user = manager.get_user(user_id);
    let progress = user.progress();

    println!("User {}", user.id);
    println!(
        "Level {} ({}/{} XP, {:.1}%), {} XP total",
        progress.level,
        progress.level_xp,
        progress.level_max_xp,
        progress.percentage * 100.0,
        progress.xp
    );
    if let Some(role) = progress.role(&config.level_roles) {
        println!("Level role: {role}");
    }
    if user.is_quarantined() {
        println!("In quarantine");
    }
    for (kind, count) in &user.tokens {
        println!("Tokens {kind}: {count}");
    }

    if user.reminders.is_empty() {
        println!("No reminders");
    }
    for (index, reminder) in user.reminders.iter().enumerate() {
        let status = if reminder.is_due(now) {
            "due".to_string()
        } else {
            format!("in {}", format_duration(reminder.remaining(now).round() as i64))
        };
        println!(
            "#{index} [{status}, {}] {}",
            format_duration_short(reminder.duration.round() as i64),
            reminder.text.as_deref().unwrap_or("(no text)")
        );
    }

    Ok(())
}
