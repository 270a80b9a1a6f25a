//! Business-hours configuration loading.
//!
//! A config file describes the whole week; weekdays it leaves out are closed.
//! Without a file the built-in table applies. `SLOTS_*` environment variables
//! are layered on top (e.g. `SLOTS_SLOT_GRANULARITY_MINUTES=15`).
//!
//! ```toml
//! slot_granularity_minutes = 30
//!
//! [monday]
//! open = [{ start = "08:00", end = "12:00" }, { start = "13:00", end = "19:00" }]
//! break_interval = { start = "12:00", end = "13:00" }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use slot_engine::WeeklySchedule;

const ENV_PREFIX: &str = "SLOTS_";

/// Load the schedule from `config_path`, or from the default location when
/// no path is given.
pub fn load_schedule(config_path: Option<&Path>) -> Result<WeeklySchedule> {
    let file = match config_path {
        Some(path) => {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => default_config_file().filter(|p| p.is_file()),
    };

    let schedule = load_from(file.as_deref())?;
    tracing::debug!(file = ?file, ?schedule, "loaded business hours");
    Ok(schedule)
}

/// Extract and validate a schedule from `file` (or the built-in table) plus
/// the environment.
pub fn load_from(file: Option<&Path>) -> Result<WeeklySchedule> {
    let figment = match file {
        Some(path) => Figment::from(Toml::file(path)),
        None => Figment::from(Serialized::defaults(WeeklySchedule::default())),
    };

    let schedule: WeeklySchedule = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("failed to load business hours")?;
    schedule.validate().context("invalid business hours")?;
    Ok(schedule)
}

/// `<config dir>/slots/config.toml`, e.g. `~/.config/slots/config.toml`.
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slots").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_file_ends_with_config_toml() {
        let path = default_config_file().unwrap();
        assert_eq!(path.file_name().unwrap(), "config.toml");
        assert!(path.parent().unwrap().ends_with("slots"));
    }

    #[test]
    fn test_no_file_uses_builtin_table() {
        let schedule = load_from(None).unwrap();
        assert_eq!(schedule.day(Weekday::Mon), WeeklySchedule::default().day(Weekday::Mon));
    }

    #[test]
    fn test_file_replaces_whole_week() {
        let file = write_config(
            r#"
slot_granularity_minutes = 20

[sunday]
open = [{ start = "10:00", end = "14:00" }]
"#,
        );

        let schedule = load_from(Some(file.path())).unwrap();

        assert_eq!(schedule.slot_granularity_minutes, 20);
        assert_eq!(schedule.sunday.open.len(), 1);
        assert!(schedule.monday.is_closed());
    }

    #[test]
    fn test_invalid_schedule_in_file_rejected() {
        let file = write_config(
            r#"
[monday]
open = [{ start = "08:00", end = "12:00" }, { start = "11:00", end = "19:00" }]
"#,
        );

        let err = load_from(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("overlap"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = load_schedule(Some(Path::new("/nonexistent/slots.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
