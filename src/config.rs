use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::error::ScheduleError;
use crate::models::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    validate(&config).with_context(|| format!("Invalid schedule in {}", path.display()))?;
    Ok(config)
}

/// Checks what serde cannot: slot shapes, ranges, days and id uniqueness.
/// Overlapping slots are allowed through so they can be reported.
pub fn validate(config: &Config) -> Result<()> {
    let timeline = &config.timeline;
    if timeline.start >= timeline.end {
        bail!(
            "Timeline start {} must be before its end {}",
            timeline.start,
            timeline.end
        );
    }
    if timeline.default_duration == 0 {
        bail!("Default slot duration must be positive");
    }

    let mut seen = HashSet::new();
    for slot in &config.slots {
        if !seen.insert(slot.id) {
            bail!("Slot id {} appears more than once", slot.id);
        }
        if slot.start >= slot.end {
            return Err(ScheduleError::InvalidRange {
                start: slot.start.to_string(),
                end: slot.end.to_string(),
            })
            .with_context(|| format!("Slot {}", slot.summary()));
        }
        if !slot.participants.fits(slot.sport.kind()) {
            return Err(ScheduleError::ShapeMismatch {
                sport: slot.sport,
                found: slot.participants.kind_name(),
            })
            .with_context(|| format!("Slot {}", slot.summary()));
        }
        if slot.day.0 == 0 || slot.day.0 > config.days {
            bail!("Slot {} is on day {}, outside 1..={}", slot.summary(), slot.day, config.days);
        }
        if slot.ground == 0 {
            bail!("Slot {} has no ground, grounds are counted from 1", slot.summary());
        }
        if !timeline.window().fits(slot.start.minutes(), slot.duration()) {
            warn!(
                "Slot {} on day {} lies outside the {}-{} timeline",
                slot.summary(),
                slot.day,
                timeline.start,
                timeline.end
            );
        }
    }

    for team in &config.teams {
        for id in &team.players {
            if !config.players.iter().any(|p| p.id == *id) {
                warn!("{} lists unknown player {}", team.name, id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Sport};

    const SAMPLE: &str = r#"
days = 5

[timeline]
start = "17:00"
end = "28:00"
grid = 15
default_duration = 60

[[players]]
id = 1
name = "Alice"

[[players]]
id = 5
name = "Eve"

[[teams]]
id = 1
name = "Team Alpha"
players = [1]

[[slots]]
day = 1
ground = 1
start = "17:00"
end = "18:00"
sport = "Football"
participants = { kind = "team", side_a = 1 }

[[slots]]
day = 1
ground = 2
start = "17:30"
end = "18:30"
sport = "Chess"
participants = { kind = "individual", side_a = 1, side_b = 5 }
"#;

    #[test]
    fn test_load_sample_schedule() {
        let dir = std::env::temp_dir().join(format!("sports-planner-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schedule.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.slots[1].sport, Sport::Chess);
        assert_eq!(config.slots[1].day, Day(1));
        assert_ne!(config.slots[0].id, config.slots[1].id);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_config(Path::new("/nonexistent/schedule.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_defaults_apply() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.days, 5);
        assert_eq!(config.timeline.grid, 15);
        assert_eq!(config.timeline.window().span(), 11 * 60);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let bad = SAMPLE.replace(r#"kind = "individual""#, r#"kind = "team""#);
        let config: Config = toml::from_str(&bad).unwrap();
        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::ShapeMismatch { sport: Sport::Chess, .. })
        ));
    }

    #[test]
    fn test_day_out_of_range_rejected() {
        let bad = SAMPLE.replace("days = 5", "days = 0");
        let config: Config = toml::from_str(&bad).unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let bad = SAMPLE.replace(r#"end = "18:00""#, r#"end = "16:00""#);
        let config: Config = toml::from_str(&bad).unwrap();
        assert!(validate(&config).is_err());
    }
}
