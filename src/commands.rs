use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::clock::minutes_to_time;
use crate::config;
use crate::models::{Day, GameSlot, Participants, ResourceKey, Roster};
use crate::placement::find_first_fit;
use crate::session::Session;

fn load_session(config_path: &Path) -> Result<Session> {
    let cfg = config::load_config(config_path)?;
    info!(
        "Loaded {} slots, {} teams and {} players from {}",
        cfg.slots.len(),
        cfg.teams.len(),
        cfg.players.len(),
        config_path.display()
    );
    Ok(Session::from_config(cfg))
}

/// Human-readable seats, resolving ids against the roster.
pub fn describe_participants(participants: &Participants, roster: &Roster) -> String {
    let team = |id: &Option<u32>| match id {
        Some(id) => roster
            .team(*id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("team #{id}")),
        None => "?".to_string(),
    };
    let player = |id: &Option<u32>| match id {
        Some(id) => roster.player_name(*id),
        None => "?".to_string(),
    };

    match participants {
        Participants::Team { side_a, side_b } => format!("{} vs {}", team(side_a), team(side_b)),
        Participants::Individual { side_a, side_b } | Participants::Singles { side_a, side_b } => {
            format!("{} vs {}", player(side_a), player(side_b))
        }
        Participants::Doubles { side_a, side_b } => format!(
            "{} & {} vs {} & {}",
            player(&side_a[0]),
            player(&side_a[1]),
            player(&side_b[0]),
            player(&side_b[1])
        ),
    }
}

fn print_slot(slot: &GameSlot, roster: &Roster) {
    let kind = match slot.match_type() {
        Some(t) => format!("{} ({})", slot.sport, t),
        None => slot.sport.to_string(),
    };
    println!(
        "    {} - {}  {:<22} {}",
        slot.start,
        slot.end,
        kind,
        describe_participants(&slot.participants, roster)
    );
}

pub fn run_slots(config_path: &Path, day: Option<u8>) -> Result<()> {
    let session = load_session(config_path)?;
    let snapshot = session.snapshot();

    let mut by_resource: BTreeMap<ResourceKey, Vec<&GameSlot>> = BTreeMap::new();
    for slot in snapshot.iter().filter(|s| day.map_or(true, |d| s.day == Day(d))) {
        by_resource.entry(slot.resource()).or_default().push(slot);
    }

    if by_resource.is_empty() {
        println!("No slots scheduled.");
        return Ok(());
    }

    let mut current_day = None;
    for (resource, mut slots) in by_resource {
        if current_day != Some(resource.day) {
            println!("Day {}:", resource.day);
            current_day = Some(resource.day);
        }
        println!("  Ground {}:", resource.ground);
        slots.sort_by_key(|s| s.start);
        for slot in slots {
            print_slot(slot, session.roster());
        }
    }
    Ok(())
}

pub fn run_check(config_path: &Path, strict: bool) -> Result<()> {
    let session = load_session(config_path)?;
    let roster = session.roster();

    let clashes = session.ground_clashes();
    if clashes.is_empty() {
        println!("No overlapping slots on any ground.");
    } else {
        println!("Overlapping slots on the same ground:\n");
        for (a, b) in &clashes {
            let a = session.slot(*a)?;
            let b = session.slot(*b)?;
            println!("  Day {}: {}", a.day, a.summary());
            println!("         {}", b.summary());
        }
    }

    let conflicts = session.conflicts();
    if conflicts.is_empty() {
        println!("No conflicts found.");
    } else {
        println!("\nSchedule conflicts:\n");
        for c in &conflicts {
            println!(
                "  Player {} has overlapping games on Day {}:",
                roster.player_name(c.player_id),
                c.day
            );
            println!("    - {}", c.slot_a.summary());
            println!("    - {}", c.slot_b.summary());
        }
    }

    if strict && (!clashes.is_empty() || !conflicts.is_empty()) {
        bail!(
            "{} ground clash(es) and {} player conflict(s) found",
            clashes.len(),
            conflicts.len()
        );
    }
    Ok(())
}

pub fn run_place(config_path: &Path, day: u8, ground: u32, duration: Option<u32>) -> Result<()> {
    let session = load_session(config_path)?;
    let timeline = session.timeline();
    let duration = duration.unwrap_or(timeline.default_duration);
    let resource = ResourceKey {
        day: Day(day),
        ground,
    };
    let existing: Vec<GameSlot> = session
        .snapshot()
        .iter()
        .filter(|s| s.resource() == resource)
        .cloned()
        .collect();

    match find_first_fit(&existing, timeline.window(), duration) {
        Some(start) => println!(
            "Next free slot on day {} ground {}: {} - {}",
            day,
            ground,
            minutes_to_time(start),
            minutes_to_time(start + duration)
        ),
        None => {
            warn!(
                "No {}-minute gap on day {} ground {} between {} and {}",
                duration, day, ground, timeline.start, timeline.end
            );
            bail!("No room for a {duration}-minute slot on day {day}, ground {ground}");
        }
    }
    Ok(())
}
