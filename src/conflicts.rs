use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use crate::models::{Day, GameSlot, Participants, Player, PlayerId, Sport, Team, TeamId};
use crate::overlap::slots_overlap;

/// One player required at two overlapping slots on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub player_id: PlayerId,
    pub day: Day,
    pub slot_a: GameSlot,
    pub slot_b: GameSlot,
}

fn team_members(id: TeamId, teams: &[Team]) -> &[PlayerId] {
    match teams.iter().find(|t| t.id == id) {
        Some(team) => &team.players,
        None => {
            warn!("Unknown team {} in a scheduled slot, ignoring it", id);
            &[]
        }
    }
}

fn known_player(id: PlayerId, players: &[Player]) -> bool {
    let known = players.iter().any(|p| p.id == id);
    if !known {
        warn!("Unknown player {} in a scheduled slot, ignoring them", id);
    }
    known
}

/// Every player who has to be present for `slot`: members of both teams, or
/// the players seated directly. Empty seats and unknown ids add nobody.
pub fn implicated_players(
    slot: &GameSlot,
    sport: Sport,
    teams: &[Team],
    players: &[Player],
) -> BTreeSet<PlayerId> {
    if !slot.participants.fits(sport.kind()) {
        warn!(
            "Slot {} lists {} participants for {}, skipping it",
            slot.id,
            slot.participants.kind_name(),
            sport
        );
        return BTreeSet::new();
    }

    match &slot.participants {
        Participants::Team { side_a, side_b } => [side_a, side_b]
            .into_iter()
            .flatten()
            .flat_map(|&team| team_members(team, teams).iter().copied())
            .filter(|&id| known_player(id, players))
            .collect(),
        Participants::Individual { side_a, side_b } | Participants::Singles { side_a, side_b } => {
            [side_a, side_b]
                .into_iter()
                .flatten()
                .copied()
                .filter(|&id| known_player(id, players))
                .collect()
        }
        Participants::Doubles { side_a, side_b } => side_a
            .iter()
            .chain(side_b)
            .flatten()
            .copied()
            .filter(|&id| known_player(id, players))
            .collect(),
    }
}

/// Scan the whole schedule, every sport at once, for players booked into two
/// overlapping slots on one day. Each affected player gets a record of their
/// own, ordered by day, then player, then schedule order.
pub fn compute_conflicts(
    slots_by_sport: &BTreeMap<Sport, Vec<GameSlot>>,
    teams: &[Team],
    players: &[Player],
) -> Vec<Conflict> {
    let mut by_day: BTreeMap<Day, BTreeMap<PlayerId, Vec<&GameSlot>>> = BTreeMap::new();
    for (&sport, slots) in slots_by_sport {
        for slot in slots {
            let involved = implicated_players(slot, sport, teams, players);
            let day = by_day.entry(slot.day).or_default();
            for player in involved {
                day.entry(player).or_default().push(slot);
            }
        }
    }

    let mut conflicts = Vec::new();
    for (day, per_player) in &by_day {
        for (&player_id, slots) in per_player {
            for (i, a) in slots.iter().enumerate() {
                for b in &slots[i + 1..] {
                    if slots_overlap(a, b) {
                        conflicts.push(Conflict {
                            player_id,
                            day: *day,
                            slot_a: (*a).clone(),
                            slot_b: (*b).clone(),
                        });
                    }
                }
            }
        }
    }
    conflicts
}
