use std::collections::{BTreeMap, HashSet};

use axum::extract::State;
use axum::response::Html;

use super::views::render_page;
use super::AppState;
use crate::commands::describe_participants;
use crate::models::{Day, GameSlot};

pub(super) struct DayView {
    pub(super) day: Day,
    pub(super) grounds: Vec<GroundView>,
}

pub(super) struct GroundView {
    pub(super) ground: u32,
    pub(super) slots: Vec<SlotRow>,
}

pub(super) struct SlotRow {
    pub(super) id: String,
    pub(super) start: String,
    pub(super) end: String,
    pub(super) sport: String,
    pub(super) participants: String,
    pub(super) clash: bool,
}

pub(super) struct ConflictRow {
    pub(super) player: String,
    pub(super) day: Day,
    pub(super) slot_a: String,
    pub(super) slot_b: String,
}

pub(crate) async fn dashboard_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.session();
    let snapshot = session.snapshot();
    let roster = session.roster();

    let clashing: HashSet<_> = session
        .ground_clashes()
        .into_iter()
        .flat_map(|(a, b)| [a, b])
        .collect();

    let mut by_day: BTreeMap<Day, BTreeMap<u32, Vec<&GameSlot>>> = BTreeMap::new();
    for slot in snapshot.iter() {
        by_day
            .entry(slot.day)
            .or_default()
            .entry(slot.ground)
            .or_default()
            .push(slot);
    }

    let days: Vec<DayView> = by_day
        .into_iter()
        .map(|(day, grounds)| DayView {
            day,
            grounds: grounds
                .into_iter()
                .map(|(ground, mut slots)| {
                    slots.sort_by_key(|s| s.start);
                    GroundView {
                        ground,
                        slots: slots
                            .into_iter()
                            .map(|s| SlotRow {
                                id: s.id.to_string(),
                                start: s.start.to_string(),
                                end: s.end.to_string(),
                                sport: match s.match_type() {
                                    Some(t) => format!("{} ({})", s.sport, t),
                                    None => s.sport.to_string(),
                                },
                                participants: describe_participants(&s.participants, roster),
                                clash: clashing.contains(&s.id),
                            })
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect();

    let conflicts: Vec<ConflictRow> = session
        .conflicts()
        .into_iter()
        .map(|c| ConflictRow {
            player: roster.player_name(c.player_id),
            day: c.day,
            slot_a: c.slot_a.summary(),
            slot_b: c.slot_b.summary(),
        })
        .collect();

    let timeline = session.timeline();
    let window = format!("{} - {}", timeline.start, timeline.end);
    let html = render_page(&window, &days, &conflicts, session.can_undo());
    Html(html)
}
