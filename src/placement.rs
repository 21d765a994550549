use std::iter;

use tracing::debug;

use crate::clock::{minutes_to_time, snap, SlotTime};
use crate::error::{Result, ScheduleError};
use crate::models::{GameSlot, ResourceKey, SlotId};
use crate::overlap::{overlaps, would_overlap_on};

/// The bounded stretch of a day slots may be placed in, `[start, end)` in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn span(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn fits(self, start: u32, duration: u32) -> bool {
        start >= self.start && start.saturating_add(duration) <= self.end
    }
}

/// First candidate start whose `[start, start + duration)` lies inside the
/// window and clears every busy interval. All placement strategies are this
/// search fed with a different candidate order.
fn first_free<I>(candidates: I, duration: u32, window: Window, busy: &[(u32, u32)]) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    candidates.into_iter().find(|&start| {
        window.fits(start, duration)
            && !busy
                .iter()
                .any(|&(s, e)| overlaps(start, start.saturating_add(duration), s, e))
    })
}

fn sorted_spans<'a>(slots: impl IntoIterator<Item = &'a GameSlot>) -> Vec<(u32, u32)> {
    let mut spans: Vec<(u32, u32)> = slots.into_iter().map(GameSlot::span).collect();
    spans.sort_unstable();
    spans
}

/// Earliest free start for a new slot of `duration` minutes, scanning forward
/// from the window start. `existing` holds the slots of one resource.
pub fn find_first_fit(existing: &[GameSlot], window: Window, duration: u32) -> Option<u32> {
    let busy = sorted_spans(existing);
    let candidates = iter::once(window.start).chain(busy.iter().map(|&(_, end)| end));
    first_free(candidates, duration, window, &busy)
}

/// Closest grid-aligned start to `desired` at which the slot `exclude_id`
/// fits on its own resource, probing later offsets before earlier ones.
pub fn find_nearest_valid_start(
    desired: u32,
    duration: u32,
    exclude_id: SlotId,
    slots: &[GameSlot],
    window: Window,
    grid: u32,
) -> Option<u32> {
    let resource = slots.iter().find(|s| s.id == exclude_id)?.resource();
    let busy = sorted_spans(
        slots
            .iter()
            .filter(|s| s.id != exclude_id && s.resource() == resource),
    );

    let base = snap(desired, grid);
    let steps = if grid == 0 { 0 } else { window.span() / grid };
    let candidates = iter::once(base).chain((1..=steps).flat_map(move |k| {
        let offset = k * grid;
        [base.checked_add(offset), base.checked_sub(offset)]
            .into_iter()
            .flatten()
    }));

    let found = first_free(candidates, duration, window, &busy);
    debug!(
        "Nearest start to {} for {} ({} min): {:?}",
        minutes_to_time(desired),
        exclude_id,
        duration,
        found.map(minutes_to_time)
    );
    found
}

/// One hour directly after the latest slot of the resource, or at the window
/// start when the resource is empty.
pub fn find_append_span(existing: &[GameSlot], window: Window) -> Option<(SlotTime, SlotTime)> {
    let start = existing
        .iter()
        .map(|s| s.end.minutes())
        .max()
        .unwrap_or(window.start)
        .max(window.start);
    let start = SlotTime::from_minutes(start);
    let end = start.plus_hour();
    let busy = sorted_spans(existing);
    first_free([start.minutes()], end.minutes() - start.minutes(), window, &busy)
        .map(|_| (start, end))
}

/// Gate for a drag, resize or ground change of slot `id`. The new span must
/// stay inside `window` and last at least one `grid` step.
pub fn validate_move(
    id: SlotId,
    start: SlotTime,
    end: SlotTime,
    resource: ResourceKey,
    slots: &[GameSlot],
    window: Window,
    grid: u32,
) -> Result<()> {
    if start >= end {
        return Err(ScheduleError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let length = end.minutes() - start.minutes();
    if length < grid {
        return Err(ScheduleError::TooShort { length, minimum: grid });
    }
    if !window.fits(start.minutes(), length) {
        return Err(ScheduleError::OutsideTimeline {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if !slots.iter().any(|s| s.id == id) {
        return Err(ScheduleError::UnknownSlot(id));
    }
    if would_overlap_on(resource, start.minutes(), end.minutes(), Some(id), slots) {
        return Err(ScheduleError::OverlapRejected { id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::time_to_minutes;
    use crate::models::{Day, Sport};
    use crate::overlap::tests::slot;

    const EVENING: Window = Window::new(17 * 60, 28 * 60);

    fn at(label: &str) -> u32 {
        time_to_minutes(label).unwrap()
    }

    #[test]
    fn test_first_fit_empty_ground_uses_window_start() {
        assert_eq!(find_first_fit(&[], EVENING, 60), Some(at("17:00")));
    }

    #[test]
    fn test_first_fit_after_existing_slot() {
        let existing = vec![slot(1, 1, "17:00", "18:00", Sport::Football)];
        assert_eq!(find_first_fit(&existing, EVENING, 60), Some(at("18:00")));
    }

    #[test]
    fn test_first_fit_uses_gap_between_slots() {
        // Deliberately unsorted
        let existing = vec![
            slot(1, 1, "19:00", "20:00", Sport::Football),
            slot(1, 1, "17:00", "18:00", Sport::Football),
        ];
        assert_eq!(find_first_fit(&existing, EVENING, 60), Some(at("18:00")));
        assert_eq!(find_first_fit(&existing, EVENING, 90), Some(at("20:00")));
    }

    #[test]
    fn test_first_fit_exhausted_window() {
        let existing: Vec<GameSlot> = (17..28)
            .map(|h| {
                slot(
                    1,
                    1,
                    &minutes_to_time(h * 60),
                    &minutes_to_time((h + 1) * 60),
                    Sport::Chess,
                )
            })
            .collect();
        assert_eq!(find_first_fit(&existing, EVENING, 60), None);
    }

    #[test]
    fn test_first_fit_never_crosses_window_end() {
        let existing = vec![
            slot(1, 1, "17:00", "27:30", Sport::Chess),
            slot(1, 1, "29:00", "30:00", Sport::Chess),
        ];
        assert_eq!(find_first_fit(&existing, EVENING, 60), None);
        assert_eq!(find_first_fit(&existing, EVENING, 30), Some(at("27:30")));
    }

    #[test]
    fn test_nearest_valid_start_keeps_free_position() {
        let moving = slot(1, 1, "17:00", "18:00", Sport::Football);
        let slots = vec![moving.clone()];
        let found = find_nearest_valid_start(at("20:07"), 60, moving.id, &slots, EVENING, 15);
        assert_eq!(found, Some(at("20:00")));
    }

    #[test]
    fn test_nearest_valid_start_probes_later_then_earlier() {
        let blocker = slot(1, 1, "18:00", "19:00", Sport::Football);
        let moving = slot(1, 1, "21:00", "22:00", Sport::Football);
        let slots = vec![blocker, moving.clone()];

        // 18:30 is blocked; +15 (18:45) and -15 (18:15) too, until 19:00 fits
        let found = find_nearest_valid_start(at("18:30"), 60, moving.id, &slots, EVENING, 15);
        assert_eq!(found, Some(at("19:00")));

        // Near the window end only earlier offsets fit
        let found = find_nearest_valid_start(at("27:45"), 60, moving.id, &slots, EVENING, 15);
        assert_eq!(found, Some(at("27:00")));
    }

    #[test]
    fn test_nearest_valid_start_none_when_full() {
        let blocker = slot(1, 1, "17:00", "28:00", Sport::Chess);
        let moving = slot(1, 1, "17:00", "18:00", Sport::Chess);
        let slots = vec![blocker, moving.clone()];
        assert_eq!(
            find_nearest_valid_start(at("20:00"), 60, moving.id, &slots, EVENING, 15),
            None
        );
        assert_eq!(
            find_nearest_valid_start(at("20:00"), 60, uuid::Uuid::new_v4(), &slots, EVENING, 15),
            None
        );
    }

    #[test]
    fn test_append_after_last_slot() {
        assert_eq!(
            find_append_span(&[], EVENING),
            Some((SlotTime::from_minutes(at("17:00")), SlotTime::from_minutes(at("18:00"))))
        );
        let existing = vec![
            slot(1, 1, "17:00", "18:00", Sport::Chess),
            slot(1, 1, "19:30", "20:15", Sport::Chess),
        ];
        assert_eq!(
            find_append_span(&existing, EVENING),
            Some((SlotTime::from_minutes(at("20:15")), SlotTime::from_minutes(at("21:15"))))
        );
        let late = vec![slot(1, 1, "26:30", "27:30", Sport::Chess)];
        assert_eq!(find_append_span(&late, EVENING), None);
    }

    #[test]
    fn test_validate_move() {
        let a = slot(1, 1, "17:00", "18:00", Sport::Football);
        let b = slot(1, 1, "18:00", "19:00", Sport::Football);
        let slots = vec![a, b.clone()];
        let t = |label: &str| SlotTime::parse(label).unwrap();
        let ground_1 = b.resource();
        let ground_2 = ResourceKey { day: Day(1), ground: 2 };

        assert_eq!(
            validate_move(b.id, t("17:30"), t("18:30"), ground_1, &slots, EVENING, 15),
            Err(ScheduleError::OverlapRejected { id: b.id })
        );
        assert_eq!(
            validate_move(b.id, t("17:30"), t("18:30"), ground_2, &slots, EVENING, 15),
            Ok(())
        );
        assert_eq!(
            validate_move(b.id, t("18:00"), t("20:00"), ground_1, &slots, EVENING, 15),
            Ok(())
        );
        assert!(matches!(
            validate_move(b.id, t("19:00"), t("19:00"), ground_1, &slots, EVENING, 15),
            Err(ScheduleError::InvalidRange { .. })
        ));
        let ghost = uuid::Uuid::new_v4();
        assert_eq!(
            validate_move(ghost, t("20:00"), t("21:00"), ground_1, &slots, EVENING, 15),
            Err(ScheduleError::UnknownSlot(ghost))
        );
    }

    #[test]
    fn test_validate_move_keeps_span_in_bounds() {
        let a = slot(1, 1, "17:00", "18:00", Sport::Chess);
        let slots = vec![a.clone()];
        let t = |label: &str| SlotTime::parse(label).unwrap();
        let here = a.resource();

        assert_eq!(
            validate_move(a.id, t("19:00"), t("19:01"), here, &slots, EVENING, 15),
            Err(ScheduleError::TooShort { length: 1, minimum: 15 })
        );
        assert_eq!(
            validate_move(a.id, t("19:00"), t("19:15"), here, &slots, EVENING, 15),
            Ok(())
        );
        assert!(matches!(
            validate_move(a.id, t("03:00"), t("04:00"), here, &slots, EVENING, 15),
            Err(ScheduleError::OutsideTimeline { .. })
        ));
        assert!(matches!(
            validate_move(a.id, t("27:30"), t("28:30"), here, &slots, EVENING, 15),
            Err(ScheduleError::OutsideTimeline { .. })
        ));
        assert_eq!(
            validate_move(a.id, t("27:00"), t("28:00"), here, &slots, EVENING, 15),
            Ok(())
        );
    }

    #[test]
    fn test_nearest_valid_start_far_past_window() {
        let moving = slot(1, 1, "17:00", "18:00", Sport::Chess);
        let slots = vec![moving.clone()];
        assert_eq!(
            find_nearest_valid_start(u32::MAX - 5, 60, moving.id, &slots, EVENING, 15),
            None
        );
        assert_eq!(
            find_nearest_valid_start(at("47:45"), 60, moving.id, &slots, EVENING, 15),
            None
        );
    }
}
