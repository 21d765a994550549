use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::SlotTime;
use crate::conflicts::{compute_conflicts, Conflict};
use crate::error::{Result, ScheduleError};
use crate::models::{
    Config, Day, GameSlot, MatchType, Participants, PlayerId, ResourceKey, Roster, Side, SlotId,
    Sport, SportKind, TimelineConfig,
};
use crate::overlap::{ground_clashes, would_overlap_on};
use crate::placement::{find_append_span, find_first_fit, find_nearest_valid_start, validate_move};

/// The single owner of a planning session's slots and roster.
///
/// The slot collection is never edited in place: each mutation builds the next
/// collection and swaps it in, so a [`Session::snapshot`] taken earlier keeps
/// seeing a consistent schedule. A failed operation leaves the collection as
/// it was.
#[derive(Debug)]
pub struct Session {
    timeline: TimelineConfig,
    roster: Roster,
    slots: Arc<[GameSlot]>,
    last_removed: Option<(usize, GameSlot)>,
}

impl Session {
    pub fn new(timeline: TimelineConfig, roster: Roster, slots: Vec<GameSlot>) -> Self {
        Self {
            timeline,
            roster,
            slots: slots.into(),
            last_removed: None,
        }
    }

    pub fn from_config(config: Config) -> Self {
        let roster = Roster {
            teams: config.teams,
            players: config.players,
        };
        Self::new(config.timeline, roster, config.slots)
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn snapshot(&self) -> Arc<[GameSlot]> {
        Arc::clone(&self.slots)
    }

    pub fn slot(&self, id: SlotId) -> Result<&GameSlot> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::UnknownSlot(id))
    }

    pub fn can_undo(&self) -> bool {
        self.last_removed.is_some()
    }

    fn on_resource(&self, resource: ResourceKey) -> Vec<GameSlot> {
        self.slots
            .iter()
            .filter(|s| s.resource() == resource)
            .cloned()
            .collect()
    }

    fn commit(&mut self, next: Vec<GameSlot>) {
        self.slots = next.into();
    }

    /// Copy of the collection with slot `id` replaced by `edit`'s result.
    fn replaced<F>(&self, id: SlotId, edit: F) -> Result<Vec<GameSlot>>
    where
        F: FnOnce(&GameSlot) -> Result<GameSlot>,
    {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(ScheduleError::UnknownSlot(id))?;
        let updated = edit(&self.slots[index])?;
        let mut next = self.slots.to_vec();
        next[index] = updated;
        Ok(next)
    }

    fn push(&mut self, slot: GameSlot) -> SlotId {
        let id = slot.id;
        let mut next = self.slots.to_vec();
        next.push(slot);
        self.commit(next);
        id
    }

    /// Create a slot of the default length at the first free start of the
    /// ground's window.
    pub fn add_slot(&mut self, day: Day, ground: u32, sport: Sport) -> Result<SlotId> {
        let resource = ResourceKey { day, ground };
        let duration = self.timeline.default_duration;
        let start = find_first_fit(&self.on_resource(resource), self.timeline.window(), duration)
            .ok_or(ScheduleError::PlacementUnavailable { day, ground })?;

        let slot = new_slot(
            resource,
            SlotTime::from_minutes(start),
            SlotTime::from_minutes(start + duration),
            sport,
        );
        info!("Added {} slot {} on day {}: {}", sport, slot.id, day, slot.summary());
        Ok(self.push(slot))
    }

    /// Create an hour-long slot right after the last one on the ground.
    pub fn append_slot(&mut self, day: Day, ground: u32, sport: Sport) -> Result<SlotId> {
        let resource = ResourceKey { day, ground };
        let (start, end) = find_append_span(&self.on_resource(resource), self.timeline.window())
            .ok_or(ScheduleError::PlacementUnavailable { day, ground })?;

        let slot = new_slot(resource, start, end, sport);
        info!("Appended {} slot {} on day {}: {}", sport, slot.id, day, slot.summary());
        Ok(self.push(slot))
    }

    /// Drop a slot, remembering it for one [`Session::undo_remove`].
    pub fn remove_slot(&mut self, id: SlotId) -> Result<GameSlot> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(ScheduleError::UnknownSlot(id))?;
        let mut next = self.slots.to_vec();
        let removed = next.remove(index);
        self.commit(next);
        self.last_removed = Some((index, removed.clone()));
        info!("Removed slot {} ({})", id, removed.summary());
        Ok(removed)
    }

    /// Put the last removed slot back where it was. Fails without touching
    /// the history if it would now overlap something on its ground.
    pub fn undo_remove(&mut self) -> Result<SlotId> {
        let (index, slot) = self.last_removed.take().ok_or(ScheduleError::NothingToUndo)?;
        let (start, end) = slot.span();
        if would_overlap_on(slot.resource(), start, end, None, &self.slots) {
            warn!("Cannot restore slot {}: its place has been taken", slot.id);
            let id = slot.id;
            self.last_removed = Some((index, slot));
            return Err(ScheduleError::OverlapRejected { id });
        }

        let id = slot.id;
        let mut next = self.slots.to_vec();
        next.insert(index.min(next.len()), slot);
        self.commit(next);
        info!("Restored slot {}", id);
        Ok(id)
    }

    /// Move and/or resize a slot, optionally onto another ground of the same
    /// day. Start, end and ground change together or not at all.
    pub fn move_slot(
        &mut self,
        id: SlotId,
        start: SlotTime,
        end: SlotTime,
        ground: Option<u32>,
    ) -> Result<()> {
        let current = self.slot(id)?;
        let resource = ResourceKey {
            day: current.day,
            ground: ground.unwrap_or(current.ground),
        };
        let (window, grid) = (self.timeline.window(), self.timeline.grid);
        if let Err(e) = validate_move(id, start, end, resource, &self.slots, window, grid) {
            warn!("Rejected move of slot {} to {}-{}: {}", id, start, end, e);
            return Err(e);
        }

        let next = self.replaced(id, |slot| {
            Ok(GameSlot {
                start,
                end,
                ground: resource.ground,
                ..slot.clone()
            })
        })?;
        self.commit(next);
        info!("Moved slot {} to ground {} {}-{}", id, resource.ground, start, end);
        Ok(())
    }

    /// Change a slot's times on its own ground.
    pub fn resize_slot(&mut self, id: SlotId, start: SlotTime, end: SlotTime) -> Result<()> {
        self.move_slot(id, start, end, None)
    }

    /// Drop a slot as close to `desired` as its ground allows, keeping its
    /// length. Returns the start it landed on.
    pub fn relocate_slot(&mut self, id: SlotId, desired: SlotTime) -> Result<SlotTime> {
        let current = self.slot(id)?;
        let duration = current.duration();
        let (day, ground) = (current.day, current.ground);
        let start = find_nearest_valid_start(
            desired.minutes(),
            duration,
            id,
            &self.slots,
            self.timeline.window(),
            self.timeline.grid,
        )
        .ok_or(ScheduleError::PlacementUnavailable { day, ground })?;

        let start = SlotTime::from_minutes(start);
        let end = SlotTime::from_minutes(start.minutes() + duration);
        self.resize_slot(id, start, end)?;
        Ok(start)
    }

    /// Fill or clear one seat. `index` picks the partner seat in doubles.
    pub fn set_participant(
        &mut self,
        id: SlotId,
        side: Side,
        index: Option<usize>,
        value: Option<PlayerId>,
    ) -> Result<()> {
        let next = self.replaced(id, |slot| {
            let mut updated = slot.clone();
            let seat = updated
                .participants
                .seat_mut(side, index)
                .ok_or_else(|| ScheduleError::InvalidSeat {
                    side,
                    index,
                    shape: slot.participants.kind_name(),
                })?;
            *seat = value;
            Ok(updated)
        })?;
        self.commit(next);
        Ok(())
    }

    /// Switch a mixed-sport slot between singles and doubles. Seats are reset
    /// to the new shape, so earlier picks are lost.
    pub fn set_match_type(&mut self, id: SlotId, match_type: MatchType) -> Result<()> {
        let next = self.replaced(id, |slot| {
            if slot.sport.kind() != SportKind::Mixed {
                return Err(ScheduleError::NotMixed(slot.sport, match_type));
            }
            Ok(GameSlot {
                participants: Participants::empty_for_type(match_type),
                ..slot.clone()
            })
        })?;
        self.commit(next);
        info!("Slot {} is now {}", id, match_type);
        Ok(())
    }

    pub fn slots_by_sport(&self) -> BTreeMap<Sport, Vec<GameSlot>> {
        let mut by_sport: BTreeMap<Sport, Vec<GameSlot>> = BTreeMap::new();
        for slot in self.slots.iter() {
            by_sport.entry(slot.sport).or_default().push(slot.clone());
        }
        by_sport
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        compute_conflicts(
            &self.slots_by_sport(),
            &self.roster.teams,
            &self.roster.players,
        )
    }

    /// Pairs of slot ids that overlap on one ground.
    pub fn ground_clashes(&self) -> Vec<(SlotId, SlotId)> {
        ground_clashes(&self.slots)
            .into_iter()
            .map(|(a, b)| (a.id, b.id))
            .collect()
    }
}

fn new_slot(resource: ResourceKey, start: SlotTime, end: SlotTime, sport: Sport) -> GameSlot {
    GameSlot {
        id: Uuid::new_v4(),
        day: resource.day,
        ground: resource.ground,
        start,
        end,
        sport,
        participants: Participants::empty(sport.kind()),
    }
}
