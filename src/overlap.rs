use crate::models::{GameSlot, ResourceKey, SlotId};

/// Half-open overlap of `[a_start, a_end)` and `[b_start, b_end)`.
/// Touching endpoints do not overlap.
pub fn overlaps(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn slots_overlap(a: &GameSlot, b: &GameSlot) -> bool {
    let (a_start, a_end) = a.span();
    let (b_start, b_end) = b.span();
    overlaps(a_start, a_end, b_start, b_end)
}

/// Whether `[start, end)` would collide with another slot on the resource of
/// the slot being moved. An unknown `exclude_id` never collides.
pub fn would_overlap(start: u32, end: u32, exclude_id: SlotId, slots: &[GameSlot]) -> bool {
    match slots.iter().find(|s| s.id == exclude_id) {
        Some(current) => would_overlap_on(current.resource(), start, end, Some(exclude_id), slots),
        None => false,
    }
}

/// Same gate with an explicit resource, for moves across grounds and for
/// slots that do not exist yet.
pub fn would_overlap_on(
    resource: ResourceKey,
    start: u32,
    end: u32,
    exclude: Option<SlotId>,
    slots: &[GameSlot],
) -> bool {
    slots
        .iter()
        .filter(|s| Some(s.id) != exclude && s.resource() == resource)
        .any(|s| {
            let (s_start, s_end) = s.span();
            overlaps(start, end, s_start, s_end)
        })
}

/// Every pair of slots sharing a ground on the same day whose times overlap.
pub fn ground_clashes(slots: &[GameSlot]) -> Vec<(&GameSlot, &GameSlot)> {
    let mut clashes = Vec::new();
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a.resource() == b.resource() && slots_overlap(a, b) {
                clashes.push((a, b));
            }
        }
    }
    clashes
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::SlotTime;
    use crate::models::{Day, Participants, Sport};
    use uuid::Uuid;

    pub(crate) fn slot(day: u8, ground: u32, start: &str, end: &str, sport: Sport) -> GameSlot {
        GameSlot {
            id: Uuid::new_v4(),
            day: Day(day),
            ground,
            start: SlotTime::parse(start).unwrap(),
            end: SlotTime::parse(end).unwrap(),
            sport,
            participants: Participants::empty(sport.kind()),
        }
    }

    #[test]
    fn test_overlaps_half_open() {
        assert!(!overlaps(60, 120, 120, 180));
        assert!(overlaps(60, 121, 120, 180));
        assert!(overlaps(60, 180, 90, 100));
        assert!(!overlaps(200, 260, 60, 120));
    }

    #[test]
    fn test_overlaps_symmetric() {
        let points = [0, 30, 60, 90, 120, 150];
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    for &d in &points {
                        assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_would_overlap_rejects_move_into_neighbour() {
        let a = slot(1, 1, "17:00", "18:00", Sport::Football);
        let b = slot(1, 1, "18:00", "19:00", Sport::Football);
        let slots = vec![a, b.clone()];

        assert!(would_overlap(17 * 60 + 30, 18 * 60 + 30, b.id, &slots));
        assert!(!would_overlap(18 * 60, 19 * 60 + 30, b.id, &slots));
        // The slot never collides with its own old position
        assert!(!would_overlap(18 * 60 + 15, 19 * 60 + 15, b.id, &slots));
    }

    #[test]
    fn test_would_overlap_ignores_other_resources() {
        let other_ground = slot(1, 2, "17:00", "18:00", Sport::Chess);
        let other_day = slot(2, 1, "17:00", "18:00", Sport::Chess);
        let moving = slot(1, 1, "19:00", "20:00", Sport::Chess);
        let slots = vec![other_ground, other_day, moving.clone()];

        assert!(!would_overlap(17 * 60, 18 * 60, moving.id, &slots));
        assert!(!would_overlap(17 * 60, 18 * 60, Uuid::new_v4(), &slots));
        let target = ResourceKey { day: Day(1), ground: 2 };
        assert!(would_overlap_on(target, 17 * 60, 18 * 60, Some(moving.id), &slots));
    }

    #[test]
    fn test_ground_clashes() {
        let a = slot(1, 1, "17:00", "18:00", Sport::Football);
        let b = slot(1, 1, "17:30", "18:30", Sport::Basketball);
        let c = slot(1, 2, "17:30", "18:30", Sport::Basketball);
        let d = slot(1, 1, "18:30", "19:00", Sport::Volleyball);
        let slots = vec![a.clone(), b.clone(), c, d];

        let clashes = ground_clashes(&slots);
        assert_eq!(clashes.len(), 1);
        assert_eq!((clashes[0].0.id, clashes[0].1.id), (a.id, b.id));
    }
}
