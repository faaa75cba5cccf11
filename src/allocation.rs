// =============================================================================
// ALLOCATION MODULE
// =============================================================================
// This module is the room allocation engine: given a hotel's room types
// and the room numbers already committed to other overlapping bookings,
// it decides which physical rooms satisfy a requested guest count.
//
// Everything here is a pure function over its inputs. Availability is
// always derived from the booking ledger at call time (full pool minus
// committed numbers), so there is no mutable availability state to keep
// consistent and nothing to roll back when a modification fails.
//
// ALLOCATION POLICY:
// 1. Per room type, free numbers = full pool - committed numbers
// 2. Drop room types with no free numbers
// 3. Sort candidates ascending by max guests per room (smallest first)
// 4. Greedily take one room number at a time, placing
//    min(remaining, max_guests) guests in it
// 5. Stop as soon as every guest has a room
// 6. If guests remain after exhausting all candidates, fail and report
//    how many guests COULD have been placed; never return a partial
//    allocation
//
// Smallest-capacity-first fills cheap small rooms before consuming
// large-room capacity on small parties. The sort is stable, so room
// types with equal capacity keep their catalog order and the result is
// fully deterministic.
// =============================================================================

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{RoomAssignment, RoomType};

/// Room numbers already held by other bookings, keyed by room type label.
pub type CommittedRooms = HashMap<String, HashSet<u32>>;

/// Returned when the engine cannot place every requested guest.
///
/// Carries the diagnostic partial count; the caller converts this into a
/// capacity error without having mutated any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// How many of the requested guests had room
    pub accommodated: u32,

    /// How many guests were requested
    pub requested: u32,
}

// -----------------------------------------------------------------------------
// STAY WINDOW ARITHMETIC
// -----------------------------------------------------------------------------

/// Half-open overlap test for two stay windows.
///
/// A booking ending exactly when another begins does NOT overlap: the
/// departing guest's room is free again on their check-out day.
pub fn windows_overlap(
    a_check_in: NaiveDate,
    a_check_out: NaiveDate,
    b_check_in: NaiveDate,
    b_check_out: NaiveDate,
) -> bool {
    a_check_in < b_check_out && a_check_out > b_check_in
}

/// Number of nights in a stay window.
///
/// Callers validate `check_out > check_in` first, so this is simply the
/// whole-day difference.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    (check_out - check_in).num_days().max(0) as u32
}

/// Total price of an allocation over a stay of `nights` nights.
pub fn total_price(rooms: &[RoomAssignment], nights: u32) -> f64 {
    rooms
        .iter()
        .map(|r| r.price_per_night * f64::from(nights))
        .sum()
}

// -----------------------------------------------------------------------------
// THE ENGINE
// -----------------------------------------------------------------------------

/// Compute a room allocation for `guest_count` guests.
///
/// `committed` holds the room numbers per type that overlapping bookings
/// by OTHER guests already occupy; those numbers are off the table.
///
/// # Returns
/// * `Ok(assignments)` - summed capacity covers every guest
/// * `Err(Shortfall)` - not enough free rooms; nothing was allocated
pub fn allocate(
    room_types: &[RoomType],
    committed: &CommittedRooms,
    guest_count: u32,
) -> Result<Vec<RoomAssignment>, Shortfall> {
    // Step 1 + 2: derive free numbers per type, keeping pool order, and
    // drop types with nothing free
    let mut candidates: Vec<(&RoomType, Vec<u32>)> = room_types
        .iter()
        .map(|rt| {
            let taken = committed.get(&rt.room_type);
            let free: Vec<u32> = rt
                .room_numbers
                .iter()
                .copied()
                .filter(|n| taken.map_or(true, |t| !t.contains(n)))
                .collect();
            (rt, free)
        })
        .filter(|(_, free)| !free.is_empty())
        .collect();

    // Step 3: smallest rooms first; stable sort preserves catalog order
    // among equal capacities
    candidates.sort_by_key(|(rt, _)| rt.max_guests);

    // Step 4 + 5: greedy consumption
    let mut assignments = Vec::new();
    let mut remaining = guest_count;

    for (rt, free) in candidates {
        for room_number in free {
            if remaining == 0 {
                break;
            }
            let guests = remaining.min(rt.max_guests);
            assignments.push(RoomAssignment {
                room_type: rt.room_type.clone(),
                room_number,
                guests,
                price_per_night: rt.price_per_night,
            });
            remaining -= guests;
        }
        if remaining == 0 {
            break;
        }
    }

    // Step 6: all-or-nothing
    if remaining > 0 {
        Err(Shortfall {
            accommodated: guest_count - remaining,
            requested: guest_count,
        })
    } else {
        Ok(assignments)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn room_type(label: &str, max_guests: u32, price: f64, numbers: &[u32]) -> RoomType {
        RoomType {
            room_type: label.to_string(),
            max_guests,
            total_rooms: numbers.len() as u32,
            price_per_night: price,
            amenities: vec![],
            room_numbers: numbers.to_vec(),
        }
    }

    /// Room types matching hotel "1" in the catalog:
    /// Single x5 @ $100 (max 1), Double x3 @ $150 (max 2), Suite x2 @ $250 (max 4)
    fn grand_palace_rooms() -> Vec<RoomType> {
        vec![
            room_type("Single", 1, 100.0, &[1, 2, 3, 4, 5]),
            room_type("Double", 2, 150.0, &[1, 2, 3]),
            room_type("Suite", 4, 250.0, &[1, 2]),
        ]
    }

    fn committed(entries: &[(&str, &[u32])]) -> CommittedRooms {
        entries
            .iter()
            .map(|(label, nums)| (label.to_string(), nums.iter().copied().collect()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // OVERLAP
    // -------------------------------------------------------------------------

    #[test]
    fn overlap_is_half_open() {
        // Back-to-back stays share no night
        assert!(!windows_overlap(
            date("2025-04-01"),
            date("2025-04-05"),
            date("2025-04-05"),
            date("2025-04-08"),
        ));
        // One shared night overlaps
        assert!(windows_overlap(
            date("2025-04-01"),
            date("2025-04-06"),
            date("2025-04-05"),
            date("2025-04-08"),
        ));
        // Containment overlaps
        assert!(windows_overlap(
            date("2025-04-01"),
            date("2025-04-10"),
            date("2025-04-03"),
            date("2025-04-04"),
        ));
    }

    #[test]
    fn nights_is_whole_day_difference() {
        assert_eq!(nights(date("2025-04-01"), date("2025-04-05")), 4);
        assert_eq!(nights(date("2025-04-01"), date("2025-04-02")), 1);
    }

    // -------------------------------------------------------------------------
    // GREEDY POLICY
    // -------------------------------------------------------------------------

    #[test]
    fn prefers_smallest_room_type_first() {
        // 3 guests with every pool free: three Singles (1 guest each),
        // never a Double, because Singles sort first
        let rooms = grand_palace_rooms();
        let allocation = allocate(&rooms, &CommittedRooms::new(), 3).unwrap();

        assert_eq!(allocation.len(), 3);
        assert!(allocation.iter().all(|r| r.room_type == "Single"));
        assert!(allocation.iter().all(|r| r.guests == 1));
        assert_eq!(
            allocation.iter().map(|r| r.room_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn spills_into_larger_types_when_small_pool_exhausted() {
        // 7 guests: five Singles (5 guests) then one Double (2 guests)
        let rooms = grand_palace_rooms();
        let allocation = allocate(&rooms, &CommittedRooms::new(), 7).unwrap();

        assert_eq!(allocation.len(), 6);
        assert_eq!(
            allocation.iter().filter(|r| r.room_type == "Single").count(),
            5
        );
        let double = allocation.iter().find(|r| r.room_type == "Double").unwrap();
        assert_eq!(double.guests, 2);
    }

    #[test]
    fn committed_numbers_are_skipped() {
        // Singles 1-4 taken: one Single left (number 5), then Doubles
        let rooms = grand_palace_rooms();
        let taken = committed(&[("Single", &[1, 2, 3, 4])]);
        let allocation = allocate(&rooms, &taken, 4).unwrap();

        assert_eq!(allocation[0].room_type, "Single");
        assert_eq!(allocation[0].room_number, 5);
        // Remaining 3 guests go into Doubles (2 + 1)
        assert_eq!(allocation[1].room_type, "Double");
        assert_eq!(allocation[1].guests, 2);
        assert_eq!(allocation[2].room_type, "Double");
        assert_eq!(allocation[2].guests, 1);
    }

    #[test]
    fn fully_committed_type_is_not_a_candidate() {
        let rooms = grand_palace_rooms();
        let taken = committed(&[("Single", &[1, 2, 3, 4, 5])]);
        let allocation = allocate(&rooms, &taken, 2).unwrap();
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation[0].room_type, "Double");
    }

    #[test]
    fn guests_per_room_never_exceed_capacity() {
        let rooms = grand_palace_rooms();
        for count in 1..=19 {
            let allocation = allocate(&rooms, &CommittedRooms::new(), count).unwrap();
            let total: u32 = allocation.iter().map(|r| r.guests).sum();
            assert!(total >= count, "allocation must cover every guest");
            for a in &allocation {
                let rt = rooms.iter().find(|r| r.room_type == a.room_type).unwrap();
                assert!(a.guests <= rt.max_guests);
            }
        }
    }

    #[test]
    fn allocation_never_reuses_a_room_number_within_a_type() {
        let rooms = grand_palace_rooms();
        let allocation = allocate(&rooms, &CommittedRooms::new(), 19).unwrap();
        let mut seen = std::collections::HashSet::new();
        for a in &allocation {
            assert!(seen.insert((a.room_type.clone(), a.room_number)));
        }
    }

    // -------------------------------------------------------------------------
    // SHORTFALL
    // -------------------------------------------------------------------------

    #[test]
    fn shortfall_reports_partial_accommodation() {
        // Hotel "1" holds at most 5*1 + 3*2 + 2*4 = 19 guests
        let rooms = grand_palace_rooms();
        let err = allocate(&rooms, &CommittedRooms::new(), 100).unwrap_err();
        assert_eq!(err.requested, 100);
        assert_eq!(err.accommodated, 19);
    }

    #[test]
    fn shortfall_when_everything_is_committed() {
        let rooms = grand_palace_rooms();
        let taken = committed(&[
            ("Single", &[1, 2, 3, 4, 5]),
            ("Double", &[1, 2, 3]),
            ("Suite", &[1, 2]),
        ]);
        let err = allocate(&rooms, &taken, 1).unwrap_err();
        assert_eq!(err.accommodated, 0);
        assert_eq!(err.requested, 1);
    }

    // -------------------------------------------------------------------------
    // PRICING
    // -------------------------------------------------------------------------

    #[test]
    fn price_is_rate_times_nights_summed_over_rooms() {
        // 4 guests in Singles only for 4 nights: 4 rooms x $100 x 4 = $1600
        let rooms = vec![room_type("Single", 1, 100.0, &[1, 2, 3, 4, 5])];
        let allocation = allocate(&rooms, &CommittedRooms::new(), 4).unwrap();
        assert_eq!(allocation.len(), 4);

        let n = nights(date("2025-04-01"), date("2025-04-05"));
        assert_eq!(total_price(&allocation, n), 1600.0);
    }

    #[test]
    fn price_covers_mixed_room_types() {
        let rooms = grand_palace_rooms();
        // 7 guests: 5 Singles + 1 Double = 5*100 + 150 = $650 per night
        let allocation = allocate(&rooms, &CommittedRooms::new(), 7).unwrap();
        assert_eq!(total_price(&allocation, 2), 1300.0);
    }
}
