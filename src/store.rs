// =============================================================================
// STORE MODULE
// =============================================================================
// This module owns the in-memory booking ledger and the booking lifecycle
// operations (create / cancel / modify / lookup / current guests).
//
// LEARNING NOTES:
// - All state lives in one struct; handlers share it via Arc<RwLock<..>>
// - Every lifecycle operation runs under one lock guard, so it reads a
//   consistent snapshot of the ledger and commits atomically
// - "now" is passed in rather than read inside, which makes the date
//   preconditions deterministic under test
//
// CONSISTENCY MODEL:
// Room availability is always derived: free numbers = the catalog's full
// pool minus the numbers held by active (non-cancelled) bookings whose
// stay window overlaps the one in question. Cancellation therefore frees
// rooms implicitly, and a failed modification leaves the booking and the
// catalog untouched because nothing was mutated before the allocation
// succeeded.
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::allocation::{self, CommittedRooms, Shortfall};
use crate::error::AppError;
use crate::models::{
    Booking, BookingChanges, BookingQuery, BookingStatus, CreateBookingRequest,
    CurrentGuestsResponse, GuestSummary, Hotel, PaymentStatus, RoomSummary,
};

/// Shared handle to the store, cloned into every request handler.
pub type SharedStore = Arc<RwLock<BookingStore>>;

impl From<Shortfall> for AppError {
    fn from(s: Shortfall) -> Self {
        AppError::Capacity {
            accommodated: s.accommodated,
            requested: s.requested,
        }
    }
}

// -----------------------------------------------------------------------------
// THE STORE
// -----------------------------------------------------------------------------
/// Booking ledger plus the static hotel catalog it allocates against.
pub struct BookingStore {
    /// Static catalog, loaded once at startup
    hotels: Vec<Hotel>,

    /// Every booking ever made; cancelled ones stay (status flipped)
    bookings: Vec<Booking>,

    /// Next booking identifier; ids are never reused
    next_id: u64,
}

impl BookingStore {
    /// Create a store over the given catalog with an empty ledger.
    pub fn new(hotels: Vec<Hotel>) -> Self {
        Self {
            hotels,
            bookings: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap a store for sharing across request handlers.
    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Look up a hotel in the catalog.
    pub fn hotel(&self, id: &str) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == id)
    }

    /// True when the catalog was loaded (readiness probe).
    pub fn catalog_loaded(&self) -> bool {
        !self.hotels.is_empty()
    }

    /// Number of non-cancelled bookings (exported as a gauge).
    pub fn active_booking_count(&self) -> usize {
        self.bookings.iter().filter(|b| b.status.is_active()).count()
    }

    // -------------------------------------------------------------------------
    // OCCUPANCY DERIVATION
    // -------------------------------------------------------------------------
    /// Room numbers per type committed to active bookings at `hotel_id`
    /// whose stay window overlaps [check_in, check_out), excluding the
    /// booking identified by `exclude` (used so a modification does not
    /// conflict with its own current rooms).
    fn committed_rooms(
        &self,
        hotel_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude: Option<u64>,
    ) -> CommittedRooms {
        let mut committed = CommittedRooms::new();
        for booking in &self.bookings {
            if booking.hotel_id != hotel_id
                || !booking.status.is_active()
                || Some(booking.id) == exclude
            {
                continue;
            }
            if !allocation::windows_overlap(
                booking.check_in,
                booking.check_out,
                check_in,
                check_out,
            ) {
                continue;
            }
            for (room_type, number) in booking.rooms_by_type() {
                committed
                    .entry(room_type.to_string())
                    .or_default()
                    .insert(number);
            }
        }
        committed
    }

    // -------------------------------------------------------------------------
    // DATE PRECONDITIONS
    // -------------------------------------------------------------------------
    /// Reject stays that start in the past or end no later than they
    /// start. Check-in today is allowed.
    fn validate_window(
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if check_in < now.date_naive() {
            return Err(AppError::InvalidDates(
                "Check-in date must be in the future".to_string(),
            ));
        }
        if check_out <= check_in {
            return Err(AppError::InvalidDates(
                "Check-out date must be after check-in date".to_string(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // CREATE
    // =========================================================================
    /// Create a booking: validate the window, resolve the hotel, allocate
    /// rooms against current occupancy, then commit to the ledger.
    ///
    /// On any failure nothing is mutated; a capacity failure reports how
    /// many of the requested guests had room.
    pub fn create_booking(
        &mut self,
        request: &CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        Self::validate_window(request.check_in, request.check_out, now)?;

        let hotel = self
            .hotel(&request.hotel_id)
            .ok_or_else(|| AppError::NotFound("Hotel not found".to_string()))?;

        // Rooms held by overlapping active bookings are off the table
        let committed = self.committed_rooms(
            &request.hotel_id,
            request.check_in,
            request.check_out,
            None,
        );

        let allocated_rooms =
            allocation::allocate(&hotel.rooms, &committed, request.guest_count)
                .map_err(AppError::from)?;

        let nights = allocation::nights(request.check_in, request.check_out);
        let total_price = allocation::total_price(&allocated_rooms, nights);

        let booking = Booking {
            id: self.next_id,
            hotel_id: request.hotel_id.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guest_count: request.guest_count,
            allocated_rooms,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            guest: request.guest_details.clone(),
            total_price,
            created_at: now,
            updated_at: now,
        };

        // Commit: id consumed and record appended in one step
        self.next_id += 1;
        self.bookings.push(booking.clone());

        tracing::info!(
            booking_id = booking.id,
            hotel_id = %booking.hotel_id,
            guest_count = booking.guest_count,
            rooms = booking.allocated_rooms.len(),
            total_price = booking.total_price,
            "Booking created"
        );

        Ok(booking)
    }

    // =========================================================================
    // CANCEL
    // =========================================================================
    /// Cancel a booking and return the refund amount (the full price).
    ///
    /// Fails on: unknown id, email mismatch (authorization), already
    /// cancelled, or a stay that has already started. No catalog writes:
    /// the cancelled booking simply stops counting toward occupancy.
    pub fn cancel_booking(
        &mut self,
        booking_id: u64,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<f64, AppError> {
        let today = now.date_naive();
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.guest.email != email {
            return Err(AppError::Unauthorized);
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }
        if today >= booking.check_in {
            return Err(AppError::PastCheckIn(
                "Cannot cancel booking after check-in time".to_string(),
            ));
        }

        booking.status = BookingStatus::Cancelled;
        booking.payment_status = PaymentStatus::Refunded;
        booking.updated_at = now;

        tracing::info!(
            booking_id = booking.id,
            refund_amount = booking.total_price,
            "Booking cancelled"
        );

        Ok(booking.total_price)
    }

    // =========================================================================
    // MODIFY
    // =========================================================================
    /// Modify a booking's dates and/or guest count, re-running the
    /// allocation engine against the new window.
    ///
    /// Unspecified fields keep their current values. The operation is
    /// all-or-nothing: the booking is only written after the new
    /// allocation succeeded, so a capacity failure leaves the original
    /// record (and derived availability) exactly as it was. The booking's
    /// own current rooms are excluded from the occupancy snapshot, so
    /// re-booking the same window can reuse them.
    pub fn modify_booking(
        &mut self,
        booking_id: u64,
        email: &str,
        changes: &BookingChanges,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // Identity / status / timing preconditions (same as cancel)
        let (current_check_in, current_check_out, current_count, hotel_id) = {
            let booking = &self.bookings[index];
            if booking.guest.email != email {
                return Err(AppError::Unauthorized);
            }
            if booking.status == BookingStatus::Cancelled {
                return Err(AppError::AlreadyCancelled);
            }
            if now.date_naive() >= booking.check_in {
                return Err(AppError::PastCheckIn(
                    "Cannot modify booking after check-in time".to_string(),
                ));
            }
            (
                booking.check_in,
                booking.check_out,
                booking.guest_count,
                booking.hotel_id.clone(),
            )
        };

        // Effective stay window and guest count
        let new_check_in = changes.new_check_in.unwrap_or(current_check_in);
        let new_check_out = changes.new_check_out.unwrap_or(current_check_out);
        if changes.new_check_in.is_some() || changes.new_check_out.is_some() {
            Self::validate_window(new_check_in, new_check_out, now)?;
        }
        if let Some(count) = changes.guest_count {
            if !(1..=20).contains(&count) {
                return Err(AppError::BadRequest(
                    "Guest count must be between 1 and 20".to_string(),
                ));
            }
        }
        let guest_count = changes.guest_count.unwrap_or(current_count);

        let hotel = self
            .hotel(&hotel_id)
            .ok_or_else(|| AppError::NotFound("Associated hotel not found".to_string()))?;

        // Occupancy across ALL OTHER active bookings against the new
        // window; this booking's own rooms do not block it
        let committed =
            self.committed_rooms(&hotel_id, new_check_in, new_check_out, Some(booking_id));

        let allocated_rooms = allocation::allocate(&hotel.rooms, &committed, guest_count)
            .map_err(AppError::from)?;

        let nights = allocation::nights(new_check_in, new_check_out);
        let total_price = allocation::total_price(&allocated_rooms, nights);

        // Allocation succeeded: commit everything in one go
        let booking = &mut self.bookings[index];
        booking.check_in = new_check_in;
        booking.check_out = new_check_out;
        booking.guest_count = guest_count;
        booking.allocated_rooms = allocated_rooms;
        booking.total_price = total_price;
        booking.updated_at = now;

        tracing::info!(
            booking_id = booking.id,
            guest_count = booking.guest_count,
            total_price = booking.total_price,
            "Booking modified"
        );

        Ok(booking.clone())
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================
    /// Find a booking by id, or the most recent booking for an email.
    /// Read-only; returns None when nothing matches.
    pub fn find_booking(&self, query: &BookingQuery) -> Option<&Booking> {
        if let Some(id) = query.booking_id {
            self.bookings.iter().find(|b| b.id == id)
        } else if let Some(email) = query.email.as_deref() {
            self.bookings.iter().rev().find(|b| b.guest.email == email)
        } else {
            None
        }
    }

    /// Guests currently in-house at a hotel: active bookings whose stay
    /// window contains now, ascending by check-in date.
    ///
    /// An unresolvable hotel id degrades to the "Unknown Hotel" label
    /// with an empty guest list rather than an error.
    pub fn current_guests(
        &self,
        hotel_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> CurrentGuestsResponse {
        let today = now.date_naive();

        let hotel_name = hotel_id
            .and_then(|id| self.hotel(id))
            .map(|h| h.name.clone())
            .unwrap_or_else(|| "Unknown Hotel".to_string());

        let mut in_house: Vec<&Booking> = self
            .bookings
            .iter()
            .filter(|b| {
                Some(b.hotel_id.as_str()) == hotel_id
                    && matches!(
                        b.status,
                        BookingStatus::Confirmed | BookingStatus::CheckedIn
                    )
                    && b.check_in <= today
                    && b.check_out > today
            })
            .collect();
        in_house.sort_by_key(|b| b.check_in);

        CurrentGuestsResponse {
            hotel: hotel_name,
            current_guests: in_house
                .into_iter()
                .map(|b| GuestSummary {
                    booking_id: b.id,
                    guest_name: b.guest.guest_name.clone(),
                    email: b.guest.email.clone(),
                    contact: b.guest.contact.clone(),
                    check_in: b.check_in,
                    check_out: b.check_out,
                    status: b.status,
                    rooms: b
                        .allocated_rooms
                        .iter()
                        .map(|r| RoomSummary {
                            room_type: r.room_type.clone(),
                            room_number: r.room_number,
                            guests: r.guests,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
// Lifecycle tests pin "now" to a fixed instant so the dated scenarios
// are deterministic.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_hotels;
    use crate::models::GuestDetails;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn store() -> BookingStore {
        BookingStore::new(seed_hotels())
    }

    fn guest(name: &str, email: &str) -> GuestDetails {
        GuestDetails {
            guest_name: name.to_string(),
            email: email.to_string(),
            contact: "123456789".to_string(),
            special_requests: None,
        }
    }

    fn request(hotel_id: &str, check_in: &str, check_out: &str, count: u32) -> CreateBookingRequest {
        CreateBookingRequest {
            hotel_id: hotel_id.to_string(),
            check_in: date(check_in),
            check_out: date(check_out),
            guest_count: count,
            guest_details: guest("John Doe", "john@example.com"),
        }
    }

    // -------------------------------------------------------------------------
    // CREATE
    // -------------------------------------------------------------------------

    #[test]
    fn create_assigns_ids_and_commits_to_ledger() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();

        assert_eq!(booking.id, 1);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        // 1 Single for 4 nights at $100
        assert_eq!(booking.total_price, 400.0);
        assert_eq!(booking.allocated_rooms.len(), 1);
        assert_eq!(booking.allocated_rooms[0].room_type, "Single");

        let second = store
            .create_booking(&request("2", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_rejects_past_check_in() {
        let mut store = store();
        let err = store
            .create_booking(&request("1", "2025-02-01", "2025-02-05", 1), fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::InvalidDates(_)));
    }

    #[test]
    fn create_allows_check_in_today() {
        let mut store = store();
        assert!(store
            .create_booking(&request("1", "2025-03-01", "2025-03-03", 1), fixed_now())
            .is_ok());
    }

    #[test]
    fn create_rejects_inverted_window() {
        let mut store = store();
        let err = store
            .create_booking(&request("1", "2025-04-05", "2025-04-01", 1), fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::InvalidDates(_)));
        // Zero-night stays are rejected too
        let err = store
            .create_booking(&request("1", "2025-04-05", "2025-04-05", 1), fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::InvalidDates(_)));
    }

    #[test]
    fn create_rejects_unknown_hotel() {
        let mut store = store();
        let err = store
            .create_booking(
                &request("invalidHotel123", "2025-04-01", "2025-04-05", 1),
                fixed_now(),
            )
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::NotFound(_)));
    }

    #[test]
    fn capacity_failure_reports_partial_count_and_mutates_nothing() {
        let mut store = store();
        // Hotel "1" holds at most 19 guests
        let err = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 100), fixed_now())
            .unwrap_err();
        match err.kind() {
            AppError::Capacity {
                accommodated,
                requested,
            } => {
                assert_eq!(*accommodated, 19);
                assert_eq!(*requested, 100);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        // No ledger entry, and the next id was not consumed
        assert!(store.bookings.is_empty());
        let ok = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        assert_eq!(ok.id, 1);
    }

    #[test]
    fn overlapping_bookings_never_share_room_numbers() {
        let mut store = store();
        // Fill all 5 Singles across two overlapping bookings, then two more
        // guests must land in Doubles
        store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 3), fixed_now())
            .unwrap();
        store
            .create_booking(&request("1", "2025-04-03", "2025-04-07", 2), fixed_now())
            .unwrap();
        let third = store
            .create_booking(&request("1", "2025-04-02", "2025-04-04", 2), fixed_now())
            .unwrap();
        assert!(third.allocated_rooms.iter().all(|r| r.room_type == "Double"));

        // The ledger-wide invariant: no duplicate (type, number) among
        // overlapping active bookings
        let mut seen = HashSet::new();
        for booking in &store.bookings {
            for (room_type, number) in booking.rooms_by_type() {
                assert!(
                    seen.insert((room_type.to_string(), number)),
                    "room {room_type} #{number} double-booked"
                );
            }
        }
    }

    #[test]
    fn back_to_back_stays_reuse_rooms() {
        let mut store = store();
        // 5 guests occupy all Singles for the first window
        store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 5), fixed_now())
            .unwrap();
        // A stay starting exactly at the first one's check-out gets the
        // same Singles back (half-open windows)
        let next = store
            .create_booking(&request("1", "2025-04-05", "2025-04-08", 5), fixed_now())
            .unwrap();
        assert!(next.allocated_rooms.iter().all(|r| r.room_type == "Single"));
    }

    // -------------------------------------------------------------------------
    // CANCEL
    // -------------------------------------------------------------------------

    #[test]
    fn cancel_refunds_and_flips_status() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();

        let later = fixed_now() + chrono::Duration::hours(1);
        let refund = store
            .cancel_booking(booking.id, "john@example.com", later)
            .unwrap();
        assert_eq!(refund, booking.total_price);

        let stored = store
            .find_booking(&BookingQuery {
                booking_id: Some(booking.id),
                email: None,
            })
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.payment_status, PaymentStatus::Refunded);
        assert_eq!(stored.updated_at, later);
    }

    #[test]
    fn cancel_requires_matching_email() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        let err = store
            .cancel_booking(booking.id, "wrong@example.com", fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::Unauthorized));
    }

    #[test]
    fn cancel_twice_fails_with_already_cancelled() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        store
            .cancel_booking(booking.id, "john@example.com", fixed_now())
            .unwrap();
        let err = store
            .cancel_booking(booking.id, "john@example.com", fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::AlreadyCancelled));
    }

    #[test]
    fn cancel_after_check_in_fails() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        // Call arrives on the check-in day
        let on_check_in = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        let err = store
            .cancel_booking(booking.id, "john@example.com", on_check_in)
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::PastCheckIn(_)));
    }

    #[test]
    fn cancel_unknown_booking_fails() {
        let mut store = store();
        let err = store
            .cancel_booking(999, "john@example.com", fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::NotFound(_)));
    }

    #[test]
    fn cancelled_rooms_become_available_again() {
        let mut store = store();
        // Occupy every room in hotel "1"
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 19), fixed_now())
            .unwrap();
        // Nothing left for an overlapping request
        let err = store
            .create_booking(&request("1", "2025-04-02", "2025-04-04", 1), fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::Capacity { .. }));

        store
            .cancel_booking(booking.id, "john@example.com", fixed_now())
            .unwrap();

        // The cancelled booking no longer blocks the window
        assert!(store
            .create_booking(&request("1", "2025-04-02", "2025-04-04", 19), fixed_now())
            .is_ok());
    }

    // -------------------------------------------------------------------------
    // MODIFY
    // -------------------------------------------------------------------------

    #[test]
    fn modify_commits_new_window_count_and_price() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();

        let later = fixed_now() + chrono::Duration::hours(2);
        let changes = BookingChanges {
            new_check_in: Some(date("2025-05-01")),
            new_check_out: Some(date("2025-05-03")),
            guest_count: Some(4),
        };
        let modified = store
            .modify_booking(booking.id, "john@example.com", &changes, later)
            .unwrap();

        assert_eq!(modified.check_in, date("2025-05-01"));
        assert_eq!(modified.check_out, date("2025-05-03"));
        assert_eq!(modified.guest_count, 4);
        assert_eq!(modified.updated_at, later);

        // Price matches a fresh computation over the new allocation and
        // the new night count (4 Singles x $100 x 2 nights)
        let nights = allocation::nights(modified.check_in, modified.check_out);
        assert_eq!(
            modified.total_price,
            allocation::total_price(&modified.allocated_rooms, nights)
        );
        assert_eq!(modified.total_price, 800.0);
    }

    #[test]
    fn modify_defaults_unspecified_fields_to_current_values() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();

        let changes = BookingChanges {
            guest_count: Some(3),
            ..Default::default()
        };
        let modified = store
            .modify_booking(booking.id, "john@example.com", &changes, fixed_now())
            .unwrap();
        assert_eq!(modified.check_in, booking.check_in);
        assert_eq!(modified.check_out, booking.check_out);
        assert_eq!(modified.guest_count, 3);
    }

    #[test]
    fn modify_does_not_conflict_with_its_own_rooms() {
        let mut store = store();
        // Occupy the entire hotel
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 19), fixed_now())
            .unwrap();
        // Re-booking the same window must reuse its own rooms
        let changes = BookingChanges {
            guest_count: Some(19),
            ..Default::default()
        };
        let modified = store
            .modify_booking(booking.id, "john@example.com", &changes, fixed_now())
            .unwrap();
        assert_eq!(modified.guest_count, 19);
    }

    #[test]
    fn failed_modify_leaves_booking_fully_unchanged() {
        let mut store = store();
        let original = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();
        // A competitor takes every room in a different window
        store
            .create_booking(&CreateBookingRequest {
                guest_details: guest("Jane Doe", "jane@example.com"),
                ..request("1", "2025-06-01", "2025-06-05", 19)
            }, fixed_now())
            .unwrap();

        // Moving into the full window cannot be satisfied
        let changes = BookingChanges {
            new_check_in: Some(date("2025-06-02")),
            new_check_out: Some(date("2025-06-04")),
            guest_count: None,
        };
        let err = store
            .modify_booking(original.id, "john@example.com", &changes, fixed_now())
            .unwrap_err();
        match err.kind() {
            AppError::Capacity { accommodated, .. } => assert_eq!(*accommodated, 0),
            other => panic!("unexpected kind: {other:?}"),
        }

        // All-or-nothing: the record is byte-for-byte what it was
        let stored = store
            .find_booking(&BookingQuery {
                booking_id: Some(original.id),
                email: None,
            })
            .unwrap();
        assert_eq!(*stored, original);
    }

    #[test]
    fn modify_rejects_guest_count_out_of_range() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();
        for count in [0, 21] {
            let changes = BookingChanges {
                guest_count: Some(count),
                ..Default::default()
            };
            let err = store
                .modify_booking(booking.id, "john@example.com", &changes, fixed_now())
                .unwrap_err();
            assert!(matches!(err.kind(), AppError::BadRequest(_)));
        }
    }

    #[test]
    fn modify_rejects_past_or_inverted_new_dates() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();
        let changes = BookingChanges {
            new_check_in: Some(date("2023-04-10")),
            new_check_out: Some(date("2023-04-15")),
            guest_count: None,
        };
        let err = store
            .modify_booking(booking.id, "john@example.com", &changes, fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::InvalidDates(_)));
    }

    #[test]
    fn modify_shares_cancel_preconditions() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 2), fixed_now())
            .unwrap();
        let changes = BookingChanges::default();

        let err = store
            .modify_booking(booking.id, "wrong@example.com", &changes, fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::Unauthorized));

        let on_check_in = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        let err = store
            .modify_booking(booking.id, "john@example.com", &changes, on_check_in)
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::PastCheckIn(_)));

        store
            .cancel_booking(booking.id, "john@example.com", fixed_now())
            .unwrap();
        let err = store
            .modify_booking(booking.id, "john@example.com", &changes, fixed_now())
            .unwrap_err();
        assert!(matches!(err.kind(), AppError::AlreadyCancelled));
    }

    // -------------------------------------------------------------------------
    // LOOKUPS
    // -------------------------------------------------------------------------

    #[test]
    fn find_booking_by_id_and_by_email() {
        let mut store = store();
        let first = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        let second = store
            .create_booking(&request("2", "2025-05-01", "2025-05-05", 1), fixed_now())
            .unwrap();

        let by_id = store
            .find_booking(&BookingQuery {
                booking_id: Some(first.id),
                email: None,
            })
            .unwrap();
        assert_eq!(by_id.id, first.id);

        // Email lookup returns the most recent booking
        let by_email = store
            .find_booking(&BookingQuery {
                booking_id: None,
                email: Some("john@example.com".to_string()),
            })
            .unwrap();
        assert_eq!(by_email.id, second.id);

        assert!(store
            .find_booking(&BookingQuery {
                booking_id: Some(999),
                email: None,
            })
            .is_none());
        assert!(store.find_booking(&BookingQuery::default()).is_none());
    }

    #[test]
    fn current_guests_lists_in_house_bookings_sorted_by_check_in() {
        let mut store = store();
        // In-house during the query instant (2025-03-10)
        store
            .create_booking(&request("1", "2025-03-05", "2025-03-15", 1), fixed_now())
            .unwrap();
        store
            .create_booking(&CreateBookingRequest {
                guest_details: guest("Jane Doe", "jane@example.com"),
                ..request("1", "2025-03-08", "2025-03-12", 2)
            }, fixed_now())
            .unwrap();
        // Future stay, not in-house
        store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        // Checked out exactly today, not in-house (half-open window)
        store
            .create_booking(&request("1", "2025-03-05", "2025-03-10", 1), fixed_now())
            .unwrap();

        let query_time = Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap();
        let listing = store.current_guests(Some("1"), query_time);

        assert_eq!(listing.hotel, "Grand Palace Hotel");
        assert_eq!(listing.current_guests.len(), 2);
        assert_eq!(listing.current_guests[0].check_in, date("2025-03-05"));
        assert_eq!(listing.current_guests[1].check_in, date("2025-03-08"));
    }

    #[test]
    fn current_guests_excludes_cancelled_bookings() {
        let mut store = store();
        let booking = store
            .create_booking(&request("1", "2025-03-05", "2025-03-15", 1), fixed_now())
            .unwrap();
        store
            .cancel_booking(booking.id, "john@example.com", fixed_now())
            .unwrap();

        let query_time = Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap();
        let listing = store.current_guests(Some("1"), query_time);
        assert!(listing.current_guests.is_empty());
    }

    #[test]
    fn current_guests_degrades_to_unknown_hotel_label() {
        let store = store();
        let listing = store.current_guests(Some("nope"), fixed_now());
        assert_eq!(listing.hotel, "Unknown Hotel");
        assert!(listing.current_guests.is_empty());

        let listing = store.current_guests(None, fixed_now());
        assert_eq!(listing.hotel, "Unknown Hotel");
        assert!(listing.current_guests.is_empty());
    }

    #[test]
    fn ids_are_never_reused_after_cancellation() {
        let mut store = store();
        let first = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        store
            .cancel_booking(first.id, "john@example.com", fixed_now())
            .unwrap();
        let second = store
            .create_booking(&request("1", "2025-04-01", "2025-04-05", 1), fixed_now())
            .unwrap();
        assert_eq!(second.id, first.id + 1);
        assert_eq!(store.active_booking_count(), 1);
    }
}
