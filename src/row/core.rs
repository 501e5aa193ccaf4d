use crate::policy::SeatSelectionPolicy;

/// Occupancy of a single seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    /// Not claimed by any reservation.
    Empty,
    /// Claimed by an unconfirmed reservation.
    Held,
    /// Permanently assigned; immutable for the rest of the process.
    Confirmed,
}

impl SeatState {
    pub fn is_empty(self) -> bool {
        matches!(self, SeatState::Empty)
    }

    pub fn is_confirmed(self) -> bool {
        matches!(self, SeatState::Confirmed)
    }
}

/// How `available_seats` treats seats held by unconfirmed reservations.
///
/// `CountHeld` reports a seat as available until it is confirmed, so
/// amendments never move the availability figure. `ExcludeHeld` reports only
/// empty seats, making the capacity precheck exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldAccounting {
    #[default]
    CountHeld,
    ExcludeHeld,
}

/// One row of seats: a flat, exclusively-owned occupancy buffer plus the
/// allocation cursor. The cursor is the next center-anchored allocation
/// point; `None` means the row has no empty seat left.
///
/// Invariant: whenever the cursor is `Some(i)`, `seats[i]` is empty.
#[derive(Debug, Clone)]
pub struct SeatRow {
    seats: Vec<SeatState>,
    cursor: Option<usize>,
}

impl SeatRow {
    pub fn new(seats_per_row: usize) -> Self {
        Self {
            seats: vec![SeatState::Empty; seats_per_row],
            cursor: if seats_per_row > 0 { Some(0) } else { None },
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn state(&self, seat: usize) -> SeatState {
        self.seats[seat]
    }

    pub fn states(&self) -> &[SeatState] {
        &self.seats
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of seats no reservation has touched.
    pub fn empty_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_empty()).count()
    }

    /// Seats this row can still sell under the given accounting rule.
    pub fn available_seats(&self, accounting: HoldAccounting) -> usize {
        match accounting {
            HoldAccounting::CountHeld => {
                self.seats.iter().filter(|s| !s.is_confirmed()).count()
            }
            HoldAccounting::ExcludeHeld => self.empty_seats(),
        }
    }

    /// Centered allocation of up to `tickets` seats. Returns the claimed
    /// indices in ascending order; fewer than requested when the row cannot
    /// satisfy the demand, empty when the row is already full. Never errors.
    pub fn reserve(&mut self, policy: &dyn SeatSelectionPolicy, tickets: usize) -> Vec<usize> {
        let Some(cursor) = self.cursor else {
            return Vec::new();
        };
        let allocation = policy.allocate_centered(&mut self.seats, cursor, tickets);
        self.cursor = allocation.next_cursor;
        allocation.claimed
    }

    /// Rightward fill starting at `seat`: claims only empty seats, never
    /// wraps and never fills leftward. Returns whatever was actually claimed.
    pub fn reserve_from(
        &mut self,
        policy: &dyn SeatSelectionPolicy,
        seat: usize,
        tickets: usize,
    ) -> Vec<usize> {
        if self.cursor.is_none() {
            return Vec::new();
        }
        let allocation = policy.allocate_from_seat(&mut self.seats, seat, tickets);
        self.cursor = allocation.next_cursor;
        allocation.claimed
    }

    /// Flip held seats to confirmed and re-validate the cursor.
    pub fn confirm(&mut self, policy: &dyn SeatSelectionPolicy, seats: &[usize]) {
        for &seat in seats {
            self.seats[seat] = SeatState::Confirmed;
        }
        if let Some(cursor) = self.cursor {
            self.cursor = policy.adjust_cursor(&self.seats, cursor);
        }
    }

    /// Return held seats to the empty pool (amendment support). The cursor
    /// is rebased to the start of the widest empty gap.
    pub fn release(&mut self, policy: &dyn SeatSelectionPolicy, seats: &[usize]) {
        for &seat in seats {
            if self.seats[seat] == SeatState::Held {
                self.seats[seat] = SeatState::Empty;
            }
        }
        self.cursor = policy.rebase_cursor(&self.seats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CenterOutPolicy;

    fn policy() -> CenterOutPolicy {
        CenterOutPolicy
    }

    #[test]
    fn reserve_whole_row() {
        let mut row = SeatRow::new(10);
        let reserved = row.reserve(&policy(), 10);
        assert_eq!(reserved, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(row.empty_seats(), 0);
        assert_eq!(row.cursor(), None);

        assert!(row.reserve(&policy(), 1).is_empty());
        assert_eq!(row.cursor(), None);
    }

    #[test]
    fn reserve_sections_walks_center_out() {
        let mut row = SeatRow::new(10);

        assert_eq!(row.reserve(&policy(), 4), vec![3, 4, 5, 6]);
        assert_eq!(row.empty_seats(), 6);
        assert_eq!(row.cursor(), Some(7));

        assert_eq!(row.reserve(&policy(), 2), vec![7, 8]);
        assert_eq!(row.cursor(), Some(9));

        assert_eq!(row.reserve(&policy(), 1), vec![9]);
        assert_eq!(row.cursor(), Some(2));

        assert_eq!(row.reserve(&policy(), 1), vec![2]);
        assert_eq!(row.cursor(), Some(1));

        assert_eq!(row.reserve(&policy(), 2), vec![0, 1]);
        assert_eq!(row.empty_seats(), 0);
        assert_eq!(row.cursor(), None);

        assert!(row.reserve(&policy(), 1).is_empty());
    }

    #[test]
    fn reserve_bigger_than_row_claims_everything() {
        let mut row = SeatRow::new(10);
        let reserved = row.reserve(&policy(), 11);
        assert_eq!(reserved, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(row.cursor(), None);
    }

    #[test]
    fn reserve_from_seat_fills_rightward() {
        let mut row = SeatRow::new(10);

        assert_eq!(row.reserve_from(&policy(), 2, 4), vec![2, 3, 4, 5]);
        assert_eq!(row.empty_seats(), 6);
        assert_eq!(row.cursor(), Some(6));

        assert_eq!(row.reserve_from(&policy(), 4, 3), vec![6, 7, 8]);
        assert_eq!(row.cursor(), Some(9));

        assert_eq!(row.reserve_from(&policy(), 1, 1), vec![1]);
        assert_eq!(row.cursor(), Some(9));

        // Only seats 0 and 9 remain; rightward fill skips the held middle.
        assert_eq!(row.reserve_from(&policy(), 0, 3), vec![0, 9]);
        assert_eq!(row.empty_seats(), 0);
        assert_eq!(row.cursor(), None);
    }

    #[test]
    fn confirm_keeps_cursor_on_empty_seat() {
        let mut row = SeatRow::new(10);
        let held = row.reserve(&policy(), 4);
        row.confirm(&policy(), &held);
        assert_eq!(row.state(3), SeatState::Confirmed);
        assert_eq!(row.state(6), SeatState::Confirmed);
        assert_eq!(row.cursor(), Some(7));
    }

    #[test]
    fn release_reopens_a_full_row() {
        let mut row = SeatRow::new(10);
        let held = row.reserve(&policy(), 10);
        assert_eq!(row.cursor(), None);

        row.release(&policy(), &held[4..8]);
        assert_eq!(row.empty_seats(), 4);
        assert_eq!(row.cursor(), Some(4));
    }

    #[test]
    fn release_recenters_a_partially_booked_row() {
        let mut row = SeatRow::new(10);
        let held = row.reserve(&policy(), 4);
        assert_eq!(held, vec![3, 4, 5, 6]);

        row.release(&policy(), &held);
        assert_eq!(row.cursor(), Some(0));
        assert_eq!(row.reserve(&policy(), 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn release_ignores_confirmed_seats() {
        let mut row = SeatRow::new(10);
        let held = row.reserve(&policy(), 4);
        row.confirm(&policy(), &held);
        row.release(&policy(), &held);
        assert_eq!(row.empty_seats(), 6);
        assert_eq!(row.state(4), SeatState::Confirmed);
    }

    #[test]
    fn accounting_rules_disagree_only_on_holds() {
        let mut row = SeatRow::new(10);
        let held = row.reserve(&policy(), 4);
        assert_eq!(row.available_seats(HoldAccounting::CountHeld), 10);
        assert_eq!(row.available_seats(HoldAccounting::ExcludeHeld), 6);

        row.confirm(&policy(), &held);
        assert_eq!(row.available_seats(HoldAccounting::CountHeld), 6);
        assert_eq!(row.available_seats(HoldAccounting::ExcludeHeld), 6);
    }
}
