use crate::row::SeatState;

/// Result of one allocation pass over a row's seat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Claimed seat indices, ascending.
    pub claimed: Vec<usize>,
    /// Cursor for the next allocation; `None` when no empty seat remains.
    pub next_cursor: Option<usize>,
}

/// Picks exact seat indices within a single row.
///
/// Implementations write `Held` markers straight into the row's buffer and
/// report the adjusted cursor; `SeatRow` owns the buffer and applies the
/// returned cursor.
pub trait SeatSelectionPolicy: Send + Sync {
    /// Allocate up to `demand` seats anchored on the center of the empty run
    /// at `cursor`.
    fn allocate_centered(
        &self,
        seats: &mut [SeatState],
        cursor: usize,
        demand: usize,
    ) -> Allocation;

    /// Allocate up to `demand` empty seats starting at `from` and moving
    /// right. No wraparound, no leftward fill.
    fn allocate_from_seat(&self, seats: &mut [SeatState], from: usize, demand: usize)
    -> Allocation;

    /// Re-validate a cursor position: keep it if it points at an empty seat,
    /// otherwise scan left for the nearest empty one. `None` means the row
    /// is full.
    fn adjust_cursor(&self, seats: &[SeatState], position: usize) -> Option<usize>;

    /// Choose a fresh cursor for a row whose occupancy changed outside the
    /// normal allocation path (seats released by an amendment).
    fn rebase_cursor(&self, seats: &[SeatState]) -> Option<usize>;
}

/// The house seating rule: center the party on the empty run at the cursor,
/// spill to the right, and fall back to the block left of the cursor once
/// the right side is exhausted.
///
/// On a fresh 10-seat row the rule yields `reserve(4) -> [3,4,5,6]`,
/// `reserve(2) -> [7,8]`, `reserve(1) -> [9]`, `reserve(1) -> [2]`,
/// `reserve(2) -> [0,1]`, at which point the row reports full.
#[derive(Debug, Default, Clone, Copy)]
pub struct CenterOutPolicy;

impl CenterOutPolicy {
    /// Length of the contiguous empty run starting at `start`.
    fn empty_run_from(seats: &[SeatState], start: usize) -> usize {
        seats[start..].iter().take_while(|s| s.is_empty()).count()
    }

    /// Length of the contiguous empty run ending at `end` (inclusive).
    fn empty_run_ending_at(seats: &[SeatState], end: usize) -> usize {
        seats[..=end].iter().rev().take_while(|s| s.is_empty()).count()
    }

    fn claim(seats: &mut [SeatState], start: usize, take: usize) -> Vec<usize> {
        let claimed: Vec<usize> = (start..start + take).collect();
        for &seat in &claimed {
            seats[seat] = SeatState::Held;
        }
        claimed
    }
}

impl SeatSelectionPolicy for CenterOutPolicy {
    fn allocate_centered(
        &self,
        seats: &mut [SeatState],
        cursor: usize,
        demand: usize,
    ) -> Allocation {
        if demand == 0 {
            return Allocation {
                claimed: Vec::new(),
                next_cursor: self.adjust_cursor(seats, cursor),
            };
        }

        let size = Self::empty_run_from(seats, cursor);
        let (start, take) = if size > 1 {
            let take = size.min(demand);
            (cursor + (size - take) / 2, take)
        } else {
            // The run right of the cursor is a single seat (the row's last
            // gap on that side). Anchor against the empty block ending at
            // the cursor instead, keeping the party right-aligned.
            let run = Self::empty_run_ending_at(seats, cursor);
            let take = run.min(demand);
            (cursor + 1 - take, take)
        };

        let claimed = Self::claim(seats, start, take);
        Allocation {
            next_cursor: self.adjust_cursor(seats, start + take),
            claimed,
        }
    }

    fn allocate_from_seat(
        &self,
        seats: &mut [SeatState],
        from: usize,
        demand: usize,
    ) -> Allocation {
        let mut claimed = Vec::new();
        let mut i = from;
        while i < seats.len() && claimed.len() < demand {
            if seats[i].is_empty() {
                seats[i] = SeatState::Held;
                claimed.push(i);
            }
            i += 1;
        }
        // Park the cursor past any occupied block so the next centered
        // request resumes at the rightward frontier.
        while i < seats.len() && !seats[i].is_empty() {
            i += 1;
        }
        Allocation {
            next_cursor: self.adjust_cursor(seats, i),
            claimed,
        }
    }

    fn adjust_cursor(&self, seats: &[SeatState], position: usize) -> Option<usize> {
        if position < seats.len() && seats[position].is_empty() {
            return Some(position);
        }
        (0..position.min(seats.len()))
            .rev()
            .find(|&i| seats[i].is_empty())
    }

    fn rebase_cursor(&self, seats: &[SeatState]) -> Option<usize> {
        // Longest empty run wins; leftmost on ties.
        let mut best: Option<(usize, usize)> = None;
        let mut i = 0;
        while i < seats.len() {
            if seats[i].is_empty() {
                let run = Self::empty_run_from(seats, i);
                if best.is_none_or(|(_, len)| run > len) {
                    best = Some((i, run));
                }
                i += run;
            } else {
                i += 1;
            }
        }
        best.map(|(start, _)| start)
    }
}
