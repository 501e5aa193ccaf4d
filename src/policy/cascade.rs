use std::collections::BTreeMap;

use crate::row::SeatRow;

use super::seat::SeatSelectionPolicy;

/// Walks rows and spills unmet ticket demand from one row into the next.
pub trait RowSelectionPolicy: Send + Sync {
    /// Allocate `demand` seats across `rows[start_row..]`, recording the
    /// claimed indices per row into `placed`. Returns the demand still
    /// unsatisfied once the rows are exhausted (0 on full success).
    fn allocate_across_rows(
        &self,
        rows: &mut [SeatRow],
        seat_policy: &dyn SeatSelectionPolicy,
        start_row: usize,
        demand: usize,
        placed: &mut BTreeMap<usize, Vec<usize>>,
    ) -> usize;
}

/// The only multi-row rule in the house: visit rows in increasing index
/// order, take what each row's centered allocation gives, carry the rest
/// forward. Serves both default requests (from row 0) and the overflow of a
/// specific-seat request (from the row after the designated one).
#[derive(Debug, Default, Clone, Copy)]
pub struct RowCascadePolicy;

impl RowSelectionPolicy for RowCascadePolicy {
    fn allocate_across_rows(
        &self,
        rows: &mut [SeatRow],
        seat_policy: &dyn SeatSelectionPolicy,
        start_row: usize,
        mut demand: usize,
        placed: &mut BTreeMap<usize, Vec<usize>>,
    ) -> usize {
        for (index, row) in rows.iter_mut().enumerate().skip(start_row) {
            if demand == 0 {
                break;
            }
            if row.empty_seats() == 0 {
                continue;
            }
            let claimed = row.reserve(seat_policy, demand);
            if !claimed.is_empty() {
                demand -= claimed.len();
                placed.entry(index).or_default().extend(claimed);
            }
        }
        demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CenterOutPolicy;

    fn auditorium(rows: usize, seats: usize) -> Vec<SeatRow> {
        (0..rows).map(|_| SeatRow::new(seats)).collect()
    }

    #[test]
    fn single_row_satisfies_small_demand() {
        let cascade = RowCascadePolicy;
        let seat_policy = CenterOutPolicy;
        let mut rows = auditorium(10, 10);
        let mut placed = BTreeMap::new();

        let remaining = cascade.allocate_across_rows(&mut rows, &seat_policy, 0, 10, &mut placed);
        assert_eq!(remaining, 0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[&0], (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn demand_spills_into_following_rows() {
        let cascade = RowCascadePolicy;
        let seat_policy = CenterOutPolicy;
        let mut rows = auditorium(10, 10);
        let mut placed = BTreeMap::new();

        cascade.allocate_across_rows(&mut rows, &seat_policy, 0, 10, &mut placed);
        placed.clear();

        let remaining = cascade.allocate_across_rows(&mut rows, &seat_policy, 0, 15, &mut placed);
        assert_eq!(remaining, 0);
        assert_eq!(placed[&1], (0..10).collect::<Vec<_>>());
        assert_eq!(placed[&2], vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn partial_rows_are_drained_before_moving_on() {
        let cascade = RowCascadePolicy;
        let seat_policy = CenterOutPolicy;
        let mut rows = auditorium(10, 10);
        let mut placed = BTreeMap::new();

        for demand in [10, 15] {
            cascade.allocate_across_rows(&mut rows, &seat_policy, 0, demand, &mut placed);
        }
        placed.clear();

        let remaining = cascade.allocate_across_rows(&mut rows, &seat_policy, 0, 8, &mut placed);
        assert_eq!(remaining, 0);
        assert_eq!(placed[&2], vec![7, 8, 9]);
        assert_eq!(placed[&3], vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn reports_unsatisfied_demand_when_rows_run_out() {
        let cascade = RowCascadePolicy;
        let seat_policy = CenterOutPolicy;
        let mut rows = auditorium(2, 4);
        let mut placed = BTreeMap::new();

        let remaining = cascade.allocate_across_rows(&mut rows, &seat_policy, 0, 11, &mut placed);
        assert_eq!(remaining, 3);
        assert_eq!(placed[&0], vec![0, 1, 2, 3]);
        assert_eq!(placed[&1], vec![0, 1, 2, 3]);
    }

    #[test]
    fn start_row_skips_earlier_rows_entirely() {
        let cascade = RowCascadePolicy;
        let seat_policy = CenterOutPolicy;
        let mut rows = auditorium(4, 10);
        let mut placed = BTreeMap::new();

        let remaining = cascade.allocate_across_rows(&mut rows, &seat_policy, 2, 12, &mut placed);
        assert_eq!(remaining, 0);
        assert!(!placed.contains_key(&0));
        assert!(!placed.contains_key(&1));
        assert_eq!(placed[&2], (0..10).collect::<Vec<_>>());
        assert_eq!(placed[&3], vec![4, 5]);
    }
}
