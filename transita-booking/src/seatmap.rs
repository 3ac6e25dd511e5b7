//! Seat-map derivation.
//!
//! Both functions are pure: the seat array is rebuilt from
//! `(total_seats, booked set)` on every trip load and after every successful
//! booking, never mutated in place.

use std::collections::HashSet;

use transita_domain::Seat;

pub const DEFAULT_COLUMNS_PER_ROW: usize = 4;

/// Row-major grid of seat numbers `1..=total_seats`; the last row may be
/// short.
pub fn build_grid(total_seats: u32, columns_per_row: usize) -> Vec<Vec<u32>> {
    let columns = columns_per_row.max(1);
    let numbers: Vec<u32> = (1..=total_seats).collect();
    numbers.chunks(columns).map(<[u32]>::to_vec).collect()
}

/// Seat `i` (1-indexed) is booked iff its stringified number is in the booked
/// set. Output preserves numeric order.
pub fn compute_seats(total_seats: u32, booked: &HashSet<String>) -> Vec<Seat> {
    (1..=total_seats)
        .map(|n| {
            let seat_number = n.to_string();
            let is_booked = booked.contains(&seat_number);
            Seat {
                seat_number,
                is_booked,
                booking_id: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booked(seats: &[&str]) -> HashSet<String> {
        seats.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_seats_length_and_membership() {
        for total in [0u32, 1, 7, 40] {
            let set = booked(&["2", "5", "40"]);
            let seats = compute_seats(total, &set);
            assert_eq!(seats.len(), total as usize);
            for (idx, seat) in seats.iter().enumerate() {
                let number = (idx + 1).to_string();
                assert_eq!(seat.seat_number, number);
                assert_eq!(seat.is_booked, set.contains(&number));
            }
        }
    }

    #[test]
    fn test_compute_seats_is_idempotent() {
        let set = booked(&["3"]);
        assert_eq!(compute_seats(10, &set), compute_seats(10, &set));
    }

    #[test]
    fn test_grid_partitions_into_rows_of_four() {
        let grid = build_grid(10, 4);
        assert_eq!(grid, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]);

        let total: usize = grid.iter().map(Vec::len).sum();
        assert_eq!(total, 10);
        for row in &grid[..grid.len() - 1] {
            assert_eq!(row.len(), 4);
        }
    }

    #[test]
    fn test_grid_exact_multiple_has_no_short_row() {
        let grid = build_grid(8, 4);
        assert!(grid.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_grid_empty_trip() {
        assert!(build_grid(0, 4).is_empty());
    }
}
