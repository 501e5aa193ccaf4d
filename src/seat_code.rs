//! Seat-code parsing for the console boundary.
//!
//! A seat code is one letter (the row, case-insensitive) followed by exactly
//! two digits (the 1-based column): `C04` addresses row index 2, column
//! index 3. Parsing is pure; range checks are part of the contract, so a
//! well-shaped code naming a seat outside the screen still parses to nothing.

/// Parse `code` against a screen of `rows` x `seats_per_row`.
///
/// Returns the 0-based `(row, column)` pair, or `None` for any other shape
/// or out-of-range value. The row letter must fall below `min(rows, 26)`
/// and the column within `1..=min(seats_per_row, 50)`.
pub fn parse_seat_code(code: &str, rows: usize, seats_per_row: usize) -> Option<(usize, usize)> {
    let code = code.trim();
    let bytes = code.as_bytes();
    if bytes.len() != 3 || !bytes[0].is_ascii_alphabetic() {
        return None;
    }
    if !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
        return None;
    }

    let row = (bytes[0].to_ascii_lowercase() - b'a') as usize;
    let col = ((bytes[1] - b'0') * 10 + (bytes[2] - b'0')) as usize;

    if row >= rows.min(26) {
        return None;
    }
    if col < 1 || col > seats_per_row.min(50) {
        return None;
    }
    Some((row, col - 1))
}
