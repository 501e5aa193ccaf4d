use std::io::Write;

use crate::error::Result;

/// Cell marker for a seat nobody has confirmed and the queried id does not hold.
pub const VACANT: char = ' ';
/// Cell marker for a confirmed seat owned by some other reservation.
pub const TAKEN: char = 'x';
/// Cell marker for a seat held or confirmed by the queried reservation.
pub const OWNED: char = '#';

/// Row-major character grid of a screen's seats, row 0 (nearest the screen)
/// first. Display layers reverse the rows for a back-to-front audience view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatGrid {
    cells: Vec<Vec<char>>,
}

impl SeatGrid {
    pub(crate) fn from_cells(cells: Vec<Vec<char>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn seats_per_row(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> char {
        self.cells[row][col]
    }

    pub fn cells(&self) -> &[Vec<char>] {
        &self.cells
    }

    /// Each row as a string, row 0 first.
    pub fn to_lines(&self) -> Vec<String> {
        self.cells.iter().map(|row| row.iter().collect()).collect()
    }
}

/// Write the audience view of a grid: a screen banner, then rows back to
/// front with vacant seats shown as `.` so the gaps stay visible.
pub fn write_screen_view(writer: &mut impl Write, grid: &SeatGrid) -> Result<()> {
    writeln!(writer, "---------- SCREEN ----------")?;
    for row in grid.cells.iter().rev() {
        for &cell in row {
            let shown = if cell == VACANT { '.' } else { cell };
            write!(writer, "{shown}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
