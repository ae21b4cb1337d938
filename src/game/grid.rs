use super::{BlockType, Piece, GRID_HEIGHT, GRID_WIDTH};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(BlockType),
}

impl CellState {
    pub fn is_filled(&self) -> bool {
        matches!(self, CellState::Filled(_))
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("grid must be {}x{}, got {width}x{height}", GRID_WIDTH, GRID_HEIGHT)]
pub struct GridShapeError {
    pub width: usize,
    pub height: usize,
}

/// Fixed-size playfield. Row 0 is the top, row `GRID_HEIGHT - 1` the floor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: Vec<Vec<CellState>>,
}

fn empty_row() -> Vec<CellState> {
    vec![CellState::Empty; GRID_WIDTH]
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: vec![empty_row(); GRID_HEIGHT],
        }
    }

    /// Builds a grid from preset rows, e.g. a saved position or a test fixture.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, GridShapeError> {
        let height = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != GRID_WIDTH) {
            return Err(GridShapeError {
                width: bad.len(),
                height,
            });
        }
        if height != GRID_HEIGHT {
            return Err(GridShapeError {
                width: GRID_WIDTH,
                height,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    /// Cell at `(x, y)`, or `None` outside the visible area.
    pub fn cell(&self, x: i16, y: i16) -> Option<CellState> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// True if any block of `piece` leaves the side walls or floor, or
    /// overlaps a filled cell. Blocks above the top edge only hit the walls.
    /// A piece whose coordinates overflow always collides.
    pub fn collides(&self, piece: &Piece) -> bool {
        let Some(blocks) = piece.checked_absolute_blocks() else {
            return true;
        };
        blocks.iter().any(|b| {
            b.x < 0
                || b.x >= GRID_WIDTH as i16
                || b.y >= GRID_HEIGHT as i16
                || (b.y >= 0 && self.rows[b.y as usize][b.x as usize].is_filled())
        })
    }

    /// Writes every visible block of `piece` into the grid.
    pub fn merge(&mut self, piece: &Piece) {
        for b in piece.absolute_blocks() {
            if b.y >= 0 && b.y < GRID_HEIGHT as i16 && b.x >= 0 && b.x < GRID_WIDTH as i16 {
                self.rows[b.y as usize][b.x as usize] = CellState::Filled(piece.block_type);
            }
        }
    }

    /// Removes complete rows, scanning from the floor upward, and returns
    /// how many were removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared_count = 0;
        let mut y = GRID_HEIGHT;

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.rows.remove(y - 1);
                self.rows.insert(0, empty_row());
                cleared_count += 1;
                // Same index again: the row above has shifted into it.
            } else {
                y -= 1;
            }
        }

        cleared_count
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(CellState::is_filled)
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
