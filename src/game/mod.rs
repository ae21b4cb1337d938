mod command;
mod grid;
mod piece;
mod session;

pub use self::{
    command::{try_move, try_rotate, Command, MoveCommand, RotateCommand},
    grid::{CellState, Grid, GridShapeError},
    piece::{
        BlockType, Lifecycle, Piece, PieceFactory, PieceProvider, Position, RandomPieceProvider,
        SequencePieceProvider,
    },
    session::{GameEvent, GameSession, GameState, Snapshot},
};

// ============================================================================
// Configuration
// ============================================================================

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

/// Anchor of every newly spawned piece.
pub const SPAWN_POSITION: Position = Position::new(3, 0);

pub const LINE_CLEAR_SCORE: u32 = 100;

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_grid() -> Vec<Vec<CellState>> {
        vec![vec![CellState::Empty; GRID_WIDTH]; GRID_HEIGHT]
    }

    pub fn fill_row(grid: &mut [Vec<CellState>], y: usize) {
        for x in 0..GRID_WIDTH {
            grid[y][x] = CellState::Filled(BlockType::T);
        }
    }

    pub fn fill_row_with_gap(grid: &mut [Vec<CellState>], y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                grid[y][x] = CellState::Filled(BlockType::T);
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `rows` is not `GRID_WIDTH` by `GRID_HEIGHT`.
    pub fn grid_from(rows: Vec<Vec<CellState>>) -> Grid {
        Grid::from_rows(rows).expect("fixture rows have grid dimensions")
    }

    pub fn sequence(pieces: &[BlockType]) -> Box<dyn PieceProvider> {
        Box::new(SequencePieceProvider::new(pieces.to_vec()))
    }
}
