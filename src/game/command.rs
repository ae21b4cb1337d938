use super::{Grid, Piece};

/// A candidate transformation of a piece against a grid.
///
/// `can_execute` answers whether the transformation is legal; `execute`
/// returns the transformed copy when it is. Neither touches the original
/// piece or the grid.
pub trait Command {
    fn can_execute(&self) -> bool;

    fn execute(&self) -> Option<Piece>;
}

pub struct MoveCommand<'a> {
    piece: &'a Piece,
    dx: i16,
    dy: i16,
    grid: &'a Grid,
}

impl<'a> MoveCommand<'a> {
    pub fn new(piece: &'a Piece, dx: i16, dy: i16, grid: &'a Grid) -> Self {
        Self {
            piece,
            dx,
            dy,
            grid,
        }
    }

    fn candidate(&self) -> Option<Piece> {
        self.piece.translated(self.dx, self.dy)
    }
}

impl Command for MoveCommand<'_> {
    fn can_execute(&self) -> bool {
        self.execute().is_some()
    }

    fn execute(&self) -> Option<Piece> {
        if !self.piece.lifecycle.can_move() {
            return None;
        }
        self.candidate().filter(|moved| !self.grid.collides(moved))
    }
}

pub struct RotateCommand<'a> {
    piece: &'a Piece,
    grid: &'a Grid,
}

impl<'a> RotateCommand<'a> {
    pub fn new(piece: &'a Piece, grid: &'a Grid) -> Self {
        Self { piece, grid }
    }

    fn candidate(&self) -> Piece {
        self.piece.rotated()
    }
}

impl Command for RotateCommand<'_> {
    fn can_execute(&self) -> bool {
        self.piece.lifecycle.can_rotate()
            && !self.piece.block_type.is_square()
            && !self.grid.collides(&self.candidate())
    }

    fn execute(&self) -> Option<Piece> {
        self.can_execute().then(|| self.candidate())
    }
}

pub fn try_move(piece: &Piece, dx: i16, dy: i16, grid: &Grid) -> Option<Piece> {
    MoveCommand::new(piece, dx, dy, grid).execute()
}

pub fn try_rotate(piece: &Piece, grid: &Grid) -> Option<Piece> {
    RotateCommand::new(piece, grid).execute()
}
