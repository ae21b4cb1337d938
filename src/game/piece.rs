use rand::{rngs::StdRng, Rng, SeedableRng};

use super::SPAWN_POSITION;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlockType {
    I,
    O,
    T,
    S,
    Z,
    L,
    J,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::I,
        BlockType::O,
        BlockType::T,
        BlockType::S,
        BlockType::Z,
        BlockType::L,
        BlockType::J,
    ];

    /// Canonical local offsets of a freshly spawned piece of this type.
    pub fn shape(&self) -> [Position; 4] {
        let offsets = match self {
            BlockType::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
            BlockType::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            BlockType::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            BlockType::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            BlockType::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            BlockType::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
            BlockType::J => [(1, 0), (1, 1), (1, 2), (0, 2)],
        };
        offsets.map(|(x, y)| Position::new(x, y))
    }

    /// Display color as a `#rrggbb` string. Purely cosmetic.
    pub fn color(&self) -> &'static str {
        match self {
            BlockType::I => "#00f0f0",
            BlockType::O => "#f0f000",
            BlockType::T => "#a000f0",
            BlockType::S => "#00f000",
            BlockType::Z => "#f00000",
            BlockType::L => "#f0a000",
            BlockType::J => "#0000f0",
        }
    }

    /// The square piece looks the same in every orientation.
    pub fn is_square(&self) -> bool {
        matches!(self, BlockType::O)
    }
}

/// Per-piece lifecycle. A piece spawns `Falling` and becomes `Landed` once,
/// right before it is merged into the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, derive_more::IsVariant)]
pub enum Lifecycle {
    #[default]
    Falling,
    Landed,
}

impl Lifecycle {
    pub fn can_move(&self) -> bool {
        match self {
            Lifecycle::Falling => true,
            Lifecycle::Landed => false,
        }
    }

    pub fn can_rotate(&self) -> bool {
        match self {
            Lifecycle::Falling => true,
            Lifecycle::Landed => false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub block_type: BlockType,
    pub blocks: [Position; 4],
    pub anchor: Position,
    pub lifecycle: Lifecycle,
}

impl Piece {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            block_type,
            blocks: block_type.shape(),
            anchor: SPAWN_POSITION,
            lifecycle: Lifecycle::Falling,
        }
    }

    pub fn new_at(block_type: BlockType, x: i16, y: i16) -> Self {
        Self {
            anchor: Position::new(x, y),
            ..Self::new(block_type)
        }
    }

    /// Grid coordinates covered by this piece.
    ///
    /// Coordinates that do not fit in `i16` saturate, which keeps them off
    /// the grid. Use [`Piece::checked_absolute_blocks`] to detect that case.
    pub fn absolute_blocks(&self) -> [Position; 4] {
        self.blocks.map(|b| {
            Position::new(
                self.anchor.x.saturating_add(b.x),
                self.anchor.y.saturating_add(b.y),
            )
        })
    }

    /// Grid coordinates covered by this piece, or `None` on overflow.
    pub fn checked_absolute_blocks(&self) -> Option<[Position; 4]> {
        let mut out = [self.anchor; 4];
        for (slot, b) in out.iter_mut().zip(self.blocks) {
            *slot = Position::new(
                self.anchor.x.checked_add(b.x)?,
                self.anchor.y.checked_add(b.y)?,
            );
        }
        Some(out)
    }

    /// Copy moved by `(dx, dy)`, or `None` if the anchor would overflow.
    pub fn translated(&self, dx: i16, dy: i16) -> Option<Self> {
        Some(Self {
            anchor: Position::new(
                self.anchor.x.checked_add(dx)?,
                self.anchor.y.checked_add(dy)?,
            ),
            ..*self
        })
    }

    /// Quarter turn of every local offset: (x, y) -> (-y, x).
    pub fn rotated(&self) -> Self {
        Self {
            blocks: self.blocks.map(|b| Position::new(b.y.saturating_neg(), b.x)),
            ..*self
        }
    }

    pub fn landed(&self) -> Self {
        Self {
            lifecycle: Lifecycle::Landed,
            ..*self
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_type(&mut self) -> BlockType;
}

/// Draws each type with equal probability.
pub struct RandomPieceProvider<R> {
    rng: R,
}

impl<R: Rng> RandomPieceProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPieceProvider<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PieceProvider for RandomPieceProvider<R> {
    fn next_type(&mut self) -> BlockType {
        BlockType::ALL[self.rng.gen_range(0..BlockType::ALL.len())]
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<BlockType>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<BlockType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_type(&mut self) -> BlockType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Piece Factory
// ============================================================================

pub struct PieceFactory {
    provider: Box<dyn PieceProvider>,
}

impl PieceFactory {
    pub fn new(provider: Box<dyn PieceProvider>) -> Self {
        Self { provider }
    }

    pub fn random() -> Self {
        Self::new(Box::new(RandomPieceProvider::from_entropy()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(RandomPieceProvider::seeded(seed)))
    }

    pub fn create_piece(&mut self) -> Piece {
        Piece::new(self.provider.next_type())
    }
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::random()
    }
}
