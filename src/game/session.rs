use std::time::Duration;

use crate::config::{ConfigError, SessionConfig};

use super::{
    try_move, try_rotate, BlockType, CellState, Grid, Piece, PieceFactory, PieceProvider,
    Position, GRID_HEIGHT, GRID_WIDTH, LINE_CLEAR_SCORE,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, derive_more::IsVariant)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLanded,
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

/// Read-only view handed to the renderer after each call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub cells: Vec<Vec<CellState>>,
    pub active_blocks: [Position; 4],
    pub active_type: BlockType,
    pub score: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
    pub paused: bool,
}

// ============================================================================
// Game Session
// ============================================================================

pub struct GameSession {
    grid: Grid,
    active_piece: Piece,
    score: u32,
    lines_cleared: u32,
    state: GameState,
    tick_interval: Duration,
    factory: PieceFactory,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_factory(PieceFactory::random(), SessionConfig::default().tick_interval)
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self::with_factory(
            PieceFactory::new(provider),
            SessionConfig::default().tick_interval,
        )
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = match config.seed {
            Some(seed) => PieceFactory::seeded(seed),
            None => PieceFactory::random(),
        };
        Ok(Self::with_factory(factory, config.tick_interval))
    }

    /// Starts from a preset grid and active piece. Later spawns come from
    /// `provider`.
    pub fn with_grid(grid: Grid, active_piece: Piece, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            grid,
            active_piece,
            score: 0,
            lines_cleared: 0,
            state: GameState::Playing,
            tick_interval: SessionConfig::default().tick_interval,
            factory: PieceFactory::new(provider),
            events: Vec::new(),
        }
    }

    fn with_factory(mut factory: PieceFactory, tick_interval: Duration) -> Self {
        let active_piece = factory.create_piece();
        Self {
            grid: Grid::new(),
            active_piece,
            score: 0,
            lines_cleared: 0,
            state: GameState::Playing,
            tick_interval,
            factory,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    // ------------------------------------------------------------------------
    // Gravity and input
    // ------------------------------------------------------------------------

    /// One gravity step: move down, or lock when the piece is resting.
    pub fn tick(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        if !self.handle_move(0, 1) {
            self.lock_and_clear();
        }
    }

    /// Soft drop behaves exactly like a gravity step.
    pub fn soft_drop(&mut self) {
        self.tick();
    }

    /// Attempts a translation. Never locks the piece.
    pub fn handle_move(&mut self, dx: i16, dy: i16) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        match try_move(&self.active_piece, dx, dy, &self.grid) {
            Some(moved) => {
                self.active_piece = moved;
                self.events.push(GameEvent::PieceMoved);
                true
            }
            None => false,
        }
    }

    pub fn handle_rotate(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        match try_rotate(&self.active_piece, &self.grid) {
            Some(rotated) => {
                self.active_piece = rotated;
                self.events.push(GameEvent::PieceRotated);
                true
            }
            None => false,
        }
    }

    pub fn hard_drop(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        while let Some(moved) = try_move(&self.active_piece, 0, 1, &self.grid) {
            self.active_piece = moved;
        }
        self.lock_and_clear();
    }

    // ------------------------------------------------------------------------
    // Lock and clear
    // ------------------------------------------------------------------------

    fn lock_and_clear(&mut self) {
        self.active_piece = self.active_piece.landed();
        self.events.push(GameEvent::PieceLanded);

        self.grid.merge(&self.active_piece);
        self.events.push(GameEvent::PieceLocked);

        let cleared = self.grid.clear_lines();
        if cleared > 0 {
            self.lines_cleared = self.lines_cleared.saturating_add(cleared);
            self.score = self.score.saturating_add(cleared * LINE_CLEAR_SCORE);
            self.events.push(GameEvent::LinesCleared(cleared));
        }

        self.spawn_next_piece();
    }

    /// Installs a fresh piece, or ends the game if it has no room. On game
    /// over the landed piece stays as the active one.
    fn spawn_next_piece(&mut self) {
        let piece = self.factory.create_piece();
        if self.grid.collides(&piece) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        } else {
            self.active_piece = piece;
        }
    }

    // ------------------------------------------------------------------------
    // Pause and restart
    // ------------------------------------------------------------------------

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.events.push(GameEvent::Unpaused);
            }
            GameState::GameOver => {}
        }
    }

    pub fn restart(&mut self) {
        self.grid = Grid::new();
        self.score = 0;
        self.lines_cleared = 0;
        self.state = GameState::Playing;
        self.events.clear();
        self.active_piece = self.factory.create_piece();
        self.events.push(GameEvent::GameRestarted);
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// The grid with the active piece drawn over it.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual_grid = self.grid.rows().to_vec();

        for block in self.active_piece.absolute_blocks() {
            if block.y >= 0
                && block.y < GRID_HEIGHT as i16
                && block.x >= 0
                && block.x < GRID_WIDTH as i16
            {
                visual_grid[block.y as usize][block.x as usize] =
                    CellState::Filled(self.active_piece.block_type);
            }
        }

        visual_grid
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.grid.rows().to_vec(),
            active_blocks: self.active_piece.absolute_blocks(),
            active_type: self.active_piece.block_type,
            score: self.score,
            lines_cleared: self.lines_cleared,
            game_over: self.is_game_over(),
            paused: self.is_paused(),
        }
    }

    /// Takes and clears all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
