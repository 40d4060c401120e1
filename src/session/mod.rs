//! Session control: one live game, its engine and its tick scheduler.
//!
//! A [`Session`] is the only owner of the running [`GameState`]. Front ends
//! feed it directions, await [`Session::next_tick`] and hand it a
//! [`Renderer`] to present the outcome of each step.

pub mod scheduler;

pub use scheduler::TickScheduler;

use rand::rngs::StdRng;

use crate::game::{
    ApplePlacer, Direction, GameConfig, GameEngine, GameState, Grid, Position, RandomPlacer,
    Snake, StepOutcome, StepResult,
};

/// What a renderer gets once per running tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub apple: Position,
    pub score: u32,
    pub grid: Grid,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            snake: &state.snake,
            apple: state.apple,
            score: state.apples_eaten,
            grid: state.grid,
        }
    }
}

/// Presentation side of a session
pub trait Renderer {
    type Error;

    /// Draw a frame; called after every tick that leaves the game running.
    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Self::Error>;

    /// Called once when the session ends.
    fn session_ended(&mut self, final_score: u32) -> Result<(), Self::Error>;
}

pub struct Session<P = RandomPlacer<StdRng>> {
    engine: GameEngine<P>,
    state: Option<GameState>,
    scheduler: TickScheduler,
}

impl Session {
    /// Session with an entropy-seeded random apple placer
    pub fn random(config: &GameConfig) -> Self {
        Self::new(RandomPlacer::from_entropy(config.apple_rule))
    }

    /// Session whose apples follow a fixed seed
    pub fn seeded(seed: u64, config: &GameConfig) -> Self {
        Self::new(RandomPlacer::seeded(seed, config.apple_rule))
    }
}

impl<P: ApplePlacer> Session<P> {
    pub fn new(placer: P) -> Self {
        Self {
            engine: GameEngine::new(placer),
            state: None,
            scheduler: TickScheduler::new(),
        }
    }

    /// Throw away any previous game, set up a fresh one and start ticking.
    pub fn start_session(&mut self, config: &GameConfig) {
        let state = self.engine.new_game(config);
        log::info!(
            "session started: {}x{} cells of {}px, tick {}ms",
            state.grid.columns(),
            state.grid.rows(),
            config.unit_size,
            config.tick_interval_ms
        );
        self.state = Some(state);
        self.scheduler.restart(config.tick_interval());
    }

    /// Stop ticking. The last state stays readable.
    pub fn stop_session(&mut self) {
        self.scheduler.stop();
    }

    /// Forward a turn request; reversals and requests without a game are ignored.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        match self.state.as_mut() {
            Some(state) => state.set_direction(requested),
            None => false,
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn engine(&self) -> &GameEngine<P> {
        &self.engine
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Wait until the scheduler says it is time for the next step.
    pub async fn next_tick(&mut self) {
        self.scheduler.tick().await;
    }

    /// Run one step now. Ending the game stops the scheduler.
    pub fn tick(&mut self) -> Option<StepResult> {
        let state = self.state.as_mut()?;
        let result = self.engine.step(state);
        if result.terminated() && self.scheduler.is_running() {
            self.scheduler.stop();
        }
        Some(result)
    }

    /// Run one step and present it
    pub fn tick_and_present<R: Renderer>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Option<StepOutcome>, R::Error> {
        let Some(result) = self.tick() else {
            return Ok(None);
        };

        match result.outcome {
            StepOutcome::Frame => {
                if let Some(state) = self.state.as_ref() {
                    renderer.render(&Snapshot::of(state))?;
                }
            }
            StepOutcome::SessionEnded { score } => renderer.session_ended(score)?,
        }

        Ok(Some(result.outcome))
    }
}
