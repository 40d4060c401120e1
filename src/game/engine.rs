use super::{
    apple::ApplePlacer,
    config::GameConfig,
    state::{CollisionKind, GamePhase, GameState, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    /// Whether the snake ate the apple this step
    pub ate_apple: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionKind>,
}

/// What the presentation side should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still running; a new frame is ready
    Frame,
    /// The session is over
    SessionEnded { score: u32 },
}

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub outcome: StepOutcome,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    pub fn terminated(&self) -> bool {
        matches!(self.outcome, StepOutcome::SessionEnded { .. })
    }
}

/// The game engine that handles all game logic
pub struct GameEngine<P> {
    placer: P,
}

impl<P: ApplePlacer> GameEngine<P> {
    pub fn new(placer: P) -> Self {
        Self { placer }
    }

    pub fn placer(&self) -> &P {
        &self.placer
    }

    pub fn placer_mut(&mut self) -> &mut P {
        &mut self.placer
    }

    /// Fresh state for a new session
    pub fn new_game(&mut self, config: &GameConfig) -> GameState {
        let grid = config.grid();
        let snake = Snake::initialize(config.seed_length, config.unit_size);
        let apple = self.placer.place(&grid, &snake);

        GameState::new(snake, apple, grid)
    }

    /// Execute one tick: move, eat, then check for collisions.
    ///
    /// The apple is checked before collisions, so an apple taken on the
    /// fatal tick still scores.
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if state.phase == GamePhase::GameOver {
            return StepResult {
                outcome: StepOutcome::SessionEnded {
                    score: state.apples_eaten,
                },
                info: StepInfo::default(),
            };
        }

        state.snake.advance(state.direction);
        state.ticks += 1;

        let ate_apple = state.snake.head() == state.apple;
        if ate_apple {
            state.snake.grow();
            state.apples_eaten += 1;
            state.apple = self.placer.place(&state.grid, &state.snake);
            log::debug!(
                "apple eaten, score {} length {}",
                state.apples_eaten,
                state.snake.len()
            );
        }

        let collision = check_collision(state);
        if let Some(kind) = collision {
            state.phase = GamePhase::GameOver;
            state.collision = Some(kind);
            log::info!(
                "game over ({:?}) after {} ticks, score {}",
                kind,
                state.ticks,
                state.apples_eaten
            );
        }

        let outcome = match state.phase {
            GamePhase::Running => StepOutcome::Frame,
            GamePhase::GameOver => StepOutcome::SessionEnded {
                score: state.apples_eaten,
            },
        };

        StepResult {
            outcome,
            info: StepInfo {
                ate_apple,
                collision,
            },
        }
    }
}

/// Check whether the head has left the board or run into the body
fn check_collision(state: &GameState) -> Option<CollisionKind> {
    let head = state.snake.head();

    if !state.grid.contains(head) {
        return Some(CollisionKind::Wall);
    }

    if state.snake.collides_with_body(head) {
        return Some(CollisionKind::SelfCollision);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AppleRule, Direction, Grid, Position, RandomPlacer};
    use std::collections::VecDeque;

    /// Hands out scripted apple positions and counts calls
    struct ScriptedPlacer {
        queue: VecDeque<Position>,
        fallback: Position,
        calls: usize,
    }

    impl ScriptedPlacer {
        fn new(positions: &[Position]) -> Self {
            Self {
                queue: positions.iter().copied().collect(),
                fallback: Position::new(380, 380),
                calls: 0,
            }
        }
    }

    impl ApplePlacer for ScriptedPlacer {
        fn place(&mut self, _grid: &Grid, _snake: &Snake) -> Position {
            self.calls += 1;
            self.queue.pop_front().unwrap_or(self.fallback)
        }
    }

    fn board() -> Grid {
        Grid::new(400, 400, 20)
    }

    #[test]
    fn test_new_game() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(200, 200)]));
        let state = engine.new_game(&GameConfig::default());

        assert!(state.is_running());
        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.apple, Position::new(200, 200));
        assert_eq!(engine.placer().calls, 1);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(200, 200)]));
        let mut state = engine.new_game(&GameConfig::default());
        let before: Vec<_> = state.snake.segments().copied().collect();

        let result = engine.step(&mut state);

        assert_eq!(result.outcome, StepOutcome::Frame);
        assert!(!result.info.ate_apple);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.snake.head(), Position::new(120, 0));
        for i in 1..state.snake.len() {
            assert_eq!(state.snake.segment(i), Some(before[i - 1]));
        }
    }

    #[test]
    fn test_apple_consumption() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[
            Position::new(120, 0),
            Position::new(300, 300),
        ]));
        let mut state = engine.new_game(&GameConfig::default());
        let initial_length = state.snake.len();

        let result = engine.step(&mut state);

        assert!(result.info.ate_apple);
        assert_eq!(result.outcome, StepOutcome::Frame);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert_eq!(state.apple, Position::new(300, 300));
        // One placement for the new game, exactly one for the apple eaten
        assert_eq!(engine.placer().calls, 2);
    }

    #[test]
    fn test_no_placement_without_consumption() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(300, 300)]));
        let mut state = engine.new_game(&GameConfig::default());

        for _ in 0..5 {
            engine.step(&mut state);
        }

        assert_eq!(state.score(), 0);
        assert_eq!(engine.placer().calls, 1);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[]));
        let snake = Snake::from_segments(
            [
                Position::new(380, 0),
                Position::new(360, 0),
                Position::new(340, 0),
            ],
            20,
        );
        let mut state = GameState::new(snake, Position::new(100, 100), board());

        let result = engine.step(&mut state);

        assert_eq!(state.snake.head().x, 400);
        assert!(result.terminated());
        assert_eq!(result.outcome, StepOutcome::SessionEnded { score: 0 });
        assert_eq!(result.info.collision, Some(CollisionKind::Wall));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_wall_collision_top_and_left() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[]));

        let mut up = GameState::new(Snake::initialize(6, 20), Position::new(200, 200), board());
        up.set_direction(Direction::Up);
        assert_eq!(
            engine.step(&mut up).info.collision,
            Some(CollisionKind::Wall)
        );

        let snake = Snake::from_segments([Position::new(0, 40), Position::new(20, 40)], 20);
        let mut left = GameState::new(snake, Position::new(200, 200), board());
        left.direction = Direction::Left;
        assert_eq!(
            engine.step(&mut left).info.collision,
            Some(CollisionKind::Wall)
        );
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[]));

        //   (80,80) (100,80) (120,80)
        //           (100,100)(120,100)
        let snake = Snake::from_segments(
            [
                Position::new(100, 100),
                Position::new(120, 100),
                Position::new(120, 80),
                Position::new(100, 80),
                Position::new(80, 80),
            ],
            20,
        );
        let mut state = GameState::new(snake, Position::new(300, 300), board());
        state.direction = Direction::Up;

        let result = engine.step(&mut state);

        assert_eq!(state.snake.head(), Position::new(100, 80));
        assert_eq!(state.snake.segment(4), Some(Position::new(100, 80)));
        assert!(result.terminated());
        assert_eq!(result.info.collision, Some(CollisionKind::SelfCollision));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_self_collision_with_segment_three() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[]));
        // Segments need not be contiguous for the check; after the shift,
        // segment 3 holds what segment 2 held before.
        let snake = Snake::from_segments(
            [
                Position::new(100, 100),
                Position::new(120, 100),
                Position::new(100, 80),
                Position::new(80, 80),
            ],
            20,
        );
        let mut state = GameState::new(snake, Position::new(300, 300), board());
        state.direction = Direction::Up;

        let result = engine.step(&mut state);

        assert_eq!(state.snake.segment(3), Some(state.snake.head()));
        assert_eq!(result.info.collision, Some(CollisionKind::SelfCollision));
        assert_eq!(result.outcome, StepOutcome::SessionEnded { score: 0 });
    }

    #[test]
    fn test_apple_counts_on_fatal_tick() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(0, 0)]));
        let snake = Snake::from_segments(
            [
                Position::new(100, 100),
                Position::new(120, 100),
                Position::new(120, 80),
                Position::new(100, 80),
                Position::new(80, 80),
            ],
            20,
        );
        // Apple sits on the cell that kills the snake
        let mut state = GameState::new(snake, Position::new(100, 80), board());
        state.direction = Direction::Up;

        let result = engine.step(&mut state);

        assert!(result.info.ate_apple);
        assert_eq!(result.info.collision, Some(CollisionKind::SelfCollision));
        assert_eq!(result.outcome, StepOutcome::SessionEnded { score: 1 });
        assert_eq!(engine.placer().calls, 1);
    }

    #[test]
    fn test_circling_snake_dies() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(380, 380)]));
        let mut state = engine.new_game(&GameConfig::default());

        state.set_direction(Direction::Down);
        assert!(!engine.step(&mut state).terminated());
        state.set_direction(Direction::Left);
        assert!(!engine.step(&mut state).terminated());
        state.set_direction(Direction::Up);
        let result = engine.step(&mut state);

        assert!(result.terminated());
        assert_eq!(result.info.collision, Some(CollisionKind::SelfCollision));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::new(ScriptedPlacer::new(&[Position::new(300, 300)]));
        let mut state = engine.new_game(&GameConfig::default());
        state.phase = GamePhase::GameOver;
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated());
        assert_eq!(state, before);
    }

    #[test]
    fn test_random_engine_runs_to_wall() {
        let mut engine = GameEngine::new(RandomPlacer::seeded(1, AppleRule::AvoidSnake));
        let mut state = engine.new_game(&GameConfig::default());

        // Heading right from x=100 on a 20-column board: wall within 15 ticks
        let mut ticks = 0;
        while state.is_running() {
            engine.step(&mut state);
            ticks += 1;
            assert!(ticks <= 15);
        }
        assert_eq!(state.collision, Some(CollisionKind::Wall));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn direction() -> impl Strategy<Value = Direction> {
            prop_oneof![
                Just(Direction::Up),
                Just(Direction::Down),
                Just(Direction::Left),
                Just(Direction::Right),
            ]
        }

        fn turn_sequence() -> impl Strategy<Value = Vec<Direction>> {
            prop::collection::vec(direction(), 1..200)
        }

        proptest! {
            #[test]
            fn length_tracks_score(seed in any::<u64>(), turns in turn_sequence()) {
                let config = GameConfig::new(120, 40);
                let mut engine = GameEngine::new(RandomPlacer::seeded(seed, AppleRule::Anywhere));
                let mut state = engine.new_game(&config);

                for turn in turns {
                    if !state.is_running() {
                        break;
                    }
                    let previous = state.direction;
                    let applied = state.set_direction(turn);
                    prop_assert_eq!(applied, !previous.is_opposite(turn));

                    let score_before = state.score();
                    let result = engine.step(&mut state);
                    prop_assert!(state.score() - score_before <= 1);
                    prop_assert_eq!(result.info.ate_apple, state.score() == score_before + 1);
                    prop_assert_eq!(state.snake.len(), config.seed_length + state.score() as usize);
                    prop_assert!(state.grid.contains(state.apple));
                }
            }

            #[test]
            fn running_head_stays_on_board(seed in any::<u64>(), turns in turn_sequence()) {
                let mut engine = GameEngine::new(RandomPlacer::seeded(seed, AppleRule::AvoidSnake));
                let mut state = engine.new_game(&GameConfig::default());

                for turn in turns {
                    state.set_direction(turn);
                    let result = engine.step(&mut state);
                    if result.terminated() {
                        break;
                    }
                    let head = state.snake.head();
                    prop_assert!(state.grid.contains(head));
                    prop_assert!(!state.snake.collides_with_body(head));
                }
            }
        }
    }
}
