use std::collections::VecDeque;

use super::direction::Direction;
use super::grid::{Grid, Position};

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    unit: i32,
}

impl Snake {
    /// Lay out `seed_length` segments on row 0, head rightmost and the tail
    /// on the origin, ready to move right.
    pub fn initialize(seed_length: usize, unit: u32) -> Self {
        let unit = unit as i32;
        let body = (0..seed_length)
            .map(|i| Position::new((seed_length - i - 1) as i32 * unit, 0))
            .collect();

        Self { body, unit }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>, unit: u32) -> Self {
        Self {
            body: segments.into_iter().collect(),
            unit: unit as i32,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn segment(&self, index: usize) -> Option<Position> {
        self.body.get(index).copied()
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == pos)
    }

    /// Check if position is occupied by any segment
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move one unit: each segment takes the place its predecessor held
    /// before the move and the head steps in `direction`.
    pub fn advance(&mut self, direction: Direction) {
        let new_head = self.head().stepped(direction, self.unit);
        self.body.push_front(new_head);
        self.body.pop_back();
    }

    /// Add a segment on top of the current tail
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the session is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Running,
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub apple: Position,
    pub apples_eaten: u32,
    pub phase: GamePhase,
    pub grid: Grid,
    pub ticks: u64,
    /// Set once the session has ended
    pub collision: Option<CollisionKind>,
}

impl GameState {
    /// Create a new running game state heading right
    pub fn new(snake: Snake, apple: Position, grid: Grid) -> Self {
        Self {
            snake,
            direction: Direction::Right,
            apple,
            apples_eaten: 0,
            phase: GamePhase::Running,
            grid,
            ticks: 0,
            collision: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u32 {
        self.apples_eaten
    }

    /// Change heading unless it would reverse the snake onto itself.
    ///
    /// Returns whether the direction was taken.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.direction.is_opposite(requested) {
            log::trace!("ignoring reverse turn {:?} -> {:?}", self.direction, requested);
            return false;
        }
        self.direction = requested;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Snake {
        Snake::initialize(6, 20)
    }

    #[test]
    fn test_snake_initialization() {
        let snake = seeded();
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.head(), Position::new(100, 0));
        assert_eq!(snake.tail(), Position::new(0, 0));
        for (i, segment) in snake.segments().enumerate() {
            assert_eq!(*segment, Position::new((5 - i as i32) * 20, 0));
        }
    }

    #[test]
    fn test_advance_shifts_segments() {
        let mut snake = seeded();
        let before: Vec<_> = snake.segments().copied().collect();

        snake.advance(Direction::Right);

        assert_eq!(snake.len(), 6);
        assert_eq!(snake.head(), Position::new(120, 0));
        for i in 1..snake.len() {
            assert_eq!(snake.segment(i), Some(before[i - 1]));
        }
    }

    #[test]
    fn test_advance_turning() {
        let mut snake = seeded();
        snake.advance(Direction::Down);
        assert_eq!(snake.head(), Position::new(100, 20));
        assert_eq!(snake.segment(1), Some(Position::new(100, 0)));
    }

    #[test]
    fn test_grow_duplicates_tail() {
        let mut snake = seeded();
        snake.advance(Direction::Right);
        let tail = snake.tail();

        snake.grow();

        assert_eq!(snake.len(), 7);
        assert_eq!(snake.tail(), tail);
        assert_eq!(snake.segment(5), Some(tail));

        // The duplicate unfolds on the next move
        snake.advance(Direction::Right);
        assert_eq!(snake.len(), 7);
        assert_eq!(snake.tail(), tail);
        assert_ne!(snake.segment(5), Some(tail));
    }

    #[test]
    fn test_collision_detection() {
        let snake = seeded();
        assert!(!snake.collides_with_body(Position::new(100, 0))); // head
        assert!(snake.collides_with_body(Position::new(80, 0))); // body
        assert!(snake.collides_with_body(Position::new(0, 0))); // tail
        assert!(!snake.collides_with_body(Position::new(200, 200))); // empty
        assert!(snake.contains(Position::new(100, 0)));
    }

    #[test]
    fn test_reverse_turn_rejected() {
        let grid = Grid::new(400, 400, 20);
        let mut state = GameState::new(seeded(), Position::new(200, 200), grid);

        assert!(!state.set_direction(Direction::Left));
        assert_eq!(state.direction, Direction::Right);

        assert!(state.set_direction(Direction::Up));
        assert_eq!(state.direction, Direction::Up);

        assert!(!state.set_direction(Direction::Down));
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_latest_turn_wins() {
        let grid = Grid::new(400, 400, 20);
        let mut state = GameState::new(seeded(), Position::new(200, 200), grid);

        state.set_direction(Direction::Up);
        state.set_direction(Direction::Right);
        assert_eq!(state.direction, Direction::Right);
    }
}
