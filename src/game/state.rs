use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the position lies on a `board_size` x `board_size` board
    pub fn is_within(&self, board_size: usize) -> bool {
        let size = board_size as i64;
        (0..size).contains(&(self.x as i64)) && (0..size).contains(&(self.y as i64))
    }
}

/// The snake body.
///
/// Segments are ordered oldest first: the tail sits at index 0 and the head
/// is the last element. A snake always has at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from segments ordered tail first.
    /// Returns `None` for an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: Vec<Position> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get the tail position (oldest segment)
    pub fn tail(&self) -> Position {
        self.body[0]
    }

    /// All segments, tail first
    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Check if position is occupied by any segment, head and tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Append a new head. When `grow` is false the tail is dropped so the
    /// length stays the same.
    pub(crate) fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push(new_head);
        if !grow {
            self.body.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// True when the snake has no segments
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl TryFrom<Vec<Position>> for Snake {
    type Error = &'static str;

    fn try_from(body: Vec<Position>) -> Result<Self, Self::Error> {
        Snake::from_segments(body).ok_or("snake must have at least one segment")
    }
}

impl From<Snake> for Vec<Position> {
    fn from(snake: Snake) -> Self {
        snake.body
    }
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake ran into one of its own segments
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub direction: Direction,
    pub score: u32,
    pub alive: bool,
}

impl GameState {
    /// Create a fresh, live state with a zero score
    pub fn new(snake: Snake, food: Position, direction: Direction) -> Self {
        Self {
            snake,
            food,
            direction,
            score: 0,
            alive: true,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(Position::new(0, 0).is_within(10));
        assert!(Position::new(9, 9).is_within(10));
        assert!(!Position::new(-1, 0).is_within(10));
        assert!(!Position::new(0, -1).is_within(10));
        assert!(!Position::new(10, 0).is_within(10));
        assert!(!Position::new(0, 10).is_within(10));
        assert!(!Position::new(0, 0).is_within(0));
    }

    #[test]
    fn test_snake_head_is_last_segment() {
        let snake = Snake::from_segments([
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
        ])
        .unwrap();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.tail(), Position::new(0, 0));
        assert_eq!(snake.head(), Position::new(2, 0));
    }

    #[test]
    fn test_empty_snake_rejected() {
        assert!(Snake::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(0, 0));

        snake.advance(Position::new(1, 0), false);
        assert_eq!(snake.segments(), &[Position::new(1, 0)]);

        snake.advance(Position::new(2, 0), true);
        assert_eq!(snake.segments(), &[Position::new(1, 0), Position::new(2, 0)]);
    }

    #[test]
    fn test_snake_serializes_as_segment_list() {
        let snake = Snake::from_segments([Position::new(0, 0), Position::new(1, 0)]).unwrap();
        let json = serde_json::to_string(&snake).unwrap();
        assert_eq!(json, r#"[{"x":0,"y":0},{"x":1,"y":0}]"#);

        assert!(serde_json::from_str::<Snake>("[]").is_err());
    }

    #[test]
    fn test_occupancy() {
        let state = GameState::new(
            Snake::from_segments([Position::new(3, 3), Position::new(4, 3)]).unwrap(),
            Position::new(7, 7),
            Direction::Right,
        );
        assert!(state.is_occupied_by_snake(Position::new(3, 3)));
        assert!(state.is_occupied_by_snake(Position::new(4, 3)));
        assert!(!state.is_occupied_by_snake(Position::new(7, 7)));
    }
}
