use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    config::{FoodPlacement, GameConfig},
    direction::{request_direction, Direction},
    state::{CollisionType, GameState, Position, Snake},
};

/// What happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate and grew; `food` is the newly placed food
    Ate { food: Position },
    /// The snake hit a wall or itself and the game is over
    Collided(CollisionType),
    /// The input state was already terminal and was returned as is
    AlreadyOver,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The next state; the input state is never modified
    pub state: GameState,
    pub event: StepEvent,
}

impl StepResult {
    pub fn ate_food(&self) -> bool {
        matches!(self.event, StepEvent::Ate { .. })
    }

    pub fn terminated(&self) -> bool {
        !self.state.alive
    }
}

/// Advance `state` by one tick on a `board_size` x `board_size` board,
/// placing new food uniformly over the whole board.
///
/// `rng` is only consulted when the snake eats.
pub fn step<R: Rng + ?Sized>(state: &GameState, board_size: usize, rng: &mut R) -> StepResult {
    step_with_placement(state, board_size, FoodPlacement::Uniform, rng)
}

/// Same as [`step`] with an explicit food placement policy.
pub fn step_with_placement<R: Rng + ?Sized>(
    state: &GameState,
    board_size: usize,
    placement: FoodPlacement,
    rng: &mut R,
) -> StepResult {
    if !state.alive {
        return StepResult {
            state: state.clone(),
            event: StepEvent::AlreadyOver,
        };
    }

    let new_head = state.snake.head().moved_in_direction(state.direction);

    if let Some(collision) = check_collision(&state.snake, new_head, board_size) {
        let mut next = state.clone();
        next.alive = false;
        return StepResult {
            state: next,
            event: StepEvent::Collided(collision),
        };
    }

    let mut next = state.clone();
    let ate_food = new_head == state.food;
    next.snake.advance(new_head, ate_food);

    let event = if ate_food {
        next.score += 1;
        next.food = spawn_food(&next.snake, board_size, placement, rng);
        StepEvent::Ate { food: next.food }
    } else {
        StepEvent::Moved
    };

    StepResult { state: next, event }
}

/// Walls are checked before the body. Every segment counts, including the
/// tail that would move away this tick.
fn check_collision(snake: &Snake, pos: Position, board_size: usize) -> Option<CollisionType> {
    if !pos.is_within(board_size) {
        return Some(CollisionType::Wall);
    }

    if snake.occupies(pos) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

/// Pick a food position according to `placement`.
///
/// `AvoidSnake` falls back to a uniform pick when the snake covers the
/// whole board.
pub fn spawn_food<R: Rng + ?Sized>(
    snake: &Snake,
    board_size: usize,
    placement: FoodPlacement,
    rng: &mut R,
) -> Position {
    if placement == FoodPlacement::AvoidSnake {
        let free: Vec<Position> = (0..board_size as i32)
            .flat_map(|y| (0..board_size as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        if let Some(pos) = free.choose(rng) {
            return *pos;
        }
    }

    let x = rng.gen_range(0..board_size) as i32;
    let y = rng.gen_range(0..board_size) as i32;
    Position::new(x, y)
}

/// The game engine: a configuration plus the random source used for food
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food sequence is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The fixed starting state; involves no randomness
    pub fn reset(&self) -> GameState {
        GameState::new(
            Snake::new(self.config.initial_head),
            self.config.initial_food,
            self.config.initial_direction,
        )
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &GameState) -> StepResult {
        let result = step_with_placement(
            state,
            self.config.board_size,
            self.config.food_placement,
            &mut self.rng,
        );

        match result.event {
            StepEvent::Ate { food } => {
                debug!(
                    score = result.state.score,
                    length = result.state.snake.len(),
                    food_x = food.x,
                    food_y = food.y,
                    "Food eaten"
                );
            }
            StepEvent::Collided(collision) => {
                info!(
                    ?collision,
                    score = result.state.score,
                    length = result.state.snake.len(),
                    "Game over"
                );
            }
            StepEvent::Moved | StepEvent::AlreadyOver => {}
        }

        result
    }

    /// Apply a direction request to `state` at input time
    pub fn request_direction(&self, state: &mut GameState, requested: Direction) {
        state.direction = request_direction(state.direction, requested);
    }
}
