use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::game::{Direction, GameEngine, GameState, StepEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{required_area, Renderer};

const RENDER_PERIOD: Duration = Duration::from_millis(33);

/// The game ticker, tagged with the game it belongs to
struct GameTicker {
    game: u64,
    interval: Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickerAction {
    Keep,
    Start,
    Stop,
}

/// One ticker per live game: started when a game becomes active, dropped on
/// game over, replaced when a restart begins a new game.
fn ticker_action(alive: bool, ticker_game: Option<u64>, current_game: u64) -> TickerAction {
    match (alive, ticker_game) {
        (false, Some(_)) => TickerAction::Stop,
        (false, None) => TickerAction::Keep,
        (true, Some(game)) if game == current_game => TickerAction::Keep,
        (true, _) => TickerAction::Start,
    }
}

async fn next_tick(ticker: &mut Option<GameTicker>) {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Interactive keyboard-driven game in the terminal
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Incremented on every restart
    game: u64,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            game: 0,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let needed = required_area(self.engine.config().board_size);
        match terminal.size() {
            Ok(size) if size.width < needed.width || size.height < needed.height => {
                warn!(
                    width = size.width,
                    height = size.height,
                    needed_width = needed.width,
                    needed_height = needed.height,
                    "Terminal is smaller than the board layout"
                );
            }
            Ok(_) => {}
            Err(err) => warn!(%err, "Could not query terminal size"),
        }

        info!(
            board_size = self.engine.config().board_size,
            tick_ms = self.engine.config().tick_ms,
            "Game started"
        );

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even when the loop failed
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            best_score = self.metrics.best_score,
            "Quit"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker: Option<GameTicker> = None;
        let mut render_timer = interval(RENDER_PERIOD);

        loop {
            self.sync_ticker(&mut ticker);

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = next_tick(&mut ticker) => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.refresh_clock();
                    let board_size = self.engine.config().board_size;
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, board_size, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn sync_ticker(&self, ticker: &mut Option<GameTicker>) {
        let ticker_game = ticker.as_ref().map(|t| t.game);
        match ticker_action(self.state.alive, ticker_game, self.game) {
            TickerAction::Keep => {}
            TickerAction::Stop => *ticker = None,
            TickerAction::Start => {
                let period = self.engine.config().tick_period();
                // First step happens one full period after the game starts
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(GameTicker {
                    game: self.game,
                    interval,
                });
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => self.turn(direction),
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// Direction requests are validated the moment they arrive. A finished
    /// game ignores them until restart.
    fn turn(&mut self, direction: Direction) {
        if self.state.alive {
            self.engine.request_direction(&mut self.state, direction);
        }
    }

    /// The elapsed time stops on game over and restarts with the next game
    fn refresh_clock(&mut self) {
        if self.state.alive {
            self.metrics.update();
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.step(&self.state);

        if let StepEvent::Collided(_) = result.event {
            self.metrics.on_game_over(result.state.score);
        }

        self.state = result.state;
    }

    fn reset_game(&mut self) {
        if self.state.alive {
            // Abandoned mid-game
            self.metrics.on_game_over(self.state.score);
        }
        self.state = self.engine.reset();
        self.game += 1;
        self.metrics.on_game_start();
        info!(game = self.game, "Game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(GameEngine::with_seed(GameConfig::default(), 1))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.state().alive);
        assert_eq!(mode.state().score, 0);
        assert_eq!(mode.state().snake.segments(), &[Position::new(0, 0)]);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.score = 10;
        mode.state.alive = false;

        mode.handle_event(key(KeyCode::Char('r')));

        assert_eq!(mode.state, mode.engine.reset());
        assert_eq!(mode.game, 1);
    }

    #[test]
    fn test_reversal_dropped_at_input_time() {
        let mut mode = mode();

        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.state.direction, Direction::Right);

        mode.handle_event(key(KeyCode::Down));
        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.state.direction, Direction::Down);
    }

    #[test]
    fn test_ticks_move_the_snake() {
        let mut mode = mode();

        mode.update_game();
        mode.update_game();

        assert_eq!(mode.state.snake.head(), Position::new(2, 0));
    }

    #[test]
    fn test_game_over_is_recorded_and_frozen() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up));

        mode.update_game();
        assert!(!mode.state.alive);
        assert_eq!(mode.metrics.games_played, 1);

        // Input after game over leaves the state alone
        mode.handle_event(key(KeyCode::Right));
        assert_eq!(mode.state.direction, Direction::Up);
    }

    #[test]
    fn test_clock_frozen_after_game_over() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();
        assert!(!mode.state.alive);

        mode.metrics.elapsed_time = Duration::from_secs(42);
        mode.refresh_clock();
        assert_eq!(mode.metrics.elapsed_time, Duration::from_secs(42));

        mode.reset_game();
        mode.refresh_clock();
        assert!(mode.metrics.elapsed_time < Duration::from_secs(42));
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_ticker_lifecycle() {
        assert_eq!(ticker_action(true, None, 0), TickerAction::Start);
        assert_eq!(ticker_action(true, Some(0), 0), TickerAction::Keep);
        assert_eq!(ticker_action(false, Some(0), 0), TickerAction::Stop);
        assert_eq!(ticker_action(false, None, 0), TickerAction::Keep);
        // Restart mid-game replaces the ticker
        assert_eq!(ticker_action(true, Some(0), 1), TickerAction::Start);
    }

    #[tokio::test]
    async fn test_sync_ticker_follows_game_state() {
        let mut mode = mode();
        let mut ticker = None;

        mode.sync_ticker(&mut ticker);
        assert!(ticker.is_some());

        mode.state.alive = false;
        mode.sync_ticker(&mut ticker);
        assert!(ticker.is_none());

        mode.reset_game();
        mode.sync_ticker(&mut ticker);
        assert_eq!(ticker.as_ref().map(|t| t.game), Some(1));
    }
}
