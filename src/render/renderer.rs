use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// What a board cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Snake,
    Food,
}

/// Classify a board cell. A snake segment hides food lying under it.
pub fn cell_at(state: &GameState, pos: Position) -> Cell {
    if state.snake.occupies(pos) {
        Cell::Snake
    } else if pos == state.food {
        Cell::Food
    } else {
        Cell::Empty
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        board_size: usize,
        metrics: &GameMetrics,
    ) {
        let area = frame.area();
        let cells = board_cells(board_size);
        // Header, status and footer keep their rows; the board gets the rest
        let board_height = cells.saturating_add(2).min(area.height.saturating_sub(4));
        let [header, board, status, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(board_height),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(self.render_stats(state, metrics), header);

        // Two columns per cell plus the border
        let board_width = cells.saturating_mul(2).saturating_add(2).min(area.width);
        let [board] = Layout::horizontal([Constraint::Length(board_width)])
            .flex(Flex::Center)
            .areas(board);
        frame.render_widget(self.render_grid(state, board_size, board), board);

        frame.render_widget(self.render_status(state), status);
        frame.render_widget(self.render_controls(), footer);
    }

    fn render_grid(&self, state: &GameState, board_size: usize, area: Rect) -> Paragraph<'static> {
        let head = state.snake.head();
        let border_color = if state.alive { Color::White } else { Color::Red };

        // Cells beyond the visible area would be clipped anyway
        let rows = board_size.min(area.height.saturating_sub(2) as usize);
        let cols = board_size.min((area.width.saturating_sub(2) / 2) as usize);

        let lines: Vec<Line> = (0..rows as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..cols as i32)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        match cell_at(state, pos) {
                            Cell::Snake if pos == head => Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Cell::Snake => Span::styled("□ ", Style::default().fg(Color::Green)),
                            Cell::Food => Span::styled(
                                "● ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            ),
                            Cell::Empty => {
                                Span::styled("· ", Style::default().fg(Color::DarkGray))
                            }
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.max(state.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, state: &GameState) -> Paragraph<'static> {
        if state.alive {
            return Paragraph::new("");
        }

        let text = vec![
            Line::from(Span::styled(
                format!("GAME OVER - final score {}", state.score),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Board side length in terminal rows, clamped to what a terminal can address
fn board_cells(board_size: usize) -> u16 {
    u16::try_from(board_size).unwrap_or(u16::MAX)
}

/// Smallest terminal area that fits the whole layout
pub fn required_area(board_size: usize) -> Rect {
    let cells = board_cells(board_size);
    let width = cells.saturating_mul(2).saturating_add(2).max(50);
    let height = cells.saturating_add(6);
    Rect::new(0, 0, width, height)
}
