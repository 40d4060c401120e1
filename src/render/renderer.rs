use std::collections::HashSet;
use std::io;

use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Difficulty, GameConfig, Position};
use crate::session::{self, Snapshot};

/// Draws the menu, the board and the result screen into a ratatui terminal.
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    best_score: u32,
    games_played: u32,
}

impl<B: Backend> TuiRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            best_score: 0,
            games_played: 0,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Best score of this run; nothing is kept between runs
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn draw_menu(
        &mut self,
        presets: &[(Difficulty, GameConfig)],
        selected: usize,
    ) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let [header, body, footer] = layout(frame.area());
            frame.render_widget(title_line("Choose a difficulty"), header);
            frame.render_widget(menu_widget(presets, selected), body);
            frame.render_widget(menu_controls(), footer);
        })?;
        Ok(())
    }

    pub fn draw_board(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let best = self.best_score;
        self.terminal.draw(|frame| {
            let [header, body, footer] = layout(frame.area());
            frame.render_widget(stats_widget(snapshot.score, best), header);
            frame.render_widget(board_widget(snapshot), centered(body));
            frame.render_widget(game_controls(), footer);
        })?;
        Ok(())
    }

    pub fn draw_result(&mut self, score: u32) -> io::Result<()> {
        let best = self.best_score;
        self.terminal.draw(|frame| {
            let [header, body, footer] = layout(frame.area());
            frame.render_widget(stats_widget(score, best), header);
            frame.render_widget(result_widget(score, best), centered(body));
            frame.render_widget(result_controls(), footer);
        })?;
        Ok(())
    }
}

impl<B: Backend> session::Renderer for TuiRenderer<B> {
    type Error = io::Error;

    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.draw_board(snapshot)
    }

    fn session_ended(&mut self, final_score: u32) -> io::Result<()> {
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
        self.draw_result(final_score)
    }
}

fn layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn centered(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(area)[1]
}

fn board_widget(snapshot: &Snapshot<'_>) -> Paragraph<'static> {
    let grid = snapshot.grid;
    let head = snapshot.snake.head();
    let tail = snapshot.snake.tail();
    let body: HashSet<Position> = snapshot.snake.segments().skip(1).copied().collect();

    let mut lines = Vec::with_capacity(grid.rows() as usize);
    for row in 0..grid.rows() {
        let mut spans = Vec::with_capacity(grid.columns() as usize);

        for col in 0..grid.columns() {
            let pos = grid.cell(col, row);

            let cell = if pos == head {
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                )
            } else if pos == tail && body.contains(&pos) {
                Span::styled("▪ ", Style::default().fg(Color::LightBlue))
            } else if body.contains(&pos) {
                Span::styled("□ ", Style::default().fg(Color::Cyan))
            } else if pos == snapshot.apple {
                Span::styled(
                    "● ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(". ", Style::default().fg(Color::Green))
            };

            spans.push(cell);
        }

        lines.push(Line::from(spans));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
        .alignment(Alignment::Center)
}

fn stats_widget(score: u32, best: u32) -> Paragraph<'static> {
    let text = vec![Line::from(vec![
        Span::styled("Score: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            score.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("Best: ", Style::default().fg(Color::Yellow)),
        Span::styled(best.to_string(), Style::default().fg(Color::White)),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn title_line(title: &'static str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
}

fn menu_widget(presets: &[(Difficulty, GameConfig)], selected: usize) -> Paragraph<'static> {
    let mut lines = vec![Line::from("")];

    for (i, (difficulty, config)) in presets.iter().enumerate() {
        let grid = config.grid();
        let label = format!(
            "{}. {:<7} {:>4} ms   {}x{} cells",
            i + 1,
            difficulty.label(),
            config.tick_interval_ms,
            grid.columns(),
            grid.rows()
        );
        let style = if i == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Snake "),
    )
}

fn result_widget(score: u32, best: u32) -> Paragraph<'static> {
    let mut text = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("Game over! Score: {}", score),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    if score > 0 && score >= best {
        text.push(Line::from(Span::styled(
            "New best!",
            Style::default().fg(Color::Yellow),
        )));
        text.push(Line::from(""));
    }
    text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            "R",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to return to the menu or ", Style::default().fg(Color::Gray)),
        Span::styled(
            "Q",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to quit", Style::default().fg(Color::Gray)),
    ]));

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
}

fn game_controls() -> Paragraph<'static> {
    let text = vec![Line::from(vec![
        Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("WASD", Style::default().fg(Color::Cyan)),
        Span::raw(" to move | "),
        Span::styled("R", Style::default().fg(Color::Green)),
        Span::raw(" menu | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn menu_controls() -> Paragraph<'static> {
    let text = vec![Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::raw(" + "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("1-4", Style::default().fg(Color::Cyan)),
        Span::raw(" to start | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn result_controls() -> Paragraph<'static> {
    let text = vec![Line::from(vec![
        Span::styled("R", Style::default().fg(Color::Green)),
        Span::raw(" / "),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" for the menu | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}
