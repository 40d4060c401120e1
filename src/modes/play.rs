use anyhow::{Context, Result, bail};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{Stderr, stderr};

use crate::game::{ConfigOverrides, Difficulty, Direction, GameConfig, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::TuiRenderer;
use crate::session::{Renderer, Session, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu { selected: usize },
    Playing,
    Result { score: u32 },
}

/// Keyboard-driven play: menu, game, result, back to the menu.
pub struct PlayMode {
    session: Session,
    presets: Vec<(Difficulty, GameConfig)>,
    input_handler: InputHandler,
    screen: Screen,
    /// Config to launch straight into, skipping the menu once
    initial: Option<GameConfig>,
    should_quit: bool,
}

impl PlayMode {
    /// Each menu preset is the difficulty's speed and cell size with
    /// `overrides` (config file and flags) on top, so a pinned value holds for
    /// every game of the run. Presets that do not fit the board are left out.
    pub fn new(
        overrides: ConfigOverrides,
        initial: Option<GameConfig>,
        seed: Option<u64>,
    ) -> Result<Self> {
        let base = overrides.base();
        let presets: Vec<_> = Difficulty::ALL
            .iter()
            .map(|difficulty| (*difficulty, overrides.preset(*difficulty)))
            .filter(|(difficulty, config)| match config.validate() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("dropping {} preset: {:#}", difficulty.label(), err);
                    false
                }
            })
            .collect();

        if let Some(config) = &initial {
            config.validate().context("Invalid game configuration")?;
        } else if presets.is_empty() {
            bail!(
                "no difficulty preset fits a {}x{} board",
                base.board_width,
                base.board_height
            );
        }

        let session = match seed {
            Some(seed) => Session::seeded(seed, &base),
            None => Session::random(&base),
        };

        Ok(Self {
            session,
            presets,
            input_handler: InputHandler::new(),
            screen: Screen::Menu { selected: 0 },
            initial,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        let mut renderer = TuiRenderer::new(terminal);

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut renderer).await;

        // Cleanup terminal
        cleanup_terminal(renderer.terminal_mut())?;

        if renderer.games_played() > 0 {
            log::info!(
                "played {} games, best score {}",
                renderer.games_played(),
                renderer.best_score()
            );
        }

        result
    }

    pub fn presets(&self) -> &[(Difficulty, GameConfig)] {
        &self.presets
    }

    async fn run_game_loop(
        &mut self,
        renderer: &mut TuiRenderer<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        match self.initial.take() {
            Some(config) => self.start_game(&config, renderer)?,
            None => self.redraw(renderer)?,
        }

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, renderer)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick; parked while no session is running
                _ = self.session.next_tick() => {
                    self.update_game(renderer)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.session.stop_session();
        Ok(())
    }

    fn handle_event<B: Backend>(
        &mut self,
        event: Event,
        renderer: &mut TuiRenderer<B>,
    ) -> Result<()> {
        match event {
            Event::Resize(_, _) => self.redraw(renderer),
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action, renderer)
            }
            _ => Ok(()),
        }
    }

    fn apply<B: Backend>(
        &mut self,
        action: KeyAction,
        renderer: &mut TuiRenderer<B>,
    ) -> Result<()> {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        match self.screen {
            Screen::Menu { selected } => match action {
                KeyAction::Turn(Direction::Up) => {
                    self.screen = Screen::Menu {
                        selected: selected.saturating_sub(1),
                    };
                    self.redraw(renderer)?;
                }
                KeyAction::Turn(Direction::Down) => {
                    self.screen = Screen::Menu {
                        selected: (selected + 1).min(self.presets.len().saturating_sub(1)),
                    };
                    self.redraw(renderer)?;
                }
                KeyAction::Confirm => self.start_preset(selected, renderer)?,
                KeyAction::Pick(index) => self.start_preset(index, renderer)?,
                _ => {}
            },
            Screen::Playing => match action {
                KeyAction::Turn(direction) => {
                    self.session.set_direction(direction);
                }
                KeyAction::Restart => {
                    self.session.stop_session();
                    self.show_menu(renderer)?;
                }
                _ => {}
            },
            Screen::Result { .. } => {
                if matches!(action, KeyAction::Restart | KeyAction::Confirm) {
                    self.show_menu(renderer)?;
                }
            }
        }

        Ok(())
    }

    fn start_preset<B: Backend>(
        &mut self,
        index: usize,
        renderer: &mut TuiRenderer<B>,
    ) -> Result<()> {
        let Some((difficulty, config)) = self.presets.get(index).cloned() else {
            return Ok(());
        };
        log::info!("starting {} game", difficulty.label());
        self.start_game(&config, renderer)
    }

    fn start_game<B: Backend>(
        &mut self,
        config: &GameConfig,
        renderer: &mut TuiRenderer<B>,
    ) -> Result<()> {
        self.session.start_session(config);
        self.screen = Screen::Playing;
        self.redraw(renderer)
    }

    fn show_menu<B: Backend>(&mut self, renderer: &mut TuiRenderer<B>) -> Result<()> {
        self.screen = Screen::Menu { selected: 0 };
        self.redraw(renderer)
    }

    fn update_game<B: Backend>(&mut self, renderer: &mut TuiRenderer<B>) -> Result<()> {
        let outcome = self
            .session
            .tick_and_present(renderer)
            .context("Failed to draw frame")?;

        if let Some(StepOutcome::SessionEnded { score }) = outcome {
            self.screen = Screen::Result { score };
        }

        Ok(())
    }

    fn redraw<B: Backend>(&mut self, renderer: &mut TuiRenderer<B>) -> Result<()> {
        let drawn = match self.screen {
            Screen::Menu { selected } => renderer.draw_menu(&self.presets, selected),
            Screen::Playing => match self.session.state() {
                Some(state) => renderer.render(&Snapshot::of(state)),
                None => Ok(()),
            },
            Screen::Result { score } => renderer.draw_result(score),
        };
        drawn.context("Failed to draw frame")
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
