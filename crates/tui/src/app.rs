use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use race20_core::{
    EventTag, GameSession, GameState, PlayerId, RollOutcome, SeededDice, SessionError,
    SessionStore, Space,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const BOARD_COLUMNS: usize = 5;

#[derive(Debug, Clone)]
struct Theme {
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    player_one: Color,
    player_two: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            player_one: Color::Blue,
            player_two: Color::Red,
        }
    }
}

impl Theme {
    fn player(&self, player: PlayerId) -> Color {
        match player {
            PlayerId::One => self.player_one,
            PlayerId::Two => self.player_two,
        }
    }

    fn event(&self, event: &EventTag) -> Color {
        match event {
            EventTag::Troll => self.warning,
            EventTag::Hotel => self.accent,
            EventTag::Shortcut => self.success,
            EventTag::Other(_) => self.muted,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal client playing one session from the store.
pub struct RaceApp {
    store: SessionStore,
    session: String,
    dice: SeededDice,
    theme: Theme,
    status: String,
    should_quit: bool,
}

impl RaceApp {
    pub fn new(store: SessionStore, session: String, dice: SeededDice) -> Self {
        Self {
            store,
            session,
            dice,
            theme: Theme::default(),
            status: String::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let snapshot = self.store.view(&self.session);
        self.status = format!(
            "Table '{}' ready • {} to start • seed {}",
            self.session,
            turn_label(&snapshot.state),
            self.dice.seed()
        );

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            let snapshot = self.store.view(&self.session);
            terminal.draw(|frame| self.draw(frame, &snapshot))?;
            if self.should_quit {
                break;
            }

            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) => {
                    if let Err(err) = self.handle_key(key) {
                        self.status = format!("Error: {err}");
                    }
                }
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        info!(session = %self.session, "Client closed");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => self.roll()?,
            KeyCode::Char('n') => self.new_game(),
            _ => {}
        }
        Ok(())
    }

    fn roll(&mut self) -> Result<()> {
        match self.store.roll(&self.session, &mut self.dice) {
            Ok(outcome) => {
                debug!(?outcome, "Roll handled");
                self.status = format!(
                    "[{}] {}",
                    Local::now().format("%H:%M:%S"),
                    describe_outcome(&outcome)
                );
                Ok(())
            }
            Err(err @ SessionError::UnknownSession(_)) => {
                warn!(%err, "Roll requested without a game; starting one");
                self.store.view(&self.session);
                self.status = "No game in progress; a new one has been set up.".to_string();
                Ok(())
            }
        }
    }

    fn new_game(&mut self) {
        let session = self.store.reset(&self.session);
        self.status = format!("New game • {} to start", turn_label(&session.state));
    }

    fn draw(&self, frame: &mut Frame, snapshot: &GameSession) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_header(frame, layout[0], &snapshot.state);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(layout[1]);
        self.render_board(frame, body[0], &snapshot.state);
        self.render_log(frame, body[1], &snapshot.state);

        self.render_status(frame, layout[2], snapshot);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &GameState) {
        let line = match state.winner() {
            Some(winner) => Line::from(Span::styled(
                format!("🎉 {winner} wins the game! 🎉"),
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(vec![
                Span::styled("Current Turn: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    turn_label(state),
                    Style::default().fg(state.turn.map_or(self.theme.muted, |p| self.theme.player(p))),
                ),
            ]),
        };
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("Race to 20"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, state: &GameState) {
        let block = Block::default().borders(Borders::ALL).title("Board");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let spaces: Vec<(Space, &[EventTag])> = self.store.board().spaces().collect();
        let rows = spaces.chunks(BOARD_COLUMNS).collect::<Vec<_>>();
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
            .split(inner);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let cell_areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, BOARD_COLUMNS as u32); BOARD_COLUMNS])
                .split(*row_area);
            for ((space, events), cell_area) in row.iter().zip(cell_areas.iter()) {
                self.render_space(frame, *cell_area, state, *space, events);
            }
        }
    }

    fn render_space(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &GameState,
        space: Space,
        events: &[EventTag],
    ) {
        let mut lines = Vec::new();
        let tokens: Vec<Span> = state
            .players_on(space)
            .map(|player| {
                Span::styled(
                    format!("{} ", token(player)),
                    Style::default()
                        .fg(self.theme.player(player))
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        if !tokens.is_empty() {
            lines.push(Line::from(tokens));
        }
        for event in events {
            lines.push(Line::from(Span::styled(
                event.label().to_string(),
                Style::default().fg(self.theme.event(event)),
            )));
        }

        let border = if space.is_finish() {
            Style::default().fg(self.theme.success)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Span::styled(
                        space.to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, state: &GameState) {
        let visible = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = log_tail(&state.log, visible)
            .iter()
            .map(|entry| ListItem::new(entry.as_str()))
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Game Log"));
        frame.render_widget(list, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, snapshot: &GameSession) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = format!(
            "r/space roll • n new game • q quit   ({} rolls since {})",
            snapshot.rolls,
            snapshot.created_at.with_timezone(&Local).format("%H:%M")
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn token(player: PlayerId) -> &'static str {
    match player {
        PlayerId::One => "P1",
        PlayerId::Two => "P2",
    }
}

fn turn_label(state: &GameState) -> String {
    state
        .turn
        .map(|player| player.to_string())
        .unwrap_or_else(|| "Game over".to_string())
}

fn log_tail(log: &[String], visible: usize) -> &[String] {
    &log[log.len().saturating_sub(visible)..]
}

fn describe_outcome(outcome: &RollOutcome) -> String {
    match outcome {
        RollOutcome::GameOver => "The game is over. Press n to play again.".to_string(),
        RollOutcome::Skipped { player } => format!("{player} is stuck at the Hotel."),
        RollOutcome::Tie { rolls } => format!("Both rolled {}; nobody moves.", rolls.player_one),
        RollOutcome::Moved {
            mover,
            rolls,
            position,
        } => format!(
            "{} vs {}: {mover} ends on space {position}.",
            rolls.player_one, rolls.player_two
        ),
        RollOutcome::Won { winner, .. } => format!("{winner} reaches space 20 and wins!"),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use race20_core::{BoardConfig, Rolls, ScriptedDice};

    fn app() -> RaceApp {
        RaceApp::new(
            SessionStore::new(BoardConfig::default()),
            "test".to_string(),
            SeededDice::new(1),
        )
    }

    #[test]
    fn log_tail_keeps_the_newest_entries() {
        let log: Vec<String> = (1..=5).map(|n| format!("entry {n}")).collect();
        assert_eq!(log_tail(&log, 2), &log[3..]);
        assert_eq!(log_tail(&log, 10), &log[..]);
        assert!(log_tail(&log, 0).is_empty());
    }

    #[test]
    fn outcomes_read_naturally() {
        let rolls = Rolls {
            player_one: 2,
            player_two: 5,
        };
        assert_eq!(
            describe_outcome(&RollOutcome::Moved {
                mover: PlayerId::Two,
                rolls,
                position: Space::new(6).unwrap(),
            }),
            "2 vs 5: Player 2 ends on space 6."
        );
        assert_eq!(
            describe_outcome(&RollOutcome::Skipped {
                player: PlayerId::One
            }),
            "Player 1 is stuck at the Hotel."
        );
    }

    #[test]
    fn roll_without_a_game_sets_one_up() -> Result<()> {
        let mut app = app();
        app.roll()?;
        assert_eq!(app.store.len(), 1);
        assert!(app.status.starts_with("No game in progress"));

        app.roll()?;
        assert_eq!(app.store.view("test").rolls, 1);
        Ok(())
    }

    #[test]
    fn keys_drive_the_session() -> Result<()> {
        let mut app = app();
        app.store.view("test");
        app.store
            .roll("test", &mut ScriptedDice::new([6, 1]))
            .context("scripted roll")?;

        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE))?;
        assert_eq!(app.store.view("test").state, GameState::new(PlayerId::One));

        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE))?;
        assert_eq!(app.store.view("test").rolls, 1);

        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))?;
        assert!(app.should_quit);
        Ok(())
    }
}
