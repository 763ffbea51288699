use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use evosnake_engine::{Direction, Frontend, Game, Polled, Steering};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};

use crate::ui::widgets::{BoardDisplay, KeyBindingDisplay, SnakeStatsDisplay};

/// Frontend drawing the game with ratatui and reading keys with crossterm.
///
/// Keyboard steering always targets slot 0.
pub struct TerminalFrontend<'a> {
    terminal: &'a mut DefaultTerminal,
    title: String,
    human: bool,
}

impl<'a> TerminalFrontend<'a> {
    pub fn new(terminal: &'a mut DefaultTerminal, title: String, human: bool) -> Self {
        Self {
            terminal,
            title,
            human,
        }
    }
}

fn render(frame: &mut Frame, game: &Game, title: &str, human: bool) {
    let board = BoardDisplay::new(game).block(BlockWidget::bordered().title(title));
    let stats = SnakeStatsDisplay::new(game).block(BlockWidget::bordered().title("SNAKES"));
    let keys = KeyBindingDisplay::for_play(human);

    let [main_area, keys_area] = frame.area().layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(KeyBindingDisplay::HEIGHT),
    ]));
    let [board_area, stats_area] = main_area.layout(
        &Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1),
    );
    let [board_area] = board_area.layout(&Layout::vertical([Constraint::Length(board.height())]));
    let [stats_area] = stats_area.layout(&Layout::vertical([Constraint::Length(stats.height())]));

    frame.render_widget(board, board_area);
    frame.render_widget(stats, stats_area);
    frame.render_widget(keys, keys_area);
}

impl Frontend for TerminalFrontend<'_> {
    fn draw(&mut self, game: &Game) -> io::Result<()> {
        let Self {
            terminal,
            title,
            human,
        } = self;
        terminal.draw(|frame| render(frame, game, title, *human))?;
        Ok(())
    }

    fn poll_input(&mut self, timeout: Duration) -> io::Result<Polled> {
        if !event::poll(timeout)? {
            return Ok(Polled::IDLE);
        }
        match event::read()? {
            Event::Key(key) => Ok(key_to_polled(key)),
            _ => Ok(Polled::IDLE),
        }
    }
}

/// Maps a key press onto the play loop's input.
pub fn key_to_polled(key: KeyEvent) -> Polled {
    if key.kind != KeyEventKind::Press {
        return Polled::IDLE;
    }
    let direction = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Polled::QUIT,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Polled::QUIT;
        }
        KeyCode::Up | KeyCode::Char('w' | 'W') => Direction::Up,
        KeyCode::Right | KeyCode::Char('d' | 'D') => Direction::Right,
        KeyCode::Down | KeyCode::Char('s' | 'S') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A') => Direction::Left,
        _ => return Polled::IDLE,
    };
    Polled {
        keep_running: true,
        steering: Some(Steering {
            player: 0,
            direction,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_and_wasd_steer_slot_zero() {
        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('d'), Direction::Right),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('A'), Direction::Left),
        ];
        for (code, direction) in cases {
            let polled = key_to_polled(press(code));
            assert!(polled.keep_running);
            assert_eq!(
                polled.steering,
                Some(Steering {
                    player: 0,
                    direction
                })
            );
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_polled(press(KeyCode::Char('q'))), Polled::QUIT);
        assert_eq!(key_to_polled(press(KeyCode::Esc)), Polled::QUIT);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_polled(ctrl_c), Polled::QUIT);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(key_to_polled(press(KeyCode::Char('x'))), Polled::IDLE);
        let release = KeyEvent::new_with_kind(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(key_to_polled(release), Polled::IDLE);
    }
}
