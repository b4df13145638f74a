use std::error::Error;
use std::fs::OpenOptions;
use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use env_logger::Env;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::{POLL_INTERVAL_MS, Settings};
use crate::game::{Game, GameEvent, Intent};
use crate::highscore::HighScore;
use crate::ui::{View, draw_game};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// What a key press asks the loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Intent),
    Restart,
    Quit,
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    let intent = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('r') => return Some(Command::Restart),
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Down => Intent::SoftDrop,
        KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Up | KeyCode::Char('x') => Intent::RotateClockwise,
        KeyCode::Char('z') | KeyCode::Char('m') => Intent::RotateCounterClockwise,
        _ => return None,
    };
    Some(Command::Play(intent))
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env();
    init_logging(&settings)?;
    log::info!(
        "starting on {}x{} arena, drop every {:?}",
        settings.width,
        settings.height,
        settings.drop_interval
    );

    let mut highscore = HighScore::load(&settings.highscore_path);
    let mut tui = TuiGuard::new()?;
    let result = run_loop(tui.terminal_mut(), &settings, &mut highscore);
    drop(tui);

    if let Err(err) = highscore.save() {
        log::warn!("could not save high score: {err}");
    }
    result
}

fn run_loop(
    terminal: &mut Term,
    settings: &Settings,
    highscore: &mut HighScore,
) -> Result<(), Box<dyn Error>> {
    let mut game = Game::new(settings);
    let mut last_frame = Instant::now();

    loop {
        let snapshot = game.snapshot();
        let ghost = game.ghost_piece();
        let view = View {
            snapshot: &snapshot,
            ghost: Some((ghost.x, ghost.y)),
            best: highscore.best().max(game.score),
        };
        terminal.draw(|frame| draw_game(frame, &view))?;

        // Drain every pending key before gravity runs for this frame.
        let mut events = Vec::new();
        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            loop {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        match command_for_key(key.code) {
                            Some(Command::Quit) => {
                                highscore.submit(game.score);
                                return Ok(());
                            }
                            Some(Command::Restart) => {
                                if game.is_over() {
                                    game.restart();
                                }
                            }
                            Some(Command::Play(intent)) => events.extend(game.apply(intent)),
                            None => {}
                        }
                    }
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        events.extend(game.tick(now - last_frame));
        last_frame = now;

        for ev in events {
            handle_event(ev, &game, highscore);
        }
    }
}

fn handle_event(ev: GameEvent, game: &Game, highscore: &mut HighScore) {
    match ev {
        GameEvent::Locked { cleared } if cleared > 0 => {
            log::debug!("cleared {cleared} rows, score {}", game.score);
        }
        GameEvent::Locked { .. } => {}
        GameEvent::GameOver { score } => {
            if highscore.submit(score) {
                log::info!("new high score {score}");
                if let Err(err) = highscore.save() {
                    log::warn!("could not save high score: {err}");
                }
            }
        }
        GameEvent::ArenaReset => {
            log::info!("arena reset at score {}", game.score);
        }
    }
}

/// Log lines would corrupt the alternate screen, so they go to a file when
/// one is configured and are otherwise left to `RUST_LOG`.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let mut builder = match &settings.log_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let mut builder =
                env_logger::Builder::from_env(Env::default().default_filter_or("debug"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(Env::default().default_filter_or("off")),
    };
    builder.try_init()?;
    Ok(())
}

struct TuiGuard {
    terminal: Term,
}

impl TuiGuard {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(command_for_key(KeyCode::Left), Some(Command::Play(Intent::MoveLeft)));
        assert_eq!(command_for_key(KeyCode::Right), Some(Command::Play(Intent::MoveRight)));
        assert_eq!(command_for_key(KeyCode::Down), Some(Command::Play(Intent::SoftDrop)));
        assert_eq!(command_for_key(KeyCode::Up), Some(Command::Play(Intent::RotateClockwise)));
    }

    #[test]
    fn letter_keys() {
        assert_eq!(command_for_key(KeyCode::Char(' ')), Some(Command::Play(Intent::HardDrop)));
        assert_eq!(
            command_for_key(KeyCode::Char('m')),
            Some(Command::Play(Intent::RotateCounterClockwise))
        );
        assert_eq!(command_for_key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(command_for_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(command_for_key(KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(command_for_key(KeyCode::Char('k')), None);
    }

    #[test]
    fn game_over_event_updates_high_score() {
        let dir = std::env::temp_dir().join(format!("blockfall-app-{}", std::process::id()));
        let mut highscore = HighScore::load(dir.join("hs.json"));
        let game = Game::with_seed(1);
        handle_event(GameEvent::GameOver { score: 700 }, &game, &mut highscore);
        assert_eq!(highscore.best(), 700);
        handle_event(GameEvent::GameOver { score: 100 }, &game, &mut highscore);
        assert_eq!(highscore.best(), 700);
        let _ = std::fs::remove_dir_all(dir);
    }
}
