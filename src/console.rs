//! Plain terminal front end: one command per line in, a text board out.

use std::fmt::Write as _;

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt as _, BufReader},
    select,
};
use tracing::debug;

use crate::{
    game::{Color, Coord, BOARD_SIZE},
    protocol::{GameView, Presence, Status},
    state::{Command, GameSession},
};

pub const HELP: &str = "\
commands:
  <x> <y>   preview a stone at column x, row y (0-14)
  ok        place the previewed stone
  restart   start a new game for both of us
  invite    show the invite link again
  help      show this text
  quit      leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Invite,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` is not a coordinate between 0 and 14")]
    BadCoordinate(String),
}

pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => return Ok(Input::Nothing),
        "ok" | "confirm" | "y" => return Ok(Input::Command(Command::Confirm)),
        "restart" | "new" => return Ok(Input::Command(Command::Restart)),
        "invite" => return Ok(Input::Invite),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" | "q" => return Ok(Input::Quit),
        _ => {}
    }

    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [x, y] = parts.as_slice() else {
        return Err(InputError::Unknown(line.to_string()));
    };
    let axis = |part: &str| {
        part.parse::<u8>()
            .ok()
            .filter(|v| usize::from(*v) < BOARD_SIZE)
            .ok_or_else(|| InputError::BadCoordinate(part.to_string()))
    };
    Ok(Input::Command(Command::Propose(Coord::new(axis(x)?, axis(y)?))))
}

/// Draw the board with a status line underneath.
///
/// `x`/`o` are stones, capitals mark the winning line, `+` is the preview.
pub fn render(view: &GameView) -> String {
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE {
        let _ = write!(out, "{x:>3}");
    }
    out.push('\n');
    for y in 0..BOARD_SIZE as u8 {
        let _ = write!(out, "{y:>3}");
        for x in 0..BOARD_SIZE as u8 {
            let coord = Coord::new(x, y);
            let cell = match view.game.board().get(coord) {
                Some(stone) => match (stone.color(), stone.in_winning_line) {
                    (Color::First, false) => 'x',
                    (Color::First, true) => 'X',
                    (Color::Second, false) => 'o',
                    (Color::Second, true) => 'O',
                },
                None if view.game.pending() == Some(coord) => '+',
                None => '.',
            };
            let _ = write!(out, "{cell:>3}");
        }
        out.push('\n');
    }
    out.push_str(&status_line(view));
    out
}

pub fn status_line(view: &GameView) -> String {
    let mut line = match view.status() {
        Status::Open => "board is open, place a stone to move first".to_string(),
        Status::YourTurn => format!("your turn ({})", stone_name(view)),
        Status::Waiting => "waiting for the opponent".to_string(),
        Status::Won => "you won! type `restart` for another game".to_string(),
        Status::Lost => "you lost. type `restart` for another game".to_string(),
    };
    match view.presence() {
        Presence::Present => {}
        Presence::Absent => line.push_str(" | nobody here yet, share the invite"),
        Presence::Offline => line.push_str(" | opponent is offline"),
    }
    if let Some(hint) = view.hint {
        let _ = write!(line, " | {hint}");
    }
    line
}

fn stone_name(view: &GameView) -> &'static str {
    match view.hand.color() {
        Some(Color::First) => "x",
        Some(Color::Second) => "o",
        None => "?",
    }
}

/// Read commands from stdin and redraw on every change, until `quit` or the
/// session ends.
pub async fn run(session: &GameSession, invite: &str) -> Result<()> {
    let mut views = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("invite: {invite}\n\n{HELP}\n");
    println!("{}", render(&session.view()));
    loop {
        select! {
            changed = views.changed() => {
                if changed.is_err() {
                    debug!("game session ended");
                    break;
                }
                let view = views.borrow_and_update().clone();
                println!("{}", render(&view));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Input::Command(command)) => session.send(command).await?,
                    Ok(Input::Invite) => println!("{invite}"),
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Ok(Input::Nothing) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::MoveError,
        protocol::{Peer, Session},
    };

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_line("7 7"),
            Ok(Input::Command(Command::Propose(Coord::new(7, 7))))
        );
        assert_eq!(
            parse_line(" 3,14 "),
            Ok(Input::Command(Command::Propose(Coord::new(3, 14))))
        );
        assert_eq!(parse_line("OK"), Ok(Input::Command(Command::Confirm)));
        assert_eq!(parse_line("restart"), Ok(Input::Command(Command::Restart)));
        assert_eq!(parse_line(""), Ok(Input::Nothing));
        assert_eq!(parse_line("q"), Ok(Input::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_line("15 2"),
            Err(InputError::BadCoordinate("15".into()))
        );
        assert_eq!(
            parse_line("-1 2"),
            Err(InputError::BadCoordinate("-1".into()))
        );
        assert!(matches!(parse_line("1 2 3"), Err(InputError::Unknown(_))));
        assert!(matches!(parse_line("dance"), Err(InputError::Unknown(_))));
    }

    #[test]
    fn renders_stones_preview_and_status() {
        let mut a = Peer::new(Session::new("a", "room"));
        a.on_member_joined("b");
        a.propose(Coord::new(0, 0)).unwrap();
        a.confirm().unwrap();
        a.apply(crate::protocol::Message::MoveCommitted(Coord::new(1, 0)));
        a.propose(Coord::new(2, 0)).unwrap();

        let text = render(&a.view().with_hint(Some(MoveError::OccupiedCell)));
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("  0  x  o  +  ."));
        assert!(text.ends_with("your turn (x) | that point is already taken"));
    }

    #[test]
    fn status_mentions_missing_opponent() {
        let a = Peer::new(Session::new("a", "room"));
        assert_eq!(
            status_line(&a.view()),
            "board is open, place a stone to move first | nobody here yet, share the invite"
        );
    }
}
