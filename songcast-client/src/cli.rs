use songcast_protocol::{Command, encode};
use thiserror::Error;

/// A line typed at the prompt.
#[derive(PartialEq, Debug, Eq)]
pub enum UserCommand {
    List,
    Play(String),
    Stop,
    Quit,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("{0}: missing song name or index")]
    MissingTarget(String),
    #[error("{0:?} cannot be sent as a song name")]
    InvalidTarget(String),
    #[error("Unknown command: {0}")]
    Unknown(String),
}

/// Parse a prompt line. Everything after `play` is the target, so song names
/// may contain spaces.
pub fn parse_command(line: &str) -> Result<UserCommand, ParseError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => Err(ParseError::Empty),
        "list" | "l" => Ok(UserCommand::List),
        "play" | "p" if rest.is_empty() => Err(ParseError::MissingTarget(command.to_string())),
        "play" | "p" if encode(&Command::play(rest)).is_err() => {
            Err(ParseError::InvalidTarget(rest.to_string()))
        }
        "play" | "p" => Ok(UserCommand::Play(rest.to_string())),
        "stop" | "s" => Ok(UserCommand::Stop),
        "quit" | "q" | "exit" => Ok(UserCommand::Quit),
        "help" | "h" => Ok(UserCommand::Help),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
