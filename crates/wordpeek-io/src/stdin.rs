use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, BufReader};
use wordpeek_types::{AppEvent, HostEvent, SelectionEvent};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command `{0}`, try: select, click, esc, key, close, audio, nav, hide, show, toggle, on, off, quit")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid coordinate `{0}`")]
    InvalidCoordinate(String),
}

/// Split off the first word, returning it and the untouched rest
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(i) => Some((&input[..i], &input[i..])),
        None => Some((input, "")),
    }
}

fn coordinate(word: &str) -> Result<f64, InputParseError> {
    word.parse()
        .map_err(|_| InputParseError::InvalidCoordinate(word.to_string()))
}

fn point(command: &'static str, rest: &str) -> Result<(f64, f64, String), InputParseError> {
    let missing = InputParseError::MissingArgument {
        command,
        expected: "<x> <y>",
    };
    let (x, rest) = next_word(rest).ok_or(missing.clone())?;
    let (y, rest) = next_word(rest).ok_or(missing)?;
    Ok((coordinate(x)?, coordinate(y)?, rest.trim().to_string()))
}

fn host(event: HostEvent) -> Result<AppEvent, InputParseError> {
    Ok(AppEvent::Host(event))
}

/// Parse one line of the stdin protocol.
///
/// `select <x> <y> <text...>` emits a selection (empty text is a collapsed
/// selection), `click <x> <y>` a pointer-down, the other commands map to a
/// single event each.
pub fn parse_command(line: &str) -> Result<AppEvent, InputParseError> {
    let (command, rest) = next_word(line).ok_or(InputParseError::Empty)?;

    match command.to_lowercase().as_str() {
        "select" | "s" => {
            let (x, y, text) = point("select", rest)?;
            host(HostEvent::SelectionEnd(SelectionEvent::new(text, x, y)))
        }
        "click" | "c" => {
            let (x, y, _) = point("click", rest)?;
            host(HostEvent::PointerDown { x, y })
        }
        "esc" | "escape" => host(HostEvent::KeyDown {
            key: "Escape".to_string(),
        }),
        "key" => {
            let (key, _) = next_word(rest).ok_or(InputParseError::MissingArgument {
                command: "key",
                expected: "<key name>",
            })?;
            host(HostEvent::KeyDown {
                key: key.to_string(),
            })
        }
        "close" => host(HostEvent::CloseClicked),
        "audio" => host(HostEvent::AudioClicked),
        "nav" => host(HostEvent::Navigation),
        "hide" => host(HostEvent::VisibilityChanged { hidden: true }),
        "show" => host(HostEvent::VisibilityChanged { hidden: false }),
        "toggle" => Ok(AppEvent::ToggleEnabled),
        "on" => Ok(AppEvent::SetEnabled(true)),
        "off" => Ok(AppEvent::SetEnabled(false)),
        "quit" | "exit" => Ok(AppEvent::Quit),
        other => Err(InputParseError::UnknownCommand(other.to_string())),
    }
}

/// Reads commands from stdin until EOF
pub async fn read_stdin(event_tx: AsyncSender<AppEvent>) -> Result<(), anyhow::Error> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(event) => event_tx.send(event).await?,
            Err(InputParseError::Empty) => {}
            Err(e) => tracing::warn!("{}", e),
        }
    }

    tracing::info!("stdin closed");
    Ok(())
}
