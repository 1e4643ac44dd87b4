//! Codec protocol command parser.
//!
//! Parses incoming protocol commands from raw text into structured
//! `Command` variants that the main loop can dispatch on.

use log::warn;

/// Where a `position` command takes its position from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    /// The standard starting position.
    StartPos,
    /// A full six-field FEN string.
    Fen(String),
}

/// A parsed client-to-codec command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake; the codec replies with id and option lines.
    Codec,

    /// Synchronization ping; the codec must reply `readyok`.
    IsReady,

    /// Set a codec option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Set the current position.
    Position(PositionSpec),

    /// Encode a UCI move played in the current position.
    Encode { uci: String },

    /// Decode a policy index in the context of the current position.
    Decode { index: usize },

    /// Report per-plane sums of the current position's encoding.
    Planes,

    /// Terminate the codec process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "codec" => Some(Command::Codec),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "planes" => Some(Command::Planes),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "encode" => parse_encode(&tokens),
        "decode" => parse_decode(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position startpos` or `position fen <six fields>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        Some(&"startpos") => Some(Command::Position(PositionSpec::StartPos)),
        Some(&"fen") if tokens.len() > 2 => {
            // FEN fields are re-joined; field validation happens when the
            // position is applied.
            Some(Command::Position(PositionSpec::Fen(tokens[2..].join(" "))))
        }
        _ => {
            warn!("malformed position: expected 'position startpos' or 'position fen <fen>'");
            None
        }
    }
}

/// Parses `encode <uci>`.
fn parse_encode(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed encode: expected 'encode <uci>'");
        return None;
    }
    Some(Command::Encode {
        uci: tokens[1].to_string(),
    })
}

/// Parses `decode <index>`.
fn parse_decode(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed decode: expected 'decode <index>'");
        return None;
    }
    match tokens[1].parse::<usize>() {
        Ok(index) => Some(Command::Decode { index }),
        Err(_) => {
            warn!("invalid policy index: '{}'", tokens[1]);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("codec"), Some(Command::Codec));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("planes"), Some(Command::Planes));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name StrictCastling value true"),
            Some(Command::SetOption {
                name: "StrictCastling".to_string(),
                value: Some("true".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name StrictCastling"),
            Some(Command::SetOption {
                name: "StrictCastling".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_position_startpos() {
        assert_eq!(
            parse_command("position startpos"),
            Some(Command::Position(PositionSpec::StartPos))
        );
    }

    #[test]
    fn parse_position_fen_rejoins_fields() {
        let fen = "8/4k3/8/8/8/8/3K4/8 w - - 0 1";
        assert_eq!(
            parse_command(&format!("position fen {}", fen)),
            Some(Command::Position(PositionSpec::Fen(fen.to_string())))
        );
        assert_eq!(
            parse_command("position   fen  8/8/8/8/8/8/8/8   w - -  0 1"),
            Some(Command::Position(PositionSpec::Fen(
                "8/8/8/8/8/8/8/8 w - - 0 1".to_string()
            )))
        );
    }

    #[test]
    fn parse_position_malformed_returns_none() {
        assert_eq!(parse_command("position"), None);
        assert_eq!(parse_command("position fen"), None);
        assert_eq!(parse_command("position somewhere"), None);
    }

    #[test]
    fn parse_encode_and_decode() {
        assert_eq!(
            parse_command("encode e2e4"),
            Some(Command::Encode {
                uci: "e2e4".to_string()
            })
        );
        assert_eq!(parse_command("decode 877"), Some(Command::Decode { index: 877 }));
    }

    #[test]
    fn parse_encode_decode_malformed() {
        assert_eq!(parse_command("encode"), None);
        assert_eq!(parse_command("encode e2e4 e7e5"), None);
        assert_eq!(parse_command("decode"), None);
        assert_eq!(parse_command("decode -1"), None);
        assert_eq!(parse_command("decode abc"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  codec  "), Some(Command::Codec));
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }
}
