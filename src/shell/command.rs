use crate::perft::MAX_PLY;

use super::options::parse_setoption;
use super::ShellError;

/// Where a `position` command starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSource {
    StartPos,
    Fen(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Uci,
    IsReady,
    SetOption { name: String, value: Option<String> },
    Position { source: PositionSource, moves: Vec<String> },
    Perft(usize),
    Divide(usize),
    Moves,
    Board,
    /// Optional node cap overriding the `SuiteMaxNodes` option.
    Suite(Option<u64>),
    Quit,
    Unknown(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return Ok(None);
    };

    let cmd = match head {
        "uci" => ShellCommand::Uci,
        "isready" => ShellCommand::IsReady,
        "setoption" => {
            let (name, value) = parse_setoption(&parts).ok_or(ShellError::MissingArgument {
                command: "setoption",
                what: "name",
            })?;
            ShellCommand::SetOption { name, value }
        }
        "position" | "p" => parse_position(&parts[1..])?,
        "perft" | "f" => ShellCommand::Perft(parse_depth("perft", parts.get(1))?),
        "divide" => ShellCommand::Divide(parse_depth("divide", parts.get(1))?),
        "moves" | "m" => ShellCommand::Moves,
        "board" | "b" => ShellCommand::Board,
        "suite" | "pt" => {
            let cap = parts
                .get(1)
                .map(|v| {
                    v.parse::<u64>().map_err(|_| ShellError::InvalidValue {
                        name: "max_nodes".to_string(),
                        value: (*v).to_string(),
                    })
                })
                .transpose()?;
            ShellCommand::Suite(cap)
        }
        "quit" | "q" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.trim().to_string()),
    };
    Ok(Some(cmd))
}

fn parse_depth(command: &'static str, arg: Option<&&str>) -> Result<usize, ShellError> {
    let text = arg.ok_or(ShellError::MissingArgument {
        command,
        what: "depth",
    })?;
    text.parse::<usize>()
        .ok()
        .filter(|&depth| depth <= MAX_PLY)
        .ok_or_else(|| ShellError::InvalidDepth((*text).to_string()))
}

/// `startpos|s [moves ...]` or `fen|f <4-6 fields> [moves ...]`.
fn parse_position(args: &[&str]) -> Result<ShellCommand, ShellError> {
    let missing = ShellError::MissingArgument {
        command: "position",
        what: "startpos or fen",
    };
    let (&kind, rest) = args.split_first().ok_or(missing)?;
    let split = rest
        .iter()
        .position(|&t| t == "moves")
        .unwrap_or(rest.len());
    let (fields, tail) = rest.split_at(split);
    let moves = tail.iter().skip(1).map(|m| (*m).to_string()).collect();

    let source = match kind {
        "startpos" | "s" => PositionSource::StartPos,
        "fen" | "f" => {
            if fields.is_empty() {
                return Err(ShellError::MissingArgument {
                    command: "position",
                    what: "fen",
                });
            }
            PositionSource::Fen(fields.join(" "))
        }
        other => return Err(ShellError::InvalidPositionKind(other.to_string())),
    };
    Ok(ShellCommand::Position { source, moves })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(parse_command("f 3").unwrap(), Some(ShellCommand::Perft(3)));
        assert_eq!(parse_command("m").unwrap(), Some(ShellCommand::Moves));
        assert_eq!(parse_command("b").unwrap(), Some(ShellCommand::Board));
        assert_eq!(parse_command("q").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_command("pt").unwrap(), Some(ShellCommand::Suite(None)));
        assert_eq!(
            parse_command("suite 5000").unwrap(),
            Some(ShellCommand::Suite(Some(5000)))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_position_forms() {
        assert_eq!(
            parse_command("p s").unwrap(),
            Some(ShellCommand::Position {
                source: PositionSource::StartPos,
                moves: vec![],
            })
        );
        assert_eq!(
            parse_command("position startpos moves e2e4 e7e5").unwrap(),
            Some(ShellCommand::Position {
                source: PositionSource::StartPos,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            })
        );
        assert_eq!(
            parse_command("p f 8/8/8/8/8/8/8/K1k5 w - -").unwrap(),
            Some(ShellCommand::Position {
                source: PositionSource::Fen("8/8/8/8/8/8/8/K1k5 w - -".to_string()),
                moves: vec![],
            })
        );
        assert_eq!(
            parse_command("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4").unwrap(),
            Some(ShellCommand::Position {
                source: PositionSource::Fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string()),
                moves: vec!["e2e4".to_string()],
            })
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_command("perft"),
            Err(ShellError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_command("perft deep"),
            Err(ShellError::InvalidDepth(_))
        ));
        assert!(matches!(
            parse_command("divide 129"),
            Err(ShellError::InvalidDepth(_))
        ));
        assert!(matches!(
            parse_command("perft 18446744073709551615"),
            Err(ShellError::InvalidDepth(_))
        ));
        assert_eq!(parse_command("f 128").unwrap(), Some(ShellCommand::Perft(MAX_PLY)));
        assert!(matches!(
            parse_command("position sideways"),
            Err(ShellError::InvalidPositionKind(_))
        ));
        assert!(parse_command("position fen moves e2e4").is_err());
        assert!(parse_command("setoption").is_err());
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            parse_command("go depth 5").unwrap(),
            Some(ShellCommand::Unknown("go depth 5".to_string()))
        );
    }
}
