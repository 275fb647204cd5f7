//! Line-based front end.
//!
//! A small UCI-flavoured command set for driving the move generator by hand
//! or from scripts: set up a position, list its moves, run perft/divide and
//! the regression suite. Results go to the writer handed to [`Shell::new`];
//! logging goes through `log` and never touches that writer.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use log::debug;

use crate::board::{FenError, MoveParseError, Position};
use crate::perft::suite::{run_suite, REGRESSION_SUITE};
use crate::perft::{divide_parallel, nodes_per_second, perft_parallel, PerftReport};

pub mod command;
pub mod options;

use command::{parse_command, PositionSource, ShellCommand};
use options::ShellOptions;

/// Errors reported back to the user; none of them end the session.
#[derive(Debug, Clone)]
pub enum ShellError {
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    InvalidDepth(String),
    InvalidPositionKind(String),
    InvalidValue {
        name: String,
        value: String,
    },
    UnknownOption(String),
    InvalidFen(FenError),
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::MissingArgument { command, what } => {
                write!(f, "{command}: missing {what}")
            }
            ShellError::InvalidDepth(text) => write!(f, "Invalid depth '{text}'"),
            ShellError::InvalidPositionKind(text) => {
                write!(f, "Expected 'startpos' or 'fen', found '{text}'")
            }
            ShellError::InvalidValue { name, value } => {
                write!(f, "Invalid value '{value}' for {name}")
            }
            ShellError::UnknownOption(name) => write!(f, "Unknown option '{name}'"),
            ShellError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            ShellError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::InvalidFen(e) => Some(e),
            ShellError::InvalidMove { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<FenError> for ShellError {
    fn from(e: FenError) -> Self {
        ShellError::InvalidFen(e)
    }
}

/// Build the position described by a `position` command.
pub fn setup_position(source: &PositionSource, moves: &[String]) -> Result<Position, ShellError> {
    let mut pos = match source {
        PositionSource::StartPos => Position::startpos(),
        PositionSource::Fen(fen) => Position::from_fen(fen)?,
    };
    for text in moves {
        let mv = pos.parse_move(text).map_err(|error| ShellError::InvalidMove {
            move_str: text.clone(),
            error,
        })?;
        pos = pos.make_move(mv);
    }
    Ok(pos)
}

/// Session state: the current position and options.
pub struct Shell<W: Write> {
    position: Position,
    options: ShellOptions,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(out: W) -> Self {
        Shell {
            position: Position::startpos(),
            options: ShellOptions::default(),
            out,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn options(&self) -> &ShellOptions {
        &self.options
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if !self.execute(&line?)? {
                break;
            }
        }
        Ok(())
    }

    /// Handle one line. Returns `Ok(false)` once the session should end.
    ///
    /// Only output failures are returned as errors; bad commands are
    /// reported on the output and the session carries on.
    pub fn execute(&mut self, line: &str) -> io::Result<bool> {
        let cmd = match parse_command(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(true),
            Err(e) => {
                self.report_error(&e)?;
                return Ok(true);
            }
        };
        debug!("shell: {cmd:?}");

        match cmd {
            ShellCommand::Uci => self.options.print(&mut self.out)?,
            ShellCommand::IsReady => writeln!(self.out, "readyok")?,
            ShellCommand::SetOption { name, value } => {
                if let Err(e) = self.options.apply_setoption(&name, value.as_deref()) {
                    self.report_error(&e)?;
                }
            }
            ShellCommand::Position { source, moves } => match setup_position(&source, &moves) {
                Ok(pos) => self.position = pos,
                Err(e) => self.report_error(&e)?,
            },
            ShellCommand::Perft(depth) => self.perft(depth)?,
            ShellCommand::Divide(depth) => self.divide(depth)?,
            ShellCommand::Moves => {
                for mv in &self.position.legal_moves() {
                    writeln!(self.out, "{mv}")?;
                }
            }
            ShellCommand::Board => writeln!(self.out, "{}", self.position)?,
            ShellCommand::Suite(cap) => self.suite(cap.unwrap_or(self.options.suite_max_nodes))?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Unknown(_) => writeln!(self.out, "?")?,
        }
        self.out.flush()?;
        Ok(true)
    }

    fn report_error(&mut self, e: &ShellError) -> io::Result<()> {
        writeln!(self.out, "info string error {e}")?;
        self.out.flush()
    }

    /// Every depth from 0 up to `depth`, then the combined rate.
    fn perft(&mut self, depth: usize) -> io::Result<()> {
        let start = Instant::now();
        let mut total = 0u64;
        for d in 0..=depth {
            let report = PerftReport::measure(d, || {
                perft_parallel(&self.position, d, self.options.threads)
            });
            total += report.nodes;
            writeln!(self.out, "perft({d}) = {}", report.nodes)?;
        }
        let elapsed = start.elapsed();
        writeln!(
            self.out,
            "time = {:.2} ms, nps = {}",
            elapsed.as_secs_f64() * 1000.0,
            nodes_per_second(total, elapsed)
        )
    }

    fn divide(&mut self, depth: usize) -> io::Result<()> {
        let start = Instant::now();
        let split = divide_parallel(&self.position, depth, self.options.threads);
        let elapsed = start.elapsed();
        let total: u64 = split.iter().map(|&(_, nodes)| nodes).sum();
        for (mv, nodes) in split {
            writeln!(self.out, "{mv}: {nodes}")?;
        }
        writeln!(self.out, "total = {total}")?;
        writeln!(
            self.out,
            "time = {:.2} ms, nps = {}",
            elapsed.as_secs_f64() * 1000.0,
            nodes_per_second(total, elapsed)
        )
    }

    fn suite(&mut self, max_nodes: u64) -> io::Result<()> {
        let out = &mut self.out;
        let mut write_err = None;
        let report = run_suite(REGRESSION_SUITE, max_nodes, self.options.threads, |r| {
            if write_err.is_some() {
                return;
            }
            let line = match &r.outcome {
                Ok(actual) => writeln!(
                    out,
                    "{} {} {} {} ({})",
                    r.record.fen,
                    r.record.depth,
                    actual,
                    r.record.expected,
                    r.difference().unwrap_or_default()
                ),
                Err(e) => writeln!(out, "{} {} error: {e}", r.record.fen, r.record.depth),
            };
            if let Err(e) = line {
                write_err = Some(e);
            }
        });
        if let Some(e) = write_err {
            return Err(e);
        }
        writeln!(
            self.out,
            "passed = {}, failed = {}, skipped = {}",
            report.passed(),
            report.failed(),
            report.skipped
        )?;
        writeln!(
            self.out,
            "time = {:.2} ms, nps = {}",
            report.elapsed.as_secs_f64() * 1000.0,
            report.nps()
        )
    }
}
