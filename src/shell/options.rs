use std::io::{self, Write};

use super::ShellError;

pub const MAX_THREADS: usize = 256;

/// Settings changed through `setoption`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellOptions {
    pub threads: usize,
    /// Suite records expecting more nodes than this are skipped; 0 runs all.
    pub suite_max_nodes: u64,
}

impl Default for ShellOptions {
    fn default() -> Self {
        ShellOptions {
            threads: 1,
            suite_max_nodes: 0,
        }
    }
}

impl ShellOptions {
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name bitperft {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(
            out,
            "option name Threads type spin default {} min 1 max {MAX_THREADS}",
            self.threads
        )?;
        writeln!(
            out,
            "option name SuiteMaxNodes type spin default {} min 0 max 18446744073709551615",
            self.suite_max_nodes
        )?;
        writeln!(out, "uciok")
    }

    /// Option names are case-insensitive. Out-of-range values are clamped.
    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>) -> Result<(), ShellError> {
        let normalized = name.trim().to_ascii_lowercase();
        let value = value.map(str::trim).ok_or_else(|| ShellError::MissingArgument {
            command: "setoption",
            what: "value",
        })?;
        match normalized.as_str() {
            "threads" => {
                let threads = value.parse::<usize>().map_err(|_| ShellError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })?;
                self.threads = threads.clamp(1, MAX_THREADS);
            }
            "suitemaxnodes" | "suite max nodes" => {
                self.suite_max_nodes =
                    value.parse::<u64>().map_err(|_| ShellError::InvalidValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    })?;
            }
            _ => return Err(ShellError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}

/// Split `setoption name <words...> [value <words...>]`.
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut in_value = None;

    for &part in parts.iter().skip(1) {
        match part {
            "name" => in_value = Some(false),
            "value" => in_value = Some(true),
            _ => match in_value {
                Some(false) => name_parts.push(part),
                Some(true) => value_parts.push(part),
                None => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }
    let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
    Some((name_parts.join(" "), value))
}
