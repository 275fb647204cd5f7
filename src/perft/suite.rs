//! Known-answer perft regression suite.
//!
//! Each record pairs a position with the node count it must produce at a
//! given depth. The built-in [`REGRESSION_SUITE`] covers the usual
//! published positions plus a set of hand-picked castling, en passant and
//! promotion traps at small depths.

use std::time::{Duration, Instant};

use log::{info, warn};

use super::{nodes_per_second, perft_parallel};
use crate::board::{FenError, Position};

/// One known-answer test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerftRecord<'a> {
    pub fen: &'a str,
    pub depth: usize,
    pub expected: u64,
    pub label: &'a str,
}

const fn record(
    fen: &'static str,
    depth: usize,
    expected: u64,
    label: &'static str,
) -> PerftRecord<'static> {
    PerftRecord {
        fen,
        depth,
        expected,
        label,
    }
}

#[rustfmt::skip]
pub const REGRESSION_SUITE: &[PerftRecord<'static>] = &[
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 0, 1, "cpw-pos1-0"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 1, 20, "cpw-pos1-1"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2, 400, "cpw-pos1-2"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3, 8_902, "cpw-pos1-3"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4, 197_281, "cpw-pos1-4"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 5, 4_865_609, "cpw-pos1-5"),
    record("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 6, 119_060_324, "cpw-pos1-6"),
    record("4k3/8/8/8/8/8/R7/R3K2R w Q - 0 1", 3, 4_729, "castling-2"),
    record("4k3/8/8/8/8/8/R7/R3K2R w K - 0 1", 3, 4_686, "castling-3"),
    record("4k3/8/8/8/8/8/R7/R3K2R w - - 0 1", 3, 4_522, "castling-4"),
    record("r3k2r/r7/8/8/8/8/8/4K3 b kq - 0 1", 3, 4_893, "castling-5"),
    record("r3k2r/r7/8/8/8/8/8/4K3 b q - 0 1", 3, 4_729, "castling-6"),
    record("r3k2r/r7/8/8/8/8/8/4K3 b k - 0 1", 3, 4_686, "castling-7"),
    record("r3k2r/r7/8/8/8/8/8/4K3 b - - 0 1", 3, 4_522, "castling-8"),
    record("rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq - 0 1", 1, 42, "cpw-pos5-1"),
    record("rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq - 0 1", 2, 1_352, "cpw-pos5-2"),
    record("rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq - 0 1", 3, 53_392, "cpw-pos5-3"),
    record("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 1, 48, "cpw-pos2-1"),
    record("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2, 2_039, "cpw-pos2-2"),
    record("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 3, 97_862, "cpw-pos2-3"),
    record("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5, 674_624, "cpw-pos3-5"),
    record("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 1, 24, "prom-1"),
    record("8/5bk1/8/2Pp4/8/1K6/8/8 w - d6 0 1", 6, 824_064, "ccc-1"),
    record("8/8/1k6/8/2pP4/8/5BK1/8 b - d3 0 1", 6, 824_064, "ccc-2"),
    record("8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", 6, 1_440_467, "ccc-3"),
    record("8/5k2/8/2Pp4/2B5/1K6/8/8 w - d6 0 1", 6, 1_440_467, "ccc-4"),
    record("5k2/8/8/8/8/8/8/4K2R w K - 0 1", 6, 661_072, "ccc-5"),
    record("4k2r/8/8/8/8/8/8/5K2 b k - 0 1", 6, 661_072, "ccc-6"),
    record("3k4/8/8/8/8/8/8/R3K3 w Q - 0 1", 6, 803_711, "ccc-7"),
    record("r3k3/8/8/8/8/8/8/3K4 b q - 0 1", 6, 803_711, "ccc-8"),
    record("r3k2r/1b4bq/8/8/8/8/7B/R3K2R w KQkq - 0 1", 4, 1_274_206, "ccc-9"),
    record("r3k2r/7b/8/8/8/8/1B4BQ/R3K2R b KQkq - 0 1", 4, 1_274_206, "ccc-10"),
    record("r3k2r/8/3Q4/8/8/5q2/8/R3K2R b KQkq - 0 1", 4, 1_720_476, "ccc-11"),
    record("r3k2r/8/5Q2/8/8/3q4/8/R3K2R w KQkq - 0 1", 4, 1_720_476, "ccc-12"),
    record("2K2r2/4P3/8/8/8/8/8/3k4 w - - 0 1", 6, 3_821_001, "ccc-13"),
    record("3K4/8/8/8/8/8/4p3/2k2R2 b - - 0 1", 6, 3_821_001, "ccc-14"),
    record("8/8/1P2K3/8/2n5/1q6/8/5k2 b - - 0 1", 5, 1_004_658, "ccc-15"),
    record("5K2/8/1Q6/2N5/8/1p2k3/8/8 w - - 0 1", 5, 1_004_658, "ccc-16"),
    record("4k3/1P6/8/8/8/8/K7/8 w - - 0 1", 6, 217_342, "ccc-17"),
    record("8/k7/8/8/8/8/1p6/4K3 b - - 0 1", 6, 217_342, "ccc-18"),
    record("8/P1k5/K7/8/8/8/8/8 w - - 0 1", 6, 92_683, "ccc-19"),
    record("8/8/8/8/8/k7/p1K5/8 b - - 0 1", 6, 92_683, "ccc-20"),
    record("K1k5/8/P7/8/8/8/8/8 w - - 0 1", 6, 2_217, "ccc-21"),
    record("8/8/8/8/8/p7/8/k1K5 b - - 0 1", 6, 2_217, "ccc-22"),
    record("8/k1P5/8/1K6/8/8/8/8 w - - 0 1", 7, 567_584, "ccc-23"),
    record("8/8/8/8/1k6/8/K1p5/8 b - - 0 1", 7, 567_584, "ccc-24"),
    record("8/8/2k5/5q2/5n2/8/5K2/8 b - - 0 1", 4, 23_527, "ccc-25"),
    record("8/5k2/8/5N2/5Q2/2K5/8/8 w - - 0 1", 4, 23_527, "ccc-26"),
    record("8/p7/8/1P6/K1k3p1/6P1/7P/8 w - - 0 1", 8, 8_103_790, "jvm-7"),
    record("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 6, 71_179_139, "jvm-8"),
    record("r3k2r/p6p/8/B7/1pp1p3/3b4/P6P/R3K2R w KQkq - 0 1", 6, 77_054_993, "jvm-9"),
    record("8/5p2/8/2k3P1/p3K3/8/1P6/8 b - - 0 1", 8, 64_451_405, "jvm-11"),
    record("r3k2r/pb3p2/5npp/n2p4/1p1PPB2/6P1/P2N1PBP/R3K2R w KQkq - 0 1", 5, 29_179_893, "jvm-12"),
    record("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 7, 178_633_661, "jvm-10"),
    record("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 5, 193_690_690, "jvm-6"),
    record("8/2pkp3/8/RP3P1Q/6B1/8/2PPP3/rb1K1n1r w - - 0 1", 6, 181_153_194, "ob1"),
    record("rnbqkb1r/ppppp1pp/7n/4Pp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 1", 6, 244_063_299, "jvm-5"),
    record("8/2ppp3/8/RP1k1P1Q/8/8/2PPP3/rb1K1n1r w - - 0 1", 6, 205_552_081, "ob2"),
    record("8/8/3q4/4r3/1b3n2/8/3PPP2/2k1K2R w K - 0 1", 6, 207_139_531, "ob3"),
    record("4r2r/RP1kP1P1/3P1P2/8/8/3ppp2/1p4p1/4K2R b K - 0 1", 6, 314_516_438, "ob4"),
    record("r3k2r/8/8/8/3pPp2/8/8/R3K1RR b KQkq e3 0 1", 6, 485_647_607, "jvm-1"),
    record("8/3K4/2p5/p2b2r1/5k2/8/8/1q6 b - - 0 1", 7, 493_407_574, "jvm-4"),
    record("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 6, 706_045_033, "jvm-2"),
    record("r6r/1P4P1/2kPPP2/8/8/3ppp2/1p4p1/R3K2R w KQ - 0 1", 6, 975_944_981, "ob5"),
];

/// Result of running one record.
#[derive(Clone, Debug)]
pub struct RecordResult<'a> {
    pub record: PerftRecord<'a>,
    /// Node count, or why the position could not be set up.
    pub outcome: Result<u64, FenError>,
    pub elapsed: Duration,
}

impl RecordResult<'_> {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Ok(nodes) if nodes == self.record.expected)
    }

    /// `actual - expected`, if the record ran.
    #[must_use]
    pub fn difference(&self) -> Option<i128> {
        self.outcome
            .as_ref()
            .ok()
            .map(|&nodes| i128::from(nodes) - i128::from(self.record.expected))
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.outcome.as_ref().copied().unwrap_or(0)
    }
}

/// Summary of a suite run.
#[derive(Clone, Debug, Default)]
pub struct SuiteReport<'a> {
    pub results: Vec<RecordResult<'a>>,
    /// Records left out by the node cap.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl SuiteReport<'_> {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(RecordResult::passed)
    }

    #[must_use]
    pub fn total_nodes(&self) -> u64 {
        self.results.iter().map(RecordResult::nodes).sum()
    }

    #[must_use]
    pub fn nps(&self) -> u64 {
        nodes_per_second(self.total_nodes(), self.elapsed)
    }
}

/// Run `records` in order, calling `on_result` after each one.
///
/// With `max_nodes > 0`, records expecting more nodes than that are skipped.
/// A record whose FEN does not parse counts as a failure, the run goes on.
pub fn run_suite<'a>(
    records: &[PerftRecord<'a>],
    max_nodes: u64,
    threads: usize,
    mut on_result: impl FnMut(&RecordResult<'a>),
) -> SuiteReport<'a> {
    let start = Instant::now();
    let mut report = SuiteReport::default();

    for &record in records {
        if max_nodes > 0 && record.expected > max_nodes {
            report.skipped += 1;
            continue;
        }

        let record_start = Instant::now();
        let outcome = Position::from_fen(record.fen)
            .map(|pos| perft_parallel(&pos, record.depth, threads));
        let result = RecordResult {
            record,
            outcome,
            elapsed: record_start.elapsed(),
        };

        match (&result.outcome, result.difference()) {
            (Err(err), _) => warn!("{}: invalid FEN {:?}: {err}", record.label, record.fen),
            (Ok(actual), Some(diff)) if diff != 0 => warn!(
                "{}: perft({}) = {actual}, expected {} (difference {diff:+})",
                record.label, record.depth, record.expected
            ),
            _ => {}
        }

        on_result(&result);
        report.results.push(result);
    }

    report.elapsed = start.elapsed();
    info!(
        "suite: {} passed, {} failed, {} skipped, {} nodes in {:?}",
        report.passed(),
        report.failed(),
        report.skipped,
        report.total_nodes(),
        report.elapsed
    );
    report
}
