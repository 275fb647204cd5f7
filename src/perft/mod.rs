//! Perft: count every legal move path to a fixed depth.
//!
//! The recursion works over a caller-owned [`PlyStack`], one [`Frame`] per
//! ply. Sibling calls at the same depth reuse that depth's frame in turn, so
//! a stack must never be shared between threads; the parallel driver gives
//! each worker its own.

pub mod suite;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::board::{Move, MoveList, Position};

/// Deepest search a [`PlyStack`] will hold.
pub const MAX_PLY: usize = 128;

/// Scratch state for one ply: the position reached and its generated moves.
#[derive(Clone)]
pub struct Frame {
    position: Position,
    moves: MoveList,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            position: Position::startpos(),
            moves: MoveList::new(),
        }
    }
}

/// Per-depth scratch frames for the recursive counter.
#[derive(Clone, Default)]
pub struct PlyStack {
    frames: Vec<Frame>,
}

impl PlyStack {
    /// A stack able to search `depth` plies (`depth + 1` frames).
    #[must_use]
    pub fn new(depth: usize) -> Self {
        let mut stack = PlyStack::default();
        stack.reserve_depth(depth);
        stack
    }

    /// Grow to at least `depth + 1` frames. Never shrinks.
    ///
    /// # Panics
    ///
    /// If `depth` exceeds [`MAX_PLY`].
    pub fn reserve_depth(&mut self, depth: usize) {
        assert!(depth <= MAX_PLY, "perft depth {depth} exceeds MAX_PLY ({MAX_PLY})");
        if self.frames.len() <= depth {
            self.frames.resize_with(depth + 1, Frame::default);
        }
    }

    /// Deepest search this stack can hold without growing.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }
}

/// Number of leaf nodes `depth` plies below `position`.
#[must_use]
pub fn perft(position: &Position, depth: usize) -> u64 {
    let mut stack = PlyStack::new(depth);
    perft_with(&mut stack, position, depth)
}

/// [`perft`] reusing an existing stack, which is grown if too shallow.
pub fn perft_with(stack: &mut PlyStack, position: &Position, depth: usize) -> u64 {
    stack.reserve_depth(depth);
    let frames = &mut stack.frames[..=depth];
    frames[0].position = *position;
    count(frames)
}

/// Frame 0 holds the current position; the slice length is the remaining depth + 1.
fn count(frames: &mut [Frame]) -> u64 {
    match frames {
        [] => 0,
        [_] => 1,
        [current, deeper @ ..] => {
            current.position.generate_moves(&mut current.moves);
            let mut nodes = 0;
            for &mv in &current.moves {
                if current
                    .position
                    .make_legal_move_into(mv, &mut deeper[0].position)
                {
                    nodes += count(deeper);
                }
            }
            nodes
        }
    }
}

/// Per-root-move node counts at `depth`, in generation order.
///
/// Depth 0 has no moves to split on and yields an empty list.
#[must_use]
pub fn divide(position: &Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut stack = PlyStack::new(depth - 1);
    position
        .legal_moves()
        .iter()
        .map(|&mv| (mv, perft_with(&mut stack, &position.make_move(mv), depth - 1)))
        .collect()
}

/// [`divide`] with root moves handed out to `threads` workers.
///
/// Each worker owns its stack; results come back in the same order as
/// [`divide`]. If a worker thread cannot be spawned the remaining threads
/// (including the caller's) drain the queue.
#[must_use]
pub fn divide_parallel(position: &Position, depth: usize, threads: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let root = position.legal_moves();
    let threads = threads.clamp(1, root.len().max(1));
    if threads == 1 {
        return divide(position, depth);
    }

    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<(usize, u64)>> = Mutex::new(Vec::with_capacity(root.len()));

    let work = || {
        let mut stack = PlyStack::new(depth - 1);
        let mut local = Vec::new();
        loop {
            let idx = next.fetch_add(1, Ordering::Relaxed);
            let Some(&mv) = root.as_slice().get(idx) else {
                break;
            };
            local.push((idx, perft_with(&mut stack, &position.make_move(mv), depth - 1)));
        }
        results.lock().extend(local);
    };

    thread::scope(|scope| {
        for id in 1..threads {
            if let Err(err) = thread::Builder::new()
                .name(format!("perft-{id}"))
                .spawn_scoped(scope, work)
            {
                warn!("could not spawn perft worker {id}: {err}");
            }
        }
        work();
    });

    let mut counts = results.into_inner();
    counts.sort_unstable_by_key(|&(idx, _)| idx);
    debug!("parallel divide: {} root moves on {threads} threads", counts.len());
    counts
        .into_iter()
        .map(|(idx, nodes)| (root[idx], nodes))
        .collect()
}

/// [`perft`] split over `threads` workers at the root. Same totals as [`perft`].
#[must_use]
pub fn perft_parallel(position: &Position, depth: usize, threads: usize) -> u64 {
    if depth <= 1 || threads <= 1 {
        return perft(position, depth);
    }
    divide_parallel(position, depth, threads)
        .iter()
        .map(|&(_, nodes)| nodes)
        .sum()
}

/// Node count with timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerftReport {
    pub depth: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl PerftReport {
    /// Run `count` and time it.
    pub fn measure(depth: usize, count: impl FnOnce() -> u64) -> Self {
        let start = Instant::now();
        let nodes = count();
        PerftReport {
            depth,
            nodes,
            elapsed: start.elapsed(),
        }
    }

    /// Nodes per second; a run too fast to time reports the raw count.
    #[must_use]
    pub fn nps(&self) -> u64 {
        nodes_per_second(self.nodes, self.elapsed)
    }
}

pub(crate) fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let micros = elapsed.as_micros();
    if micros == 0 {
        nodes
    } else {
        u64::try_from(u128::from(nodes) * 1_000_000 / micros).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_zero_counts_the_root() {
        assert_eq!(perft(&Position::startpos(), 0), 1);
    }

    #[test]
    #[should_panic(expected = "exceeds MAX_PLY")]
    fn test_depth_past_max_ply_panics() {
        let _ = perft(&Position::startpos(), usize::MAX);
    }

    #[test]
    fn test_stack_reuse_across_depths() {
        let pos = Position::startpos();
        let mut stack = PlyStack::new(1);
        assert_eq!(perft_with(&mut stack, &pos, 1), 20);
        assert_eq!(perft_with(&mut stack, &pos, 3), 8902);
        assert_eq!(stack.max_depth(), 3);
        assert_eq!(perft_with(&mut stack, &pos, 2), 400);
        assert_eq!(stack.max_depth(), 3);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let split = divide(&pos, 2);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 2039);
        assert!(divide(&pos, 0).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pos = Position::startpos();
        assert_eq!(perft_parallel(&pos, 4, 4), 197_281);
        assert_eq!(divide_parallel(&pos, 3, 3), divide(&pos, 3));
        assert_eq!(perft_parallel(&pos, 0, 8), 1);
        assert_eq!(perft_parallel(&pos, 1, 8), 20);
    }

    #[test]
    fn test_nps() {
        assert_eq!(nodes_per_second(1000, Duration::from_millis(500)), 2000);
        assert_eq!(nodes_per_second(42, Duration::ZERO), 42);
    }
}
