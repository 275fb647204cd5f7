//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Node counts for well-known positions
//! - `make_move.rs` - Copy-make correctness for every move kind
//! - `edge_cases.rs` - Mates, stalemates, pins and other special positions
//! - `magic.rs` - Magic lookups against the slow ray walk
//! - `proptest.rs` - Property-based tests

mod edge_cases;
