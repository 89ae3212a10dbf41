//! Puckstate Core Library
//!
//! This library infers latent performance states of a hockey team from
//! per-game statistics using a Gaussian-emission hidden Markov model:
//! - CSV ingestion and validation
//! - Per-column feature standardization
//! - Baum-Welch fitting with deterministic seeded initialization
//! - Viterbi decoding of the per-game state sequence
//! - Score-ranked mapping of model states onto the fixed label vocabulary
//! - Coaching-note annotation and report assembly
//!
//! The binary entry point is in `main.rs`.

pub mod annotate;
pub mod exit_codes;
pub mod hmm;
pub mod ingest;
pub mod label;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod report;
