//! Search controller: the quality/scale loop that drives the encoder.
//!
//! Every attempt encodes the *natural* raster at the current quality and
//! target size and compares the byte count with the budget:
//!
//! ```text
//!            ┌──────────── size > target, under cap ────────────┐
//!            ▼                                                   │
//!      ┌──────────┐  size <= target   ┌────────────┐             │
//!  ──▶ │Searching │ ────────────────▶ │ MetTarget  │     quality > floor ? step quality down
//!      └──────────┘                   └────────────┘                       : shrink dimensions
//!            │ failures == max_iterations
//!            ▼
//!      ┌──────────┐
//!      │Exhausted │  best effort, not an error
//!      └──────────┘
//! ```
//!
//! Quality is lowered first (cheap, same pixel count). Only once it sits at
//! `min_quality` do the dimensions shrink, each shrink compounding on the
//! previous target size. Lossless output skips the quality phase.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::{CompressionConfig, ExhaustionPolicy};
use crate::decode::Raster;
use crate::encode::{EncodeError, Encoder};

/// Quality arithmetic is snapped to this grid so repeated 0.1 steps land
/// exactly on the floor instead of a hair above it.
const QUALITY_GRID: f32 = 1_000_000.0;

/// Terminal (and initial) states of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchState {
    Searching,
    MetTarget,
    Exhausted,
}

/// Mutable per-run state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationState {
    pub quality: f32,
    pub width: u32,
    pub height: u32,
    /// Number of attempts that missed the target so far.
    pub iteration: u32,
}

impl IterationState {
    pub fn initial(config: &CompressionConfig, raster: &Raster) -> Self {
        Self {
            quality: config.initial_quality,
            width: raster.width(),
            height: raster.height(),
            iteration: 0,
        }
    }

    /// Move to the next attempt's parameters after a miss.
    ///
    /// Lossless formats ignore quality, so they go straight to shrinking.
    pub fn advance(&mut self, config: &CompressionConfig) {
        if config.output_format.is_lossy() && self.quality > config.min_quality {
            self.quality = step_quality(self.quality, config.quality_step, config.min_quality);
        } else {
            self.width = shrink(self.width, config.scale_ratio);
            self.height = shrink(self.height, config.scale_ratio);
        }
    }
}

fn step_quality(quality: f32, step: f32, floor: f32) -> f32 {
    let next = ((quality - step) * QUALITY_GRID).round() / QUALITY_GRID;
    next.max(floor)
}

fn shrink(dimension: u32, ratio: f32) -> u32 {
    ((dimension as f32 * ratio).floor() as u32).max(1)
}

/// One encoder call and what it produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub quality: f32,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

/// What the controller hands back on a terminal state.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub state: SearchState,
    pub bytes: Vec<u8>,
    /// The attempt `bytes` came from.
    pub chosen: Attempt,
    /// Every attempt in order.
    pub attempts: Vec<Attempt>,
}

impl SearchOutcome {
    pub fn met_target(&self) -> bool {
        self.state == SearchState::MetTarget
    }
}

/// Failures that abort a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Compression cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: usize },
}

/// Cooperative cancellation flag, checked between attempts.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs the bounded quality-then-scale search for one raster.
pub struct SearchController<'a, E> {
    encoder: E,
    config: &'a CompressionConfig,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a, E: Encoder> SearchController<'a, E> {
    pub fn new(encoder: E, config: &'a CompressionConfig) -> Self {
        Self {
            encoder,
            config,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancellation.is_some_and(CancellationToken::is_cancelled)
    }

    /// Search until the target is met or the iteration cap is reached.
    ///
    /// At least one attempt is made even when `max_iterations` is 0. Encoder
    /// failures end the search immediately.
    pub fn run(&self, raster: &Raster) -> Result<SearchOutcome, SearchError> {
        let config = self.config;
        let mut state = IterationState::initial(config, raster);
        let mut attempts: Vec<Attempt> = Vec::new();
        let mut retained: Option<(Vec<u8>, Attempt)> = None;

        loop {
            if !attempts.is_empty() && self.cancelled() {
                return Err(SearchError::Cancelled {
                    attempts: attempts.len(),
                });
            }

            let bytes = self.encoder.encode(
                raster,
                state.width,
                state.height,
                state.quality,
                config.output_format,
            )?;
            let attempt = Attempt {
                quality: state.quality,
                width: state.width,
                height: state.height,
                size: bytes.len() as u64,
            };
            attempts.push(attempt);
            tracing::debug!(
                attempt = attempts.len(),
                quality = attempt.quality,
                width = attempt.width,
                height = attempt.height,
                size = attempt.size,
                target = config.target_size_bytes,
                "encode attempt"
            );

            if attempt.size <= config.target_size_bytes {
                return Ok(SearchOutcome {
                    state: SearchState::MetTarget,
                    bytes,
                    chosen: attempt,
                    attempts,
                });
            }

            state.iteration += 1;
            let keep = match (&retained, config.exhaustion_policy) {
                (None, _) | (_, ExhaustionPolicy::LastAttempt) => true,
                (Some((_, best)), ExhaustionPolicy::SmallestAttempt) => attempt.size < best.size,
            };
            if keep {
                retained = Some((bytes, attempt));
            }

            if state.iteration >= config.max_iterations {
                // retained is always set after a miss
                let (bytes, chosen) = retained.unwrap_or_default();
                return Ok(SearchOutcome {
                    state: SearchState::Exhausted,
                    bytes,
                    chosen,
                    attempts,
                });
            }

            state.advance(config);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
