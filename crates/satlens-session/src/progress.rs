//! Cosmetic progress simulation for running analyses

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::upload::UploadState;

/// Phase labels shown while an analysis runs, in order
pub const ANALYSIS_PHASES: [&str; 5] = [
    "Preprocessing image...",
    "Running classification model...",
    "Analyzing vegetation (NDVI)...",
    "Environmental assessment...",
    "Generating insights...",
];

pub const UPLOAD_STEP: &str = "Uploading image...";
pub const COMPLETE_STEP: &str = "Analysis complete!";
pub const FAILED_STEP: &str = "Analysis failed";

pub const MAX_PROGRESS: f64 = 100.0;

/// Smallest increment per tick, keeps every phase finite
const MIN_INCREMENT: f64 = 0.1;

/// Timing of the progress animation
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    /// Pause between micro-steps inside a phase
    pub tick: Duration,

    /// Pause after each phase reaches its ceiling
    pub phase_pause: Duration,

    /// Hold time after the terminal progress value before leaving `Analyzing`
    pub settle: Duration,

    /// Upper bound of a single random increment, in percentage points
    pub max_increment: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            phase_pause: Duration::from_millis(300),
            settle: Duration::from_millis(600),
            max_increment: 3.0,
        }
    }
}

impl Pacing {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            tick: Duration::ZERO,
            phase_pause: Duration::ZERO,
            settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Progress state published to observers
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub state: UploadState,
    pub progress: f64,
    pub step: String,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            state: UploadState::Idle,
            progress: 0.0,
            step: String::new(),
        }
    }
}

/// Advance `current` by `increment` without passing `ceiling`
pub fn advance(current: f64, ceiling: f64, increment: f64) -> f64 {
    (current + increment.max(0.0)).min(ceiling)
}

/// Random-walk progress animation over [`ANALYSIS_PHASES`]
///
/// Each phase owns an equal slice of 0..100. Inside a phase the value climbs
/// by random increments until the slice's ceiling, pausing `tick` between
/// steps and `phase_pause` after the phase.
pub struct ProgressSimulator {
    pacing: Pacing,
    rng: StdRng,
}

impl ProgressSimulator {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic increments for reproducible runs
    pub fn with_seed(pacing: Pacing, seed: u64) -> Self {
        Self {
            pacing,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Run the animation, calling `report` with every new value
    pub async fn run<F>(&mut self, mut report: F)
    where
        F: FnMut(f64, &str),
    {
        let phase_count = ANALYSIS_PHASES.len() as f64;
        let upper = self.pacing.max_increment.max(MIN_INCREMENT);

        for (index, phase) in ANALYSIS_PHASES.iter().enumerate() {
            let ceiling = (index + 1) as f64 / phase_count * MAX_PROGRESS;
            let mut current = index as f64 / phase_count * MAX_PROGRESS;
            report(current, phase);

            while current < ceiling {
                let increment = self.rng.gen_range(MIN_INCREMENT..=upper);
                current = advance(current, ceiling, increment);
                report(current, phase);
                tokio::time::sleep(self.pacing.tick).await;
            }

            tokio::time::sleep(self.pacing.phase_pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_caps_at_ceiling() {
        assert_eq!(advance(19.0, 20.0, 3.0), 20.0);
        assert_eq!(advance(10.0, 20.0, 2.5), 12.5);
        assert_eq!(advance(10.0, 20.0, -4.0), 10.0);
    }

    #[tokio::test]
    async fn test_simulation_visits_every_phase_in_order() {
        let mut simulator = ProgressSimulator::with_seed(Pacing::instant(), 7);
        let mut seen: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        simulator
            .run(|progress, step| {
                if seen.last().map(String::as_str) != Some(step) {
                    seen.push(step.to_string());
                }
                values.push(progress);
            })
            .await;

        assert_eq!(seen, ANALYSIS_PHASES);
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "progress went backwards");
        assert_eq!(values.last().copied(), Some(MAX_PROGRESS));
    }

    #[tokio::test]
    async fn test_tiny_max_increment_still_terminates() {
        let pacing = Pacing { max_increment: 0.0, ..Pacing::instant() };
        let mut simulator = ProgressSimulator::with_seed(pacing, 1);
        let mut last = 0.0;

        simulator.run(|progress, _| last = progress).await;

        assert_eq!(last, MAX_PROGRESS);
    }

    proptest! {
        #[test]
        fn prop_advance_is_monotonic_and_bounded(
            start in 0.0f64..100.0,
            increments in proptest::collection::vec(-5.0f64..5.0, 0..64),
        ) {
            let mut current = start;
            for increment in increments {
                let next = advance(current, MAX_PROGRESS, increment);
                prop_assert!(next >= current);
                prop_assert!(next <= MAX_PROGRESS);
                current = next;
            }
        }
    }
}
