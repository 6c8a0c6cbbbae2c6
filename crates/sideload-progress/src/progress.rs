use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Share of the completion fraction reserved for the transfer stage.
///
/// The remainder covers the remote install itself, which emits no
/// byte-level signal. The split is a heuristic, not a measurement; keep it
/// as a constant and override per [`StageModel`] where a different feel is
/// wanted.
pub const TRANSFER_WEIGHT: f64 = 0.8;

/// Snapshot of an in-flight install session.
///
/// Recomputed on every observed byte-count change; the previous value is
/// discarded, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Display name of the payload being installed.
    pub name: String,

    /// Current stage of the session.
    pub stage: Stage,

    /// Bytes handed to the target so far. Monotonically non-decreasing
    /// within a session.
    pub transferred: u64,

    /// Total payload size in bytes, known before streaming begins.
    pub total_size: u64,

    /// Overall completion in `[0, 1]`.
    ///
    /// `None` when the fraction is undefined (zero-byte payloads have no
    /// meaningful transfer fraction). Exactly `1.0` only at
    /// [`Stage::Completed`].
    pub fraction: Option<f64>,
}

impl Progress {
    /// Returns `true` once the session has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.stage.is_terminal()
    }
}

/// Pure mapping from observed byte counts to [`Progress`] values.
///
/// Holds the transfer/install weighting; everything else is derived from
/// the arguments, so a single model can serve any number of concurrent
/// sessions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageModel {
    /// Fraction of the progress range covered by the transfer stage.
    /// Must lie in `(0, 1)`.
    pub transfer_weight: f64,
}

impl Default for StageModel {
    fn default() -> Self {
        Self {
            transfer_weight: TRANSFER_WEIGHT,
        }
    }
}

impl StageModel {
    /// Create a model with a custom transfer weight.
    #[must_use]
    pub fn new(transfer_weight: f64) -> Self {
        Self { transfer_weight }
    }

    /// Derive progress from a byte count observed during the transfer.
    ///
    /// While `transferred < total` the session is Transferring and the
    /// fraction scales linearly up to the transfer weight. The instant
    /// `transferred == total` the stage flips to Installing and the
    /// fraction freezes at the weight — no further byte-level signal
    /// exists until the orchestrator reports completion.
    ///
    /// Counts past `total` clamp to the freeze point. `total == 0` goes
    /// straight to Installing with an undefined fraction.
    #[must_use]
    pub fn transfer(&self, name: &str, transferred: u64, total: u64) -> Progress {
        if total == 0 {
            return Progress {
                name: name.to_string(),
                stage: Stage::Installing,
                transferred: 0,
                total_size: 0,
                fraction: None,
            };
        }

        if transferred < total {
            Progress {
                name: name.to_string(),
                stage: Stage::Transferring,
                transferred,
                total_size: total,
                fraction: Some((transferred as f64 / total as f64) * self.transfer_weight),
            }
        } else {
            Progress {
                name: name.to_string(),
                stage: Stage::Installing,
                transferred: total,
                total_size: total,
                fraction: Some(self.transfer_weight),
            }
        }
    }

    /// Derive the terminal progress value for an explicit completion
    /// signal. Byte counts play no part here; the fraction is exactly 1.
    #[must_use]
    pub fn completed(&self, name: &str, total: u64) -> Progress {
        Progress {
            name: name.to_string(),
            stage: Stage::Completed,
            transferred: total,
            total_size: total,
            fraction: Some(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_fraction_scales_with_weight() {
        let model = StageModel::default();

        let p = model.transfer("pkg", 0, 1000);
        assert_eq!(p.stage, Stage::Transferring);
        assert_eq!(p.fraction, Some(0.0));

        let p = model.transfer("pkg", 500, 1000);
        assert_eq!(p.stage, Stage::Transferring);
        assert_eq!(p.fraction, Some(0.4));

        let p = model.transfer("pkg", 999, 1000);
        assert_eq!(p.stage, Stage::Transferring);
        assert!(p.fraction.unwrap() < TRANSFER_WEIGHT);
    }

    #[test]
    fn transfer_fraction_is_monotonic() {
        let model = StageModel::default();
        let total = 4096;
        let mut last = -1.0;

        for transferred in (0..=total).step_by(64) {
            let p = model.transfer("pkg", transferred, total);
            let fraction = p.fraction.unwrap();
            assert!(fraction >= last);
            assert!((0.0..=TRANSFER_WEIGHT).contains(&fraction));
            last = fraction;
        }
    }

    #[test]
    fn full_transfer_freezes_at_weight() {
        let model = StageModel::default();

        for total in [1, 37, 1024, 10_485_760] {
            let p = model.transfer("pkg", total, total);
            assert_eq!(p.stage, Stage::Installing);
            assert_eq!(p.fraction, Some(TRANSFER_WEIGHT));
            assert_eq!(p.transferred, total);
        }
    }

    #[test]
    fn overshoot_clamps_to_freeze_point() {
        let model = StageModel::default();
        let p = model.transfer("pkg", 2048, 1024);
        assert_eq!(p.stage, Stage::Installing);
        assert_eq!(p.transferred, 1024);
        assert_eq!(p.fraction, Some(TRANSFER_WEIGHT));
    }

    #[test]
    fn zero_total_has_undefined_fraction() {
        let model = StageModel::default();
        let p = model.transfer("pkg", 0, 0);
        assert_eq!(p.stage, Stage::Installing);
        assert_eq!(p.fraction, None);
        assert!(!p.is_completed());
    }

    #[test]
    fn completion_is_exactly_one() {
        let model = StageModel::default();

        for total in [0, 1, 1024] {
            let p = model.completed("pkg", total);
            assert_eq!(p.stage, Stage::Completed);
            assert_eq!(p.fraction, Some(1.0));
            assert_eq!(p.transferred, total);
            assert!(p.is_completed());
        }
    }

    #[test]
    fn custom_weight_is_respected() {
        let model = StageModel::new(0.5);
        let p = model.transfer("pkg", 500, 1000);
        assert_eq!(p.fraction, Some(0.25));
        let p = model.transfer("pkg", 1000, 1000);
        assert_eq!(p.fraction, Some(0.5));
    }
}
