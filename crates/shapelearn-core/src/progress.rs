//! Learner progress analysis.
//!
//! Reduces a list of attempt records to accuracy and latency statistics
//! plus a coarse next-tier recommendation. Nothing is stored.

use serde::{Deserialize, Serialize};

use crate::practice::SkillLevel;
use crate::transform::OperationKind;

/// Accuracy above which an operation counts as a strength.
const STRENGTH_THRESHOLD: f64 = 0.8;
/// Accuracy below which an operation needs improvement.
const IMPROVEMENT_THRESHOLD: f64 = 0.6;
/// Mean response time (seconds) a learner must beat to move up.
const PROMOTION_MAX_SECONDS: f64 = 10.0;
/// Attempts required before moving up.
const PROMOTION_MIN_ATTEMPTS: usize = 11;

/// One answered problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Operation label, normally `addition` or `subtraction`.
    #[serde(default)]
    pub operation: Option<String>,
    /// Whether the answer was right.
    #[serde(default)]
    pub correct: bool,
    /// Seconds taken to answer. Absent or zero means not reported.
    #[serde(default, alias = "response_time_seconds")]
    pub response_time: Option<f64>,
}

impl AttemptRecord {
    /// Creates a record with a reported response time.
    #[must_use]
    pub fn new(operation: OperationKind, correct: bool, response_time: f64) -> Self {
        Self {
            operation: Some(operation.as_str().to_string()),
            correct,
            response_time: Some(response_time),
        }
    }

    fn is_operation(&self, operation: OperationKind) -> bool {
        self.operation.as_deref() == Some(operation.as_str())
    }

    fn reported_time(&self) -> Option<f64> {
        self.response_time.filter(|t| *t != 0.0)
    }
}

/// Statistics over a non-empty attempt list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressAnalysis {
    /// Number of attempts analyzed.
    pub total_problems: usize,
    /// Fraction correct overall.
    pub accuracy: f64,
    /// Fraction correct among addition attempts, 0 if none.
    pub addition_accuracy: f64,
    /// Fraction correct among subtraction attempts, 0 if none.
    pub subtraction_accuracy: f64,
    /// Mean seconds over attempts reporting a time, 0 if none.
    pub average_response_time: f64,
    /// Operations answered with accuracy above 0.8.
    pub strengths: Vec<OperationKind>,
    /// Operations answered with accuracy below 0.6.
    pub areas_for_improvement: Vec<OperationKind>,
    /// Recommended tier for the next session.
    pub next_skill_level: SkillLevel,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressReport {
    /// Full statistics.
    Analysis(ProgressAnalysis),
    /// Sentinel for an empty attempt list.
    NoData {
        /// Always `no_data`.
        status: String,
        /// Always `start_with_basics`.
        recommendation: String,
    },
}

impl ProgressReport {
    fn no_data() -> Self {
        Self::NoData {
            status: "no_data".to_string(),
            recommendation: "start_with_basics".to_string(),
        }
    }

    /// Returns the statistics, or `None` for the empty-input sentinel.
    #[must_use]
    pub const fn analysis(&self) -> Option<&ProgressAnalysis> {
        match self {
            Self::Analysis(analysis) => Some(analysis),
            Self::NoData { .. } => None,
        }
    }
}

/// Analyzes a list of attempts.
#[must_use]
pub fn analyze(attempts: &[AttemptRecord]) -> ProgressReport {
    if attempts.is_empty() {
        return ProgressReport::no_data();
    }

    let accuracy = fraction_correct(attempts.iter());
    let addition_accuracy =
        fraction_correct(attempts.iter().filter(|a| a.is_operation(OperationKind::Addition)));
    let subtraction_accuracy = fraction_correct(
        attempts
            .iter()
            .filter(|a| a.is_operation(OperationKind::Subtraction)),
    );

    let times: Vec<f64> = attempts.iter().filter_map(AttemptRecord::reported_time).collect();
    let average_response_time = if times.is_empty() {
        0.0
    } else {
        times.iter().sum::<f64>() / times.len() as f64
    };

    let mut strengths = Vec::new();
    let mut areas_for_improvement = Vec::new();
    for (operation, op_accuracy) in [
        (OperationKind::Addition, addition_accuracy),
        (OperationKind::Subtraction, subtraction_accuracy),
    ] {
        if op_accuracy > STRENGTH_THRESHOLD {
            strengths.push(operation);
        } else if op_accuracy < IMPROVEMENT_THRESHOLD {
            areas_for_improvement.push(operation);
        }
    }

    let next_skill_level = if accuracy > STRENGTH_THRESHOLD
        && average_response_time < PROMOTION_MAX_SECONDS
        && attempts.len() >= PROMOTION_MIN_ATTEMPTS
    {
        SkillLevel::Intermediate
    } else {
        SkillLevel::Beginner
    };

    ProgressReport::Analysis(ProgressAnalysis {
        total_problems: attempts.len(),
        accuracy,
        addition_accuracy,
        subtraction_accuracy,
        average_response_time,
        strengths,
        areas_for_improvement,
        next_skill_level,
    })
}

fn fraction_correct<'a>(attempts: impl Iterator<Item = &'a AttemptRecord>) -> f64 {
    let (total, correct) = attempts.fold((0_usize, 0_usize), |(total, correct), a| {
        (total + 1, correct + usize::from(a.correct))
    });
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}
