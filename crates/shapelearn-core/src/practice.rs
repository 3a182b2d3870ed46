//! Practice problem generation.
//!
//! Operands are sampled from a range chosen by the learner's skill tier.
//! The random source is passed in so callers can seed it.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::transform::{OperationKind, COMPLEMENT_TOTAL};

/// Problems generated when the caller does not ask for a count.
pub const DEFAULT_PRACTICE_COUNT: usize = 5;

/// Coarse difficulty tier bounding operand ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    /// Operands in 1-5 (default).
    #[default]
    Beginner,
    /// Operands in 1-10.
    Intermediate,
    /// Operands in 1-20.
    Advanced,
}

impl SkillLevel {
    /// Resolves a client-supplied label.
    ///
    /// Unrecognized labels fall back to [`SkillLevel::Beginner`] instead of
    /// failing, so a typo silently yields beginner problems.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            other => {
                tracing::debug!(label = %other, "Unknown skill level, using beginner");
                Self::Beginner
            }
        }
    }

    /// Inclusive `(min, max)` operand bounds for this tier.
    #[must_use]
    pub const fn operand_bounds(self) -> (i32, i32) {
        match self {
            Self::Beginner => (1, 5),
            Self::Intermediate => (1, 10),
            Self::Advanced => (1, 20),
        }
    }

    /// The wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeProblem {
    /// 1-based position within the generated batch.
    pub id: usize,
    /// Equation with the answer blanked, e.g. `3 + 4 = ?`.
    pub equation: String,
    /// First operand.
    pub operand1: i32,
    /// Second operand.
    pub operand2: i32,
    /// Expected answer.
    pub result: i32,
    /// Operation practiced.
    pub operation: OperationKind,
    /// Tier the operands were drawn from.
    pub skill_level: SkillLevel,
    /// `true` for additions summing to 10.
    pub is_complementary: bool,
}

impl PracticeProblem {
    fn new(
        id: usize,
        operation: OperationKind,
        skill_level: SkillLevel,
        operand1: i32,
        operand2: i32,
    ) -> Self {
        let result = operation.apply(operand1, operand2);
        Self {
            id,
            equation: format!("{operand1} {} {operand2} = ?", operation.symbol()),
            operand1,
            operand2,
            result,
            operation,
            skill_level,
            is_complementary: operation == OperationKind::Addition && result == COMPLEMENT_TOTAL,
        }
    }
}

/// Generates `count` problems for the given tier and operation.
pub fn generate_problems<R: Rng>(
    skill_level: SkillLevel,
    operation: OperationKind,
    count: usize,
    rng: &mut R,
) -> Vec<PracticeProblem> {
    let (min, max) = skill_level.operand_bounds();

    (1..=count)
        .map(|id| {
            let (operand1, operand2) = match operation {
                OperationKind::Addition => {
                    let mut a = rng.gen_range(min..=max);
                    let mut b = rng.gen_range(min..=max);
                    // Clamp rather than resample; skews toward small operands.
                    if a + b > max * 2 {
                        (a, b) = (a.min(b), min);
                    }
                    (a, b)
                }
                OperationKind::Subtraction => {
                    let a = rng.gen_range(min + 1..=max);
                    let b = rng.gen_range(min..=a);
                    (a, b)
                }
            };
            PracticeProblem::new(id, operation, skill_level, operand1, operand2)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_beginner_addition() {
        let problems =
            generate_problems(SkillLevel::Beginner, OperationKind::Addition, 5, &mut seeded());

        assert_eq!(problems.len(), 5);
        for (i, problem) in problems.iter().enumerate() {
            assert_eq!(problem.id, i + 1);
            assert!((1..=5).contains(&problem.operand1));
            assert!((1..=5).contains(&problem.operand2));
            assert_eq!(problem.result, problem.operand1 + problem.operand2);
            assert_eq!(
                problem.equation,
                format!("{} + {} = ?", problem.operand1, problem.operand2)
            );
            assert_eq!(problem.is_complementary, problem.result == 10);
            assert_eq!(problem.skill_level, SkillLevel::Beginner);
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        let mut rng = seeded();
        for level in [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ] {
            let (min, max) = level.operand_bounds();
            for problem in generate_problems(level, OperationKind::Subtraction, 200, &mut rng) {
                assert!((min + 1..=max).contains(&problem.operand1));
                assert!((min..=problem.operand1).contains(&problem.operand2));
                assert!(problem.result >= 0);
                assert!(!problem.is_complementary);
                assert!(problem.equation.contains(" - "));
            }
        }
    }

    #[test]
    fn test_advanced_addition_stays_in_range() {
        let problems =
            generate_problems(SkillLevel::Advanced, OperationKind::Addition, 500, &mut seeded());
        assert!(problems
            .iter()
            .all(|p| (1..=20).contains(&p.operand1) && (1..=20).contains(&p.operand2)));
        assert!(problems.iter().all(|p| p.result <= 40));
    }

    #[test]
    fn test_same_seed_same_problems() {
        let first =
            generate_problems(SkillLevel::Intermediate, OperationKind::Addition, 10, &mut seeded());
        let second =
            generate_problems(SkillLevel::Intermediate, OperationKind::Addition, 10, &mut seeded());
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let problems =
            generate_problems(SkillLevel::Beginner, OperationKind::Addition, 0, &mut seeded());
        assert!(problems.is_empty());
    }

    #[test]
    fn test_skill_level_labels() {
        assert_eq!(SkillLevel::from_label("advanced"), SkillLevel::Advanced);
        assert_eq!(SkillLevel::from_label("intermediate"), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_label("expert"), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_label(""), SkillLevel::Beginner);
        assert_eq!(SkillLevel::Intermediate.operand_bounds(), (1, 10));
        assert_eq!(SkillLevel::Advanced.to_string(), "advanced");
    }
}
