//! Transformation scripts for addition and subtraction.
//!
//! A script is a fixed three-step animation telling the renderer how two
//! operand shapes combine into the result shape. Addition has a separate
//! narrative for complementary pairs (operands summing to 10); the poses
//! and timings are the same in both branches.
//!
//! Generators trust their inputs. Range checks belong to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shapes::{Vec3, ORIGIN, UNIT_SCALE};

/// Sum that marks a complementary pair.
pub const COMPLEMENT_TOTAL: i32 = 10;

const RESULT_SCALE: Vec3 = [1.2, 1.2, 1.2];

const PRESENT_MS: u32 = 1000;
const COMBINE_MS: u32 = 2000;
const PHASE_MS: u32 = 2500;
const RESULT_MS: u32 = 1500;

// ============================================================================
// Script Types
// ============================================================================

/// Arithmetic operation a script animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// `a + b`.
    Addition,
    /// `a - b`.
    Subtraction,
}

impl OperationKind {
    /// The infix symbol used in equation text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Addition => '+',
            Self::Subtraction => '-',
        }
    }

    /// Applies the operation.
    #[must_use]
    pub const fn apply(self, operand1: i32, operand2: i32) -> i32 {
        match self {
            Self::Addition => operand1 + operand2,
            Self::Subtraction => operand1 - operand2,
        }
    }

    /// The wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addition" => Ok(Self::Addition),
            "subtraction" => Ok(Self::Subtraction),
            other => Err(format!(
                "invalid operation '{other}': expected 'addition' or 'subtraction'"
            )),
        }
    }
}

/// Animation the renderer plays for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationTag {
    /// Complementary addition, step 1.
    HighlightComplementary,
    /// Complementary addition, step 2.
    MoveToLink,
    /// Complementary addition, step 3.
    MergeToResult,
    /// Plain addition, step 1.
    PresentOperands,
    /// Plain addition, step 2.
    MoveTogether,
    /// Plain addition, step 3.
    TransformToResult,
    /// Subtraction, step 1.
    PresentMinuend,
    /// Subtraction, step 2.
    SubtractionStorm,
    /// Subtraction, step 3.
    RevealResult,
}

/// Which shape a pose applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeRole {
    /// First operand (addend or minuend).
    Operand1,
    /// Second operand (addend or subtrahend).
    Operand2,
    /// The result shape.
    Result,
}

/// Visual effect applied to a shape during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeEffect {
    /// Translucent pass-through used by subtraction.
    Phasing,
}

/// Partial pose for one shape. Unset fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePose {
    /// Position at the start of the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Position the shape travels to during the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Vec3>,
    /// Euler rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    /// Scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    /// Opacity in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Whether the shape's color shifts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_shift: Option<bool>,
    /// Special effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<ShapeEffect>,
}

impl ShapePose {
    /// A pose that only sets the position.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Sets the scale.
    #[must_use]
    pub const fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the rotation.
    #[must_use]
    pub const fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets the travel target.
    #[must_use]
    pub const fn moving_to(mut self, target: Vec3) -> Self {
        self.target_position = Some(target);
        self
    }

    /// Sets the color shift flag.
    #[must_use]
    pub const fn with_color_shift(mut self) -> Self {
        self.color_shift = Some(true);
        self
    }

    /// Sets the effect.
    #[must_use]
    pub const fn with_effect(mut self, effect: ShapeEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// One step of a transformation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    /// 1-based step index.
    pub step: u8,
    /// Narration shown to the learner.
    pub description: String,
    /// Animation to play.
    pub animation: AnimationTag,
    /// Duration in milliseconds.
    pub duration: u32,
    /// Poses keyed by role.
    pub shapes: BTreeMap<ShapeRole, ShapePose>,
}

impl AnimationStep {
    fn new(
        step: u8,
        description: String,
        animation: AnimationTag,
        duration: u32,
        poses: impl IntoIterator<Item = (ShapeRole, ShapePose)>,
    ) -> Self {
        Self {
            step,
            description,
            animation,
            duration,
            shapes: poses.into_iter().collect(),
        }
    }
}

/// Ordered animation describing how two operands become the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationScript {
    /// The operation animated.
    #[serde(rename = "type")]
    pub operation: OperationKind,
    /// First operand.
    pub operand1: i32,
    /// Second operand.
    pub operand2: i32,
    /// Result of the operation.
    pub result: i32,
    /// `true` only for additions summing to 10.
    pub is_complementary: bool,
    /// Exactly three steps.
    pub steps: Vec<AnimationStep>,
}

impl TransformationScript {
    /// Total animation time in milliseconds.
    #[must_use]
    pub fn total_duration(&self) -> u32 {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Builds the script for `operation` applied to the two operands.
#[must_use]
pub fn transformation(
    operation: OperationKind,
    operand1: i32,
    operand2: i32,
) -> TransformationScript {
    match operation {
        OperationKind::Addition => addition(operand1, operand2),
        OperationKind::Subtraction => subtraction(operand1, operand2),
    }
}

/// Builds the addition script for `a + b`.
#[must_use]
pub fn addition(a: i32, b: i32) -> TransformationScript {
    let result = a + b;
    let is_complementary = result == COMPLEMENT_TOTAL;

    let (tags, descriptions) = if is_complementary {
        (
            [
                AnimationTag::HighlightComplementary,
                AnimationTag::MoveToLink,
                AnimationTag::MergeToResult,
            ],
            [
                format!("Number {a} and {b} are complementary - they naturally fit together"),
                format!("Watch how {a} and {b} connect at their natural linking points"),
                format!("The shapes flow together to create {result}!"),
            ],
        )
    } else {
        (
            [
                AnimationTag::PresentOperands,
                AnimationTag::MoveTogether,
                AnimationTag::TransformToResult,
            ],
            [
                format!("Starting with {a} and {b}"),
                format!("Bringing {a} and {b} together"),
                format!("They combine to form {result}!"),
            ],
        )
    };

    // Complementary pairs stop further apart, meeting at their linking points.
    let (gap, approach_rotation) = if is_complementary {
        (0.8, Some(ORIGIN))
    } else {
        (0.5, None)
    };
    let approach = |x: f64| {
        let pose = ShapePose::at([x, 0.0, 0.0]);
        match approach_rotation {
            Some(rotation) => pose.rotated(rotation),
            None => pose,
        }
    };

    let [present_tag, move_tag, merge_tag] = tags;
    let [present_text, move_text, merge_text] = descriptions;

    let steps = vec![
        AnimationStep::new(
            1,
            present_text,
            present_tag,
            PRESENT_MS,
            [
                (
                    ShapeRole::Operand1,
                    ShapePose::at([-2.0, 0.0, 0.0]).scaled(UNIT_SCALE),
                ),
                (
                    ShapeRole::Operand2,
                    ShapePose::at([2.0, 0.0, 0.0]).scaled(UNIT_SCALE),
                ),
            ],
        ),
        AnimationStep::new(
            2,
            move_text,
            move_tag,
            COMBINE_MS,
            [
                (ShapeRole::Operand1, approach(-gap)),
                (ShapeRole::Operand2, approach(gap)),
            ],
        ),
        AnimationStep::new(
            3,
            merge_text,
            merge_tag,
            RESULT_MS,
            [(ShapeRole::Result, ShapePose::at(ORIGIN).scaled(RESULT_SCALE))],
        ),
    ];

    TransformationScript {
        operation: OperationKind::Addition,
        operand1: a,
        operand2: b,
        result,
        is_complementary,
        steps,
    }
}

/// Builds the subtraction script for `a - b`.
///
/// The subtrahend "phases through" the minuend, leaving the result behind.
#[must_use]
pub fn subtraction(a: i32, b: i32) -> TransformationScript {
    let result = a - b;

    let steps = vec![
        AnimationStep::new(
            1,
            format!("Starting with {a}"),
            AnimationTag::PresentMinuend,
            PRESENT_MS,
            [(
                ShapeRole::Operand1,
                ShapePose::at(ORIGIN).scaled(RESULT_SCALE).with_opacity(1.0),
            )],
        ),
        AnimationStep::new(
            2,
            format!("Watch as {b} phases through like a storm"),
            AnimationTag::SubtractionStorm,
            PHASE_MS,
            [
                (
                    ShapeRole::Operand1,
                    ShapePose::default().with_opacity(0.7).with_color_shift(),
                ),
                (
                    ShapeRole::Operand2,
                    ShapePose::at([-3.0, 0.0, 0.0])
                        .moving_to([3.0, 0.0, 0.0])
                        .with_opacity(0.6)
                        .with_effect(ShapeEffect::Phasing),
                ),
            ],
        ),
        AnimationStep::new(
            3,
            format!("The transformation leaves us with {result}!"),
            AnimationTag::RevealResult,
            RESULT_MS,
            [(
                ShapeRole::Result,
                ShapePose::at(ORIGIN).scaled(RESULT_SCALE).with_opacity(1.0),
            )],
        ),
    ];

    TransformationScript {
        operation: OperationKind::Subtraction,
        operand1: a,
        operand2: b,
        result,
        is_complementary: false,
        steps,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn durations(script: &TransformationScript) -> Vec<u32> {
        script.steps.iter().map(|s| s.duration).collect()
    }

    fn pose(script: &TransformationScript, step: usize, role: ShapeRole) -> &ShapePose {
        script.steps[step].shapes.get(&role).unwrap()
    }

    #[test]
    fn test_complementary_addition() {
        let script = addition(3, 7);

        assert!(script.is_complementary);
        assert_eq!(script.result, 10);
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0].duration, 1000);
        assert_eq!(script.steps[0].animation, AnimationTag::HighlightComplementary);
        assert_eq!(script.steps[1].animation, AnimationTag::MoveToLink);
        assert_eq!(script.steps[2].animation, AnimationTag::MergeToResult);

        assert_eq!(
            pose(&script, 1, ShapeRole::Operand1).position,
            Some([-0.8, 0.0, 0.0])
        );
        assert_eq!(
            pose(&script, 1, ShapeRole::Operand2).rotation,
            Some([0.0, 0.0, 0.0])
        );
        insta::assert_snapshot!(
            &script.steps[0].description,
            @"Number 3 and 7 are complementary - they naturally fit together"
        );
        insta::assert_snapshot!(
            &script.steps[2].description,
            @"The shapes flow together to create 10!"
        );
    }

    #[test]
    fn test_plain_addition() {
        let script = addition(2, 3);

        assert!(!script.is_complementary);
        assert_eq!(script.result, 5);
        assert_eq!(script.steps[0].animation, AnimationTag::PresentOperands);
        assert_eq!(script.steps[1].animation, AnimationTag::MoveTogether);
        assert_eq!(script.steps[2].animation, AnimationTag::TransformToResult);

        let near = pose(&script, 1, ShapeRole::Operand2);
        assert_eq!(near.position, Some([0.5, 0.0, 0.0]));
        assert_eq!(near.rotation, None);

        insta::assert_snapshot!(&script.steps[1].description, @"Bringing 2 and 3 together");
        insta::assert_snapshot!(&script.steps[2].description, @"They combine to form 5!");
    }

    #[test]
    fn test_addition_branches_share_timing_and_result_pose() {
        let complementary = addition(4, 6);
        let plain = addition(4, 5);

        assert_eq!(durations(&complementary), vec![1000, 2000, 1500]);
        assert_eq!(durations(&plain), durations(&complementary));
        assert_eq!(
            pose(&plain, 2, ShapeRole::Result),
            pose(&complementary, 2, ShapeRole::Result)
        );
        assert_eq!(
            pose(&plain, 0, ShapeRole::Operand1),
            pose(&complementary, 0, ShapeRole::Operand1)
        );
        assert_eq!(
            pose(&plain, 2, ShapeRole::Result).scale,
            Some([1.2, 1.2, 1.2])
        );
    }

    #[test]
    fn test_zero_plus_ten_is_complementary() {
        assert!(addition(0, 10).is_complementary);
        assert!(addition(5, 5).is_complementary);
        assert!(!addition(10, 10).is_complementary);
    }

    #[test]
    fn test_subtraction_script() {
        let script = subtraction(10, 4);

        assert_eq!(script.result, 6);
        assert!(!script.is_complementary);
        assert_eq!(script.steps.len(), 3);
        assert_eq!(durations(&script), vec![1000, 2500, 1500]);
        assert_eq!(script.steps[0].animation, AnimationTag::PresentMinuend);
        assert_eq!(script.steps[1].animation, AnimationTag::SubtractionStorm);
        assert_eq!(script.steps[2].animation, AnimationTag::RevealResult);

        let minuend = pose(&script, 1, ShapeRole::Operand1);
        assert_eq!(minuend.opacity, Some(0.7));
        assert_eq!(minuend.color_shift, Some(true));

        let subtrahend = pose(&script, 1, ShapeRole::Operand2);
        assert_eq!(subtrahend.position, Some([-3.0, 0.0, 0.0]));
        assert_eq!(subtrahend.target_position, Some([3.0, 0.0, 0.0]));
        assert_eq!(subtrahend.opacity, Some(0.6));
        assert_eq!(subtrahend.effect, Some(ShapeEffect::Phasing));

        insta::assert_snapshot!(
            &script.steps[1].description,
            @"Watch as 4 phases through like a storm"
        );
    }

    #[test]
    fn test_transformation_dispatch() {
        assert_eq!(transformation(OperationKind::Addition, 3, 7), addition(3, 7));
        assert_eq!(
            transformation(OperationKind::Subtraction, 9, 2),
            subtraction(9, 2)
        );
        assert_eq!(addition(1, 2).total_duration(), 4500);
        assert_eq!(subtraction(2, 1).total_duration(), 5000);
    }

    #[test]
    fn test_operation_kind_parsing() {
        assert_eq!("addition".parse::<OperationKind>(), Ok(OperationKind::Addition));
        assert_eq!(
            "subtraction".parse::<OperationKind>(),
            Ok(OperationKind::Subtraction)
        );
        assert!("multiplication".parse::<OperationKind>().is_err());
        assert!("Addition".parse::<OperationKind>().is_err());
        assert_eq!(OperationKind::Subtraction.symbol(), '-');
        assert_eq!(OperationKind::Addition.apply(8, 9), 17);
    }

    #[test]
    fn test_script_serialization() {
        let json = serde_json::to_value(subtraction(10, 4)).unwrap();

        assert_eq!(json["type"], "subtraction");
        assert_eq!(json["is_complementary"], false);
        assert_eq!(json["steps"][1]["animation"], "subtraction_storm");
        assert_eq!(json["steps"][1]["shapes"]["operand2"]["effect"], "phasing");
        assert_eq!(json["steps"][1]["shapes"]["operand1"]["color_shift"], true);
        assert!(json["steps"][1]["shapes"]["operand1"].get("position").is_none());
        assert_eq!(json["steps"][2]["shapes"]["result"]["opacity"], 1.0);
    }
}
