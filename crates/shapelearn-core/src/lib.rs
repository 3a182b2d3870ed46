//! ShapeLearn core
//!
//! Declarative scene data for the ShapeLearn 3D math client: the number
//! shape catalog, addition/subtraction transformation scripts, practice
//! problem generation and learner progress analysis.
//!
//! Every operation here is a pure (or, for practice generation, seeded)
//! function. Nothing performs I/O.

pub mod error;
pub mod practice;
pub mod progress;
pub mod shapes;
pub mod transform;

pub use error::{CoreError, Result};
pub use practice::{generate_problems, PracticeProblem, SkillLevel, DEFAULT_PRACTICE_COUNT};
pub use progress::{analyze, AttemptRecord, ProgressAnalysis, ProgressReport};
pub use shapes::{
    BaseShape, ComponentLabel, CompoundShape, Geometry, ShapeCatalog, ShapeComponent,
    ShapeDescriptor, ShapeKind, Vec3, MAX_CATALOG_NUMBER,
};
pub use transform::{
    addition, subtraction, transformation, AnimationStep, AnimationTag, OperationKind,
    ShapeEffect, ShapePose, ShapeRole, TransformationScript,
};
