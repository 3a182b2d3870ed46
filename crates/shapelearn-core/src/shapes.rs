//! Number shape catalog.
//!
//! Every number from 0 to 20 maps to exactly one [`ShapeDescriptor`]. The
//! single digits are hand-authored primitives; 10 through 20 are compound
//! descriptors that embed owned copies of their tens and ones digits.
//!
//! # Example
//!
//! ```rust
//! use shapelearn_core::{ShapeCatalog, ShapeKind};
//!
//! let catalog = ShapeCatalog::build();
//! let seven = catalog.lookup(7).unwrap();
//! assert_eq!(seven.kind(), ShapeKind::FlagPost);
//! assert!(catalog.lookup(21).is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A position, rotation or scale in scene space.
pub type Vec3 = [f64; 3];

/// The highest number the catalog covers.
pub const MAX_CATALOG_NUMBER: u8 = 20;

pub(crate) const ORIGIN: Vec3 = [0.0, 0.0, 0.0];
pub(crate) const UNIT_SCALE: Vec3 = [1.0, 1.0, 1.0];

const COMPOUND_COLOR: &str = "#A8E6CF";
const TENS_OFFSET: Vec3 = [-1.5, 0.0, 0.0];
const ONES_OFFSET: Vec3 = [1.5, 0.0, 0.0];

// ============================================================================
// Descriptor Types
// ============================================================================

/// Geometric primitive a descriptor renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Ring (0).
    Torus,
    /// Tapered pillar (1).
    Cylinder,
    /// Polyline tube (2).
    CurvedPath,
    /// Two stacked arcs (3).
    DoubleCurve,
    /// Open rectangular frame (4).
    AngularFrame,
    /// Pole with a rectangular flag (5).
    FlagShape,
    /// Flat spiral (6).
    Spiral,
    /// Pole with an angled flag (7).
    FlagPost,
    /// Figure-eight (8).
    DoubleLoop,
    /// Round head with a trailing tail (9).
    CurvedTail,
    /// Tens and ones digits side by side (10-20).
    Compound,
}

/// Primitive-specific render parameters.
///
/// Field names on the wire follow what the renderer reads for each
/// primitive, which is why casing is not uniform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Geometry {
    /// Parameters for [`ShapeKind::Torus`].
    Torus {
        /// Ring radius.
        radius: f64,
        /// Tube radius.
        tube: f64,
        /// Segments around the tube.
        #[serde(rename = "radialSegments")]
        radial_segments: u32,
        /// Segments around the ring.
        #[serde(rename = "tubularSegments")]
        tubular_segments: u32,
    },
    /// Parameters for [`ShapeKind::Cylinder`].
    Cylinder {
        /// Radius at the top cap.
        #[serde(rename = "radiusTop")]
        radius_top: f64,
        /// Radius at the bottom cap.
        #[serde(rename = "radiusBottom")]
        radius_bottom: f64,
        /// Pillar height.
        height: f64,
    },
    /// Parameters for [`ShapeKind::CurvedPath`].
    CurvedPath {
        /// Control points of the path.
        points: Vec<Vec3>,
        /// Tube thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::DoubleCurve`].
    DoubleCurve {
        /// Number of arcs.
        curves: u32,
        /// Arc radius.
        radius: f64,
        /// Tube thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::AngularFrame`].
    AngularFrame {
        /// Frame width.
        width: f64,
        /// Frame height.
        height: f64,
        /// Bar thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::FlagShape`].
    FlagShape {
        /// Pole height.
        pole_height: f64,
        /// Flag width.
        flag_width: f64,
        /// Bar thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::Spiral`].
    Spiral {
        /// Outer radius.
        radius: f64,
        /// Number of turns.
        turns: f64,
        /// Tube thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::FlagPost`].
    FlagPost {
        /// Pole height.
        pole_height: f64,
        /// Flag width.
        flag_width: f64,
        /// Flag angle in degrees.
        angle: f64,
    },
    /// Parameters for [`ShapeKind::DoubleLoop`].
    DoubleLoop {
        /// Number of loops.
        loops: u32,
        /// Loop radius.
        radius: f64,
        /// Tube thickness.
        thickness: f64,
    },
    /// Parameters for [`ShapeKind::CurvedTail`].
    CurvedTail {
        /// Head radius.
        head_radius: f64,
        /// Tail length.
        tail_length: f64,
        /// Tube thickness.
        thickness: f64,
    },
}

impl Geometry {
    /// Returns the primitive these parameters describe.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Torus { .. } => ShapeKind::Torus,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::CurvedPath { .. } => ShapeKind::CurvedPath,
            Self::DoubleCurve { .. } => ShapeKind::DoubleCurve,
            Self::AngularFrame { .. } => ShapeKind::AngularFrame,
            Self::FlagShape { .. } => ShapeKind::FlagShape,
            Self::Spiral { .. } => ShapeKind::Spiral,
            Self::FlagPost { .. } => ShapeKind::FlagPost,
            Self::DoubleLoop { .. } => ShapeKind::DoubleLoop,
            Self::CurvedTail { .. } => ShapeKind::CurvedTail,
        }
    }
}

/// A single-digit shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseShape {
    /// The digit this shape stands for.
    pub number: u8,
    /// Primitive tag, always consistent with `geometry`.
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Render parameters.
    pub geometry: Geometry,
    /// RGB hex color.
    pub color: String,
    /// Resting position.
    pub position: Vec3,
    /// Resting scale.
    pub scale: Vec3,
    /// Human-readable description.
    pub description: String,
    /// Named anchors other shapes can attach to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_points: Option<Vec<String>>,
}

impl BaseShape {
    fn new(number: u8, geometry: Geometry, color: &str, description: &str) -> Self {
        Self {
            number,
            kind: geometry.kind(),
            geometry,
            color: color.to_string(),
            position: ORIGIN,
            scale: UNIT_SCALE,
            description: description.to_string(),
            connection_points: None,
        }
    }

    fn with_connection_points(mut self, points: &[&str]) -> Self {
        self.connection_points = Some(points.iter().map(|p| (*p).to_string()).collect());
        self
    }
}

/// Which digit a compound component stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentLabel {
    /// The tens digit, placed left.
    Tens,
    /// The ones digit, placed right.
    Ones,
}

/// A digit embedded in a compound shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeComponent {
    /// Owned copy of the digit's shape.
    pub shape: BaseShape,
    /// Offset from the compound's origin.
    pub position: Vec3,
    /// Which digit this is.
    pub label: ComponentLabel,
}

/// A two-digit shape (10-20).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundShape {
    /// The number this shape stands for.
    pub number: u8,
    /// Always [`ShapeKind::Compound`].
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Tens component, then the ones component unless the ones digit is 0.
    pub components: Vec<ShapeComponent>,
    /// RGB hex color of the compound frame.
    pub color: String,
    /// Resting position.
    pub position: Vec3,
    /// Resting scale.
    pub scale: Vec3,
    /// Human-readable description.
    pub description: String,
}

impl CompoundShape {
    /// Returns the component with the given label, if present.
    #[must_use]
    pub fn component(&self, label: ComponentLabel) -> Option<&ShapeComponent> {
        self.components.iter().find(|c| c.label == label)
    }
}

/// Declarative render description for one number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShapeDescriptor {
    /// 0-9.
    Single(BaseShape),
    /// 10-20.
    Compound(CompoundShape),
}

impl ShapeDescriptor {
    /// The number this descriptor stands for.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Single(shape) => shape.number,
            Self::Compound(shape) => shape.number,
        }
    }

    /// The primitive tag.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Single(shape) => shape.kind,
            Self::Compound(shape) => shape.kind,
        }
    }

    /// RGB hex color.
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Single(shape) => &shape.color,
            Self::Compound(shape) => &shape.color,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Single(shape) => &shape.description,
            Self::Compound(shape) => &shape.description,
        }
    }

    /// Returns the compound form, if this is a two-digit number.
    #[must_use]
    pub const fn as_compound(&self) -> Option<&CompoundShape> {
        match self {
            Self::Single(_) => None,
            Self::Compound(shape) => Some(shape),
        }
    }

    /// Returns the single-digit form, if this is a single digit.
    #[must_use]
    pub const fn as_single(&self) -> Option<&BaseShape> {
        match self {
            Self::Single(shape) => Some(shape),
            Self::Compound(_) => None,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable mapping from number to shape descriptor.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShapeCatalog {
    shapes: BTreeMap<u8, ShapeDescriptor>,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::build()
    }
}

impl ShapeCatalog {
    /// Builds the full 0-20 catalog.
    #[must_use]
    pub fn build() -> Self {
        let digits = single_digit_shapes();
        let mut shapes: BTreeMap<u8, ShapeDescriptor> = digits
            .iter()
            .map(|shape| (shape.number, ShapeDescriptor::Single(shape.clone())))
            .collect();

        for number in 10..=MAX_CATALOG_NUMBER {
            let compound = compound_shape(number, &digits);
            shapes.insert(number, ShapeDescriptor::Compound(compound));
        }

        tracing::debug!(count = shapes.len(), "Built shape catalog");
        Self { shapes }
    }

    /// Looks up the descriptor for `number`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeNotFound`] when `number` is outside 0-20.
    pub fn lookup(&self, number: i64) -> Result<&ShapeDescriptor> {
        u8::try_from(number)
            .ok()
            .and_then(|n| self.shapes.get(&n))
            .ok_or_else(|| CoreError::shape_not_found(number))
    }

    /// All descriptors keyed by number, in ascending order.
    #[must_use]
    pub const fn shapes(&self) -> &BTreeMap<u8, ShapeDescriptor> {
        &self.shapes
    }

    /// Number of descriptors in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the catalog holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn single_digit_shapes() -> Vec<BaseShape> {
    vec![
        BaseShape::new(
            0,
            Geometry::Torus {
                radius: 1.2,
                tube: 0.4,
                radial_segments: 16,
                tubular_segments: 32,
            },
            "#FF6B6B",
            "A complete circle representing wholeness and zero",
        ),
        BaseShape::new(
            1,
            Geometry::Cylinder {
                radius_top: 0.2,
                radius_bottom: 0.3,
                height: 2.5,
            },
            "#4ECDC4",
            "A tall, slender pillar representing unity and singularity",
        ),
        BaseShape::new(
            2,
            Geometry::CurvedPath {
                points: vec![
                    [0.0, 1.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                ],
                thickness: 0.3,
            },
            "#45B7D1",
            "A curved path with flowing lines, like the number 2",
        ),
        BaseShape::new(
            3,
            Geometry::DoubleCurve {
                curves: 2,
                radius: 0.8,
                thickness: 0.3,
            },
            "#96CEB4",
            "Two curved sections that can interlock with others",
        )
        .with_connection_points(&["top_curve", "middle_gap", "bottom_curve"]),
        BaseShape::new(
            4,
            Geometry::AngularFrame {
                width: 1.5,
                height: 2.0,
                thickness: 0.2,
            },
            "#FECA57",
            "An angular, structural frame with strong corners",
        ),
        BaseShape::new(
            5,
            Geometry::FlagShape {
                pole_height: 2.0,
                flag_width: 1.2,
                thickness: 0.25,
            },
            "#FF9FF3",
            "A flag-like shape with horizontal and vertical elements",
        ),
        BaseShape::new(
            6,
            Geometry::Spiral {
                radius: 1.0,
                turns: 1.5,
                thickness: 0.3,
            },
            "#54A0FF",
            "A spiral that can nestle with other curved numbers",
        ),
        BaseShape::new(
            7,
            Geometry::FlagPost {
                pole_height: 2.2,
                flag_width: 1.4,
                angle: 45.0,
            },
            "#5F27CD",
            "An angular flag that can invert and connect",
        )
        .with_connection_points(&["flag_tip", "pole_base", "corner_joint"]),
        BaseShape::new(
            8,
            Geometry::DoubleLoop {
                loops: 2,
                radius: 0.7,
                thickness: 0.3,
            },
            "#00D2D3",
            "Two connected loops that can interlock with linear shapes",
        ),
        BaseShape::new(
            9,
            Geometry::CurvedTail {
                head_radius: 0.8,
                tail_length: 1.5,
                thickness: 0.3,
            },
            "#FF6B6B",
            "A curved head with flowing tail, complementary to 1",
        ),
    ]
}

/// Synthesizes the compound for a two-digit `number` from owned digit copies.
fn compound_shape(number: u8, digits: &[BaseShape]) -> CompoundShape {
    let tens = number / 10;
    let ones = number % 10;

    let mut components = vec![ShapeComponent {
        shape: digits[usize::from(tens)].clone(),
        position: TENS_OFFSET,
        label: ComponentLabel::Tens,
    }];
    if ones != 0 {
        components.push(ShapeComponent {
            shape: digits[usize::from(ones)].clone(),
            position: ONES_OFFSET,
            label: ComponentLabel::Ones,
        });
    }

    CompoundShape {
        number,
        kind: ShapeKind::Compound,
        components,
        color: COMPOUND_COLOR.to_string(),
        position: ORIGIN,
        scale: UNIT_SCALE,
        description: format!("Compound number combining {tens} and {ones}"),
    }
}
