//! Kind registry: name tables and construct-by-name
//!
//! The editor's "create node" menus enumerate kinds by display name and
//! construct a default-parameterized kind from the chosen entry.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;

use super::{OperatorKind, PrimitiveKind};

impl PrimitiveKind {
    /// Display names of all primitive kinds, in menu order.
    pub const NAMES: &'static [&'static str] =
        &["sphere", "box", "cylinder", "torus", "ellipsoid", "plane"];

    /// Display name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Box { .. } => "box",
            PrimitiveKind::Cylinder { .. } => "cylinder",
            PrimitiveKind::Torus { .. } => "torus",
            PrimitiveKind::Ellipsoid { .. } => "ellipsoid",
            PrimitiveKind::Plane { .. } => "plane",
        }
    }

    /// Construct a kind with editor-default parameters from its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sphere" => PrimitiveKind::Sphere,
            "box" => PrimitiveKind::Box {
                dimensions: Vec3::ONE,
            },
            "cylinder" => PrimitiveKind::Cylinder {
                radius: 0.5,
                height: 1.0,
            },
            "torus" => PrimitiveKind::Torus {
                major_radius: 0.4,
                minor_radius: 0.1,
            },
            "ellipsoid" => PrimitiveKind::Ellipsoid {
                radii: Vec3::new(0.5, 0.3, 0.2),
            },
            "plane" => PrimitiveKind::Plane {
                normal: Vec3::Y,
                h: 0.0,
            },
            _ => return None,
        })
    }
}

impl OperatorKind {
    /// Default blend radius for smooth operators.
    pub const DEFAULT_K: f32 = 0.3;

    /// Display names of all operator kinds, in menu order.
    pub const NAMES: &'static [&'static str] = &[
        "union",
        "intersection",
        "subtraction",
        "smooth union",
        "smooth intersection",
        "smooth subtraction",
    ];

    /// Display name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Union => "union",
            OperatorKind::Intersection => "intersection",
            OperatorKind::Subtraction => "subtraction",
            OperatorKind::SmoothUnion { .. } => "smooth union",
            OperatorKind::SmoothIntersection { .. } => "smooth intersection",
            OperatorKind::SmoothSubtraction { .. } => "smooth subtraction",
        }
    }

    /// Construct a kind with editor-default parameters from its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "union" => OperatorKind::Union,
            "intersection" => OperatorKind::Intersection,
            "subtraction" => OperatorKind::Subtraction,
            "smooth union" => OperatorKind::SmoothUnion { k: Self::DEFAULT_K },
            "smooth intersection" => OperatorKind::SmoothIntersection { k: Self::DEFAULT_K },
            "smooth subtraction" => OperatorKind::SmoothSubtraction { k: Self::DEFAULT_K },
            _ => return None,
        })
    }

    /// Whether this kind is a smooth (blending) variant, which requires
    /// exactly two inputs at generation time.
    pub fn is_smooth(&self) -> bool {
        matches!(
            self,
            OperatorKind::SmoothUnion { .. }
                | OperatorKind::SmoothIntersection { .. }
                | OperatorKind::SmoothSubtraction { .. }
        )
    }
}
