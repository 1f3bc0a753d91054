//! Cross-section shapes
//!
//! A shape owns its geometric parameters and the section properties derived
//! from them. Every parameter update recomputes the properties before
//! returning, so they can never be read in a stale state.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{FrameError, FrameResult};

/// Common interface of parameterised cross-section shapes
pub trait Shape {
    /// Merge the given `(name, value)` pairs into the parameters and recompute
    /// the section properties.
    ///
    /// The update is all-or-nothing: an unknown name or an invalid value
    /// leaves the shape untouched.
    fn update(&mut self, params: &[(&str, f64)]) -> FrameResult<()>;

    /// Recompute the section properties from the current parameters
    fn recalculate(&mut self);

    /// Cross-sectional area
    fn area(&self) -> f64;

    /// Names of the parameters this shape accepts
    fn parameter_names(&self) -> &'static [&'static str];

    /// Current parameter values, in the order of [`Shape::parameter_names`]
    fn parameters(&self) -> Vec<(&'static str, f64)>;
}

/// Section properties of a planar (2D) shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneProperties {
    /// Cross-sectional area
    pub area: f64,
    /// Second moment of area about the bending axis
    pub inertia: f64,
    /// Distance from the neutral axis to the extreme fibre
    pub y_max: f64,
}

/// Section properties of a spatial (3D) shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceProperties {
    /// Cross-sectional area
    pub area: f64,
    /// Second moment resisting deflection along n1
    pub i1: f64,
    /// Second moment resisting deflection along n2
    pub i2: f64,
    /// Torsion constant
    pub j: f64,
}

/// Geometry of a 2D cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Profile2D {
    /// Solid circle of radius `r`
    Circle { r: f64 },
    /// Solid rectangle, width `b`, height `h`
    Rectangle { b: f64, h: f64 },
    /// Hollow box, outer `a` x `b`, walls right `t1`, top `t2`, left `t3`, bottom `t4`
    Box {
        a: f64,
        b: f64,
        t1: f64,
        t2: f64,
        t3: f64,
        t4: f64,
    },
    /// Properties given directly
    Generalized { area: f64, inertia: f64, y_max: f64 },
}

/// Geometry of a 3D cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Profile3D {
    /// Solid circle of radius `r`
    Circle { r: f64 },
    /// Solid rectangle, width `b` (along n2), height `h` (along n1)
    Rectangle { b: f64, h: f64 },
}

/// A 2D cross-section shape with its derived properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape2D {
    profile: Profile2D,
    properties: PlaneProperties,
}

/// A 3D cross-section shape with its derived properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape3D {
    profile: Profile3D,
    properties: SpaceProperties,
}

fn check_value(key: &str, value: f64) -> FrameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FrameError::InvalidParameter {
            key: key.to_string(),
            value,
        })
    }
}

/// Validate every pair before anything is written
fn validate(
    shape: &'static str,
    accepted: &[&str],
    params: &[(&str, f64)],
) -> FrameResult<()> {
    for &(key, value) in params {
        if !accepted.contains(&key) {
            return Err(FrameError::UnknownParameter {
                shape,
                key: key.to_string(),
            });
        }
        check_value(key, value)?;
    }
    Ok(())
}

impl Profile2D {
    fn name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Rectangle { .. } => "rectangle",
            Self::Box { .. } => "box",
            Self::Generalized { .. } => "generalized",
        }
    }

    fn keys(&self) -> &'static [&'static str] {
        match self {
            Self::Circle { .. } => &["R"],
            Self::Rectangle { .. } => &["b", "h"],
            Self::Box { .. } => &["a", "b", "t1", "t2", "t3", "t4"],
            Self::Generalized { .. } => &["A", "I", "y_max"],
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut f64> {
        match (self, key) {
            (Self::Circle { r }, "R") => Some(r),
            (Self::Rectangle { b, .. }, "b") => Some(b),
            (Self::Rectangle { h, .. }, "h") => Some(h),
            (Self::Box { a, .. }, "a") => Some(a),
            (Self::Box { b, .. }, "b") => Some(b),
            (Self::Box { t1, .. }, "t1") => Some(t1),
            (Self::Box { t2, .. }, "t2") => Some(t2),
            (Self::Box { t3, .. }, "t3") => Some(t3),
            (Self::Box { t4, .. }, "t4") => Some(t4),
            (Self::Generalized { area, .. }, "A") => Some(area),
            (Self::Generalized { inertia, .. }, "I") => Some(inertia),
            (Self::Generalized { y_max, .. }, "y_max") => Some(y_max),
            _ => None,
        }
    }

    fn values(&self) -> Vec<f64> {
        match *self {
            Self::Circle { r } => vec![r],
            Self::Rectangle { b, h } => vec![b, h],
            Self::Box {
                a,
                b,
                t1,
                t2,
                t3,
                t4,
            } => vec![a, b, t1, t2, t3, t4],
            Self::Generalized {
                area,
                inertia,
                y_max,
            } => vec![area, inertia, y_max],
        }
    }

    /// Box walls must leave a non-empty hollow
    fn check_walls(&self) -> FrameResult<()> {
        match *self {
            Self::Box {
                a,
                b,
                t1,
                t2,
                t3,
                t4,
            } if t1 + t3 >= a || t2 + t4 >= b => Err(FrameError::InvalidGeometry(format!(
                "box walls ({t1}, {t2}, {t3}, {t4}) do not fit a {a} x {b} outline"
            ))),
            _ => Ok(()),
        }
    }

    fn properties(&self) -> PlaneProperties {
        match *self {
            Self::Circle { r } => PlaneProperties {
                area: PI * r.powi(2),
                inertia: PI * r.powi(4) / 4.0,
                y_max: r,
            },
            Self::Rectangle { b, h } => PlaneProperties {
                area: b * h,
                inertia: b * h.powi(3) / 12.0,
                y_max: h / 2.0,
            },
            Self::Box {
                a,
                b,
                t1,
                t2,
                t3,
                t4,
            } => {
                let inner_a = a - t1 - t3;
                let inner_b = b - t2 - t4;
                PlaneProperties {
                    area: a * b - inner_a * inner_b,
                    inertia: a * b.powi(3) / 12.0 - inner_a * inner_b.powi(3) / 12.0,
                    y_max: b / 2.0,
                }
            }
            Self::Generalized {
                area,
                inertia,
                y_max,
            } => PlaneProperties {
                area,
                inertia,
                y_max,
            },
        }
    }
}

impl Shape2D {
    fn from_profile(profile: Profile2D) -> FrameResult<Self> {
        for (key, value) in profile.keys().iter().zip(profile.values()) {
            check_value(key, value)?;
        }
        profile.check_walls()?;
        let properties = profile.properties();
        Ok(Self {
            profile,
            properties,
        })
    }

    /// Solid circular section
    pub fn circle(r: f64) -> FrameResult<Self> {
        Self::from_profile(Profile2D::Circle { r })
    }

    /// Solid rectangular section
    pub fn rectangle(b: f64, h: f64) -> FrameResult<Self> {
        Self::from_profile(Profile2D::Rectangle { b, h })
    }

    /// Hollow box section
    ///
    /// # Arguments
    /// * `a` - Outer width
    /// * `b` - Outer height
    /// * `t1`, `t2`, `t3`, `t4` - Right, top, left and bottom wall thickness
    pub fn box_section(a: f64, b: f64, t1: f64, t2: f64, t3: f64, t4: f64) -> FrameResult<Self> {
        Self::from_profile(Profile2D::Box {
            a,
            b,
            t1,
            t2,
            t3,
            t4,
        })
    }

    /// Section with area, second moment and extreme fibre distance given directly
    pub fn generalized(area: f64, inertia: f64, y_max: f64) -> FrameResult<Self> {
        Self::from_profile(Profile2D::Generalized {
            area,
            inertia,
            y_max,
        })
    }

    /// Current geometry
    pub fn profile(&self) -> &Profile2D {
        &self.profile
    }

    /// Derived section properties
    pub fn properties(&self) -> PlaneProperties {
        self.properties
    }

    /// Second moment of area
    pub fn inertia(&self) -> f64 {
        self.properties.inertia
    }

    /// Extreme fibre distance
    pub fn y_max(&self) -> f64 {
        self.properties.y_max
    }
}

impl Shape for Shape2D {
    fn update(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        validate(self.profile.name(), self.profile.keys(), params)?;
        let mut profile = self.profile.clone();
        for &(key, value) in params {
            if let Some(slot) = profile.slot(key) {
                *slot = value;
            }
        }
        profile.check_walls()?;
        self.profile = profile;
        self.recalculate();
        Ok(())
    }

    fn recalculate(&mut self) {
        self.properties = self.profile.properties();
    }

    fn area(&self) -> f64 {
        self.properties.area
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        self.profile.keys()
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.profile.keys().iter().copied().zip(self.profile.values()).collect()
    }
}

impl Profile3D {
    fn name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Rectangle { .. } => "rectangle",
        }
    }

    fn keys(&self) -> &'static [&'static str] {
        match self {
            Self::Circle { .. } => &["R"],
            Self::Rectangle { .. } => &["b", "h"],
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut f64> {
        match (self, key) {
            (Self::Circle { r }, "R") => Some(r),
            (Self::Rectangle { b, .. }, "b") => Some(b),
            (Self::Rectangle { h, .. }, "h") => Some(h),
            _ => None,
        }
    }

    fn values(&self) -> Vec<f64> {
        match *self {
            Self::Circle { r } => vec![r],
            Self::Rectangle { b, h } => vec![b, h],
        }
    }

    fn properties(&self) -> SpaceProperties {
        match *self {
            Self::Circle { r } => {
                let i = PI * r.powi(4) / 4.0;
                SpaceProperties {
                    area: PI * r.powi(2),
                    i1: i,
                    i2: i,
                    j: PI * r.powi(4) / 2.0,
                }
            }
            Self::Rectangle { b, h } => SpaceProperties {
                area: b * h,
                i1: b * h.powi(3) / 12.0,
                i2: h * b.powi(3) / 12.0,
                j: (h * b.powi(3) + b * h.powi(3)) / 12.0,
            },
        }
    }
}

impl Shape3D {
    fn from_profile(profile: Profile3D) -> FrameResult<Self> {
        for (key, value) in profile.keys().iter().zip(profile.values()) {
            check_value(key, value)?;
        }
        let properties = profile.properties();
        Ok(Self {
            profile,
            properties,
        })
    }

    /// Solid circular section
    pub fn circle(r: f64) -> FrameResult<Self> {
        Self::from_profile(Profile3D::Circle { r })
    }

    /// Solid rectangular section, `h` measured along n1 and `b` along n2
    pub fn rectangle(b: f64, h: f64) -> FrameResult<Self> {
        Self::from_profile(Profile3D::Rectangle { b, h })
    }

    /// Current geometry
    pub fn profile(&self) -> &Profile3D {
        &self.profile
    }

    /// Derived section properties
    pub fn properties(&self) -> SpaceProperties {
        self.properties
    }

    /// Extreme fibre distances along n1 and n2
    pub fn fibre_distances(&self) -> (f64, f64) {
        match self.profile {
            Profile3D::Circle { r } => (r, r),
            Profile3D::Rectangle { b, h } => (h / 2.0, b / 2.0),
        }
    }
}

impl Shape for Shape3D {
    fn update(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        validate(self.profile.name(), self.profile.keys(), params)?;
        for &(key, value) in params {
            if let Some(slot) = self.profile.slot(key) {
                *slot = value;
            }
        }
        self.recalculate();
        Ok(())
    }

    fn recalculate(&mut self) {
        self.properties = self.profile.properties();
    }

    fn area(&self) -> f64 {
        self.properties.area
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        self.profile.keys()
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.profile.keys().iter().copied().zip(self.profile.values()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_properties() {
        let shape = Shape2D::circle(0.05).unwrap();
        assert_relative_eq!(shape.area(), PI * 0.0025, max_relative = 1e-12);
        assert_relative_eq!(shape.inertia(), PI * 0.05_f64.powi(4) / 4.0);
        assert_relative_eq!(shape.y_max(), 0.05);
    }

    #[test]
    fn test_box_properties() {
        let shape = Shape2D::box_section(0.2, 0.3, 0.01, 0.02, 0.01, 0.02).unwrap();
        let p = shape.properties();
        assert_relative_eq!(p.area, 0.2 * 0.3 - 0.18 * 0.26, max_relative = 1e-12);
        assert_relative_eq!(
            p.inertia,
            0.2 * 0.3_f64.powi(3) / 12.0 - 0.18 * 0.26_f64.powi(3) / 12.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(p.y_max, 0.15);
    }

    #[test]
    fn test_box_walls_must_fit() {
        assert!(matches!(
            Shape2D::box_section(0.2, 0.3, 0.1, 0.02, 0.1, 0.02),
            Err(FrameError::InvalidGeometry(_))
        ));
        let mut shape = Shape2D::box_section(0.2, 0.3, 0.01, 0.02, 0.01, 0.02).unwrap();
        let before = shape.clone();
        assert!(shape.update(&[("t2", 0.15), ("t4", 0.15)]).is_err());
        assert_eq!(shape, before);
    }

    #[test]
    fn test_generalized_passthrough() {
        let mut shape = Shape2D::generalized(1e-3, 2e-6, 0.04).unwrap();
        assert_eq!(
            shape.properties(),
            PlaneProperties {
                area: 1e-3,
                inertia: 2e-6,
                y_max: 0.04
            }
        );
        shape.update(&[("I", 5e-6)]).unwrap();
        assert_eq!(shape.inertia(), 5e-6);
        assert_eq!(shape.area(), 1e-3);
    }

    #[test]
    fn test_update_recalculates() {
        let mut shape = Shape2D::rectangle(0.1, 0.2).unwrap();
        shape.update(&[("h", 0.4)]).unwrap();
        assert_relative_eq!(shape.area(), 0.04, max_relative = 1e-12);
        assert_relative_eq!(shape.inertia(), 0.1 * 0.064 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(shape.y_max(), 0.2);
        assert_eq!(shape.parameters(), vec![("b", 0.1), ("h", 0.4)]);
    }

    #[test]
    fn test_unknown_parameter_is_atomic() {
        let mut shape = Shape2D::rectangle(0.1, 0.2).unwrap();
        let before = shape.clone();
        let err = shape.update(&[("b", 0.5), ("R", 0.1)]).unwrap_err();
        assert!(matches!(err, FrameError::UnknownParameter { shape: "rectangle", .. }));
        assert_eq!(shape, before);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut shape = Shape3D::circle(0.02).unwrap();
        assert!(matches!(
            shape.update(&[("R", -1.0)]),
            Err(FrameError::InvalidParameter { .. })
        ));
        assert!(Shape2D::circle(f64::NAN).is_err());
        assert_relative_eq!(shape.properties().i1, PI * 0.02_f64.powi(4) / 4.0);
    }

    #[test]
    fn test_rectangle_3d_properties() {
        let shape = Shape3D::rectangle(0.1, 0.3).unwrap();
        let p = shape.properties();
        assert_relative_eq!(p.area, 0.03, max_relative = 1e-12);
        assert_relative_eq!(p.i1, 0.1 * 0.027 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(p.i2, 0.3 * 0.001 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(p.j, (0.3 * 0.001 + 0.1 * 0.027) / 12.0, max_relative = 1e-12);
        assert_eq!(shape.fibre_distances(), (0.15, 0.05));
    }

    #[test]
    fn test_circle_monotonic_in_radius() {
        let mut previous = Shape2D::circle(0.001).unwrap().properties();
        for step in 1..50 {
            let r = 0.001 + step as f64 * 0.002;
            let current = Shape2D::circle(r).unwrap().properties();
            assert!(current.area > previous.area);
            assert!(current.inertia > previous.inertia);
            previous = current;
        }
    }
}
