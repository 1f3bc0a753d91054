//! Nodes - points in 2D or 3D space

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// A node of a planar frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// A node of a spatial frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node3D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node2D {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the direction towards `other`, measured from global +X
    pub fn angle_to(&self, other: &Node2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl Node3D {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Get the coordinates as a vector
    pub fn coords(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node3D) -> f64 {
        (other.coords() - self.coords()).norm()
    }
}
