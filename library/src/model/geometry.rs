//! Minimal 3-D geometry used by the branch generator.
//!
//! Only what the forest needs: points, vectors, lines and a rigid rotation
//! about an axis parallel to world Z.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: Point3) -> f64 {
        (other - *self).length()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const Y_AXIS: Vector3 = Vector3::new(0.0, 1.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Unit vector in the same direction. A zero (or non-finite) vector has
    /// no direction and yields `Vector3::ZERO`.
    pub fn unitized(&self) -> Vector3 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Vector3::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vector3::ZERO
        }
    }

    /// Counter-clockwise rotation about world Z, looking down from +Z.
    pub fn rotated_z(&self, angle: f64) -> Vector3 {
        let (sin, cos) = angle.sin_cos();
        Vector3::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: Vector3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vector3;

    fn sub(self, rhs: Point3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

/// A directed segment between two points.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Line {
    pub from: Point3,
    pub to: Point3,
}

impl Line {
    pub const fn new(from: Point3, to: Point3) -> Self {
        Self { from, to }
    }

    /// Line starting at `start` running `length` along `direction`.
    ///
    /// The direction is unitized first; a negative length points the line
    /// backwards and a zero direction collapses it onto `start`.
    pub fn from_direction(start: Point3, direction: Vector3, length: f64) -> Self {
        Self::new(start, start + direction.unitized() * length)
    }

    pub fn direction(&self) -> Vector3 {
        self.to - self.from
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn unit_tangent(&self) -> Vector3 {
        self.direction().unitized()
    }

    pub fn transformed(&self, xform: &Transform) -> Line {
        Line::new(xform.apply(self.from), xform.apply(self.to))
    }
}

/// Rigid rotation about an axis parallel to world Z through `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    center: Point3,
    sin: f64,
    cos: f64,
}

impl Transform {
    pub fn rotation(angle: f64, center: Point3) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { center, sin, cos }
    }

    pub fn apply(&self, point: Point3) -> Point3 {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        Point3::new(
            self.center.x + dx * self.cos - dy * self.sin,
            self.center.y + dx * self.sin + dy * self.cos,
            point.z,
        )
    }
}
