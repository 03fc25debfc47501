//! Integer displacement vectors.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Integer 3-component displacement.
///
/// Used for offsets between voxels, never for absolute positions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vector3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector3i {
    /// Zero displacement
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// One voxel up (+Y)
    pub const UP: Self = Self::new(0, 1, 0);
    /// One voxel down (-Y)
    pub const DOWN: Self = Self::new(0, -1, 0);
    /// One voxel towards -Z
    pub const NORTH: Self = Self::new(0, 0, -1);
    /// One voxel towards +Z
    pub const SOUTH: Self = Self::new(0, 0, 1);
    /// One voxel towards +X
    pub const EAST: Self = Self::new(1, 0, 0);
    /// One voxel towards -X
    pub const WEST: Self = Self::new(-1, 0, 0);

    /// The four horizontal unit directions.
    pub const HORIZONTAL: [Self; 4] = [Self::EAST, Self::WEST, Self::SOUTH, Self::NORTH];

    /// Create a new vector
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    #[inline]
    pub fn length(self) -> f64 {
        f64::from(self.length_squared()).sqrt()
    }

    /// Squared Euclidean length
    #[inline]
    pub const fn length_squared(self) -> i32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Convert to glam IVec3
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for Vector3i {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3i> for IVec3 {
    fn from(v: Vector3i) -> Self {
        v.to_ivec3()
    }
}

impl Add for Vector3i {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3i {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3i {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for Vector3i {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vector3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn componentwise_add() {
        let a = Vector3i::new(1, -2, 3);
        let b = Vector3i::new(-4, 5, 6);
        assert_eq!(a + b, Vector3i::new(-3, 3, 9));
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn horizontal_directions_cancel() {
        let sum = Vector3i::HORIZONTAL
            .iter()
            .fold(Vector3i::ZERO, |acc, &d| acc + d);
        assert_eq!(sum, Vector3i::ZERO);
        assert_eq!(-Vector3i::UP, Vector3i::DOWN);
    }

    #[test]
    fn length_of_diagonal() {
        assert_relative_eq!(Vector3i::new(1, 0, 1).length(), 2f64.sqrt());
        assert_relative_eq!((Vector3i::EAST * 3).length(), 3.0);
    }

    #[test]
    fn ivec3_conversion() {
        let v = Vector3i::new(7, -8, 9);
        assert_eq!(Vector3i::from(v.to_ivec3()), v);
    }

    #[test]
    fn display_format() {
        assert_eq!(Vector3i::new(1, -2, 3).to_string(), "<1,-2,3>");
    }
}
