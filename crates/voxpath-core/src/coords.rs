//! Coordinate systems for the voxel world.
//!
//! Three addressing frames are used:
//! - [`GlobalVoxelCoordinates`]: absolute voxel position, X/Z unbounded.
//! - [`ChunkCoordinates`] + [`LocalVoxelCoordinates`]: the owning chunk
//!   column and the offset inside it.
//! - [`GlobalColumnCoordinates`] / [`LocalColumnCoordinates`]: the same
//!   frames projected onto the X/Z plane.
//!
//! Global to chunk conversion uses floor division, so `x = -1` belongs to
//! chunk `-1` at local offset `CHUNK_WIDTH - 1`.

use std::fmt;
use std::ops::{Add, Sub};

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{CHUNK_DEPTH, CHUNK_VOLUME, CHUNK_WIDTH, WORLD_HEIGHT};
use crate::error::{Axis, Error, Result};
use crate::vector::Vector3i;

#[inline]
fn check(axis: Axis, value: i32, bound: i32) -> Result<i32> {
    if (0..bound).contains(&value) {
        Ok(value)
    } else {
        Err(Error::OutOfRange { axis, value, bound })
    }
}

#[inline]
fn planar_distance(ax: i32, az: i32, bx: i32, bz: i32) -> f64 {
    let dx = f64::from(ax) - f64::from(bx);
    let dz = f64::from(az) - f64::from(bz);
    (dx * dx + dz * dz).sqrt()
}

/// Absolute position of one voxel.
///
/// Y is not range-checked here; the world decides what lies outside
/// `0..WORLD_HEIGHT`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct GlobalVoxelCoordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GlobalVoxelCoordinates {
    /// Create a new global position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the chunk containing this position
    #[inline]
    pub const fn chunk(self) -> ChunkCoordinates {
        ChunkCoordinates::new(self.x.div_euclid(CHUNK_WIDTH), self.z.div_euclid(CHUNK_DEPTH))
    }

    /// Get the offset of this position inside its chunk.
    ///
    /// Fails only when Y lies outside the world's vertical extent.
    #[inline]
    pub fn local(self) -> Result<LocalVoxelCoordinates> {
        LocalVoxelCoordinates::new(
            self.x.rem_euclid(CHUNK_WIDTH),
            self.y,
            self.z.rem_euclid(CHUNK_DEPTH),
        )
    }

    /// Split into owning chunk and local offset
    #[inline]
    pub fn split(self) -> Result<(ChunkCoordinates, LocalVoxelCoordinates)> {
        Ok((self.chunk(), self.local()?))
    }

    /// Recombine a chunk and a local offset; exact inverse of [`split`](Self::split).
    #[inline]
    pub const fn from_chunk_local(chunk: ChunkCoordinates, local: LocalVoxelCoordinates) -> Self {
        Self::new(
            chunk.x * CHUNK_WIDTH + local.x,
            local.y,
            chunk.z * CHUNK_DEPTH + local.z,
        )
    }

    /// Offset by a displacement, or `None` if a component leaves the `i32` range.
    #[inline]
    pub fn checked_add(self, offset: Vector3i) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(offset.x)?,
            self.y.checked_add(offset.y)?,
            self.z.checked_add(offset.z)?,
        ))
    }

    /// Project onto the X/Z plane
    #[inline]
    pub const fn column(self) -> GlobalColumnCoordinates {
        GlobalColumnCoordinates::new(self.x, self.z)
    }

    /// Euclidean distance to another position
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        let dy = f64::from(self.y) - f64::from(other.y);
        let planar = planar_distance(self.x, self.z, other.x, other.z);
        (planar * planar + dy * dy).sqrt()
    }

    /// Minimum corner of this voxel in continuous space
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Voxel containing a continuous point
    #[inline]
    pub fn containing(point: Vec3) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }
}

impl Add<Vector3i> for GlobalVoxelCoordinates {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Vector3i) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for GlobalVoxelCoordinates {
    type Output = Vector3i;

    #[inline]
    fn sub(self, rhs: Self) -> Vector3i {
        Vector3i::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<IVec3> for GlobalVoxelCoordinates {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for GlobalVoxelCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.x, self.y, self.z)
    }
}

/// Position of a voxel relative to its owning chunk.
///
/// X lies in `0..CHUNK_WIDTH`, Y in `0..WORLD_HEIGHT`, Z in `0..CHUNK_DEPTH`.
/// Values outside those ranges cannot be constructed, and arithmetic never
/// rolls over into a neighbouring chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 3]", into = "[i32; 3]")]
pub struct LocalVoxelCoordinates {
    x: i32,
    y: i32,
    z: i32,
}

impl LocalVoxelCoordinates {
    /// Create a validated local position
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self> {
        Ok(Self {
            x: check(Axis::X, x, CHUNK_WIDTH)?,
            y: check(Axis::Y, y, WORLD_HEIGHT)?,
            z: check(Axis::Z, z, CHUNK_DEPTH)?,
        })
    }

    #[inline]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Offset by a displacement, failing if the result leaves the chunk.
    #[inline]
    pub fn checked_add(self, offset: Vector3i) -> Result<Self> {
        Self::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.z.saturating_add(offset.z),
        )
    }

    /// Convert to linear index for flat array storage (Y-major layers)
    #[inline]
    pub const fn to_index(self) -> usize {
        (self.x + self.z * CHUNK_WIDTH + self.y * CHUNK_WIDTH * CHUNK_DEPTH) as usize
    }

    /// Create from linear index
    #[inline]
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= CHUNK_VOLUME {
            return Err(Error::IndexOutOfRange {
                index,
                len: CHUNK_VOLUME,
            });
        }
        let index = index as i32;
        let layer = CHUNK_WIDTH * CHUNK_DEPTH;
        Ok(Self {
            x: index % CHUNK_WIDTH,
            y: index / layer,
            z: (index % layer) / CHUNK_WIDTH,
        })
    }

    /// Project onto the X/Z plane
    #[inline]
    pub const fn column(self) -> LocalColumnCoordinates {
        LocalColumnCoordinates {
            x: self.x,
            z: self.z,
        }
    }

    /// Euclidean distance to another local position
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        let dy = f64::from(self.y - other.y);
        let planar = planar_distance(self.x, self.z, other.x, other.z);
        (planar * planar + dy * dy).sqrt()
    }
}

impl TryFrom<[i32; 3]> for LocalVoxelCoordinates {
    type Error = Error;

    fn try_from([x, y, z]: [i32; 3]) -> Result<Self> {
        Self::new(x, y, z)
    }
}

impl From<LocalVoxelCoordinates> for [i32; 3] {
    fn from(local: LocalVoxelCoordinates) -> Self {
        [local.x, local.y, local.z]
    }
}

impl fmt::Display for LocalVoxelCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.x, self.y, self.z)
    }
}

/// Chunk position in chunk units.
///
/// A chunk spans the whole vertical extent, so only X and Z are needed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct ChunkCoordinates {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoordinates {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Global position of the chunk's minimum corner (Y = 0)
    #[inline]
    pub const fn origin(self) -> GlobalVoxelCoordinates {
        GlobalVoxelCoordinates::new(self.x * CHUNK_WIDTH, 0, self.z * CHUNK_DEPTH)
    }

    /// Get the four horizontally adjacent chunk positions
    pub const fn neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.z),
            Self::new(self.x + 1, self.z),
            Self::new(self.x, self.z - 1),
            Self::new(self.x, self.z + 1),
        ]
    }

    /// Euclidean distance to another chunk, in chunk units
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        planar_distance(self.x, self.z, other.x, other.z)
    }
}

impl fmt::Display for ChunkCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.z)
    }
}

/// Vertical column of voxels in world space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct GlobalColumnCoordinates {
    pub x: i32,
    pub z: i32,
}

impl GlobalColumnCoordinates {
    /// Create a new global column
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Get the chunk containing this column
    #[inline]
    pub const fn chunk(self) -> ChunkCoordinates {
        ChunkCoordinates::new(self.x.div_euclid(CHUNK_WIDTH), self.z.div_euclid(CHUNK_DEPTH))
    }

    /// Get the column's offset inside its chunk
    #[inline]
    pub const fn local(self) -> LocalColumnCoordinates {
        LocalColumnCoordinates {
            x: self.x.rem_euclid(CHUNK_WIDTH),
            z: self.z.rem_euclid(CHUNK_DEPTH),
        }
    }

    /// Recombine a chunk and a local column
    #[inline]
    pub const fn from_chunk_local(chunk: ChunkCoordinates, local: LocalColumnCoordinates) -> Self {
        Self::new(chunk.x * CHUNK_WIDTH + local.x, chunk.z * CHUNK_DEPTH + local.z)
    }

    /// Lift to a voxel at the given height
    #[inline]
    pub const fn at_height(self, y: i32) -> GlobalVoxelCoordinates {
        GlobalVoxelCoordinates::new(self.x, y, self.z)
    }

    /// Euclidean distance to another column
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        planar_distance(self.x, self.z, other.x, other.z)
    }
}

impl fmt::Display for GlobalColumnCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.z)
    }
}

/// Column position inside a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalColumnCoordinates {
    x: i32,
    z: i32,
}

impl LocalColumnCoordinates {
    /// Create a validated local column
    #[inline]
    pub fn new(x: i32, z: i32) -> Result<Self> {
        Ok(Self {
            x: check(Axis::X, x, CHUNK_WIDTH)?,
            z: check(Axis::Z, z, CHUNK_DEPTH)?,
        })
    }

    #[inline]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Lift to a local voxel at the given height
    #[inline]
    pub fn at_height(self, y: i32) -> Result<LocalVoxelCoordinates> {
        LocalVoxelCoordinates::new(self.x, y, self.z)
    }

    /// Euclidean distance to another local column
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        planar_distance(self.x, self.z, other.x, other.z)
    }
}

impl fmt::Display for LocalColumnCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.z)
    }
}
