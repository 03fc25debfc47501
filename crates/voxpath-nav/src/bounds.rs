//! Agent bounding volume and voxel occupancy tests.

use glam::Vec3;
use voxpath_core::{GlobalVoxelCoordinates, Vector3i, WorldQuery};

use crate::error::{Result, SearchError};

/// Faces that merely touch a voxel boundary do not overlap that voxel.
const EPSILON: f32 = 1e-4;

/// Furthest a box corner may lie from its anchor voxel, in voxels.
pub const MAX_EXTENT: f32 = 64.0;

/// Axis-aligned box describing the space an agent occupies.
///
/// Expressed in voxel units relative to the minimum corner of the voxel the
/// agent stands in. The default is the unit box filling exactly that voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::UNIT
    }
}

impl BoundingBox {
    /// The unit box filling one voxel.
    pub const UNIT: Self = Self::new(Vec3::ZERO, Vec3::ONE);

    /// Create a new box from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given footprint width and height, centred on the voxel
    /// column and resting on the voxel floor.
    pub fn agent(width: f32, height: f32) -> Self {
        let half = width * 0.5;
        Self {
            min: Vec3::new(0.5 - half, 0.0, 0.5 - half),
            max: Vec3::new(0.5 + half, height, 0.5 + half),
        }
    }

    /// Get the size of the box
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the box
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Check if this box intersects another (touching faces do not count)
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Check that the box is finite, non-inverted, overlaps at least one voxel
    /// and stays within [`MAX_EXTENT`] of its anchor voxel.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SearchError::InvalidBounds(format!(
                "non-finite corners {} .. {}",
                self.min, self.max
            )));
        }
        if self.min.abs().max_element() > MAX_EXTENT || self.max.abs().max_element() > MAX_EXTENT
        {
            return Err(SearchError::InvalidBounds(format!(
                "corners {} .. {} reach further than {MAX_EXTENT} voxels from the anchor",
                self.min, self.max
            )));
        }
        if self.min.cmpge(self.max).any() {
            return Err(SearchError::InvalidBounds(format!(
                "min {} is not below max {} on every axis",
                self.min, self.max
            )));
        }
        let (lo, hi) = self.voxel_offsets();
        if lo.x > hi.x || lo.y > hi.y || lo.z > hi.z {
            return Err(SearchError::InvalidBounds(format!(
                "box {} .. {} is too thin to cover a voxel",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Inclusive range of voxel offsets the box overlaps, relative to its anchor voxel.
    ///
    /// Computed in local space so precision does not degrade far from the origin.
    pub fn voxel_offsets(&self) -> (Vector3i, Vector3i) {
        let lo = (self.min + Vec3::splat(EPSILON)).floor().as_ivec3();
        let hi = (self.max - Vec3::splat(EPSILON)).ceil().as_ivec3() - glam::IVec3::ONE;
        (lo.into(), hi.into())
    }

    /// Inclusive corners of the voxel block the box overlaps at `pos`.
    ///
    /// `None` when part of the block lies outside the `i32` coordinate range.
    pub fn voxel_bounds(
        &self,
        pos: GlobalVoxelCoordinates,
    ) -> Option<(GlobalVoxelCoordinates, GlobalVoxelCoordinates)> {
        let (lo, hi) = self.voxel_offsets();
        Some((pos.checked_add(lo)?, pos.checked_add(hi)?))
    }

    /// Every voxel overlapped by the box when the agent stands at `pos`.
    pub fn occupied_voxels(
        &self,
        pos: GlobalVoxelCoordinates,
    ) -> impl Iterator<Item = GlobalVoxelCoordinates> {
        self.voxel_bounds(pos).into_iter().flat_map(|(lo, hi)| {
            (lo.y..=hi.y).flat_map(move |y| layer(lo, hi, y))
        })
    }

    /// Voxels directly beneath the box's footprint when the agent stands at `pos`.
    pub fn floor_voxels(
        &self,
        pos: GlobalVoxelCoordinates,
    ) -> impl Iterator<Item = GlobalVoxelCoordinates> {
        self.voxel_bounds(pos)
            .and_then(|(lo, hi)| Some((lo, hi, lo.y.checked_sub(1)?)))
            .into_iter()
            .flat_map(|(lo, hi, y)| layer(lo, hi, y))
    }

    /// Returns true if no voxel under the box is occupied at `pos`.
    ///
    /// A box reaching past the `i32` coordinate range never fits.
    pub fn fits<W: WorldQuery + ?Sized>(&self, world: &W, pos: GlobalVoxelCoordinates) -> bool {
        self.voxel_bounds(pos).is_some()
            && self.occupied_voxels(pos).all(|voxel| !world.is_occupied(voxel))
    }

    /// Returns true if any voxel beneath the footprint is occupied at `pos`.
    pub fn is_supported<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        pos: GlobalVoxelCoordinates,
    ) -> bool {
        self.floor_voxels(pos).any(|voxel| world.is_occupied(voxel))
    }
}

/// One horizontal layer of the block `lo..=hi` at height `y`.
fn layer(
    lo: GlobalVoxelCoordinates,
    hi: GlobalVoxelCoordinates,
    y: i32,
) -> impl Iterator<Item = GlobalVoxelCoordinates> {
    (lo.z..=hi.z).flat_map(move |z| (lo.x..=hi.x).map(move |x| GlobalVoxelCoordinates::new(x, y, z)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use voxpath_core::query::from_fn;

    fn collect(bounds: &BoundingBox, pos: GlobalVoxelCoordinates) -> Vec<GlobalVoxelCoordinates> {
        bounds.occupied_voxels(pos).collect()
    }

    #[test]
    fn unit_box_covers_single_voxel() {
        let pos = GlobalVoxelCoordinates::new(-3, 4, 7);
        assert_eq!(collect(&BoundingBox::default(), pos), vec![pos]);
        assert_eq!(
            BoundingBox::UNIT.floor_voxels(pos).collect::<Vec<_>>(),
            vec![GlobalVoxelCoordinates::new(-3, 3, 7)]
        );
    }

    #[test]
    fn tall_agent_covers_two_voxels() {
        let agent = BoundingBox::agent(0.6, 1.8);
        let pos = GlobalVoxelCoordinates::new(0, 4, 0);
        assert_eq!(
            collect(&agent, pos),
            vec![pos, GlobalVoxelCoordinates::new(0, 5, 0)]
        );
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn wide_agent_covers_neighbours() {
        let wide = BoundingBox::agent(2.0, 1.0);
        let voxels = collect(&wide, GlobalVoxelCoordinates::new(10, 4, 10));
        // -0.5..1.5 spans offsets -1..=1 on X and Z.
        assert_eq!(voxels.len(), 9);
        assert!(voxels.contains(&GlobalVoxelCoordinates::new(9, 4, 11)));
        assert_eq!(wide.floor_voxels(GlobalVoxelCoordinates::new(10, 4, 10)).count(), 9);
    }

    #[test]
    fn far_from_origin_stays_exact() {
        let pos = GlobalVoxelCoordinates::new(29_999_999, 64, -29_999_999);
        assert_eq!(collect(&BoundingBox::UNIT, pos), vec![pos]);
    }

    #[test]
    fn fits_and_support() {
        let world = from_fn(|pos: GlobalVoxelCoordinates| pos.y < 4 || pos == GlobalVoxelCoordinates::new(0, 5, 0));
        let agent = BoundingBox::agent(0.6, 1.8);

        assert!(BoundingBox::UNIT.fits(&world, GlobalVoxelCoordinates::new(0, 4, 0)));
        assert!(!agent.fits(&world, GlobalVoxelCoordinates::new(0, 4, 0)));
        assert!(agent.fits(&world, GlobalVoxelCoordinates::new(1, 4, 0)));

        assert!(agent.is_supported(&world, GlobalVoxelCoordinates::new(1, 4, 0)));
        assert!(!agent.is_supported(&world, GlobalVoxelCoordinates::new(1, 5, 0)));
    }

    #[test]
    fn rejects_malformed_boxes() {
        let inverted = BoundingBox::new(Vec3::ONE, Vec3::ZERO);
        let flat = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let nan = BoundingBox::new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 1.0));
        let sliver = BoundingBox::new(Vec3::splat(0.99999), Vec3::ONE);
        let deep = BoundingBox::new(Vec3::new(0.0, -3e9, 0.0), Vec3::ONE);
        let huge = BoundingBox::new(Vec3::ZERO, Vec3::splat(1e6));
        let just_over = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, MAX_EXTENT + 1.0, 1.0));

        for bounds in [inverted, flat, nan, sliver, deep, huge, just_over] {
            assert!(
                matches!(bounds.validate(), Err(SearchError::InvalidBounds(_))),
                "{bounds:?} accepted"
            );
        }
    }

    #[test]
    fn largest_accepted_box() {
        let tall = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, MAX_EXTENT, 1.0));
        assert!(tall.validate().is_ok());
        assert_eq!(tall.occupied_voxels(GlobalVoxelCoordinates::new(0, 0, 0)).count(), 64);
    }

    #[test]
    fn coordinate_range_edges() {
        let open_air = from_fn(|_| false);
        let solid = from_fn(|_| true);

        // No voxel exists below i32::MIN, so nothing supports the agent.
        let bottom = GlobalVoxelCoordinates::new(0, i32::MIN, 0);
        assert_eq!(BoundingBox::UNIT.floor_voxels(bottom).count(), 0);
        assert!(!BoundingBox::UNIT.is_supported(&solid, bottom));

        // A wide box at the east edge would reach past i32::MAX.
        let east = GlobalVoxelCoordinates::new(i32::MAX, 4, 0);
        let wide = BoundingBox::agent(2.0, 1.0);
        assert!(wide.voxel_bounds(east).is_none());
        assert!(!wide.fits(&open_air, east));
        assert!(BoundingBox::UNIT.fits(&open_air, east));
    }

    #[test]
    fn intersects_ignores_touching_faces() {
        let a = BoundingBox::UNIT;
        let b = BoundingBox::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = BoundingBox::new(Vec3::splat(0.5), Vec3::splat(1.5));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(c.center(), Vec3::ONE);
        assert_eq!(a.size(), Vec3::ONE);
    }
}
