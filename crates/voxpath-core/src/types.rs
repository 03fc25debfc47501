//! Block identifiers.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Kind of block stored in a voxel.
///
/// Navigation only distinguishes air from everything else; the named
/// solid kinds exist so generated worlds stay readable when inspected.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Empty space; the zero value
    pub const AIR: Self = Self(0);
    pub const STONE: Self = Self(1);
    /// Top layer of generated floors
    pub const GRASS: Self = Self(3);
    /// Bottom layer of generated floors
    pub const BEDROCK: Self = Self(4);

    /// Returns true if agents can move through this block.
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == Self::AIR.0
    }

    /// Returns true if this block obstructs movement.
    #[inline]
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_air_is_passable() {
        assert_eq!(BlockId::default(), BlockId::AIR);
        assert!(BlockId::AIR.is_air() && !BlockId::AIR.is_solid());
        for solid in [BlockId::STONE, BlockId::GRASS, BlockId::BEDROCK, BlockId(u16::MAX)] {
            assert!(solid.is_solid(), "{solid:?} should block movement");
        }
    }
}
