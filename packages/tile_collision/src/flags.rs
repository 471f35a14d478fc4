//! Which sides of a moving body were blocked.

use tile_grid::{
    Face,
    PerFace,
};
use std::ops::BitOr;


/// Which sides of a moving body were blocked during a movement.
///
/// `right` means the body's right side ran into something, which happens when
/// moving towards positive X.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub const NONE: CollisionFlags = CollisionFlags {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Flags with only the side the body faces with `face` set.
    pub const fn from_face(face: Face) -> Self {
        let mut flags = CollisionFlags::NONE;
        match face {
            Face::PosX => flags.right = true,
            Face::NegX => flags.left = true,
            Face::PosY => flags.up = true,
            Face::NegY => flags.down = true,
        }
        flags
    }

    pub fn blocked_x(self) -> bool {
        self.left || self.right
    }

    pub fn blocked_y(self) -> bool {
        self.up || self.down
    }

    /// Whether any side was blocked.
    pub fn any(self) -> bool {
        self.blocked_x() || self.blocked_y()
    }

    pub fn get(self, face: Face) -> bool {
        match face {
            Face::PosX => self.right,
            Face::NegX => self.left,
            Face::PosY => self.up,
            Face::NegY => self.down,
        }
    }

    pub fn set(&mut self, face: Face, blocked: bool) {
        match face {
            Face::PosX => self.right = blocked,
            Face::NegX => self.left = blocked,
            Face::PosY => self.up = blocked,
            Face::NegY => self.down = blocked,
        }
    }

    pub fn union(self, rhs: CollisionFlags) -> CollisionFlags {
        CollisionFlags {
            up: self.up || rhs.up,
            down: self.down || rhs.down,
            left: self.left || rhs.left,
            right: self.right || rhs.right,
        }
    }
}

impl BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<Face> for CollisionFlags {
    fn from(face: Face) -> Self {
        CollisionFlags::from_face(face)
    }
}

impl From<CollisionFlags> for PerFace<bool> {
    fn from(flags: CollisionFlags) -> Self {
        let mut per_face = PerFace::repeat(false);
        for face in tile_grid::FACES {
            per_face[face] = flags.get(face);
        }
        per_face
    }
}


#[test]
fn test_derived_flags() {
    let none = CollisionFlags::default();
    assert!(!none.any());

    let right = CollisionFlags::from_face(Face::PosX);
    assert!(right.right && right.blocked_x() && !right.blocked_y() && right.any());

    let down = CollisionFlags::from(Face::NegY);
    assert!(down.down && down.blocked_y() && !down.blocked_x());

    let both = right | down;
    assert!(both.right && both.down && !both.left && !both.up);

    let per_face: PerFace<bool> = both.into();
    assert!(per_face[Face::PosX]);
    assert!(per_face[Face::NegY]);
    assert!(!per_face[Face::NegX]);
}
