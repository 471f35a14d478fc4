//! Axes, poles, and faces of the 2D tile grid.

use std::ops::{
    Index,
    IndexMut,
    Neg,
};


macro_rules! axis_enum {
    (
        $name:ident,
        $num_constant:ident = $num:expr,
        $per_name:ident,
        $all_constant:ident,
        ($(
            $variant:ident,
        )*),
    )=>{
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(u8)]
        pub enum $name {$(
            $variant,
        )*}

        pub const $num_constant: usize = $num;

        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $per_name<T>(pub [T; $num_constant]);

        pub const $all_constant: $per_name<$name> = $per_name([$(
            $name::$variant,
        )*]);

        impl<T> Index<$name> for $per_name<T> {
            type Output = T;

            fn index(&self, i: $name) -> &Self::Output {
                &self.0[i as usize]
            }
        }

        impl<T> IndexMut<$name> for $per_name<T> {
            fn index_mut(&mut self, i: $name) -> &mut Self::Output {
                &mut self.0[i as usize]
            }
        }

        impl<T: Copy> $per_name<T> {
            pub fn repeat(val: T) -> Self {
                $per_name([val; $num_constant])
            }
        }

        impl<T> IntoIterator for $per_name<T> {
            type Item = T;
            type IntoIter = <[T; $num_constant] as IntoIterator>::IntoIter;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }
    };
}

axis_enum!(
    Axis,
    NUM_AXES = 2,
    PerAxis,
    AXES,
    (
        X,
        Y,
    ),
);

impl Axis {
    /// The one axis which is not `self`.
    pub const fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

axis_enum!(
    Face,
    NUM_FACES = 4,
    PerFace,
    FACES,
    (
        PosX,
        NegX,
        PosY,
        NegY,
    ),
);

impl Face {
    pub const fn to_axis_pole(self) -> (Axis, Pole) {
        match self {
            Face::PosX => (Axis::X, Pole::Pos),
            Face::NegX => (Axis::X, Pole::Neg),
            Face::PosY => (Axis::Y, Pole::Pos),
            Face::NegY => (Axis::Y, Pole::Neg),
        }
    }

    pub const fn from_axis_pole(axis: Axis, pole: Pole) -> Self {
        match (axis, pole) {
            (Axis::X, Pole::Pos) => Face::PosX,
            (Axis::X, Pole::Neg) => Face::NegX,
            (Axis::Y, Pole::Pos) => Face::PosY,
            (Axis::Y, Pole::Neg) => Face::NegY,
        }
    }
}

impl Neg for Face {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
        }
    }
}

/// Direction along an axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Pole {
    Neg,
    Pos,
}

impl Pole {
    /// The pole in the direction of `sign`, or `None` for zero.
    pub const fn from_sign(sign: Sign) -> Option<Self> {
        match sign {
            Sign::Pos => Some(Pole::Pos),
            Sign::Neg => Some(Pole::Neg),
            Sign::Zero => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Sign {
    Neg,
    Zero,
    Pos,
}

impl Sign {
    /// Sign of `n`. NaN is treated as zero.
    pub fn of_f32(n: f32) -> Self {
        if n > 0.0 {
            Sign::Pos
        } else if n < 0.0 {
            Sign::Neg
        } else {
            Sign::Zero
        }
    }
}


#[test]
fn test_face_axis_pole_round_trip() {
    for face in FACES {
        let (axis, pole) = face.to_axis_pole();
        assert_eq!(face, Face::from_axis_pole(axis, pole));
        let (neg_axis, neg_pole) = (-face).to_axis_pole();
        assert_eq!(neg_axis, axis);
        assert_ne!(neg_pole, pole);
    }
    assert_eq!(-Face::NegY, Face::PosY);
}

#[test]
fn test_per_face_indexing() {
    let mut per_face = PerFace::repeat(0);
    per_face[Face::NegX] = 3;
    assert_eq!(per_face.0, [0, 3, 0, 0]);
    assert_eq!(AXES.into_iter().map(Axis::other).collect::<Vec<_>>(), vec![Axis::Y, Axis::X]);
}

#[test]
fn test_pole_from_sign() {
    assert_eq!(Pole::from_sign(Sign::of_f32(0.5)), Some(Pole::Pos));
    assert_eq!(Pole::from_sign(Sign::of_f32(-3.0)), Some(Pole::Neg));
    assert_eq!(Pole::from_sign(Sign::of_f32(0.0)), None);
    assert_eq!(Pole::from_sign(Sign::of_f32(-0.0)), None);
    assert_eq!(Pole::from_sign(Sign::of_f32(f32::NAN)), None);
}
