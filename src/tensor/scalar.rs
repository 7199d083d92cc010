//! Admissible element types
//!
//! Tensors are generic over [`Scalar`], a sealed trait implemented for a
//! closed set of signed/unsigned integers and 32/64-bit floats. Booleans and
//! complex numbers are deliberately not admissible.

use std::fmt;

use rand::distributions::uniform::SampleUniform;

use super::value::Element;

mod private {
    pub trait Sealed {}
}

/// Runtime tag for each admissible element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric element of a tensor.
///
/// Arithmetic is the element type's native arithmetic: integers wrap on
/// overflow instead of widening, floats follow IEEE-754.
pub trait Scalar:
    private::Sealed
    + Copy
    + PartialEq
    + PartialOrd
    + Default
    + fmt::Debug
    + fmt::Display
    + SampleUniform
    + Send
    + Sync
    + 'static
{
    const KIND: ScalarKind;

    fn zero() -> Self;

    fn scalar_add(self, rhs: Self) -> Self;

    fn scalar_sub(self, rhs: Self) -> Self;

    fn scalar_mul(self, rhs: Self) -> Self;

    /// Returns `None` only for an integer zero divisor.
    fn scalar_div(self, rhs: Self) -> Option<Self>;

    /// Always true for integers.
    fn is_finite(self) -> bool;

    /// Extracts a value of this type from an input leaf, if the leaf has
    /// exactly this representation.
    fn from_element(element: &Element) -> Option<Self>;

    fn into_element(self) -> Element;
}

macro_rules! impl_int_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl private::Sealed for $ty {}

        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn scalar_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn scalar_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn scalar_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn scalar_div(self, rhs: Self) -> Option<Self> {
                if rhs == 0 {
                    None
                } else {
                    // MIN / -1 wraps like the other integer operations
                    Some(self.wrapping_div(rhs))
                }
            }

            #[inline]
            fn is_finite(self) -> bool {
                true
            }

            fn from_element(element: &Element) -> Option<Self> {
                match element {
                    Element::$kind(v) => Some(*v),
                    _ => None,
                }
            }

            fn into_element(self) -> Element {
                Element::$kind(self)
            }
        }
    )*};
}

macro_rules! impl_float_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl private::Sealed for $ty {}

        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn scalar_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn scalar_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn scalar_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn scalar_div(self, rhs: Self) -> Option<Self> {
                Some(self / rhs)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            fn from_element(element: &Element) -> Option<Self> {
                match element {
                    Element::$kind(v) => Some(*v),
                    _ => None,
                }
            }

            fn into_element(self) -> Element {
                Element::$kind(self)
            }
        }
    )*};
}

impl_int_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

impl_float_scalar!(f32 => F32, f64 => F64);
