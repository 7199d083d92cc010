//! Neutral nested representation of tensor input
//!
//! Arbitrarily nested input is expressed as a [`Value`] tree: every node is
//! either a scalar leaf or a sequence of further nodes. Leaves keep the exact
//! representation they were built from so that construction can reject
//! input whose leaves are not of the tensor's element type.

use super::scalar::ScalarKind;

/// A single leaf of nested input.
///
/// Besides the admissible numeric representations, booleans and text can be
/// represented so that they are rejected during validation rather than at
/// the type level.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    Text(String),
}

impl Element {
    /// Numeric kind of this leaf, `None` for booleans and text.
    pub fn kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Element::I8(_) => ScalarKind::I8,
            Element::I16(_) => ScalarKind::I16,
            Element::I32(_) => ScalarKind::I32,
            Element::I64(_) => ScalarKind::I64,
            Element::Isize(_) => ScalarKind::Isize,
            Element::U8(_) => ScalarKind::U8,
            Element::U16(_) => ScalarKind::U16,
            Element::U32(_) => ScalarKind::U32,
            Element::U64(_) => ScalarKind::U64,
            Element::Usize(_) => ScalarKind::Usize,
            Element::F32(_) => ScalarKind::F32,
            Element::F64(_) => ScalarKind::F64,
            Element::Bool(_) | Element::Text(_) => return None,
        };
        Some(kind)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Bool(_) => "bool",
            Element::Text(_) => "text",
            other => other.kind().map_or("unknown", |k| k.name()),
        }
    }
}

/// A node of nested tensor input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Element),
    Sequence(Vec<Value>),
}

impl Value {
    /// Builds a sequence node from anything convertible into values.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Element {
            fn from(v: $ty) -> Self {
                Element::$variant(v)
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Scalar(Element::$variant(v))
            }
        }
    )*};
}

impl_from_primitive!(
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
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Text,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Element::Text(v.to_string()))
    }
}

impl From<Element> for Value {
    fn from(e: Element) -> Self {
        Value::Scalar(e)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::sequence(items)
    }
}

impl<V: Into<Value>, const N: usize> From<[V; N]> for Value {
    fn from(items: [V; N]) -> Self {
        Value::sequence(items)
    }
}
