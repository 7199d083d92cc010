//! Pretty-printer for tensors
//!
//! Renders nested brackets with two spaces of indentation per depth. Meant
//! for debugging and test fixtures, not as a stable serialization format.

use std::fmt;

use super::shape;
use super::{Scalar, Tensor};

const INDENT: usize = 2;

fn render<T: Scalar>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    dims: &[usize],
    indent: usize,
) -> fmt::Result {
    let pad = " ".repeat(indent);
    match dims {
        [] => write!(f, "{}", data[0]),
        [_] => {
            write!(f, "{}[", pad)?;
            for (i, value) in data.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")
        }
        [_, rest @ ..] => {
            writeln!(f, "{}[", pad)?;
            for block in data.chunks(shape::numel(rest)) {
                render(f, block, rest, indent + INDENT)?;
                writeln!(f)?;
            }
            write!(f, "{}]", pad)
        }
    }
}

impl<T: Scalar> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(")?;
        render(f, &self.data, &self.shape, 0)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalar() {
        let t = Tensor::<i32>::with_value(10).unwrap();
        assert_eq!(t.to_string(), "Tensor(10)");
    }

    #[test]
    fn test_display_vector() {
        let t = Tensor::<u32>::with_value(vec![1u32, 2, 3, 4, 5]).unwrap();
        assert_eq!(t.to_string(), "Tensor([1 2 3 4 5])");
    }

    #[test]
    fn test_display_matrix() {
        let t = Tensor::<f64>::with_value(vec![vec![1.5, 2.0], vec![3.0, -4.25]]).unwrap();
        assert_eq!(t.to_string(), "Tensor([\n  [1.5 2]\n  [3 -4.25]\n])");
    }

    #[test]
    fn test_display_rank_three() {
        let t = Tensor::new((1..=8).collect::<Vec<i64>>(), vec![2, 2, 2]).unwrap();
        let expected = "Tensor([\n  [\n    [1 2]\n    [3 4]\n  ]\n  [\n    [5 6]\n    [7 8]\n  ]\n])";
        assert_eq!(t.to_string(), expected);
    }
}
