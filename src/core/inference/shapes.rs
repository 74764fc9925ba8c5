//! Declared tensor shapes of a built session.
//!
//! Shapes are read from the session metadata on every call; nothing is cached, so
//! repeated queries always agree and concurrent queries need no locking.

use super::session::Session;
use crate::core::errors::{SessionError, SessionResult};
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Marker for an axis whose size is only known at run time.
pub const DYNAMIC_DIM: i64 = -1;

/// The declared dimensions of one tensor, outermost axis first.
///
/// Dynamic axes are always stored as [`DYNAMIC_DIM`], whatever negative value or
/// symbolic name the model used. A rank-0 (scalar) tensor has no dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ShapeDescriptor(Vec<i64>);

impl ShapeDescriptor {
    /// Creates a descriptor, normalizing every negative dimension to [`DYNAMIC_DIM`].
    pub fn new(dims: impl IntoIterator<Item = i64>) -> Self {
        Self(
            dims.into_iter()
                .map(|d| if d < 0 { DYNAMIC_DIM } else { d })
                .collect(),
        )
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// True when no axis is dynamic.
    pub fn is_static(&self) -> bool {
        self.0.iter().all(|&d| d != DYNAMIC_DIM)
    }

    /// True for rank-0 tensors.
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices of the dynamic axes.
    pub fn dynamic_axes(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == DYNAMIC_DIM)
            .map(|(axis, _)| axis)
            .collect()
    }

    /// Total element count, or `None` if any axis is dynamic.
    ///
    /// A scalar holds one element.
    pub fn static_element_count(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| {
            usize::try_from(d).ok().and_then(|d| acc.checked_mul(d))
        })
    }

    /// Consumes the descriptor, returning the raw dimensions.
    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }
}

impl Deref for ShapeDescriptor {
    type Target = [i64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<i64>> for ShapeDescriptor {
    fn from(dims: Vec<i64>) -> Self {
        Self::new(dims)
    }
}

impl PartialEq<[i64]> for ShapeDescriptor {
    fn eq(&self, other: &[i64]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&[i64]> for ShapeDescriptor {
    fn eq(&self, other: &&[i64]) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialEq<[i64; N]> for ShapeDescriptor {
    fn eq(&self, other: &[i64; N]) -> bool {
        self.0 == other
    }
}

impl PartialEq<Vec<i64>> for ShapeDescriptor {
    fn eq(&self, other: &Vec<i64>) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", d)?;
        }
        f.write_str("]")
    }
}

/// Name, element type and shape of one declared tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorInfo {
    pub name: String,
    pub element_type: TensorElementType,
    pub shape: ShapeDescriptor,
}

fn tensor_info(
    direction: &'static str,
    index: usize,
    name: &str,
    value_type: &ValueType,
) -> SessionResult<TensorInfo> {
    match value_type {
        ValueType::Tensor { ty, shape, .. } => Ok(TensorInfo {
            name: name.to_string(),
            element_type: *ty,
            shape: ShapeDescriptor::new(shape.iter().copied()),
        }),
        other => Err(SessionError::unsupported_value_type(direction, name, index, other)),
    }
}

pub(crate) fn input_info_of(session: &ort::session::Session) -> SessionResult<Vec<TensorInfo>> {
    session
        .inputs
        .iter()
        .enumerate()
        .map(|(index, input)| tensor_info("input", index, &input.name, &input.input_type))
        .collect()
}

pub(crate) fn output_info_of(session: &ort::session::Session) -> SessionResult<Vec<TensorInfo>> {
    session
        .outputs
        .iter()
        .enumerate()
        .map(|(index, output)| tensor_info("output", index, &output.name, &output.output_type))
        .collect()
}

/// Returns the declared shape of every model input, in declaration order.
///
/// # Errors
///
/// [`SessionError::UnsupportedValueType`] if an input is a sequence, map or other
/// non-tensor value.
pub fn get_input_shapes(session: &Session<'_>) -> SessionResult<Vec<ShapeDescriptor>> {
    Ok(get_input_info(session)?
        .into_iter()
        .map(|info| info.shape)
        .collect())
}

/// Returns the declared shape of every model output, in declaration order.
///
/// # Errors
///
/// See [`get_input_shapes`].
pub fn get_output_shapes(session: &Session<'_>) -> SessionResult<Vec<ShapeDescriptor>> {
    Ok(get_output_info(session)?
        .into_iter()
        .map(|info| info.shape)
        .collect())
}

/// Returns name, element type and shape of every model input.
pub fn get_input_info(session: &Session<'_>) -> SessionResult<Vec<TensorInfo>> {
    input_info_of(session.inner())
}

/// Returns name, element type and shape of every model output.
pub fn get_output_info(session: &Session<'_>) -> SessionResult<Vec<TensorInfo>> {
    output_info_of(session.inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_dims_are_normalized() {
        let shape = ShapeDescriptor::new([1, -7, 3, -1]);
        assert_eq!(shape, [1, -1, 3, -1]);
        assert_eq!(shape.dynamic_axes(), vec![1, 3]);
        assert!(!shape.is_static());
        assert_eq!(shape.static_element_count(), None);
    }

    #[test]
    fn test_static_shape() {
        let shape = ShapeDescriptor::from(vec![1, 1, 32, 32]);
        assert!(shape.is_static());
        assert_eq!(shape.rank(), 4);
        assert_eq!(shape.static_element_count(), Some(1024));
        assert_eq!(shape, vec![1, 1, 32, 32]);
        assert_eq!(&shape[2..], &[32, 32]);
    }

    #[test]
    fn test_scalar_shape() {
        let shape = ShapeDescriptor::new(std::iter::empty());
        assert!(shape.is_scalar());
        assert!(shape.is_static());
        assert_eq!(shape.rank(), 0);
        assert_eq!(shape.static_element_count(), Some(1));
        assert_eq!(shape.to_string(), "[]");
    }

    #[test]
    fn test_zero_sized_axis() {
        let shape = ShapeDescriptor::new([0, 4]);
        assert_eq!(shape.static_element_count(), Some(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ShapeDescriptor::new([1, 1, -1, -1]).to_string(),
            "[1, 1, -1, -1]"
        );
        assert_eq!(ShapeDescriptor::new([10]).to_string(), "[10]");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let shape = ShapeDescriptor::new([1, -1]);
        assert_eq!(serde_json::to_string(&shape).unwrap(), "[1,-1]");
    }
}
