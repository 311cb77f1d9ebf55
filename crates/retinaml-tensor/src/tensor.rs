//! Tensor - Core N-Dimensional Array Type
//!
//! The `Tensor` struct is the fundamental data structure in RetinaML. It
//! represents an N-dimensional array of numeric values with automatic
//! broadcasting and efficient memory sharing through views. Image batches
//! are stored NHWC: (batch, height, width, channels).
//!
//! # Key Features
//! - Generic over element type (f32, f64, i32, etc.)
//! - Efficient views with shared storage
//! - Broadcasting support for element-wise arithmetic
//! - Range slicing for spatial crops
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;
use core::ops::{Add, Div, Mul, Sub};

use retinaml_core::dtype::{Float, Numeric, Scalar};
use retinaml_core::error::{Error, Result};
use retinaml_core::storage::Storage;

use crate::shape::{
    broadcast_shape, broadcast_strides, contiguous_strides, is_contiguous, linear_index, numel,
    reshape, unravel_index, validate_indices, Shape, Strides,
};

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of numeric values.
///
/// Tensors are the core data structure for all computations in RetinaML.
/// They support arbitrary dimensions, automatic broadcasting, and efficient
/// memory sharing between views.
#[derive(Clone)]
pub struct Tensor<T: Scalar> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Storage<T>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
    /// Strides for each dimension.
    pub(crate) strides: Strides,
    /// Offset into storage (for views).
    pub(crate) offset: usize,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new tensor from storage with the given shape.
    ///
    /// # Arguments
    /// * `storage` - The underlying data storage
    /// * `shape` - Shape of the tensor
    ///
    /// # Returns
    /// New tensor, or error if shape doesn't match storage size.
    pub fn from_storage(storage: Storage<T>, shape: &[usize]) -> Result<Self> {
        let total = numel(shape);
        if total != storage.len() {
            return Err(Error::shape_mismatch(&[storage.len()], shape));
        }

        let shape = Shape::from_slice(shape);
        let strides = contiguous_strides(&shape);

        Ok(Self {
            storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Creates a new tensor from a vector with the given shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_vec(data);
        Self::from_storage(storage, shape)
    }

    /// Creates a new tensor from a slice with the given shape.
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_slice(data);
        Self::from_storage(storage, shape)
    }

    /// Creates a scalar tensor (0-dimensional).
    #[must_use]
    pub fn scalar(value: T) -> Self {
        Self {
            storage: Storage::from_vec(vec![value]),
            shape: Shape::new(),
            strides: Strides::new(),
            offset: 0,
        }
    }

    /// Creates a tensor filled with zeros.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        crate::creation::zeros(shape)
    }

    /// Creates a tensor filled with ones.
    #[must_use]
    pub fn ones(shape: &[usize]) -> Self
    where
        T: Numeric,
    {
        crate::creation::ones(shape)
    }

    /// Creates a tensor filled with a constant value.
    #[must_use]
    pub fn full(shape: &[usize], value: T) -> Self {
        crate::creation::full(shape, value)
    }

    /// Creates a tensor with random values from the standard normal distribution.
    #[must_use]
    pub fn randn(shape: &[usize]) -> Self
    where
        T: Float,
        rand_distr::StandardNormal: rand::distributions::Distribution<T>,
    {
        crate::creation::randn(shape)
    }

    /// Creates a tensor with random values from the uniform distribution [0, 1).
    #[must_use]
    pub fn rand(shape: &[usize]) -> Self
    where
        T: Float,
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        crate::creation::rand(shape)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns true if the tensor is contiguous in memory.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Returns true if this tensor is a scalar (0-dimensional).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        validate_indices(indices, &self.shape)?;

        let offset = self.offset + linear_index(indices, &self.strides);
        Ok(self.storage.as_slice()[offset])
    }

    /// Sets the element at the given indices.
    pub fn set(&self, indices: &[usize], value: T) -> Result<()> {
        validate_indices(indices, &self.shape)?;

        let offset = self.offset + linear_index(indices, &self.strides);
        self.storage.as_slice_mut()[offset] = value;
        Ok(())
    }

    /// Returns the scalar value for a single-element tensor.
    pub fn item(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::invalid_operation(
                "item() only works on single-element tensors",
            ));
        }

        if self.is_scalar() {
            Ok(self.storage.as_slice()[self.offset])
        } else {
            let indices = vec![0; self.ndim()];
            self.get(&indices)
        }
    }

    /// Returns the data as a contiguous vector.
    ///
    /// If the tensor is already contiguous this copies the visible window
    /// directly; otherwise it gathers elements through the strides.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        if self.is_contiguous() {
            let storage = self.storage.as_slice();
            storage[self.offset..self.offset + self.numel()].to_vec()
        } else {
            let total = self.numel();
            let mut result = Vec::with_capacity(total);
            let storage = self.storage.as_slice();
            for i in 0..total {
                let indices = unravel_index(i, &self.shape);
                let offset = self.offset + linear_index(&indices, &self.strides);
                result.push(storage[offset]);
            }
            result
        }
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a new tensor with the specified shape.
    ///
    /// The total number of elements must remain the same.
    /// Supports -1 in one dimension to infer the size.
    pub fn reshape(&self, new_shape: &[isize]) -> Result<Self> {
        let shape = reshape(&self.shape, new_shape)?;

        if self.is_contiguous() {
            // Can just change shape without copying
            Ok(Self {
                storage: self.storage.clone(),
                strides: contiguous_strides(&shape),
                shape,
                offset: self.offset,
            })
        } else {
            let data = self.to_vec();
            Ok(Self {
                storage: Storage::from_vec(data),
                strides: contiguous_strides(&shape),
                shape,
                offset: 0,
            })
        }
    }

    /// Returns a new tensor flattened to one dimension.
    #[must_use]
    pub fn flatten(&self) -> Self {
        self.reshape(&[-1]).expect("Flatten should never fail")
    }

    /// Returns a contiguous copy if the tensor is not already contiguous.
    #[must_use]
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && self.offset == 0 && self.storage.len() == self.numel() {
            return self.clone();
        }

        let data = self.to_vec();
        let shape = self.shape.clone();
        Self {
            storage: Storage::from_vec(data),
            strides: contiguous_strides(&shape),
            shape,
            offset: 0,
        }
    }

    /// Makes a deep copy with fresh storage.
    #[must_use]
    pub fn clone_deep(&self) -> Self {
        let data = self.to_vec();
        let shape = self.shape.clone();
        Self {
            storage: Storage::from_vec(data),
            strides: contiguous_strides(&shape),
            shape,
            offset: 0,
        }
    }

    /// Copies out a sub-tensor selected by per-dimension ranges.
    ///
    /// Dimensions beyond `ranges.len()` are kept whole. Used for spatial
    /// crops on NHWC batches.
    ///
    /// # Arguments
    /// * `ranges` - Half-open index ranges, one per leading dimension
    pub fn slice(&self, ranges: &[std::ops::Range<usize>]) -> Result<Self> {
        if ranges.len() > self.ndim() {
            return Err(Error::invalid_operation(format!(
                "slice got {} ranges for a {}D tensor",
                ranges.len(),
                self.ndim()
            )));
        }

        let mut new_shape = Shape::with_capacity(self.ndim());
        for (i, range) in ranges.iter().enumerate() {
            if range.start > range.end || range.end > self.shape[i] {
                return Err(Error::IndexOutOfBounds {
                    index: range.end,
                    size: self.shape[i],
                });
            }
            new_shape.push(range.end - range.start);
        }
        for i in ranges.len()..self.ndim() {
            new_shape.push(self.shape[i]);
        }

        let total = numel(&new_shape);
        let mut result = Vec::with_capacity(total);
        let storage = self.storage.as_slice();

        for i in 0..total {
            let mut indices = unravel_index(i, &new_shape);
            for (d, range) in ranges.iter().enumerate() {
                indices[d] += range.start;
            }
            let offset = self.offset + linear_index(&indices, &self.strides);
            result.push(storage[offset]);
        }
        drop(storage);

        Self::from_vec(result, &new_shape)
    }

    /// Copies out `len` consecutive entries of one dimension starting at
    /// `start`, keeping every other dimension whole.
    ///
    /// `narrow(1, 2, 3)` on a `[B, H, W, C]` tensor keeps rows 2..5.
    pub fn narrow(&self, dim: usize, start: usize, len: usize) -> Result<Self> {
        if dim >= self.ndim() {
            return Err(Error::InvalidDimension {
                index: dim as i64,
                ndim: self.ndim(),
            });
        }

        let mut ranges: Vec<std::ops::Range<usize>> =
            self.shape.iter().map(|&d| 0..d).collect();
        ranges[dim] = start..start + len;
        self.slice(&ranges)
    }

    /// Applies a function to every element, producing a new tensor.
    fn map(&self, f: impl Fn(T) -> T) -> Self {
        let data: Vec<T> = self.to_vec().into_iter().map(f).collect();
        Self::from_vec(data, &self.shape).expect("map preserves shape")
    }
}

// =============================================================================
// Numeric Operations
// =============================================================================

impl<T: Numeric> Tensor<T> {
    /// Element-wise binary operation with broadcasting.
    fn broadcast_binary(&self, other: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        let result_shape = broadcast_shape(&self.shape, &other.shape)?;
        let self_strides = broadcast_strides(&self.shape, &self.strides, &result_shape);
        let other_strides = broadcast_strides(&other.shape, &other.strides, &result_shape);

        let total = numel(&result_shape);
        let mut result_data = Vec::with_capacity(total);

        let self_data = self.storage.as_slice();
        let other_data = other.storage.as_slice();

        for i in 0..total {
            let indices = unravel_index(i, &result_shape);
            let self_idx = self.offset + linear_index(&indices, &self_strides);
            let other_idx = other.offset + linear_index(&indices, &other_strides);
            result_data.push(f(self_data[self_idx], other_data[other_idx]));
        }
        drop(self_data);
        drop(other_data);

        Self::from_vec(result_data, &result_shape)
    }

    /// Element-wise addition with broadcasting.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a + b)
    }

    /// Element-wise subtraction with broadcasting.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a - b)
    }

    /// Element-wise multiplication with broadcasting.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a * b)
    }

    /// Element-wise division with broadcasting.
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a / b)
    }

    /// Adds a scalar to every element.
    #[must_use]
    pub fn add_scalar(&self, scalar: T) -> Self {
        self.map(|x| x + scalar)
    }

    /// Multiplies every element by a scalar.
    #[must_use]
    pub fn mul_scalar(&self, scalar: T) -> Self {
        self.map(|x| x * scalar)
    }

    /// Clamps every element to the inclusive range [min, max].
    #[must_use]
    pub fn clamp(&self, min: T, max: T) -> Self {
        self.map(|x| {
            if x < min {
                min
            } else if x > max {
                max
            } else {
                x
            }
        })
    }

    /// Element-wise rectified linear unit: max(x, 0).
    #[must_use]
    pub fn relu(&self) -> Self {
        self.map(|x| if x < T::ZERO { T::ZERO } else { x })
    }

    /// Sums all elements into a scalar tensor.
    #[must_use]
    pub fn sum(&self) -> Self {
        let mut acc = T::ZERO;
        for &x in self.to_vec().iter() {
            acc = acc + x;
        }
        Self::scalar(acc)
    }

    /// Returns the maximum element as a scalar tensor.
    pub fn max(&self) -> Result<Self> {
        let data = self.to_vec();
        let first = *data.first().ok_or(Error::EmptyTensor)?;
        let mut best = first;
        for &x in &data[1..] {
            if x > best {
                best = x;
            }
        }
        Ok(Self::scalar(best))
    }

    /// Returns the minimum element as a scalar tensor.
    pub fn min(&self) -> Result<Self> {
        let data = self.to_vec();
        let first = *data.first().ok_or(Error::EmptyTensor)?;
        let mut best = first;
        for &x in &data[1..] {
            if x < best {
                best = x;
            }
        }
        Ok(Self::scalar(best))
    }

    /// Matrix multiplication for 2D tensors: [m, k] @ [k, n] -> [m, n].
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.ndim() != 2 || other.ndim() != 2 {
            return Err(Error::invalid_operation("matmul requires 2D tensors"));
        }

        let m = self.shape[0];
        let k1 = self.shape[1];
        let k2 = other.shape[0];
        let n = other.shape[1];

        if k1 != k2 {
            return Err(Error::invalid_operation(format!(
                "matmul inner dimensions must match: {k1} vs {k2}"
            )));
        }

        let a = self.contiguous().to_vec();
        let b = other.contiguous().to_vec();
        let mut c = vec![T::ZERO; m * n];

        for i in 0..m {
            for k in 0..k1 {
                let a_ik = a[i * k1 + k];
                let row = &b[k * n..(k + 1) * n];
                let out = &mut c[i * n..(i + 1) * n];
                for j in 0..n {
                    out[j] = out[j] + a_ik * row[j];
                }
            }
        }

        Self::from_vec(c, &[m, n])
    }
}

// =============================================================================
// Float Operations
// =============================================================================

impl<T: Float> Tensor<T> {
    /// Element-wise logistic sigmoid: 1 / (1 + exp(-x)).
    #[must_use]
    pub fn sigmoid(&self) -> Self {
        self.map(|x| T::ONE / (T::ONE + (-x).exp_value()))
    }

    /// Element-wise square root.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        self.map(Float::sqrt_value)
    }

    /// Mean of all elements as a scalar tensor.
    pub fn mean(&self) -> Result<Self> {
        let count = self.numel();
        if count == 0 {
            return Err(Error::EmptyTensor);
        }
        let sum = self.sum().item()?;
        let n = num_traits::cast::<usize, T>(count)
            .ok_or_else(|| Error::internal("element count does not fit in float type"))?;
        Ok(Self::scalar(sum / n))
    }
}

// =============================================================================
// Operator Trait Implementations
// =============================================================================

impl<T: Numeric> Add for &Tensor<T> {
    type Output = Tensor<T>;

    fn add(self, other: Self) -> Self::Output {
        Tensor::add(self, other).expect("Addition failed")
    }
}

impl<T: Numeric> Sub for &Tensor<T> {
    type Output = Tensor<T>;

    fn sub(self, other: Self) -> Self::Output {
        Tensor::sub(self, other).expect("Subtraction failed")
    }
}

impl<T: Numeric> Mul for &Tensor<T> {
    type Output = Tensor<T>;

    fn mul(self, other: Self) -> Self::Output {
        Tensor::mul(self, other).expect("Multiplication failed")
    }
}

impl<T: Numeric> Div for &Tensor<T> {
    type Output = Tensor<T>;

    fn div(self, other: Self) -> Self::Output {
        Tensor::div(self, other).expect("Division failed")
    }
}

// =============================================================================
// Display
// =============================================================================

impl<T: Scalar> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("dtype", &T::DTYPE)
            .field("numel", &self.numel())
            .finish()
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            let value = self.item().map_err(|_| fmt::Error)?;
            write!(f, "{value}")
        } else if self.ndim() == 1 {
            write!(f, "[")?;
            for (i, value) in self.to_vec().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")
        } else {
            write!(f, "Tensor(shape={:?})", self.shape())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.shape(), &[2, 2]);
        assert_eq!(t.numel(), 4);
        assert_eq!(t.get(&[1, 0]).unwrap(), 3.0);
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        assert!(Tensor::from_vec(vec![1.0f32, 2.0, 3.0], &[2, 2]).is_err());
    }

    #[test]
    fn test_get_set() {
        let t = Tensor::<f32>::zeros(&[2, 3]);
        t.set(&[1, 2], 5.0).unwrap();
        assert_eq!(t.get(&[1, 2]).unwrap(), 5.0);
        assert!(t.get(&[2, 0]).is_err());
    }

    #[test]
    fn test_reshape_and_flatten() {
        let t = Tensor::from_vec((0..24).map(|x| x as f32).collect(), &[2, 3, 4]).unwrap();

        let r = t.reshape(&[6, 4]).unwrap();
        assert_eq!(r.shape(), &[6, 4]);
        assert_eq!(r.get(&[1, 0]).unwrap(), 4.0);

        let inferred = t.reshape(&[2, -1]).unwrap();
        assert_eq!(inferred.shape(), &[2, 12]);

        let flat = t.flatten();
        assert_eq!(flat.shape(), &[24]);
    }

    #[test]
    fn test_add_broadcast() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::from_vec(vec![10.0f32, 20.0], &[2]).unwrap();
        let c = a.add(&b).unwrap();
        assert_eq!(c.to_vec(), vec![11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn test_broadcast_error() {
        let a = Tensor::<f32>::zeros(&[2, 3]);
        let b = Tensor::<f32>::zeros(&[2, 4]);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_scalar_ops() {
        let t = Tensor::from_vec(vec![1.0f32, -2.0, 3.0], &[3]).unwrap();
        assert_eq!(t.mul_scalar(2.0).to_vec(), vec![2.0, -4.0, 6.0]);
        assert_eq!(t.add_scalar(1.0).to_vec(), vec![2.0, -1.0, 4.0]);
        assert_eq!(t.clamp(0.0, 2.0).to_vec(), vec![1.0, 0.0, 2.0]);
        assert_eq!(t.relu().to_vec(), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_reductions() {
        let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.sum().item().unwrap(), 10.0);
        assert_eq!(t.mean().unwrap().item().unwrap(), 2.5);
        assert_eq!(t.max().unwrap().item().unwrap(), 4.0);
        assert_eq!(t.min().unwrap().item().unwrap(), 1.0);
    }

    #[test]
    fn test_sigmoid() {
        let t = Tensor::from_vec(vec![0.0f32], &[1]).unwrap();
        let s = t.sigmoid();
        assert!((s.get(&[0]).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_matmul() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::from_vec(vec![5.0f32, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);

        let bad = Tensor::<f32>::zeros(&[3, 2]);
        assert!(a.matmul(&bad).is_err());
    }

    #[test]
    fn test_slice_crop() {
        // 1x4x4x1 image, crop the center 2x2
        let t = Tensor::from_vec((0..16).map(|x| x as f32).collect(), &[1, 4, 4, 1]).unwrap();
        let crop = t.slice(&[0..1, 1..3, 1..3]).unwrap();
        assert_eq!(crop.shape(), &[1, 2, 2, 1]);
        assert_eq!(crop.to_vec(), vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_slice_out_of_range() {
        let t = Tensor::<f32>::zeros(&[2, 2]);
        assert!(t.slice(&[0..3]).is_err());
    }

    #[test]
    fn test_narrow_single_dimension() {
        let t = Tensor::from_vec((0..16).map(|x| x as f32).collect(), &[1, 4, 4, 1]).unwrap();
        let rows = t.narrow(1, 1, 2).unwrap();
        assert_eq!(rows.shape(), &[1, 2, 4, 1]);
        assert_eq!(
            rows.to_vec(),
            vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]
        );

        assert!(t.narrow(4, 0, 1).is_err());
        assert!(t.narrow(1, 2, 3).is_err());
    }

    #[test]
    fn test_item_requires_single_element() {
        let t = Tensor::<f32>::zeros(&[2]);
        assert!(t.item().is_err());
        assert_eq!(Tensor::scalar(7.0f32).item().unwrap(), 7.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tensor::scalar(7.0f32).to_string(), "7");
        let v = Tensor::from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
        assert_eq!(v.to_string(), "[1, 2]");
        let m = Tensor::<f32>::zeros(&[2, 2]);
        assert_eq!(m.to_string(), "Tensor(shape=[2, 2])");
    }
}
