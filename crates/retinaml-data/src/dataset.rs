//! Dataset Trait - Core Data Abstraction
//!
//! Defines the Dataset trait that all data sources implement, plus the
//! concrete datasets used by the denoising pipeline. Items are
//! (input, target) pairs; for denoising the input is a corrupted image
//! and the target is the clean original.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use retinaml_tensor::Tensor;

// =============================================================================
// Dataset Trait
// =============================================================================

/// Core trait for all datasets.
///
/// A dataset provides indexed access to data items.
pub trait Dataset: Send + Sync {
    /// The type of items in the dataset.
    type Item: Send;

    /// Returns the number of items in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets an item by index.
    fn get(&self, index: usize) -> Option<Self::Item>;
}

// =============================================================================
// TensorDataset
// =============================================================================

/// A dataset backed by a pair of tensors indexed along the first axis.
///
/// Both tensors must have the same first dimension. Each item is the
/// pair of slices at that index with the leading axis removed, so a
/// `[N, H, W, C]` tensor yields `[H, W, C]` items.
pub struct TensorDataset {
    inputs: Tensor<f32>,
    targets: Tensor<f32>,
    len: usize,
}

impl TensorDataset {
    /// Creates a new `TensorDataset` from input and target tensors.
    ///
    /// # Panics
    /// Panics if the first dimensions differ.
    #[must_use]
    pub fn new(inputs: Tensor<f32>, targets: Tensor<f32>) -> Self {
        let len = inputs.shape().first().copied().unwrap_or(0);
        assert_eq!(
            len,
            targets.shape().first().copied().unwrap_or(0),
            "Inputs and targets must have same first dimension"
        );
        Self {
            inputs,
            targets,
            len,
        }
    }

    /// Creates a dataset where each sample is its own target.
    ///
    /// Useful for plain (non-denoising) autoencoder reconstruction.
    #[must_use]
    pub fn identity(inputs: Tensor<f32>) -> Self {
        let targets = inputs.clone();
        Self::new(inputs, targets)
    }

    fn sample(tensor: &Tensor<f32>, index: usize) -> Option<Tensor<f32>> {
        let shape = tensor.shape();
        let mut ranges: Vec<std::ops::Range<usize>> = vec![index..index + 1];
        ranges.extend(shape[1..].iter().map(|&d| 0..d));

        let row = tensor.slice(&ranges).ok()?;
        let item_shape: Vec<isize> = shape[1..].iter().map(|&d| d as isize).collect();
        if item_shape.is_empty() {
            return row.reshape(&[1]).ok();
        }
        row.reshape(&item_shape).ok()
    }
}

impl Dataset for TensorDataset {
    type Item = (Tensor<f32>, Tensor<f32>);

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        if index >= self.len {
            return None;
        }
        let x = Self::sample(&self.inputs, index)?;
        let y = Self::sample(&self.targets, index)?;
        Some((x, y))
    }
}

// =============================================================================
// MapDataset
// =============================================================================

/// A dataset that applies a transform to another dataset's items.
pub struct MapDataset<D, F>
where
    D: Dataset,
    F: Fn(D::Item) -> D::Item + Send + Sync,
{
    dataset: D,
    transform: F,
}

impl<D, F> MapDataset<D, F>
where
    D: Dataset,
    F: Fn(D::Item) -> D::Item + Send + Sync,
{
    /// Creates a new `MapDataset`.
    pub fn new(dataset: D, transform: F) -> Self {
        Self { dataset, transform }
    }
}

impl<D, F> Dataset for MapDataset<D, F>
where
    D: Dataset,
    F: Fn(D::Item) -> D::Item + Send + Sync,
{
    type Item = D::Item;

    fn len(&self) -> usize {
        self.dataset.len()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.dataset.get(index).map(&self.transform)
    }
}

// =============================================================================
// SubsetDataset
// =============================================================================

/// A dataset exposing a fixed set of indices of another dataset.
pub struct SubsetDataset<D: Dataset> {
    dataset: D,
    indices: Vec<usize>,
}

impl<D: Dataset> SubsetDataset<D> {
    /// Creates a new `SubsetDataset` with the given indices.
    pub fn new(dataset: D, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// Creates a subset of the first `n` items.
    pub fn head(dataset: D, n: usize) -> Self {
        let n = n.min(dataset.len());
        Self::new(dataset, (0..n).collect())
    }
}

impl<D: Dataset> Dataset for SubsetDataset<D> {
    type Item = D::Item;

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        let real_index = *self.indices.get(index)?;
        self.dataset.get(real_index)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_dataset() {
        let inputs = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).unwrap();
        let targets = Tensor::from_vec(vec![0.0, 1.0, 2.0], &[3, 1]).unwrap();
        let dataset = TensorDataset::new(inputs, targets);

        assert_eq!(dataset.len(), 3);

        let (x, y) = dataset.get(0).unwrap();
        assert_eq!(x.to_vec(), vec![1.0, 2.0]);
        assert_eq!(y.to_vec(), vec![0.0]);

        let (x, y) = dataset.get(2).unwrap();
        assert_eq!(x.to_vec(), vec![5.0, 6.0]);
        assert_eq!(y.to_vec(), vec![2.0]);

        assert!(dataset.get(3).is_none());
    }

    #[test]
    fn test_tensor_dataset_image_items() {
        let images = Tensor::<f32>::rand(&[4, 8, 8, 3]);
        let dataset = TensorDataset::identity(images);

        assert_eq!(dataset.len(), 4);
        let (x, y) = dataset.get(1).unwrap();
        assert_eq!(x.shape(), &[8, 8, 3]);
        assert_eq!(x.to_vec(), y.to_vec());
    }

    #[test]
    fn test_map_dataset() {
        let inputs = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[4, 1]).unwrap();
        let base = TensorDataset::identity(inputs);

        let mapped = MapDataset::new(base, |(x, y)| (x.mul_scalar(2.0), y));

        assert_eq!(mapped.len(), 4);
        let (x, y) = mapped.get(0).unwrap();
        assert_eq!(x.to_vec(), vec![2.0]);
        assert_eq!(y.to_vec(), vec![1.0]);
    }

    #[test]
    fn test_subset_dataset() {
        let inputs = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0], &[5, 1]).unwrap();
        let base = TensorDataset::identity(inputs);

        let subset = SubsetDataset::new(base, vec![0, 2, 4]);
        assert_eq!(subset.len(), 3);

        let (x, _) = subset.get(1).unwrap();
        assert_eq!(x.to_vec(), vec![3.0]);
        assert!(subset.get(3).is_none());
    }

    #[test]
    fn test_subset_head() {
        let inputs = Tensor::<f32>::rand(&[10, 2, 2, 1]);
        let base = TensorDataset::identity(inputs);

        let head = SubsetDataset::head(base, 3);
        assert_eq!(head.len(), 3);

        let inputs = Tensor::<f32>::rand(&[2, 2, 2, 1]);
        let short = SubsetDataset::head(TensorDataset::identity(inputs), 5);
        assert_eq!(short.len(), 2);
    }
}
