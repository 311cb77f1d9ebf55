//! `DataLoader` - Batched Data Iteration
//!
//! Provides batched iteration over datasets with optional shuffling and
//! parallel sample collection. Samples are stacked along a new leading
//! axis, so image items of shape `[H, W, C]` batch into `[B, H, W, C]`.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rayon::prelude::*;
use retinaml_tensor::{stack, Tensor};

use crate::dataset::Dataset;
use crate::sampler::{RandomSampler, Sampler, SequentialSampler};

// =============================================================================
// Batch Type
// =============================================================================

/// A batch of data from the `DataLoader`.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Batched input data.
    pub inputs: Tensor<f32>,
    /// Batched targets.
    pub targets: Tensor<f32>,
    /// Number of samples in this batch.
    pub size: usize,
}

impl Batch {
    /// Creates a new Batch.
    #[must_use]
    pub fn new(inputs: Tensor<f32>, targets: Tensor<f32>) -> Self {
        let size = inputs.shape().first().copied().unwrap_or(0);
        Self {
            inputs,
            targets,
            size,
        }
    }

    /// Returns the batch size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

// =============================================================================
// DataLoader
// =============================================================================

/// `DataLoader` for batched iteration over datasets.
///
/// Provides configurable batching, shuffling, and iteration over datasets.
pub struct DataLoader<D>
where
    D: Dataset<Item = (Tensor<f32>, Tensor<f32>)>,
{
    dataset: D,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    num_workers: usize,
}

impl<D> DataLoader<D>
where
    D: Dataset<Item = (Tensor<f32>, Tensor<f32>)>,
{
    /// Creates a new `DataLoader` with the specified batch size.
    pub fn new(dataset: D, batch_size: usize) -> Self {
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            num_workers: 0,
        }
    }

    /// Enables or disables shuffling.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets whether to drop the last incomplete batch.
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Sets the number of worker threads for parallel sample collection.
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Returns the batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the number of batches.
    pub fn len(&self) -> usize {
        let total = self.dataset.len();
        if self.drop_last {
            total / self.batch_size
        } else {
            total.div_ceil(self.batch_size)
        }
    }

    /// Returns true if the `DataLoader` is empty.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Returns the dataset length.
    pub fn dataset_len(&self) -> usize {
        self.dataset.len()
    }

    /// Creates an iterator over batches.
    pub fn iter(&self) -> DataLoaderIter<'_, D> {
        let indices: Vec<usize> = if self.shuffle {
            RandomSampler::new(self.dataset.len()).iter().collect()
        } else {
            SequentialSampler::new(self.dataset.len()).iter().collect()
        };

        DataLoaderIter {
            dataset: &self.dataset,
            indices,
            batch_size: self.batch_size,
            drop_last: self.drop_last,
            position: 0,
            num_workers: self.num_workers,
        }
    }
}

// =============================================================================
// DataLoaderIter
// =============================================================================

/// Iterator over batches from a `DataLoader`.
pub struct DataLoaderIter<'a, D>
where
    D: Dataset<Item = (Tensor<f32>, Tensor<f32>)>,
{
    dataset: &'a D,
    indices: Vec<usize>,
    batch_size: usize,
    drop_last: bool,
    position: usize,
    num_workers: usize,
}

impl<D> Iterator for DataLoaderIter<'_, D>
where
    D: Dataset<Item = (Tensor<f32>, Tensor<f32>)>,
{
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.indices.len() {
            return None;
        }

        let end = (self.position + self.batch_size).min(self.indices.len());
        let batch_indices = &self.indices[self.position..end];

        if batch_indices.len() < self.batch_size && self.drop_last {
            return None;
        }

        // Collect samples for this batch (parallel when num_workers > 0)
        let samples: Vec<(Tensor<f32>, Tensor<f32>)> = if self.num_workers > 0 {
            batch_indices
                .par_iter()
                .filter_map(|&idx| self.dataset.get(idx))
                .collect()
        } else {
            batch_indices
                .iter()
                .filter_map(|&idx| self.dataset.get(idx))
                .collect()
        };

        if samples.is_empty() {
            return None;
        }

        let input_samples: Vec<Tensor<f32>> = samples.iter().map(|(x, _)| x.clone()).collect();
        let target_samples: Vec<Tensor<f32>> = samples.iter().map(|(_, y)| y.clone()).collect();

        // All items come from the same dataset, so stacking cannot fail
        let inputs = stack(&input_samples, 0).expect("Batch stacking failed");
        let targets = stack(&target_samples, 0).expect("Batch stacking failed");

        self.position = end;

        Some(Batch::new(inputs, targets))
    }
}

impl<D> DataLoaderIter<'_, D>
where
    D: Dataset<Item = (Tensor<f32>, Tensor<f32>)>,
{
    /// Returns the number of remaining batches.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let remaining_samples = self.indices.len().saturating_sub(self.position);
        if self.drop_last {
            remaining_samples / self.batch_size
        } else {
            remaining_samples.div_ceil(self.batch_size)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TensorDataset;

    fn image_dataset(size: usize) -> TensorDataset {
        let numel = size * 4 * 4 * 3;
        let pixels: Vec<f32> = (0..numel).map(|i| (i % 255) as f32 / 255.0).collect();
        let images = Tensor::from_vec(pixels, &[size, 4, 4, 3]).unwrap();
        TensorDataset::identity(images)
    }

    #[test]
    fn test_dataloader_basic() {
        let loader = DataLoader::new(image_dataset(10), 3);

        assert_eq!(loader.batch_size(), 3);
        assert_eq!(loader.len(), 4); // ceil(10/3) = 4

        let batches: Vec<Batch> = loader.iter().collect();
        assert_eq!(batches.len(), 4);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[3].len(), 1);
        assert_eq!(batches[0].inputs.shape(), &[3, 4, 4, 3]);
        assert_eq!(batches[3].inputs.shape(), &[1, 4, 4, 3]);
    }

    #[test]
    fn test_dataloader_drop_last() {
        let loader = DataLoader::new(image_dataset(10), 3).drop_last(true);

        assert_eq!(loader.len(), 3); // floor(10/3) = 3

        let batches: Vec<Batch> = loader.iter().collect();
        assert_eq!(batches.len(), 3);
        for batch in &batches {
            assert_eq!(batch.len(), 3);
        }
    }

    #[test]
    fn test_dataloader_preserves_order_without_shuffle() {
        let loader = DataLoader::new(image_dataset(6), 2).shuffle(false);

        let batches: Vec<Batch> = loader.iter().collect();
        let first = batches[0].inputs.to_vec();
        let direct = image_dataset(6).get(0).unwrap().0.to_vec();
        assert_eq!(&first[..direct.len()], &direct[..]);
    }

    #[test]
    fn test_dataloader_shuffle_covers_all_samples() {
        let loader = DataLoader::new(image_dataset(20), 6).shuffle(true);

        let total: usize = loader.iter().map(|b| b.len()).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_dataloader_empty() {
        let images = Tensor::from_vec(vec![], &[0, 4, 4, 3]).unwrap();
        let loader = DataLoader::new(TensorDataset::identity(images), 3);

        assert!(loader.is_empty());
        let batches: Vec<Batch> = loader.iter().collect();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_dataloader_remaining() {
        let loader = DataLoader::new(image_dataset(10), 3);

        let mut iter = loader.iter();
        assert_eq!(iter.remaining(), 4);

        iter.next();
        assert_eq!(iter.remaining(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let loader_seq = DataLoader::new(image_dataset(12), 4).num_workers(0);
        let loader_par = DataLoader::new(image_dataset(12), 4).num_workers(4);

        let batches_seq: Vec<Batch> = loader_seq.iter().collect();
        let batches_par: Vec<Batch> = loader_par.iter().collect();

        assert_eq!(batches_seq.len(), batches_par.len());
        for (a, b) in batches_seq.iter().zip(&batches_par) {
            assert_eq!(a.inputs.to_vec(), b.inputs.to_vec());
            assert_eq!(a.targets.to_vec(), b.targets.to_vec());
        }
    }
}
