//! Memory Storage - Reference-Counted Tensor Buffers
//!
//! Provides the shared, reference-counted buffer underlying every tensor.
//! Cloning a storage is cheap (an `Arc` bump); views share the same buffer
//! through an offset/length window. Interior mutability is provided by a
//! `parking_lot` read-write lock.
//!
//! # Key Features
//! - Cheap cloning and slicing via reference counting
//! - Guarded read/write access to the underlying buffer
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dtype::Scalar;
use crate::error::{Error, Result};

// =============================================================================
// Storage
// =============================================================================

/// A reference-counted, lock-guarded buffer of scalar values.
///
/// Multiple tensors may view the same storage; `offset` and `len` select
/// the window of the buffer this handle exposes.
pub struct Storage<T: Scalar> {
    inner: Arc<RwLock<Vec<T>>>,
    offset: usize,
    len: usize,
}

impl<T: Scalar> Storage<T> {
    /// Creates a storage of `len` default-initialized elements.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![T::default(); len])
    }

    /// Creates a storage that takes ownership of `data`.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            inner: Arc::new(RwLock::new(data)),
            offset: 0,
            len,
        }
    }

    /// Creates a storage by copying `data`.
    #[must_use]
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Returns the number of elements visible through this handle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this handle exposes no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a handle viewing `len` elements starting at `offset`
    /// relative to this handle's window.
    pub fn slice(&self, offset: usize, len: usize) -> Result<Self> {
        if offset + len > self.len {
            return Err(Error::IndexOutOfBounds {
                index: offset + len,
                size: self.len,
            });
        }
        Ok(Self {
            inner: Arc::clone(&self.inner),
            offset: self.offset + offset,
            len,
        })
    }

    /// Returns true if this storage is uniquely owned (not shared).
    #[must_use]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns a read guard over the visible window.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
            offset: self.offset,
            len: self.len,
        }
    }

    /// Returns a write guard over the visible window.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
            offset: self.offset,
            len: self.len,
        }
    }

    /// Copies data from another storage into this one.
    ///
    /// # Errors
    /// Returns an error if the window lengths don't match.
    pub fn copy_from(&self, other: &Self) -> Result<()> {
        if self.len != other.len {
            return Err(Error::shape_mismatch(&[self.len], &[other.len]));
        }

        let src = other.as_slice().to_vec();
        let mut dst = self.as_slice_mut();
        dst.copy_from_slice(&src);
        Ok(())
    }

    /// Makes a deep copy of the visible window into fresh storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        let data = self.as_slice().to_vec();
        Self::from_vec(data)
    }
}

impl<T: Scalar> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            offset: self.offset,
            len: self.len,
        }
    }
}

impl<T: Scalar> std::fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("shared", &!self.is_unique())
            .finish()
    }
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockReadGuard<'a, Vec<T>>,
    offset: usize,
    len: usize,
}

impl<T: Scalar> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard[self.offset..self.offset + self.len]
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockWriteGuard<'a, Vec<T>>,
    offset: usize,
    len: usize,
}

impl<T: Scalar> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard[self.offset..self.offset + self.len]
    }
}

impl<T: Scalar> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard[self.offset..self.offset + self.len]
    }
}

// =============================================================================
// Tests
// =============================================================================
