//! Byte View Module
//!
//! Immutable view over a cached value.

use std::fmt;

use bytes::Bytes;

use crate::cache::Weighted;

// == Byte View ==
/// An immutable sequence of bytes held by the cache.
///
/// Cloning a view shares the underlying buffer; there is no way to mutate it
/// through a view. Callers that need an owned buffer get a copy via
/// [`ByteView::to_vec`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    // == Constructor ==
    /// Copies `data` into a new view.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Returns the number of bytes in the view.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns an independent copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Borrows the bytes without copying.
    pub fn as_slice(&self) -> &[u8] {
        &self.b
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self { b: Bytes::from(data) }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::copy_from_slice(s.as_bytes())
    }
}

impl From<ByteView> for Bytes {
    fn from(view: ByteView) -> Self {
        view.b
    }
}

impl Weighted for ByteView {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteView").field(&self.b).finish()
    }
}
