//! Position/limit-bounded views over contiguous element stores.
//!
//! A [`Buffer`] is a window onto a store of elements with four cursors:
//!
//! - `capacity`, fixed when the view is created;
//! - `limit`, the index of the first element that may not be read or written;
//! - `position`, the index of the next element to be read or written;
//! - `mark`, an optional saved position restored by [`Buffer::reset`].
//!
//! Every public operation preserves `mark <= position <= limit <= capacity`.
//! Operations that would break it fail without side effects.
//!
//! Views produced by [`Buffer::slice`], [`Buffer::duplicate`] and
//! [`Buffer::as_read_only`] share their store with the original: content
//! written through one view is visible through the others, while each view
//! keeps its own cursors. The store is released when the last view over it is
//! dropped. Stores are reference counted without atomics, so views can't be
//! sent between threads.
//!
//! The element type is chosen by the [`Element`] parameter. Aliases are
//! provided for the usual shapes, with [`CharBuffer`] holding 16-bit
//! character units.

mod bytes;
mod chars;
mod store;

use alloc::{vec, vec::Vec};
use core::fmt;

use thiserror::Error;

pub use bytes::ByteOrder;
pub use store::Element;
use store::Store;

/// A buffer of bytes.
pub type ByteBuffer = Buffer<u8>;
/// A buffer of 16-bit character units.
pub type CharBuffer = Buffer<u16>;
/// A buffer of `i16`.
pub type ShortBuffer = Buffer<i16>;
/// A buffer of `i32`.
pub type IntBuffer = Buffer<i32>;
/// A buffer of `i64`.
pub type LongBuffer = Buffer<i64>;
/// A buffer of `f32`.
pub type FloatBuffer = Buffer<f32>;
/// A buffer of `f64`.
pub type DoubleBuffer = Buffer<f64>;

/// Misuse of a buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Fewer elements remain than a read requires.
    #[error("Fewer elements remain than requested.")]
    Underflow,
    /// Less room remains than a write requires.
    #[error("Less room remains than requested.")]
    Overflow,
    /// The view rejects writes.
    #[error("The buffer is read-only.")]
    ReadOnly,
    /// An index or cursor value lies outside its permitted range.
    #[error("Index {index} is out of range (bound {bound}).")]
    OutOfRange { index: usize, bound: usize },
    /// The mark is undefined.
    #[error("The mark is undefined.")]
    InvalidMark,
}

/// A bounded view over a shared element store.
pub struct Buffer<T: Element> {
    store: Store<T>,
    offset: usize,
    capacity: usize,
    limit: usize,
    position: usize,
    mark: Option<usize>,
    read_only: bool,
    order: ByteOrder,
}

impl<T: Element> Buffer<T> {
    fn from_store(store: Store<T>, offset: usize, capacity: usize, read_only: bool) -> Self {
        Self {
            store,
            offset,
            capacity,
            limit: capacity,
            position: 0,
            mark: None,
            read_only,
            order: ByteOrder::BigEndian,
        }
    }

    /// Allocate a writable buffer of `capacity` default-valued elements.
    pub fn allocate(capacity: usize) -> Self {
        Self::from_store(Store::heap(vec![T::default(); capacity]), 0, capacity, false)
    }

    /// Wrap an owned vector. Its length becomes the capacity.
    pub fn wrap(values: Vec<T>) -> Self {
        let capacity = values.len();
        Self::from_store(Store::heap(values), 0, capacity, false)
    }

    /// Wrap an owned vector, positioned on `offset` with `length` elements
    /// remaining. The capacity is still the length of the whole vector.
    pub fn wrap_range(values: Vec<T>, offset: usize, length: usize) -> Result<Self, BufferError> {
        let capacity = values.len();
        check_range(offset, length, capacity)?;

        let mut buffer = Self::wrap(values);
        buffer.limit = offset + length;
        buffer.position = offset;
        Ok(buffer)
    }

    /// Copy a slice into a newly allocated buffer.
    pub fn from_slice(values: &[T]) -> Self {
        Self::wrap(values.to_vec())
    }

    /// Wrap an immutable sequence. The resulting view is read-only.
    pub(crate) fn frozen(values: Vec<T>) -> Self {
        let capacity = values.len();
        Self::from_store(Store::frozen(values), 0, capacity, true)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The saved mark, if defined.
    pub fn marked(&self) -> Option<usize> {
        self.mark
    }

    /// The number of elements between the position and the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Move the position. A mark beyond the new position is discarded.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self, BufferError> {
        if position > self.limit {
            Err(BufferError::OutOfRange {
                index: position,
                bound: self.limit,
            })?;
        }

        self.seek(position);
        Ok(self)
    }

    /// Move the limit. The position is clamped to it, and a mark beyond it is
    /// discarded.
    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self, BufferError> {
        if limit > self.capacity {
            Err(BufferError::OutOfRange {
                index: limit,
                bound: self.capacity,
            })?;
        }

        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        if self.mark.is_some_and(|mark| mark > limit) {
            self.mark = None;
        }
        Ok(self)
    }

    /// Record the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.mark = Some(self.position);
        self
    }

    /// Restore the position saved by [`Buffer::mark`].
    pub fn reset(&mut self) -> Result<&mut Self, BufferError> {
        let mark = self.mark.ok_or(BufferError::InvalidMark)?;
        self.position = mark;
        Ok(self)
    }

    /// Prepare for filling: position to zero, limit to capacity.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.limit = self.capacity;
        self.mark = None;
        self
    }

    /// Prepare for draining what was just written: limit to the position,
    /// position to zero.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
        self
    }

    /// Prepare for re-reading: position to zero, limit unchanged.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = None;
        self
    }

    /// Read the element at the position and advance it.
    pub fn get(&mut self) -> Result<T, BufferError> {
        if !self.has_remaining() {
            Err(BufferError::Underflow)?;
        }

        let value = self.load(self.position);
        self.position += 1;
        Ok(value)
    }

    /// Write an element at the position and advance it.
    pub fn put(&mut self, value: T) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        if !self.has_remaining() {
            Err(BufferError::Overflow)?;
        }

        self.push(value);
        Ok(self)
    }

    /// Read the element at `index`, which must be below the limit.
    pub fn get_at(&self, index: usize) -> Result<T, BufferError> {
        self.check_index(index, 1)?;
        Ok(self.load(index))
    }

    /// Write an element at `index`, which must be below the limit.
    pub fn put_at(&mut self, index: usize, value: T) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        self.check_index(index, 1)?;
        self.store.store(self.offset + index, value);
        Ok(self)
    }

    /// Fill `dst` from the position onward, advancing by its length.
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<&mut Self, BufferError> {
        if dst.len() > self.remaining() {
            Err(BufferError::Underflow)?;
        }

        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.load(self.position + i);
        }
        self.position += dst.len();
        Ok(self)
    }

    /// Copy `src` in at the position, advancing by its length.
    pub fn put_slice(&mut self, src: &[T]) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        if src.len() > self.remaining() {
            Err(BufferError::Overflow)?;
        }

        for value in src {
            self.push(*value);
        }
        Ok(self)
    }

    /// Transfer the remaining elements of `src` in at the position, advancing
    /// both buffers.
    pub fn put_buffer(&mut self, src: &mut Buffer<T>) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        if src.remaining() > self.remaining() {
            Err(BufferError::Overflow)?;
        }

        if self.store.same(&src.store) {
            // The windows may overlap, so stage the elements first.
            let values = src.to_vec();
            src.position = src.limit;
            return self.put_slice(&values);
        }

        while src.has_remaining() {
            let value = src.load(src.position);
            src.position += 1;
            self.push(value);
        }
        Ok(self)
    }

    /// Fill `dst` from `index` onward without moving the position.
    pub fn get_slice_at(&self, index: usize, dst: &mut [T]) -> Result<(), BufferError> {
        self.check_index(index, dst.len())?;

        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.load(index + i);
        }
        Ok(())
    }

    /// Copy `src` in at `index` without moving the position.
    pub fn put_slice_at(&mut self, index: usize, src: &[T]) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        self.check_index(index, src.len())?;

        for (i, value) in src.iter().enumerate() {
            self.store.store(self.offset + index + i, *value);
        }
        Ok(self)
    }

    /// A view of the remaining elements. Its position is zero, and its limit
    /// and capacity are the remaining count.
    pub fn slice(&self) -> Self {
        Self::from_store(
            self.store.clone(),
            self.offset + self.position,
            self.remaining(),
            self.read_only,
        )
    }

    /// A view of `length` elements starting at `index`, independent of the
    /// position.
    pub fn slice_range(&self, index: usize, length: usize) -> Result<Self, BufferError> {
        check_range(index, length, self.limit)?;

        Ok(Self::from_store(
            self.store.clone(),
            self.offset + index,
            length,
            self.read_only,
        ))
    }

    /// A view of the same window with its own copy of the cursors.
    pub fn duplicate(&self) -> Self {
        Self {
            store: self.store.clone(),
            offset: self.offset,
            capacity: self.capacity,
            limit: self.limit,
            position: self.position,
            mark: self.mark,
            read_only: self.read_only,
            order: ByteOrder::BigEndian,
        }
    }

    /// Like [`Buffer::duplicate`], but the result rejects writes.
    pub fn as_read_only(&self) -> Self {
        let mut view = self.duplicate();
        view.read_only = true;
        view
    }

    /// Move the remaining elements to the start, then prepare for filling
    /// after them.
    pub fn compact(&mut self) -> Result<&mut Self, BufferError> {
        self.check_writable()?;

        let remaining = self.remaining();
        // Moving towards index zero, so a forward copy never clobbers unread
        // elements.
        for i in 0..remaining {
            let value = self.load(self.position + i);
            self.store.store(self.offset + i, value);
        }

        self.position = remaining;
        self.limit = self.capacity;
        self.mark = None;
        Ok(self)
    }

    /// Copy out the remaining elements.
    pub fn to_vec(&self) -> Vec<T> {
        (self.position..self.limit).map(|i| self.load(i)).collect()
    }

    /// Whether this view and `other` share a store.
    pub fn shares_store(&self, other: &Self) -> bool {
        self.store.same(&other.store)
    }

    /// Whether the backing store is an immutable external sequence.
    pub fn is_frozen(&self) -> bool {
        self.store.is_frozen()
    }

    /// Read an element by index without checking it against the limit.
    pub(crate) fn load(&self, index: usize) -> T {
        debug_assert!(index < self.capacity);
        self.store.load(self.offset + index)
    }

    /// The element at `index` if it lies before the limit.
    pub(crate) fn peek_at(&self, index: usize) -> Option<T> {
        (index < self.limit).then(|| self.load(index))
    }

    /// Write at the position and advance. Callers have checked room and
    /// writability.
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(!self.read_only && self.has_remaining());
        self.store.store(self.offset + self.position, value);
        self.position += 1;
    }

    /// Move the position to a value already known to be within the limit.
    pub(crate) fn seek(&mut self, position: usize) {
        debug_assert!(position <= self.limit);
        self.position = position;
        if self.mark.is_some_and(|mark| mark > position) {
            self.mark = None;
        }
    }

    fn check_writable(&self) -> Result<(), BufferError> {
        if self.read_only {
            Err(BufferError::ReadOnly)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize, length: usize) -> Result<(), BufferError> {
        check_range(index, length, self.limit).map_err(|_| BufferError::OutOfRange {
            index,
            bound: self.limit,
        })
    }
}

/// Check that `[index, index + length)` lies within `[0, bound)`.
fn check_range(index: usize, length: usize, bound: usize) -> Result<(), BufferError> {
    if index > bound {
        Err(BufferError::OutOfRange { index, bound })?;
    }
    if length > bound - index {
        Err(BufferError::OutOfRange {
            index: index.saturating_add(length),
            bound,
        })?;
    }
    Ok(())
}

impl<T: Element> PartialEq for Buffer<T> {
    /// Buffers are equal when their remaining elements are.
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
            && (0..self.remaining())
                .all(|i| self.load(self.position + i) == other.load(other.position + i))
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("position", &self.position)
            .field("limit", &self.limit)
            .field("capacity", &self.capacity)
            .field("read_only", &self.read_only)
            .finish()
    }
}
