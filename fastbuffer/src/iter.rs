//! Iteration over buffer elements
//!
//! - [`Iter`] borrows the buffer, so mutation during iteration does not
//!   compile.
//! - [`IntoIter`] consumes the buffer.
//! - [`Cursor`] holds only a position and checks the buffer's identity and
//!   modification count on every step, failing fast after an append or a
//!   clear.

use std::iter::FusedIterator;

use crate::buffer::FastBuffer;
use crate::error::BufferError;

/// Borrowing iterator over the occupied elements of a [`FastBuffer`]
pub struct Iter<'a, E> {
    inner: std::slice::Iter<'a, Option<E>>,
}

impl<'a, E> Iter<'a, E> {
    pub(crate) fn new(slots: &'a [Option<E>]) -> Self {
        Self {
            inner: slots.iter(),
        }
    }

    /// Check if another element is available
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.inner.len() > 0
    }

    /// Step to the next element
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Exhausted`] once all elements were produced.
    pub fn advance(&mut self) -> Result<&'a E, BufferError> {
        self.next().ok_or(BufferError::Exhausted)
    }

    /// Removal is not supported: the buffer is append-only
    ///
    /// # Errors
    ///
    /// Always returns [`BufferError::UnsupportedOperation`].
    pub fn remove(&mut self) -> Result<(), BufferError> {
        Err(BufferError::UnsupportedOperation("remove"))
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        self.inner.next().and_then(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}

impl<E> FusedIterator for Iter<'_, E> {}

impl<E> Clone for Iter<'_, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> std::fmt::Debug for Iter<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish_non_exhaustive()
    }
}

/// Owning iterator over the occupied elements of a [`FastBuffer`]
///
/// Stale slots beyond the logical length are dropped with the iterator.
pub struct IntoIter<E> {
    inner: std::iter::Take<std::vec::IntoIter<Option<E>>>,
}

impl<E> IntoIter<E> {
    pub(crate) fn new(slots: Box<[Option<E>]>, len: usize) -> Self {
        Self {
            inner: slots.into_vec().into_iter().take(len),
        }
    }
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.inner.next().flatten()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {}

impl<E> FusedIterator for IntoIter<E> {}

/// Detached position in a [`FastBuffer`]
///
/// Unlike [`Iter`], a cursor does not borrow the buffer between steps, so
/// the owner may keep appending. The cursor remembers which buffer created
/// it and that buffer's modification count, and refuses to continue against
/// another buffer or once the count changes.
///
/// # Example
///
/// ```
/// use fastbuffer::{BufferError, FastBuffer};
///
/// let mut buffer = FastBuffer::new();
/// buffer.append_slice(&[1, 2]).unwrap();
///
/// let mut cursor = buffer.cursor();
/// assert_eq!(cursor.advance(&buffer), Ok(&1));
///
/// buffer.append(3).unwrap();
/// assert!(matches!(
///     cursor.advance(&buffer),
///     Err(BufferError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    position: usize,
    buffer_id: u64,
    expected_mod_count: u64,
}

impl Cursor {
    pub(crate) fn new(buffer_id: u64, mod_count: u64) -> Self {
        Self {
            position: 0,
            buffer_id,
            expected_mod_count: mod_count,
        }
    }

    fn check<E>(&self, buffer: &FastBuffer<E>) -> Result<(), BufferError> {
        if buffer.id() != self.buffer_id {
            return Err(BufferError::ForeignBuffer {
                expected: self.buffer_id,
                found: buffer.id(),
            });
        }
        let found = buffer.mod_count();
        if found != self.expected_mod_count {
            return Err(BufferError::ConcurrentModification {
                expected: self.expected_mod_count,
                found,
            });
        }
        Ok(())
    }

    /// Index of the element the next step will produce
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if another element is available
    ///
    /// # Errors
    ///
    /// - [`BufferError::ForeignBuffer`] if `buffer` did not create the cursor.
    /// - [`BufferError::ConcurrentModification`] if the buffer was modified
    ///   since the cursor was created.
    pub fn has_next<E>(&self, buffer: &FastBuffer<E>) -> Result<bool, BufferError> {
        self.check(buffer)?;
        Ok(self.position < buffer.len())
    }

    /// Step to the next element
    ///
    /// # Errors
    ///
    /// - [`BufferError::ForeignBuffer`] if `buffer` did not create the cursor.
    /// - [`BufferError::ConcurrentModification`] if the buffer was modified
    ///   since the cursor was created.
    /// - [`BufferError::Exhausted`] once all elements were produced.
    pub fn advance<'b, E>(&mut self, buffer: &'b FastBuffer<E>) -> Result<&'b E, BufferError> {
        self.check(buffer)?;
        if self.position >= buffer.len() {
            return Err(BufferError::Exhausted);
        }
        let element = buffer.get(self.position)?;
        self.position += 1;
        Ok(element)
    }

    /// Removal is not supported: the buffer is append-only
    ///
    /// # Errors
    ///
    /// Always returns [`BufferError::UnsupportedOperation`].
    pub fn remove(&mut self) -> Result<(), BufferError> {
        Err(BufferError::UnsupportedOperation("remove"))
    }
}
