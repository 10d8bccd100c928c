//! Growable append-only buffer
//!
//! Owns an explicitly sized backing store and tracks the logical length by
//! hand, so that the growth policy stays under our control:
//!
//! ```text
//!   required <= capacity      -> no reallocation
//!   capacity * 2 >= required  -> capacity * 2
//!   otherwise                 -> required + GROWTH_PADDING
//! ```
//!
//! The linear fallback covers both a zero capacity and a single bulk append
//! larger than the doubled store.

use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::iter::{Cursor, IntoIter, Iter};

/// Capacity used by [`FastBuffer::new`]
pub const DEFAULT_CAPACITY: usize = 64;

/// Extra slots added when doubling is not enough
pub const GROWTH_PADDING: usize = 512;

/// Growable append-only buffer
///
/// Slots `[0, len)` are occupied. Slots beyond `len` hold stale elements
/// left by [`clear`](Self::clear) or nothing at all, and are never
/// observable through the API.
///
/// # Thread Safety
///
/// No internal locking. The buffer is `Send`/`Sync` whenever `E` is, and
/// mutation from several threads needs a lock supplied by the caller.
///
/// # Example
///
/// ```
/// use fastbuffer::FastBuffer;
///
/// let mut buffer = FastBuffer::with_capacity(2).unwrap();
/// buffer.append('a').unwrap();
/// buffer.append('b').unwrap();
/// buffer.append('c').unwrap();
///
/// assert_eq!(buffer.len(), 3);
/// assert_eq!(buffer.to_vec(), vec!['a', 'b', 'c']);
/// assert_eq!(buffer.capacity(), 4);
/// ```
pub struct FastBuffer<E> {
    slots: Box<[Option<E>]>,
    len: usize,
    mod_count: u64,
    id: u64,
}

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a buffer, so that a cursor can recognize its owner
fn next_buffer_id() -> u64 {
    NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Largest slot count a backing store of `E` may have
fn max_slots<E>() -> usize {
    let slot_size = std::mem::size_of::<Option<E>>().max(1);
    isize::MAX.unsigned_abs() / slot_size
}

fn allocate<E>(capacity: usize) -> Box<[Option<E>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Slot count needed to hold `count` more elements after `len`
fn required_capacity(len: usize, count: usize) -> Result<usize, BufferError> {
    len.checked_add(count)
        .ok_or(BufferError::CapacityOverflow { required: usize::MAX })
}

/// Capacity to grow to from `old` so that `required` slots fit
///
/// Doubles `old`. Falls back to `required + GROWTH_PADDING` when doubling
/// overflows, passes `limit` or is still too small. The fallback is not
/// clamped: if `required` fits under `limit` but the padded value does not,
/// the result is [`BufferError::CapacityOverflow`] even though `limit`
/// slots would have been enough.
fn grown_capacity(old: usize, required: usize, limit: usize) -> Result<usize, BufferError> {
    let doubled = old.checked_mul(2).filter(|doubled| *doubled <= limit);
    match doubled {
        Some(doubled) if doubled >= required => Ok(doubled),
        _ => {
            let padded = required
                .checked_add(GROWTH_PADDING)
                .filter(|padded| *padded <= limit)
                .ok_or(BufferError::CapacityOverflow { required })?;
            debug!(
                old_capacity = old,
                required,
                new_capacity = padded,
                "doubling is not enough, using linear growth"
            );
            Ok(padded)
        }
    }
}

impl<E> FastBuffer<E> {
    /// Create a new empty buffer with [`DEFAULT_CAPACITY`] slots
    #[must_use]
    pub fn new() -> Self {
        Self::empty(DEFAULT_CAPACITY)
    }

    fn empty(capacity: usize) -> Self {
        let id = next_buffer_id();
        trace!(id, capacity, "buffer created");
        Self {
            slots: allocate(capacity),
            len: 0,
            mod_count: 0,
            id,
        }
    }

    /// Create a new empty buffer with the given capacity
    ///
    /// Accepts any integer type, so that a signed capacity coming from
    /// configuration or arithmetic is checked instead of wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if the capacity is negative
    /// or larger than a backing store of `E` can be.
    ///
    /// # Example
    ///
    /// ```
    /// use fastbuffer::{BufferError, FastBuffer};
    ///
    /// let buffer: FastBuffer<u8> = FastBuffer::with_capacity(0).unwrap();
    /// assert!(buffer.is_empty());
    ///
    /// let err = FastBuffer::<u8>::with_capacity(-1).unwrap_err();
    /// assert!(matches!(err, BufferError::InvalidArgument(_)));
    /// ```
    pub fn with_capacity<C>(capacity: C) -> Result<Self, BufferError>
    where
        C: TryInto<usize>,
    {
        let capacity: usize = capacity.try_into().map_err(|_| {
            BufferError::InvalidArgument("capacity must be a non-negative integer".to_string())
        })?;
        if capacity > max_slots::<E>() {
            return Err(BufferError::InvalidArgument(format!(
                "capacity {capacity} exceeds the maximum of {}",
                max_slots::<E>()
            )));
        }
        Ok(Self::empty(capacity))
    }

    /// Create a new empty buffer as described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if the configured capacity
    /// is negative or too large.
    pub fn from_config(config: &BufferConfig) -> Result<Self, BufferError> {
        Self::with_capacity(config.initial_capacity)
    }

    /// Number of occupied elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer has no occupied elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing store
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn mod_count(&self) -> u64 {
        self.mod_count
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Make sure the backing store has at least `required` slots
    fn ensure_capacity(&mut self, required: usize) -> Result<(), BufferError> {
        let old_capacity = self.capacity();
        if required <= old_capacity {
            return Ok(());
        }

        let new_capacity = grown_capacity(old_capacity, required, max_slots::<E>())?;

        let mut slots = allocate(new_capacity);
        for (dst, src) in slots.iter_mut().zip(self.slots[..self.len].iter_mut()) {
            *dst = src.take();
        }
        self.slots = slots;
        trace!(old_capacity, new_capacity, required, "buffer reallocated");
        Ok(())
    }

    /// Append a single element
    ///
    /// Grows the backing store first when it is full. Amortized O(1).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] if the buffer cannot grow
    /// any further.
    pub fn append(&mut self, element: E) -> Result<(), BufferError> {
        let required = required_capacity(self.len, 1)?;
        self.ensure_capacity(required)?;
        self.slots[self.len] = Some(element);
        self.len = required;
        self.mod_count = self.mod_count.wrapping_add(1);
        Ok(())
    }

    /// Same as [`append`](Self::append)
    ///
    /// # Errors
    ///
    /// See [`append`](Self::append).
    pub fn add(&mut self, element: E) -> Result<(), BufferError> {
        self.append(element)
    }

    /// Append every element produced by `elements`, growing once up front
    fn append_exact<I>(&mut self, elements: I) -> Result<(), BufferError>
    where
        I: ExactSizeIterator<Item = E>,
    {
        let count = elements.len();
        if count == 0 {
            return Ok(());
        }
        let required = required_capacity(self.len, count)?;
        self.ensure_capacity(required)?;

        let mut written = self.len;
        for (slot, element) in self.slots[self.len..required].iter_mut().zip(elements) {
            *slot = Some(element);
            written += 1;
        }
        self.len = written;
        self.mod_count = self.mod_count.wrapping_add(1);
        Ok(())
    }

    /// Drop the occupied elements from view
    ///
    /// The backing store is kept as is: capacity does not shrink and the
    /// old elements stay in their slots (unreachable) until overwritten or
    /// until the buffer is dropped. Do not rely on this to erase data.
    pub fn clear(&mut self) {
        self.len = 0;
        self.mod_count = self.mod_count.wrapping_add(1);
    }

    /// Get the element at `index`
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IndexOutOfBounds`] unless `index < len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use fastbuffer::{BufferError, FastBuffer};
    ///
    /// let mut buffer = FastBuffer::new();
    /// buffer.append("x").unwrap();
    ///
    /// assert_eq!(buffer.get(0), Ok(&"x"));
    /// assert_eq!(
    ///     buffer.get(1),
    ///     Err(BufferError::IndexOutOfBounds { index: 1, len: 1 })
    /// );
    /// ```
    pub fn get(&self, index: usize) -> Result<&E, BufferError> {
        let out_of_bounds = BufferError::IndexOutOfBounds {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_bounds);
        }
        self.slots[index].as_ref().ok_or(out_of_bounds)
    }

    /// Iterate over the occupied elements in order
    ///
    /// The iterator borrows the buffer, so the buffer cannot be appended to
    /// or cleared while it is alive. Use [`cursor`](Self::cursor) when the
    /// walk has to interleave with mutation.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(&self.slots[..self.len])
    }

    /// Create a detached cursor positioned at the first element
    ///
    /// The cursor fails fast with [`BufferError::ConcurrentModification`]
    /// once the buffer is appended to or cleared, and with
    /// [`BufferError::ForeignBuffer`] when stepped against another buffer.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.id, self.mod_count)
    }
}

impl<E: Clone> FastBuffer<E> {
    /// Append `count` elements of `source` starting at `offset`
    ///
    /// Grows at most once. A `count` of zero is a no-op whatever the
    /// `offset` is.
    ///
    /// # Errors
    ///
    /// - [`BufferError::IndexOutOfBounds`] if `offset..offset + count` is not
    ///   inside `source`. The buffer is left untouched.
    /// - [`BufferError::CapacityOverflow`] if the buffer cannot grow enough.
    ///
    /// # Example
    ///
    /// ```
    /// use fastbuffer::FastBuffer;
    ///
    /// let mut buffer = FastBuffer::new();
    /// buffer
    ///     .append_range(&[1, 2, 3, 4], 1, 2)
    ///     .unwrap()
    ///     .append_slice(&[9])
    ///     .unwrap();
    /// assert_eq!(buffer.to_vec(), vec![2, 3, 9]);
    /// ```
    pub fn append_range(
        &mut self,
        source: &[E],
        offset: usize,
        count: usize,
    ) -> Result<&mut Self, BufferError> {
        if count == 0 {
            return Ok(self);
        }
        let end = offset
            .checked_add(count)
            .filter(|end| *end <= source.len())
            .ok_or(BufferError::IndexOutOfBounds {
                index: offset.saturating_add(count),
                len: source.len(),
            })?;
        self.append_exact(source[offset..end].iter().cloned())?;
        Ok(self)
    }

    /// Append all elements of `source`
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] if the buffer cannot grow
    /// enough.
    pub fn append_slice(&mut self, source: &[E]) -> Result<&mut Self, BufferError> {
        self.append_range(source, 0, source.len())
    }

    /// Append the occupied elements of another buffer
    ///
    /// `other` is not modified. Appending an empty buffer is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] if the buffer cannot grow
    /// enough.
    pub fn append_buffer(&mut self, other: &FastBuffer<E>) -> Result<&mut Self, BufferError> {
        if other.is_empty() {
            return Ok(self);
        }
        self.append_exact(other.iter().cloned())?;
        Ok(self)
    }

    /// Copy the occupied elements into a new vector
    ///
    /// The vector is detached from the buffer: changing one never affects
    /// the other.
    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }

    /// Copy `count` elements starting at `start` into a new vector
    ///
    /// A `count` of zero returns an empty vector without looking at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IndexOutOfBounds`] if the range reaches past
    /// the occupied elements.
    pub fn to_vec_range(&self, start: usize, count: usize) -> Result<Vec<E>, BufferError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let end = start
            .checked_add(count)
            .filter(|end| *end <= self.len)
            .ok_or(BufferError::IndexOutOfBounds {
                index: start.saturating_add(count),
                len: self.len,
            })?;
        Ok(Iter::new(&self.slots[start..end]).cloned().collect())
    }
}

impl<E> Default for FastBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Index<usize> for FastBuffer<E> {
    type Output = E;

    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`FastBuffer::get`] to get an error
    /// instead.
    fn index(&self, index: usize) -> &E {
        match self.get(index) {
            Ok(element) => element,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<E: Clone> Clone for FastBuffer<E> {
    /// Clones the occupied elements into a store of the same capacity.
    /// Stale slots are not carried over. The clone is a new buffer with its
    /// own identity: cursors of the original do not walk it.
    fn clone(&self) -> Self {
        let mut copy = Self::empty(self.capacity());
        for (dst, src) in copy.slots.iter_mut().zip(self.iter()) {
            *dst = Some(src.clone());
        }
        copy.len = self.len;
        copy
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for FastBuffer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<E: PartialEq> PartialEq for FastBuffer<E> {
    /// Compares occupied elements only; capacity is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<E: Eq> Eq for FastBuffer<E> {}

impl<'a, E> IntoIterator for &'a FastBuffer<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E> IntoIterator for FastBuffer<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.len)
    }
}
