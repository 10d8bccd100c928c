//! Error type for buffer operations
//!
//! Every variant is a programming error raised at the call that violates
//! the contract. Nothing is retried internally.

/// Error type for buffer operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Construction argument is out of range (negative or oversized capacity)
    InvalidArgument(String),

    /// Index or range lies outside the occupied elements
    IndexOutOfBounds { index: usize, len: usize },

    /// Iteration advanced past the last element
    Exhausted,

    /// Operation is not supported by this interface
    UnsupportedOperation(&'static str),

    /// Required capacity does not fit the address space
    CapacityOverflow { required: usize },

    /// Buffer was structurally modified while a cursor was walking it
    ConcurrentModification { expected: u64, found: u64 },

    /// Cursor was stepped against a buffer other than the one that created it
    ForeignBuffer { expected: u64, found: u64 },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "Index out of bounds: index {index}, length {len}")
            }
            Self::Exhausted => write!(f, "No more elements"),
            Self::UnsupportedOperation(op) => write!(f, "Unsupported operation: {op}"),
            Self::CapacityOverflow { required } => {
                write!(f, "Capacity overflow: {required} slots required")
            }
            Self::ConcurrentModification { expected, found } => write!(
                f,
                "Buffer modified during iteration (modification count {expected} -> {found})"
            ),
            Self::ForeignBuffer { expected, found } => write!(
                f,
                "Cursor belongs to buffer {expected}, used with buffer {found}"
            ),
        }
    }
}

impl std::error::Error for BufferError {}
