pub mod buffer;
pub mod config;
pub mod error;
pub mod iter;

// Re-export buffer types for convenience
pub use buffer::{FastBuffer, DEFAULT_CAPACITY, GROWTH_PADDING};

// Re-export iteration types for convenience
pub use iter::{Cursor, IntoIter, Iter};

pub use config::BufferConfig;
pub use error::BufferError;
