//! Integration tests for iterating a FastBuffer

use fastbuffer::{BufferError, FastBuffer};

fn numbers(n: i32) -> FastBuffer<i32> {
    let mut buffer = FastBuffer::with_capacity(2).unwrap();
    for i in 0..n {
        buffer.append(i).unwrap();
    }
    buffer
}

#[test]
fn test_iter_yields_len_elements_in_order() {
    let buffer = numbers(100);
    let collected: Vec<i32> = buffer.iter().copied().collect();
    assert_eq!(collected.len(), buffer.len());
    assert_eq!(collected, (0..100).collect::<Vec<_>>());
}

#[test]
fn test_iter_then_exhausted() {
    let buffer = numbers(2);
    let mut iter = buffer.iter();
    assert_eq!(iter.advance(), Ok(&0));
    assert_eq!(iter.advance(), Ok(&1));
    assert_eq!(iter.advance(), Err(BufferError::Exhausted));
}

#[test]
fn test_iter_empty() {
    let buffer = numbers(0);
    let mut iter = buffer.iter();
    assert!(!iter.has_next());
    assert_eq!(iter.next(), None);
    assert_eq!(iter.advance(), Err(BufferError::Exhausted));
}

#[test]
fn test_fresh_iter_restarts() {
    let buffer = numbers(3);
    let mut first = buffer.iter();
    while first.next().is_some() {}

    assert_eq!(buffer.iter().count(), 3);
}

#[test]
fn test_for_loop_by_reference() {
    let buffer = numbers(4);
    let mut sum = 0;
    for value in &buffer {
        sum += value;
    }
    assert_eq!(sum, 6);
}

#[test]
fn test_remove_unsupported() {
    let buffer = numbers(1);
    let mut iter = buffer.iter();
    assert!(matches!(
        iter.remove(),
        Err(BufferError::UnsupportedOperation(_))
    ));

    let mut cursor = buffer.cursor();
    assert!(matches!(
        cursor.remove(),
        Err(BufferError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_cursor_interleaved_with_reads() {
    let buffer = numbers(3);
    let mut cursor = buffer.cursor();
    let mut seen = Vec::new();
    while cursor.has_next(&buffer).unwrap() {
        seen.push(*cursor.advance(&buffer).unwrap());
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(cursor.advance(&buffer), Err(BufferError::Exhausted));
}

#[test]
fn test_cursor_detects_append() {
    let mut buffer = numbers(3);
    let mut cursor = buffer.cursor();
    cursor.advance(&buffer).unwrap();

    buffer.append(99).unwrap();

    assert!(matches!(
        cursor.has_next(&buffer),
        Err(BufferError::ConcurrentModification { .. })
    ));
    assert!(matches!(
        cursor.advance(&buffer),
        Err(BufferError::ConcurrentModification { .. })
    ));

    // a fresh cursor sees the new state
    let mut cursor = buffer.cursor();
    let mut seen = Vec::new();
    while let Ok(value) = cursor.advance(&buffer) {
        seen.push(*value);
    }
    assert_eq!(seen, vec![0, 1, 2, 99]);
}

#[test]
fn test_cursor_detects_clear() {
    let mut buffer = numbers(3);
    let mut cursor = buffer.cursor();
    buffer.clear();
    assert!(matches!(
        cursor.advance(&buffer),
        Err(BufferError::ConcurrentModification { .. })
    ));
}

#[test]
fn test_cursor_bound_to_its_buffer() {
    let mut a = FastBuffer::new();
    a.append_slice(&[1, 2, 3]).unwrap();
    let mut b = FastBuffer::new();
    b.append_slice(&[7, 8]).unwrap();

    let mut cursor = a.cursor();
    assert!(matches!(
        cursor.advance(&b),
        Err(BufferError::ForeignBuffer { .. })
    ));

    let mut cursor = b.cursor();
    let mut single = FastBuffer::new();
    single.append(42).unwrap();
    assert!(matches!(
        cursor.advance(&single),
        Err(BufferError::ForeignBuffer { .. })
    ));
    assert_eq!(cursor.advance(&b), Ok(&7));
}

#[test]
fn test_owned_into_iter() {
    let buffer = numbers(5);
    let doubled: Vec<i32> = buffer.into_iter().map(|v| v * 2).collect();
    assert_eq!(doubled, vec![0, 2, 4, 6, 8]);
}
