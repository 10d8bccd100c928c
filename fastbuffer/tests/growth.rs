//! Growth policy: doubling, with a linear fallback when doubling is not enough

use fastbuffer::{FastBuffer, DEFAULT_CAPACITY, GROWTH_PADDING};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("fastbuffer=trace"))
        .with_test_writer()
        .try_init();
}

#[test]
fn test_default_capacity() {
    init_tracing();

    let buffer: FastBuffer<()> = FastBuffer::default();
    assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn test_no_growth_until_full() {
    let mut buffer = FastBuffer::with_capacity(4).unwrap();
    buffer.append_slice(&[1, 2, 3, 4]).unwrap();
    assert_eq!(buffer.capacity(), 4);

    buffer.append(5).unwrap();
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_doubling_sequence() {
    init_tracing();

    let mut buffer = FastBuffer::with_capacity(2).unwrap();
    let mut capacities = vec![buffer.capacity()];
    for i in 0..33u32 {
        buffer.append(i).unwrap();
        if capacities.last() != Some(&buffer.capacity()) {
            capacities.push(buffer.capacity());
        }
    }

    assert_eq!(capacities, vec![2, 4, 8, 16, 32, 64]);
    assert_eq!(buffer.to_vec(), (0..33).collect::<Vec<_>>());
}

#[test]
fn test_zero_capacity_uses_padding() {
    init_tracing();

    let mut buffer = FastBuffer::with_capacity(0).unwrap();
    buffer.append(1u8).unwrap();
    assert_eq!(buffer.capacity(), 1 + GROWTH_PADDING);
}

#[test]
fn test_large_bulk_append_uses_padding() {
    init_tracing();

    let mut buffer = FastBuffer::with_capacity(10).unwrap();
    buffer.append_slice(&[0u8; 5]).unwrap();

    let big = vec![1u8; 1000];
    buffer.append_slice(&big).unwrap();

    assert_eq!(buffer.len(), 1005);
    assert_eq!(buffer.capacity(), 1005 + GROWTH_PADDING);
    assert_eq!(buffer.to_vec_range(0, 5).unwrap(), vec![0u8; 5]);
    assert_eq!(buffer.to_vec_range(5, 1000).unwrap(), big);
}

#[test]
fn test_values_survive_many_reallocations() {
    let mut buffer = FastBuffer::with_capacity(1).unwrap();
    let mut expected = Vec::new();
    for i in 0..5000 {
        let value = format!("item-{i}");
        expected.push(value.clone());
        buffer.append(value).unwrap();
    }

    assert!(buffer.capacity() >= 5000);
    assert_eq!(buffer.to_vec(), expected);
}

#[test]
fn test_clear_never_shrinks() {
    let mut buffer = FastBuffer::with_capacity(1).unwrap();
    for i in 0..100 {
        buffer.append(i).unwrap();
    }
    let capacity = buffer.capacity();

    buffer.clear();
    assert_eq!(buffer.capacity(), capacity);

    for i in 0..100 {
        buffer.append(i).unwrap();
    }
    assert_eq!(buffer.capacity(), capacity);
}
