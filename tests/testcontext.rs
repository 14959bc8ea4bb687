//! Sliding-window behavior of the error-context buffer under streamed input.

use rand::Rng;
use rxpat::context::ContextWindow;

#[test]
fn window_matches_reference_model_under_random_chunks() {
    let mut rng = rand::rng();

    for capacity in [1usize, 7, 64, 1024] {
        let mut window = ContextWindow::new(capacity);
        let mut stream: Vec<u8> = Vec::new();

        for _ in 0..200 {
            let len = rng.random_range(0..=3 * capacity);
            let chunk: Vec<u8> = (0..len).map(|_| rng.random()).collect();
            stream.extend_from_slice(&chunk);
            window.push(&chunk);

            let start = stream.len().saturating_sub(capacity);
            let (offset, bytes) = window.snapshot();
            assert_eq!(offset, start as u64, "capacity {capacity}");
            assert_eq!(bytes, &stream[start..], "capacity {capacity}");
        }
    }
}

#[test]
fn byte_at_a_time_streaming() {
    let mut window = ContextWindow::new(5);
    for (i, b) in (b'A'..=b'Z').enumerate() {
        window.push(&[b]);
        let (offset, bytes) = window.snapshot();
        assert_eq!(offset as usize, (i + 1).saturating_sub(5));
        assert_eq!(bytes.len(), (i + 1).min(5));
    }
    assert_eq!(window.snapshot(), (21, b"VWXYZ".as_slice()));
}

#[test]
fn offset_survives_repeated_oversized_pushes() {
    let mut window = ContextWindow::new(3);
    window.push(b"0123456789");
    assert_eq!(window.snapshot(), (7, b"789".as_slice()));
    window.push(b"abcdefgh");
    assert_eq!(window.snapshot(), (15, b"fgh".as_slice()));
}

#[test]
fn default_capacity_retains_a_kilobyte() {
    let mut window = ContextWindow::with_default_capacity();
    assert_eq!(window.capacity(), 1024);

    let data: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
    window.push(&data);
    let (offset, bytes) = window.snapshot();
    assert_eq!(offset, 976);
    assert_eq!(bytes.len(), 1024);
    assert_eq!(bytes, &data[976..]);
}
