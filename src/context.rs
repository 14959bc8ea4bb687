//! Bounded retention of recently consumed input for error diagnostics.
//!
//! The parser core pushes every consumed chunk through a [`ContextWindow`];
//! when a parse error surfaces, the window supplies the bytes surrounding the
//! failure point without the parser having to retain the whole document.

/// A sliding window over the tail of the input stream.
///
/// Holds at most `capacity` bytes; older bytes are evicted as new ones
/// arrive, and `start_offset` tracks the absolute stream position of the
/// first retained byte. A capacity of `0` turns retention off entirely.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    content: Vec<u8>,
    capacity: usize,
    start_offset: u64,
}

impl ContextWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            content: Vec::new(),
            capacity,
            start_offset: 0,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(crate::config::DEFAULT_CONTEXT_BYTES)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Append consumed input, evicting from the front once the window is
    /// full. A single push larger than the capacity keeps only its trailing
    /// `capacity` bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        // Zero capacity means the feature is off, not an error.
        if self.capacity == 0 || bytes.is_empty() {
            return;
        }

        if bytes.len() >= self.capacity {
            let evicted = self.content.len() + bytes.len() - self.capacity;
            self.start_offset += evicted as u64;
            self.content.clear();
            self.content
                .extend_from_slice(&bytes[bytes.len() - self.capacity..]);
        } else {
            let excess = (self.content.len() + bytes.len()).saturating_sub(self.capacity);
            if excess > 0 {
                self.content.drain(..excess);
                self.start_offset += excess as u64;
            }
            self.content.extend_from_slice(bytes);
        }
    }

    /// Current window contents and the absolute offset of the first retained
    /// byte. Read-only; calling it twice without an intervening `push`
    /// returns identical results.
    pub fn snapshot(&self) -> (u64, &[u8]) {
        (self.start_offset, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_slides_and_tracks_offset() {
        let mut window = ContextWindow::new(10);
        window.push(b"ABCDEFGHIJ");
        assert_eq!(window.snapshot(), (0, b"ABCDEFGHIJ".as_slice()));
        window.push(b"KLMNO");
        assert_eq!(window.snapshot(), (5, b"FGHIJKLMNO".as_slice()));
        assert_eq!(window.len(), 10);
    }

    #[test]
    fn zero_capacity_disables_retention() {
        let mut window = ContextWindow::new(0);
        window.push(b"ABCDEFGHIJ");
        window.push(b"KLMNO");
        assert_eq!(window.snapshot(), (0, b"".as_slice()));
        assert!(window.is_empty());
    }

    #[test]
    fn oversized_push_keeps_trailing_bytes() {
        let mut window = ContextWindow::new(4);
        window.push(b"ABCDEFG");
        assert_eq!(window.snapshot(), (3, b"DEFG".as_slice()));
    }

    #[test]
    fn oversized_push_accounts_for_existing_content() {
        let mut window = ContextWindow::new(4);
        window.push(b"XY");
        window.push(b"ABCDEFG");
        // 2 retained + 7 pushed, 4 kept: 5 bytes evicted in total.
        assert_eq!(window.snapshot(), (5, b"DEFG".as_slice()));
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut window = ContextWindow::new(8);
        window.push(b"abcdefghij");
        let first = {
            let (offset, bytes) = window.snapshot();
            (offset, bytes.to_vec())
        };
        let second = {
            let (offset, bytes) = window.snapshot();
            (offset, bytes.to_vec())
        };
        assert_eq!(first, second);
    }

    #[test]
    fn empty_push_is_a_no_op() {
        let mut window = ContextWindow::new(8);
        window.push(b"abc");
        window.push(b"");
        assert_eq!(window.snapshot(), (0, b"abc".as_slice()));
    }
}
