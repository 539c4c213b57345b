use std::collections::VecDeque;

/// Line framer for incrementally delivered byte chunks.
///
/// Bytes are held in a VecDeque until a `\n` arrives, so a line split across
/// chunk boundaries is reassembled before decoding. UTF-8 continuation bytes
/// are always >= 0x80, so scanning for the newline byte can never land inside
/// a multi-byte scalar.
pub struct LineBuffer {
    buffer: VecDeque<u8>,
}

impl LineBuffer {
    /// Create a new buffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to `\n`) from buffer, trimmed of surrounding
    /// whitespace. Returns None until a complete line is available.
    ///
    /// Invalid UTF-8 degrades to replacement characters rather than failing;
    /// downstream frame decoding skips lines it cannot classify.
    pub fn next_line(&mut self) -> Option<String> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;

        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        Some(String::from_utf8_lossy(&line_bytes).trim().to_string())
    }

    /// Current buffer size
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
