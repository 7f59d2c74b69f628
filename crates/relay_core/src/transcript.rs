//! Transcript aggregation

/// Ordered accumulation of delta fragments into the session's answer
///
/// The final text is the exact concatenation of every pushed fragment, in
/// push order. Live mode pushes each fragment before forwarding it, so the
/// transcript doubles as the post-hoc record of what was sent.
#[derive(Debug, Default)]
pub struct Transcript {
    text: String,
    fragments: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    /// Whether no usable text has been collected
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of fragments pushed so far
    pub const fn fragments(&self) -> usize {
        self.fragments
    }

    /// Consume the transcript, yielding the full text
    pub fn into_text(self) -> String {
        self.text
    }
}
