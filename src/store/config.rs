//! Limits applied when decoding untrusted bytes.

/// Decoder configuration.
///
/// Serialized graphs usually come from files, so their shape is not trusted:
/// the depth limit bounds recursion and the name limit bounds a single
/// allocation. Violations are reported as `InvalidEncoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    pub max_depth: usize,
    pub max_name_len: usize,
}

impl DecodeConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 4096;
    pub const DEFAULT_MAX_NAME_LEN: usize = 64 * 1024;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_name_len: Self::DEFAULT_MAX_NAME_LEN,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self { Self::new() }
}
