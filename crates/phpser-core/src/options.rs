//! Decoder configuration.

/// Default nesting limit for arrays and objects.
///
/// The decoder recurses once per level, so the limit has to fit a 2 MiB
/// thread stack in a debug build. serde_json uses the same value.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default cap on the number of values back references may copy in total.
pub const DEFAULT_MAX_REFERENCE_NODES: usize = 1_000_000;

/// Knobs for [`decode_with`](crate::decode_with) and
/// [`PhpSerializer`](crate::PhpSerializer).
///
/// ```
/// use phpser_core::DecodeOptions;
/// let opts = DecodeOptions::default().max_depth(64).allow_trailing_data(true);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting of arrays and objects. `0` means unlimited, in which
    /// case the caller's stack is the only bound.
    pub max_depth: usize,
    /// Ignore bytes after the root value instead of failing.
    pub allow_trailing_data: bool,
    /// Resolve `r:`/`R:` back references. When off they are rejected.
    pub allow_references: bool,
    /// Total number of values that back references may copy into the
    /// result. Each `r:`/`R:` copies its whole target, so chained references
    /// grow exponentially without this. `0` means unlimited.
    pub max_reference_nodes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_data: false,
            allow_references: true,
            max_reference_nodes: DEFAULT_MAX_REFERENCE_NODES,
        }
    }
}

impl DecodeOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn allow_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing_data = allow;
        self
    }

    pub fn allow_references(mut self, allow: bool) -> Self {
        self.allow_references = allow;
        self
    }

    pub fn max_reference_nodes(mut self, max_nodes: usize) -> Self {
        self.max_reference_nodes = max_nodes;
        self
    }
}
