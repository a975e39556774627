//! Decoding options.

/// Options for decoding PDF documents into page structures.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,
}

impl DecodeOptions {
    /// Create new decode options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (unreadable pages decode as blank pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// Error handling mode during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// An unreadable page fails the whole document
    #[default]
    Strict,
    /// Unreadable pages are logged and kept as pages without text
    Lenient,
}
