//! Parser configuration

/// Default per-buffer limit, in UTF-8 bytes
pub const DEFAULT_MAX_BUFFER_LENGTH: usize = 64 * 1024;

/// Options fixed at parser construction
///
/// Built with chained setters:
///
/// ```
/// use rustysax::ParserOptions;
///
/// let opts = ParserOptions::strict().xmlns(true).trim(true);
/// assert!(opts.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// XML well-formedness enforcement; loose mode recovers HTML-style input
    pub strict: bool,
    /// Track namespace scopes and report qualified names
    pub xmlns: bool,
    /// Trim surrounding whitespace from text and comments
    pub trim: bool,
    /// Collapse whitespace runs in text and comments to a single space
    pub normalize: bool,
    /// Loose mode folds tag and attribute names to lower case instead of upper case
    pub lowercase: bool,
    /// Disable raw `<script>` capture in loose mode
    pub noscript: bool,
    /// Track line/column/offset for error reporting
    pub position: bool,
    /// Per-buffer limit in UTF-8 bytes; `None` disables the buffer guard
    pub max_buffer_length: Option<usize>,
}

impl ParserOptions {
    /// Loose (HTML-like) defaults
    pub fn loose() -> Self {
        Self::default()
    }

    /// Strict (XML) defaults
    pub fn strict() -> Self {
        ParserOptions {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn xmlns(mut self, xmlns: bool) -> Self {
        self.xmlns = xmlns;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn noscript(mut self, noscript: bool) -> Self {
        self.noscript = noscript;
        self
    }

    pub fn position(mut self, position: bool) -> Self {
        self.position = position;
        self
    }

    pub fn max_buffer_length(mut self, max: Option<usize>) -> Self {
        self.max_buffer_length = max;
        self
    }

    /// Whether `<script>` bodies are captured raw
    pub(crate) fn captures_script(&self) -> bool {
        !self.strict && !self.noscript
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict: false,
            xmlns: false,
            trim: false,
            normalize: false,
            lowercase: false,
            noscript: false,
            position: true,
            max_buffer_length: Some(DEFAULT_MAX_BUFFER_LENGTH),
        }
    }
}
