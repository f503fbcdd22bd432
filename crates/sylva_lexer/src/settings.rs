//! Scanner configuration.

/// Operator characters recognized when no custom set is supplied.
pub const DEFAULT_OPERATOR_CHARS: &str = "[]<>=&|,.-+*/;?%#!$";

/// Default cap on group nesting (`(`/`{` plus implicit line expressions).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Runtime configuration for [`parse_with`](crate::parse_with).
///
/// Operator membership is a 256-entry byte table so the scanner's hot loop
/// stays a single indexed load. Only ASCII bytes can be operators.
#[derive(Clone, Debug)]
pub struct ScanSettings {
    operators: [bool; 256],
    /// Prefix starting a comment that runs to end of line.
    pub line_comment: Option<String>,
    /// Start/end markers of a block comment.
    pub block_comment: Option<(String, String)>,
    /// Maximum nesting depth before the scanner fails with `TooDeep`.
    pub max_depth: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            operators: build_table(DEFAULT_OPERATOR_CHARS),
            line_comment: Some("//".to_string()),
            block_comment: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScanSettings {
    pub fn new() -> Self {
        ScanSettings::default()
    }

    /// Replace the operator character set.
    #[must_use]
    pub fn with_operator_chars(mut self, chars: &str) -> Self {
        self.operators = build_table(chars);
        self
    }

    /// Set or clear the line comment prefix.
    #[must_use]
    pub fn with_line_comment(mut self, prefix: Option<&str>) -> Self {
        self.line_comment = prefix.map(str::to_string);
        self
    }

    /// Set the block comment start/end markers.
    #[must_use]
    pub fn with_block_comment(mut self, start: &str, end: &str) -> Self {
        self.block_comment = Some((start.to_string(), end.to_string()));
        self
    }

    /// Set the nesting depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// True when `byte` is an operator character.
    #[inline]
    pub fn is_operator(&self, byte: u8) -> bool {
        self.operators[byte as usize]
    }
}

fn build_table(chars: &str) -> [bool; 256] {
    let mut table = [false; 256];
    for b in chars.bytes() {
        table[b as usize] = true;
    }
    table
}
