//! The handful of display knobs the command line can toggle. The core
//! stores and validates these values; it never uses them to render
//! anything — rendering itself is out of scope for this crate.

/// Byte order used by the (external) byte-value inspector when decoding
/// integers/floats near the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "big" | "be" | "b" => Some(Self::Big),
            "little" | "le" | "l" => Some(Self::Little),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Hex columns per row.
    pub cols: usize,
    pub inspector_enabled: bool,
    pub inspector_byte_order: ByteOrder,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            cols: 16,
            inspector_enabled: false,
            inspector_byte_order: ByteOrder::Big,
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
