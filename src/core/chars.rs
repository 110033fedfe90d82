//! Character classes used by the state machine
//!
//! Name classes follow the XML 1.0 Fifth Edition productions:
//! - NameStartChar: `:` | `_` | letters | a set of Unicode ranges
//! - NameChar: NameStartChar | `-` | `.` | digits | U+00B7 | combining ranges

/// XML whitespace: space, tab, line feed, carriage return
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Attribute value delimiters
#[inline]
pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Characters allowed inside an entity reference between `&` and `;`
#[inline]
pub fn is_entity_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '#'
}

/// Characters terminating an unquoted attribute value
#[inline]
pub fn is_attrib_end(c: char) -> bool {
    is_whitespace(c) || c == '>'
}

/// XML NameStartChar
#[inline]
pub fn is_name_start_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic() || c == ':' || c == '_';
    }
    is_name_start_codepoint(c as u32)
}

/// XML NameChar
#[inline]
pub fn is_name_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '.');
    }
    let cp = c as u32;
    is_name_start_codepoint(cp)
        || cp == 0xB7
        || matches!(cp, 0x0300..=0x036F | 0x203F..=0x2040)
}

fn is_name_start_codepoint(cp: u32) -> bool {
    matches!(cp,
        0xC0..=0xD6 | 0xD8..=0xF6 | 0xF8..=0x2FF |
        0x370..=0x37D | 0x37F..=0x1FFF | 0x200C..=0x200D |
        0x2070..=0x218F | 0x2C00..=0x2FEF | 0x3001..=0xD7FF |
        0xF900..=0xFDCF | 0xFDF0..=0xFFFD | 0x10000..=0xEFFFF
    )
}
