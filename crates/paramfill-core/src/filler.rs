//! Name based heuristics that turn a field name into a plausible value.
//!
//! The resolver only knows that a parameter is a `string` or a `file`; the
//! [`FormFiller`] decides what goes in it, usually by looking at the field
//! name (`email`, `zip_code`, `avatarUrl`, ...).

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::NamedFile;

/// Produces values for string and file parameters.
pub trait FormFiller {
    /// A plausible string for a field called `field_name`.
    fn fill_string(&self, field_name: &str) -> String;

    /// A file payload for a field called `field_name`, shaped after `example_file_name`.
    fn fill_file(&self, field_name: &str, example_file_name: &str) -> NamedFile;
}

/// Value used when no rule matches the field name.
pub const FALLBACK_STRING: &str = "paramfill";

// Rules are tried in order against the lower-cased field name.
static SMART_FILL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"mail", "paramfill@example.com"),
        (r"pass(word|wd)?|pwd|secret", "Passw0rd!"),
        (r"file_?name", "cat.png"),
        (r"(first|given)_?name", "John"),
        (r"(last|family|sur)_?name", "Smith"),
        (r"user|login|nick", "john.smith"),
        (r"company|organi[sz]ation", "Example Inc."),
        (r"name|title", "John Smith"),
        (r"phone|mobile|^tel|fax", "5552368"),
        (r"url|uri|link|href|website|homepage", "http://example.com/"),
        (r"domain|host", "example.com"),
        (r"^ip($|[^a-z]|addr|v[46])|[^a-z]ip$", "127.0.0.1"),
        (r"zip|postal|postcode", "90210"),
        (r"city|town", "Buenos Aires"),
        (r"country", "Argentina"),
        (r"street|address", "Main Street 123"),
        (r"uuid|guid", "6ba7b810-9dad-11d1-80b4-00c04fd430c8"),
        (r"birth|date|dob", "2017-06-30"),
        (r"token|key", "6f1ed002ab5595859014ebf0951522d9"),
        (r"lang|locale", "en"),
        (r"currency", "USD"),
        (r"colou?r", "red"),
        (r"comment|message|description|text|body|content", "Hello world"),
        (
            r"id$|_id|^id|num|count|age|amount|qty|quantity|size|limit|offset|page|year",
            "56",
        ),
    ]
    .into_iter()
    .map(|(pattern, value)| {
        (
            Regex::new(pattern).expect("smart fill patterns are valid"),
            value,
        )
    })
    .collect()
});

/// The default [`FormFiller`], driven by a fixed table of name patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartFiller;

impl SmartFiller {
    pub fn new() -> Self {
        Self
    }
}

impl FormFiller for SmartFiller {
    fn fill_string(&self, field_name: &str) -> String {
        let name = field_name.to_lowercase();
        SMART_FILL_RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(&name))
            .map(|(_, value)| *value)
            .unwrap_or(FALLBACK_STRING)
            .to_string()
    }

    fn fill_file(&self, field_name: &str, example_file_name: &str) -> NamedFile {
        let extension = Path::new(example_file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let (content_type, content) = match extension.as_str() {
            "png" => ("image/png", PNG_HEADER.to_vec()),
            "gif" => ("image/gif", b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec()),
            "jpg" | "jpeg" => ("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9]),
            _ => (
                "text/plain",
                format!("{}\n", self.fill_string(field_name)).into_bytes(),
            ),
        };

        NamedFile::new(example_file_name, content_type, content)
    }
}

/// PNG signature followed by an IHDR chunk for a 1x1 RGBA image.
const PNG_HEADER: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R', // IHDR length and type
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // width, height
    0x08, 0x06, 0x00, 0x00, 0x00, // depth, color type, compression, filter, interlace
    0x1F, 0x15, 0xC4, 0x89, // crc
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_string_by_name() {
        let filler = SmartFiller::new();
        assert_eq!(filler.fill_string("email"), "paramfill@example.com");
        assert_eq!(filler.fill_string("userEmail"), "paramfill@example.com");
        assert_eq!(filler.fill_string("first_name"), "John");
        assert_eq!(filler.fill_string("username"), "john.smith");
        assert_eq!(filler.fill_string("password"), "Passw0rd!");
        assert_eq!(filler.fill_string("avatarUrl"), "http://example.com/");
        assert_eq!(filler.fill_string("zip"), "90210");
        assert_eq!(filler.fill_string("ip"), "127.0.0.1");
        assert_eq!(filler.fill_string("petId"), "56");
    }

    #[test]
    fn test_fill_string_fallback() {
        let filler = SmartFiller::new();
        assert_eq!(filler.fill_string("unknown"), FALLBACK_STRING);
        assert_eq!(filler.fill_string(""), FALLBACK_STRING);
    }

    #[test]
    fn test_description_is_not_an_ip() {
        assert_eq!(SmartFiller.fill_string("description"), "Hello world");
    }

    #[test]
    fn test_fill_file_png() {
        let file = SmartFiller.fill_file("avatar", "cat.png");
        assert_eq!(file.file_name, "cat.png");
        assert_eq!(file.content_type, "image/png");
        assert!(file.content.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_fill_file_text() {
        let file = SmartFiller.fill_file("comment", "notes.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.content, b"Hello world\n".to_vec());
    }
}
