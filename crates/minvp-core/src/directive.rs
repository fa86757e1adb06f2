//! Viewport Directive Parsing
//!
//! The `content` attribute of a viewport meta tag is a comma-separated
//! list of `key=value` pairs:
//!
//! ```text
//! width=device-width, min-width=400, initial-scale=1
//! ```
//!
//! Parsing keeps byte spans into the source string so a single value can
//! be rewritten while every other byte (ordering, spacing, unknown keys)
//! survives untouched.

use std::ops::Range;
use thiserror::Error;

/// Errors reading the minimum width directive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("No {key} property found in the content of the meta[name=viewport] tag. Minimum viewport width cannot be set.")]
    MissingDirective { key: String },

    #[error("Minimum viewport width cannot be set to a non-numeric value ({key}={value:?}).")]
    NonNumeric { key: String, value: String },

    #[error("Minimum viewport width must be a positive integer ({key}={value}).")]
    OutOfRange { key: String, value: String },
}

/// A single `key=value` pair from a directive string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Trimmed key
    pub key: &'a str,
    /// Trimmed value, `None` for a bare key with no `=`
    pub value: Option<&'a str>,
    /// Byte offset just past the key in the source
    key_end: usize,
    /// Byte span of the trimmed value in the source
    value_span: Option<Range<usize>>,
}

impl<'a> Directive<'a> {
    /// Parse one comma-delimited segment located at `offset` in the source.
    fn parse(segment: &'a str, offset: usize) -> Option<Self> {
        let (raw_key, rest) = match segment.find('=') {
            Some(eq) => (&segment[..eq], Some((eq + 1, &segment[eq + 1..]))),
            None => (segment, None),
        };

        let key = raw_key.trim();
        if key.is_empty() {
            return None;
        }
        let key_start = raw_key.len() - raw_key.trim_start().len();
        let key_end = offset + key_start + key.len();

        let (value, value_span) = match rest {
            Some((value_offset, raw_value)) => {
                let value = raw_value.trim();
                let start = offset + value_offset + (raw_value.len() - raw_value.trim_start().len());
                (Some(value), Some(start..start + value.len()))
            }
            None => (None, None),
        };

        Some(Self {
            key,
            value,
            key_end,
            value_span,
        })
    }
}

/// Parsed view of a viewport `content` string.
#[derive(Debug, Clone)]
pub struct ViewportContent<'a> {
    source: &'a str,
    directives: Vec<Directive<'a>>,
}

impl<'a> ViewportContent<'a> {
    /// Split a directive string into its pairs, in source order.
    pub fn parse(source: &'a str) -> Self {
        let mut directives = Vec::new();
        let mut offset = 0;

        for segment in source.split(',') {
            if let Some(directive) = Directive::parse(segment, offset) {
                directives.push(directive);
            }
            // Skip the segment and its comma
            offset += segment.len() + 1;
        }

        Self { source, directives }
    }

    /// The string this view was parsed from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// All pairs in source order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive<'a>> {
        self.directives.iter()
    }

    /// First pair whose key matches exactly (case-sensitive).
    pub fn find(&self, key: &str) -> Option<&Directive<'a>> {
        self.directives.iter().find(|d| d.key == key)
    }

    /// Value of the first pair with this key.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.find(key).and_then(|d| d.value)
    }

    /// Rewrite the value of the first pair with this key.
    ///
    /// Returns `None` when no such pair exists. A bare key gains `=value`.
    pub fn replace_value(&self, key: &str, value: &str) -> Option<String> {
        let directive = self.find(key)?;
        let mut out = String::with_capacity(self.source.len() + value.len());

        match &directive.value_span {
            Some(span) => {
                out.push_str(&self.source[..span.start]);
                out.push_str(value);
                out.push_str(&self.source[span.end..]);
            }
            None => {
                out.push_str(&self.source[..directive.key_end]);
                out.push('=');
                out.push_str(value);
                out.push_str(&self.source[directive.key_end..]);
            }
        }

        Some(out)
    }
}

/// Read the minimum width from a directive string.
///
/// The value is read like a browser `parseInt`: leading digits count,
/// trailing units such as `px` are ignored.
pub fn parse_min_width(content: &str, key: &str) -> Result<u32, ConfigurationError> {
    let parsed = ViewportContent::parse(content);
    let directive = parsed
        .find(key)
        .ok_or_else(|| ConfigurationError::MissingDirective { key: key.to_string() })?;

    let raw = directive.value.unwrap_or("");
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();

    if digits == 0 {
        return Err(ConfigurationError::NonNumeric {
            key: key.to_string(),
            value: raw.to_string(),
        });
    }

    match unsigned[..digits].parse::<u32>() {
        Ok(width) if width > 0 && !negative => Ok(width),
        _ => Err(ConfigurationError::OutOfRange {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Replace the `width_key` value with `min_width`, keeping everything else.
pub fn rewrite_width(content: &str, width_key: &str, min_width: u32) -> Option<String> {
    ViewportContent::parse(content).replace_value(width_key, &min_width.to_string())
}
