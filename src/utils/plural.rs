//! Counted nouns for log lines.

use std::fmt;

/// A count and the noun it counts, displayed as `3 assets` or `1 asset`.
#[derive(Debug, Clone, Copy)]
pub struct Counted<'a> {
    count: usize,
    noun: &'a str,
}

impl fmt::Display for Counted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            1 => write!(f, "1 {}", self.noun),
            n => write!(f, "{n} {}s", self.noun),
        }
    }
}

pub fn plural_count(count: usize, noun: &str) -> Counted<'_> {
    Counted { count, noun }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "asset").to_string(), "0 assets");
        assert_eq!(plural_count(1, "asset").to_string(), "1 asset");
        assert_eq!(plural_count(3, "extra page").to_string(), "3 extra pages");
    }

    #[test]
    fn test_counted_in_format_args() {
        let line = format!("copied {} and {}", plural_count(2, "asset"), plural_count(1, "page"));
        assert_eq!(line, "copied 2 assets and 1 page");
    }
}
