//! Pattern Matcher Module
//!
//! Key enumeration patterns: a limited glob syntax where `*` matches zero or
//! more characters, anchored at both ends of the key.

// == Key Pattern ==
/// An anchored glob over the keyspace. `*` is the only wildcard; every other
/// character matches literally.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    raw: String,
    /// Literal runs between wildcards, in order
    segments: Vec<String>,
}

impl KeyPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            segments: pattern.split('*').map(str::to_string).collect(),
        }
    }

    /// The pattern as originally written.
    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// A pattern without wildcards matches exactly one key.
    pub fn is_exact(&self) -> bool {
        !self.raw.contains('*')
    }

    // == Matches ==
    /// Full-string match: the first literal run anchors at the start, the
    /// last anchors at the end, and the runs in between must occur in order.
    pub fn matches(&self, key: &str) -> bool {
        if self.is_exact() {
            return key == self.raw;
        }

        let first = &self.segments[0];
        if !key.starts_with(first.as_str()) {
            return false;
        }
        let mut pos = first.len();

        let last_idx = self.segments.len() - 1;
        for segment in &self.segments[1..last_idx] {
            if segment.is_empty() {
                continue;
            }
            match key[pos..].find(segment.as_str()) {
                Some(offset) => pos += offset + segment.len(),
                None => return false,
            }
        }

        let last = &self.segments[last_idx];
        if last.is_empty() {
            return true;
        }
        key.len() >= pos + last.len() && key.ends_with(last.as_str())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern_matches_only_itself() {
        let pattern = KeyPattern::new("user:1");
        assert!(pattern.is_exact());
        assert!(pattern.matches("user:1"));
        assert!(!pattern.matches("user:12"));
        assert!(!pattern.matches("xuser:1"));
    }

    #[test]
    fn test_trailing_wildcard() {
        let pattern = KeyPattern::new("user:*");
        assert!(pattern.matches("user:1"));
        assert!(pattern.matches("user:"));
        assert!(!pattern.matches("post:1"));
        assert!(!pattern.matches("xuser:1"));
    }

    #[test]
    fn test_leading_wildcard() {
        let pattern = KeyPattern::new("*:1");
        assert!(pattern.matches("user:1"));
        assert!(pattern.matches(":1"));
        assert!(!pattern.matches("user:2"));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let pattern = KeyPattern::new("*");
        assert!(pattern.matches(""));
        assert!(pattern.matches("anything"));
    }

    #[test]
    fn test_inner_wildcard() {
        let pattern = KeyPattern::new("user:*:profile");
        assert!(pattern.matches("user:1:profile"));
        assert!(pattern.matches("user::profile"));
        assert!(!pattern.matches("user:1:settings"));
        assert!(!pattern.matches("user:1:profilex"));
    }

    #[test]
    fn test_multiple_wildcards() {
        let pattern = KeyPattern::new("a*b*c");
        assert!(pattern.matches("abc"));
        assert!(pattern.matches("aXbYc"));
        assert!(pattern.matches("abbcc"));
        assert!(!pattern.matches("ab"));
        assert!(!pattern.matches("acb"));
    }

    #[test]
    fn test_suffix_cannot_reuse_consumed_prefix() {
        // the 'a' suffix needs its own character after the anchored prefix
        let pattern = KeyPattern::new("a*a");
        assert!(!pattern.matches("a"));
        assert!(pattern.matches("aa"));
        assert!(pattern.matches("aba"));
    }

    #[test]
    fn test_empty_pattern_matches_empty_key() {
        let pattern = KeyPattern::new("");
        assert!(pattern.matches(""));
        assert!(!pattern.matches("a"));
    }

    #[test]
    fn test_consecutive_wildcards_collapse() {
        let pattern = KeyPattern::new("a**b");
        assert!(pattern.matches("ab"));
        assert!(pattern.matches("aXb"));
        assert!(!pattern.matches("a"));
    }
}
