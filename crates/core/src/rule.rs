//! Substitution rules
//!
//! A rule maps an integer to a replacement string, or to the empty string when it
//! doesn't apply. Rules are stateless and immutable once built.

/// A rule applied to each number of a generated sequence.
pub trait Rule {
    /// Returns the replacement for `n`, or `""` if the rule doesn't match.
    fn apply(&self, n: u64) -> &str;
}

impl<R: Rule + ?Sized> Rule for &R {
    fn apply(&self, n: u64) -> &str {
        (**self).apply(n)
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn apply(&self, n: u64) -> &str {
        (**self).apply(n)
    }
}

/// Replaces every exact multiple of `divisor` with `replacement`.
///
/// Example: `MultipleRule::new(3, "fizz")` replaces 3, 6, 9, ... with `"fizz"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleRule {
    divisor: u64,
    replacement: String,
}

impl MultipleRule {
    /// The divisor must be positive. Callers validate it before building the rule.
    pub fn new(divisor: u64, replacement: impl Into<String>) -> Self {
        Self {
            divisor,
            replacement: replacement.into(),
        }
    }

    pub fn divisor(&self) -> u64 {
        self.divisor
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl Rule for MultipleRule {
    fn apply(&self, n: u64) -> &str {
        // A zero divisor never matches instead of panicking on `n % 0`.
        match n.checked_rem(self.divisor) {
            Some(0) => &self.replacement,
            _ => "",
        }
    }
}
