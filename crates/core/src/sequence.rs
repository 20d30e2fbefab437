//! Sequence generation
//!
//! Applies an ordered list of rules to every integer of `1..=limit`. Matching
//! replacements are concatenated in rule order; a number no rule matches is
//! rendered as its decimal representation.
//!
//! Complexity: O(limit × rules).

use serde::Serialize;

use crate::rule::Rule;

/// Generate the sequence for `1..=limit`.
///
/// Element `i` (0-based) corresponds to the integer `i + 1`, so the output length
/// always equals `limit`. A `limit` of 0 yields an empty sequence.
pub fn generate<R: Rule>(rules: &[R], limit: u64) -> Vec<String> {
    (1..=limit).map(|n| apply_rules(rules, n)).collect()
}

/// Apply every rule to `n`, falling back to the number itself.
fn apply_rules<R: Rule>(rules: &[R], n: u64) -> String {
    let output: String = rules.iter().map(|rule| rule.apply(n)).collect();

    if output.is_empty() {
        n.to_string()
    } else {
        output
    }
}

/// Generated sequence, serialized as `{"result": [...], "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FizzBuzzResult {
    #[serde(rename = "result")]
    items: Vec<String>,
    count: usize,
}

impl FizzBuzzResult {
    pub fn new(items: Vec<String>) -> Self {
        let count = items.len();
        Self { items, count }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::MultipleRule;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classic_fizzbuzz() {
        let rules = [MultipleRule::new(3, "fizz"), MultipleRule::new(5, "buzz")];

        let expected = strings(&[
            "1", "2", "fizz", "4", "buzz", "fizz", "7", "8", "fizz", "buzz", "11", "fizz", "13",
            "14", "fizzbuzz",
        ]);

        assert_eq!(generate(&rules, 15), expected);
    }

    #[test]
    fn test_custom_parameters() {
        let rules = [MultipleRule::new(2, "foo"), MultipleRule::new(3, "bar")];

        assert_eq!(
            generate(&rules, 6),
            strings(&["1", "foo", "bar", "foo", "5", "foobar"])
        );
    }

    #[test]
    fn test_single_rule() {
        let rules = [MultipleRule::new(2, "even")];

        assert_eq!(
            generate(&rules, 5),
            strings(&["1", "even", "3", "even", "5"])
        );
    }

    #[test]
    fn test_limit_one() {
        let rules = [MultipleRule::new(1, "all")];

        assert_eq!(generate(&rules, 1), strings(&["all"]));
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let rules = [MultipleRule::new(3, "fizz")];

        assert!(generate(&rules, 0).is_empty());
    }

    #[test]
    fn test_rule_order_decides_concatenation() {
        // The larger divisor comes first, so its replacement leads.
        let rules = [MultipleRule::new(5, "buzz"), MultipleRule::new(3, "fizz")];

        assert_eq!(generate(&rules, 15)[14], "buzzfizz");
    }

    #[test]
    fn test_no_rules_yields_numbers() {
        let rules: [MultipleRule; 0] = [];

        assert_eq!(generate(&rules, 3), strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_length_matches_limit() {
        let rules = [MultipleRule::new(3, "fizz"), MultipleRule::new(5, "buzz")];

        for limit in [1, 2, 10, 99, 1000] {
            assert_eq!(generate(&rules, limit).len() as u64, limit);
        }
    }

    #[test]
    fn test_boxed_trait_objects() {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(MultipleRule::new(2, "foo")),
            Box::new(MultipleRule::new(3, "bar")),
        ];

        assert_eq!(generate(&rules, 6)[5], "foobar");
    }

    #[test]
    fn test_result_serializes_with_count() {
        let result = FizzBuzzResult::new(strings(&["1", "2", "fizz"]));

        assert_eq!(result.count(), 3);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"result": ["1", "2", "fizz"], "count": 3})
        );
    }
}
