//! Priority-ordered rule tables
//!
//! A derived field is described by a list of named `(predicate, value)` rules.
//! Rules are tried top to bottom and the first matching rule produces the
//! value; when nothing matches the field is missing.

use std::fmt;

use log::trace;

/// A single named rule
pub struct Rule<I: 'static, T: 'static> {
    /// Name reported in trace logs
    pub name: &'static str,
    /// Whether the rule applies
    pub predicate: fn(&I) -> bool,
    /// Value produced when it does
    pub value: fn(&I) -> T,
}

/// An ordered list of rules for one derived field
pub struct RuleTable<I: 'static, T: 'static> {
    field: &'static str,
    rules: &'static [Rule<I, T>],
}

impl<I: 'static, T: 'static> RuleTable<I, T> {
    /// Create a rule table for `field`
    #[must_use]
    pub const fn new(field: &'static str, rules: &'static [Rule<I, T>]) -> Self {
        Self { field, rules }
    }

    /// The derived field this table produces
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// The first rule whose predicate holds for `input`
    pub fn first_match(&self, input: &I) -> Option<&'static Rule<I, T>> {
        self.rules.iter().find(|rule| (rule.predicate)(input))
    }

    /// Evaluate the table; `None` when no rule matches
    pub fn evaluate(&self, input: &I) -> Option<T> {
        match self.first_match(input) {
            Some(rule) => {
                trace!("{}: rule '{}' matched", self.field, rule.name);
                Some((rule.value)(input))
            }
            None => {
                trace!("{}: no rule matched", self.field);
                None
            }
        }
    }

    /// Evaluate the table, falling back to `default` when no rule matches
    pub fn evaluate_or(&self, input: &I, default: T) -> T {
        self.evaluate(input).unwrap_or(default)
    }
}

impl<I: 'static, T: 'static> fmt::Debug for RuleTable<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTable")
            .field("field", &self.field)
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SIGN_RULES: [Rule<i32, &str>; 3] = [
        Rule {
            name: "negative",
            predicate: |v| *v < 0,
            value: |_| "negative",
        },
        Rule {
            name: "small",
            predicate: |v| *v < 10,
            value: |_| "small",
        },
        Rule {
            name: "even",
            predicate: |v| v % 2 == 0,
            value: |_| "even",
        },
    ];

    static SIGN: RuleTable<i32, &str> = RuleTable::new("sign", &SIGN_RULES);

    #[test]
    fn test_first_match_wins() {
        // -2 is negative, small and even; only the first rule counts
        assert_eq!(SIGN.evaluate(&-2), Some("negative"));
        assert_eq!(SIGN.evaluate(&4), Some("small"));
        assert_eq!(SIGN.evaluate(&12), Some("even"));
    }

    #[test]
    fn test_no_match_is_missing() {
        assert_eq!(SIGN.evaluate(&11), None);
        assert_eq!(SIGN.evaluate_or(&11, "other"), "other");
    }

    #[test]
    fn test_rule_names_in_order() {
        assert_eq!(SIGN.field(), "sign");
        assert_eq!(
            SIGN.rule_names().collect::<Vec<_>>(),
            vec!["negative", "small", "even"]
        );
        assert_eq!(SIGN.first_match(&3).map(|r| r.name), Some("small"));
    }
}
