//! Pretty-printing of rewrite rule lists.
//!
//! Rules arrive as strings of the form `"lhs ==> rhs"`. When a list holds
//! both directions of a rule, the pair is shown once as `"lhs <=> rhs"`.

use std::fmt;

use crate::percent::MISSING;

/// Separator between the two sides of a directed rule.
pub const DIRECTED: &str = " ==> ";

/// Separator between the two sides of a bidirectional rule.
pub const BIDIRECTIONAL: &str = " <=> ";

/// Line-break marker placed between formatted rules.
pub const LINE_BREAK: &str = "<br />";

/// A rule as it will be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrettyRule<'a> {
    /// `lhs ==> rhs`
    Directed { lhs: &'a str, rhs: &'a str },
    /// `lhs <=> rhs`, merged from a rule and its reverse
    Bidirectional { lhs: &'a str, rhs: &'a str },
    /// A string without a `==>` arrow, shown verbatim
    Opaque(&'a str),
}

impl<'a> PrettyRule<'a> {
    /// Split a rule string at its first arrow
    pub fn parse(rule: &'a str) -> Self {
        match rule.split_once(DIRECTED) {
            Some((lhs, rhs)) => PrettyRule::Directed { lhs, rhs },
            None => PrettyRule::Opaque(rule),
        }
    }

    pub fn is_bidirectional(&self) -> bool {
        matches!(self, PrettyRule::Bidirectional { .. })
    }
}

impl fmt::Display for PrettyRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrettyRule::Directed { lhs, rhs } => write!(f, "{}{}{}", lhs, DIRECTED, rhs),
            PrettyRule::Bidirectional { lhs, rhs } => {
                write!(f, "{}{}{}", lhs, BIDIRECTIONAL, rhs)
            }
            PrettyRule::Opaque(rule) => f.write_str(rule),
        }
    }
}

/// Collapse rule/reverse pairs into bidirectional rules.
///
/// Each input rule appears exactly once in the output: either on its own
/// or as the second half of a merged pair. Output order follows the first
/// member of each pair. A self-loop `a ==> a` is its own reverse: it takes
/// a later copy of itself along when there is one, and shows as `a <=> a`
/// either way.
pub fn merge_rules<S: AsRef<str>>(rules: &[S]) -> Vec<PrettyRule<'_>> {
    let texts: Vec<&str> = rules.iter().map(AsRef::as_ref).collect();
    let mut consumed = vec![false; texts.len()];
    let mut merged = Vec::with_capacity(texts.len());

    for (i, &text) in texts.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let pretty = match PrettyRule::parse(text) {
            PrettyRule::Directed { lhs, rhs } => {
                let reverse = format!("{}{}{}", rhs, DIRECTED, lhs);
                let partner =
                    (i + 1..texts.len()).find(|&j| !consumed[j] && texts[j] == reverse);
                match partner {
                    Some(j) => {
                        consumed[j] = true;
                        tracing::trace!(rule = text, "merged with reverse");
                        PrettyRule::Bidirectional { lhs, rhs }
                    }
                    None if lhs == rhs => PrettyRule::Bidirectional { lhs, rhs },
                    None => PrettyRule::Directed { lhs, rhs },
                }
            }
            opaque => opaque,
        };
        merged.push(pretty);
    }

    tracing::debug!(
        rules = texts.len(),
        lines = merged.len(),
        "merged rule list"
    );
    merged
}

/// Format a rule list for a table cell, one rule per `<br />` line.
///
/// Absent or empty lists give `"-"`.
pub fn format_rules<S: AsRef<str>>(rules: Option<&[S]>) -> String {
    format_rules_with(rules, LINE_BREAK)
}

/// Same as [`format_rules`] with a custom line separator.
pub fn format_rules_with<S: AsRef<str>>(rules: Option<&[S]>, separator: &str) -> String {
    match rules {
        Some(rules) if !rules.is_empty() => merge_rules(rules)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
        _ => MISSING.to_string(),
    }
}
