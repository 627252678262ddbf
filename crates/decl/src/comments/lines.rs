//! [`Comments`]: the normalised comment lines of one declaration, and the
//! query helpers used to pull directives out of them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::store::CommentGroup;
use crate::error::DeclError;

/// Ordered comment lines attached to one declaration.
///
/// Lines are kept as written (`// …` markers included) with trailing line
/// terminators removed. Empty is a valid, common state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(Vec<String>);

impl Comments {
    #[must_use]
    pub const fn new(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Flatten recorded groups, skipping absent ones.
    pub(crate) fn from_groups(groups: &[Option<CommentGroup>]) -> Self {
        groups
            .iter()
            .flatten()
            .flat_map(CommentGroup::list)
            .map(|line| line.trim_end_matches(['\n', '\r']).to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Lines accepted by `filter`, or every line when `filter` is `None`.
    #[must_use]
    pub fn lines(&self, filter: Option<&dyn Fn(&str) -> bool>) -> Vec<&str> {
        self.iter().filter(|line| filter.is_none_or(|f| f(line))).collect()
    }

    /// New `Comments` with the lines for which `pred` holds, order kept.
    #[must_use]
    pub fn filter(&self, pred: impl Fn(&str) -> bool) -> Self {
        self.iter().filter(|line| pred(line)).map(str::to_string).collect()
    }

    #[must_use]
    pub fn filter_prefix(&self, prefix: &str) -> Self {
        self.filter(|line| line.starts_with(prefix))
    }

    /// Remainder produced by the first line `extractor` accepts.
    ///
    /// ```
    /// use decl::{Comments, prefix};
    ///
    /// let comments = Comments::new(vec![
    ///     "// Book is a book.".to_string(),
    ///     "//go:generate stringer".to_string(),
    ///     "//go:generate mockgen".to_string(),
    /// ]);
    /// assert_eq!(comments.lookup(prefix("//go:generate ")), Some("stringer"));
    /// ```
    pub fn lookup<'a, F>(&'a self, extractor: F) -> Option<&'a str>
    where
        F: Fn(&'a str) -> Option<&'a str>,
    {
        self.0.iter().find_map(|line| extractor(line))
    }

    /// Merge `key=value` tokens from every line `extractor` accepts.
    ///
    /// Each remainder is split on whitespace; a token without `=` maps to
    /// the empty string and later keys overwrite earlier ones. The flag
    /// reports whether any line matched.
    pub fn collect<'a, F>(&'a self, extractor: F) -> (BTreeMap<String, String>, bool)
    where
        F: Fn(&'a str) -> Option<&'a str>,
    {
        let mut pairs = BTreeMap::new();
        let mut matched = false;
        for line in &self.0 {
            let Some(rest) = extractor(line) else {
                continue;
            };
            matched = true;
            for token in rest.split_whitespace() {
                let (key, value) = token.split_once('=').unwrap_or((token, ""));
                pairs.insert(key.to_string(), value.to_string());
            }
        }
        (pairs, matched)
    }

    /// Line at `index`; negative indexes count from the end.
    ///
    /// # Errors
    ///
    /// Returns [`DeclError::IndexOutOfRange`] when the index falls outside
    /// the lines, which is always the case for empty comments.
    pub fn try_at(&self, index: isize) -> Result<&str, DeclError> {
        let len = self.0.len();
        let resolved = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            usize::try_from(index).ok()
        };
        resolved
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
            .ok_or(DeclError::IndexOutOfRange { index, len })
    }

    /// Line at `index`; negative indexes count from the end.
    ///
    /// # Panics
    ///
    /// Panics when the index is out of range. Use [`Comments::try_at`] or
    /// [`Comments::get`] when the lines may be empty.
    #[must_use]
    pub fn at(&self, index: isize) -> &str {
        match self.try_at(index) {
            Ok(line) => line,
            Err(err) => panic!("{err}"),
        }
    }

    #[must_use]
    pub fn get(&self, index: isize) -> Option<&str> {
        self.try_at(index).ok()
    }
}

/// Extractor accepting lines that start with `p`, yielding what follows.
pub fn prefix(p: &str) -> impl Fn(&str) -> Option<&str> + '_ {
    move |line| line.strip_prefix(p)
}

impl fmt::Display for Comments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("\n"))
    }
}

impl FromIterator<String> for Comments {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Comments {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for Comments {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn comments(lines: &[&str]) -> Comments {
        lines.iter().map(ToString::to_string).collect()
    }

    fn directives() -> Comments {
        comments(&[
            "// Book holds one title.",
            "//decl:table name=books",
            "//decl:table engine=innodb name=titles",
            "//decl:index",
        ])
    }

    #[test]
    fn filter_keeps_order() {
        let filtered = directives().filter(|l| l.starts_with("//decl:"));
        assert_eq!(
            filtered.as_slice(),
            &[
                "//decl:table name=books",
                "//decl:table engine=innodb name=titles",
                "//decl:index",
            ]
        );
    }

    #[test]
    fn filter_prefix_is_literal() {
        let filtered = directives().filter_prefix("//decl:table");
        assert_eq!(filtered.len(), 2);
        assert!(directives().filter_prefix("decl").is_empty());
    }

    #[test]
    fn lines_without_filter_returns_everything() {
        let all = directives();
        assert_eq!(all.lines(None).len(), 4);
        let only_index = |l: &str| l.ends_with("index");
        assert_eq!(all.lines(Some(&only_index)), vec!["//decl:index"]);
    }

    #[test]
    fn lookup_returns_first_match() {
        assert_eq!(
            directives().lookup(prefix("//decl:table ")),
            Some("name=books")
        );
        assert_eq!(directives().lookup(prefix("//missing")), None);
    }

    #[test]
    fn collect_merges_and_overwrites() {
        let (pairs, matched) = directives().collect(prefix("//decl:table "));
        assert!(matched);
        assert_eq!(pairs.get("name").map(String::as_str), Some("titles"));
        assert_eq!(pairs.get("engine").map(String::as_str), Some("innodb"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn collect_bare_token_maps_to_empty() {
        let (pairs, matched) = comments(&["//opt fast level=3"]).collect(prefix("//opt "));
        assert!(matched);
        assert_eq!(pairs.get("fast").map(String::as_str), Some(""));
        assert_eq!(pairs.get("level").map(String::as_str), Some("3"));
    }

    #[test]
    fn collect_is_idempotent() {
        let c = directives();
        assert_eq!(c.collect(prefix("//decl:")), c.collect(prefix("//decl:")));
    }

    #[test]
    fn collect_reports_no_match() {
        let (pairs, matched) = directives().collect(prefix("//none"));
        assert!(!matched);
        assert!(pairs.is_empty());
    }

    #[rstest]
    #[case(0, "// Book holds one title.")]
    #[case(3, "//decl:index")]
    #[case(-1, "//decl:index")]
    #[case(-4, "// Book holds one title.")]
    fn at_resolves_indexes(#[case] index: isize, #[case] expected: &str) {
        assert_eq!(directives().at(index), expected);
    }

    #[test]
    fn negative_one_is_last() {
        let c = directives();
        assert_eq!(c.at(-1), c.at(isize::try_from(c.len()).expect("len fits") - 1));
    }

    #[rstest]
    #[case(4)]
    #[case(-5)]
    fn try_at_out_of_range(#[case] index: isize) {
        let err = directives().try_at(index).expect_err("should be out of range");
        assert!(matches!(err, DeclError::IndexOutOfRange { len: 4, .. }));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn at_on_empty_panics() {
        let _ = Comments::default().at(0);
    }

    #[test]
    fn get_on_empty_is_none() {
        assert_eq!(Comments::default().get(-1), None);
    }

    #[test]
    fn display_joins_with_newlines() {
        assert_eq!(comments(&["// a", "// b"]).to_string(), "// a\n// b");
        assert_eq!(Comments::default().to_string(), "");
    }
}
