//! Composition of rule fragments coming from search forms.
//!
//! Joining is plain text work: fragments are never parsed here, so callers
//! wrap fragments that contain `or` in parentheses themselves.

use std::fmt;

/// Keyword placed between fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Joiner::And => "and",
            Joiner::Or => "or",
        }
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins the non-empty fragments with ` and `. Missing and empty fragments
/// are skipped; with nothing left the result is empty, meaning "no filter".
///
/// ```
/// use cohort_rule::concat_search_expressions;
///
/// let rule = concat_search_expressions([Some(""), Some("{a}=1"), None, Some("{b}=2")]);
/// assert_eq!(rule, "{a}=1 and {b}=2");
/// assert_eq!(concat_search_expressions(Vec::new()), "");
/// ```
pub fn concat_search_expressions<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    concat_search_expressions_with(fragments, Joiner::And)
}

/// [`concat_search_expressions`] with an explicit joiner.
pub fn concat_search_expressions_with<'a, I>(fragments: I, joiner: Joiner) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let separator = format!(" {} ", joiner);
    fragments
        .into_iter()
        .flatten()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(&separator)
}
