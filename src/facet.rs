//! Facets: the search-term view of a variable.
//!
//! The search service routes each variable to a term by its first segment
//! (the model), optionally scoped to another study with a quoted key, e.g.
//! `{profile["ourhealth"].givenName}` is model `profile`, study `ourhealth`,
//! arguments `givenName`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::ast::{PathSegment, VariableRef, path::render_segments};

static STUDY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("study name pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacetError {
    #[error("invalid study name: {0}")]
    InvalidStudyName(String),

    #[error("variable {0} does not start with a model name")]
    MissingModel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub model: String,
    pub study: Option<String>,
    /// Remaining path, dotted, e.g. `surveyStableId.questionStableId`
    pub arguments: String,
}

impl Facet {
    pub fn from_variable(var: &VariableRef) -> Result<Self, FacetError> {
        let segments = var.segments();

        let Some(PathSegment::Field(model)) = segments.first() else {
            return Err(FacetError::MissingModel(var.to_string()));
        };

        let (study, rest) = match segments.get(1) {
            Some(PathSegment::Key(study)) => {
                if !STUDY_NAME.is_match(study) {
                    return Err(FacetError::InvalidStudyName(study.clone()));
                }
                (Some(study.clone()), &segments[2..])
            }
            _ => (None, &segments[1..]),
        };

        Ok(Facet {
            model: model.clone(),
            study,
            arguments: render_segments(rest),
        })
    }

    /// Splits the arguments into at most `limit` parts; the last part keeps
    /// any remaining dots. `answer.a.b.c` with limit 2 gives `["a", "b.c"]`.
    pub fn split_arguments(&self, limit: usize) -> Vec<&str> {
        if self.arguments.is_empty() {
            return Vec::new();
        }
        self.arguments.splitn(limit.max(1), '.').collect()
    }

    /// Whether this facet belongs to the term named `term`.
    pub fn is_term(&self, term: &str) -> bool {
        self.model == term
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model)?;
        if let Some(study) = &self.study {
            write!(f, "[\"{}\"]", study)?;
        }
        if !self.arguments.is_empty() {
            write!(f, ".{}", self.arguments)?;
        }
        Ok(())
    }
}
