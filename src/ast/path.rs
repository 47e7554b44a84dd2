use std::fmt;

/// One step of a variable path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Plain field name (`subject` in `{enrollee.subject}`)
    Field(String),
    /// Array index (`[0]`)
    Index(usize),
    /// Quoted key (`["ourhealth"]`)
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, "[\"{}\"]", key),
        }
    }
}

/// A reference to a record field, written `{a.b.c}` in source.
///
/// Segments after the closing brace (`{question1[0]}.trailer`) are kept in
/// the same path; `braced` records how many segments sat inside the braces
/// so the reference renders back to its original shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableRef {
    segments: Vec<PathSegment>,
    braced: usize,
}

impl VariableRef {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        let braced = segments.len();
        VariableRef { segments, braced }
    }

    /// Builds a reference from a plain dotted path such as `enrollee.subject`.
    ///
    /// ```
    /// use cohort_rule::ast::{PathSegment, VariableRef};
    ///
    /// let var = VariableRef::from_dotted("enrollee.subject");
    /// assert_eq!(var.to_string(), "{enrollee.subject}");
    /// assert_eq!(var.segments()[1], PathSegment::Field("subject".to_string()));
    /// ```
    pub fn from_dotted(path: &str) -> Self {
        VariableRef::new(
            path.split('.')
                .map(|name| PathSegment::Field(name.to_string()))
                .collect(),
        )
    }

    /// Rebuilds a reference from a `VARIABLE` token lexeme.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let chars: Vec<char> = lexeme.chars().collect();
        if chars.first() != Some(&'{') {
            return None;
        }
        match scan_variable(&chars, 0) {
            Ok((var, end)) if end == chars.len() => Some(var),
            _ => None,
        }
    }

    /// Appends a field after the closing brace.
    pub fn with_suffix(mut self, field: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(field.into()));
        self
    }

    /// Every segment of the path, suffix included.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Segments written after the closing brace.
    pub fn suffix(&self) -> &[PathSegment] {
        &self.segments[self.braced..]
    }

    /// The path without braces, e.g. `question1[0]["sub"].trailer`.
    ///
    /// Records keyed by flat dotted paths use this form as their key.
    pub fn dotted(&self) -> String {
        render_segments(&self.segments)
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", render_segments(&self.segments[..self.braced]))?;
        for segment in self.suffix() {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

/// Renders segments the way they are written inside braces.
pub(crate) fn render_segments(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && matches!(segment, PathSegment::Field(_)) {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

/// Offset of the first character that does not fit the variable grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub at: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn read_word(input: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while input.get(end).is_some_and(|c| is_word_char(*c)) {
        end += 1;
    }
    (input[start..end].iter().collect(), end)
}

/// Scans a variable starting at the `{` found at `start`.
///
/// Grammar:
///   variable = "{" word { "." word | "[" digits "]" | "[\"" chars "\"]" } "}" { "." word }
///
/// Returns the reference and the index just past its last character.
pub(crate) fn scan_variable(input: &[char], start: usize) -> Result<(VariableRef, usize), ScanError> {
    let mut i = start + 1;

    let (first, next) = read_word(input, i);
    if first.is_empty() {
        return Err(ScanError { at: i });
    }
    let mut segments = vec![PathSegment::Field(first)];
    i = next;

    loop {
        match input.get(i) {
            Some('.') => {
                let (word, next) = read_word(input, i + 1);
                if word.is_empty() {
                    return Err(ScanError { at: i + 1 });
                }
                segments.push(PathSegment::Field(word));
                i = next;
            }
            Some('[') => {
                i += 1;
                match input.get(i) {
                    Some(c) if c.is_ascii_digit() => {
                        let digits_start = i;
                        while input.get(i).is_some_and(|c| c.is_ascii_digit()) {
                            i += 1;
                        }
                        let digits: String = input[digits_start..i].iter().collect();
                        let index = digits
                            .parse::<usize>()
                            .map_err(|_| ScanError { at: digits_start })?;
                        segments.push(PathSegment::Index(index));
                    }
                    Some('"') => {
                        i += 1;
                        let key_start = i;
                        while input
                            .get(i)
                            .is_some_and(|c| !matches!(c, '"' | '\n' | '\r'))
                        {
                            i += 1;
                        }
                        if input.get(i) != Some(&'"') || i == key_start {
                            return Err(ScanError { at: i });
                        }
                        segments.push(PathSegment::Key(input[key_start..i].iter().collect()));
                        i += 1;
                    }
                    _ => return Err(ScanError { at: i }),
                }
                if input.get(i) != Some(&']') {
                    return Err(ScanError { at: i });
                }
                i += 1;
            }
            Some('}') => {
                i += 1;
                break;
            }
            _ => return Err(ScanError { at: i }),
        }
    }

    let braced = segments.len();

    // A trailing '.' without a word after it is not part of the variable.
    while input.get(i) == Some(&'.') && input.get(i + 1).is_some_and(|c| is_word_char(*c)) {
        let (word, next) = read_word(input, i + 1);
        segments.push(PathSegment::Field(word));
        i = next;
    }

    Ok((VariableRef { segments, braced }, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Result<(VariableRef, usize), ScanError> {
        let chars: Vec<char> = source.chars().collect();
        scan_variable(&chars, 0)
    }

    #[test]
    fn test_simple_path() {
        let (var, end) = scan("{enrollee.subject} = true").unwrap();
        assert_eq!(end, 18);
        assert_eq!(var, VariableRef::from_dotted("enrollee.subject"));
    }

    #[test]
    fn test_indexed_path_with_suffix() {
        let (var, end) = scan(r#"{question1[0]["sub"]}.trailer"#).unwrap();
        assert_eq!(end, 29);
        assert_eq!(
            var.segments(),
            &[
                PathSegment::Field("question1".into()),
                PathSegment::Index(0),
                PathSegment::Key("sub".into()),
                PathSegment::Field("trailer".into()),
            ]
        );
        assert_eq!(var.suffix().len(), 1);
        assert_eq!(var.to_string(), r#"{question1[0]["sub"]}.trailer"#);
        assert_eq!(var.dotted(), r#"question1[0]["sub"].trailer"#);
    }

    #[test]
    fn test_dangling_dot_after_brace_is_left_alone() {
        let (_, end) = scan("{a}.").unwrap();
        assert_eq!(end, 3);
    }

    #[test]
    fn test_errors_point_at_offending_char() {
        assert_eq!(scan("{}").unwrap_err(), ScanError { at: 1 });
        assert_eq!(scan("{a.}").unwrap_err(), ScanError { at: 3 });
        assert_eq!(scan("{a[x]}").unwrap_err(), ScanError { at: 3 });
        assert_eq!(scan("{a-b}").unwrap_err(), ScanError { at: 2 });
        assert_eq!(scan("{a").unwrap_err(), ScanError { at: 2 });
    }

    #[test]
    fn test_from_lexeme_rejects_trailing_text() {
        assert!(VariableRef::from_lexeme("{a.b}").is_some());
        assert!(VariableRef::from_lexeme("{a.b} ").is_none());
        assert!(VariableRef::from_lexeme("a.b").is_none());
    }
}
