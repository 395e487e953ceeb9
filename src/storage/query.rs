//! Translation of user search text into FTS5 match expressions
//!
//! Query syntax:
//! - `word` optional term, documents matching more terms rank higher
//! - `+word` required term
//! - `-word` excluded term
//! - `word*` prefix match
//! - `"some phrase"` exact phrase (may be combined with `+`, `-` and `*`)
//!
//! Every term is emitted as a quoted FTS5 string, so user input can never
//! inject FTS5 operators or column filters.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrence {
    Optional,
    Required,
    Excluded,
}

#[derive(Debug)]
struct Term {
    text: String,
    prefix: bool,
    occurrence: Occurrence,
}

impl Term {
    fn to_fts(&self) -> String {
        let quoted = format!("\"{}\"", self.text.replace('"', "\"\""));
        if self.prefix {
            format!("{}*", quoted)
        } else {
            quoted
        }
    }
}

/// Builds an FTS5 match expression from user search text
///
/// Returns `None` when the text holds no term that could match anything,
/// such as an empty string, pure punctuation, or only excluded terms.
///
/// # Example
///
/// ```
/// use docket::storage::build_match_query;
///
/// assert_eq!(build_match_query("budget").as_deref(), Some(r#"("budget")"#));
/// assert_eq!(build_match_query("  ").as_deref(), None);
/// ```
pub fn build_match_query(text: &str) -> Option<String> {
    let terms = tokenize(text);

    let required: Vec<String> = select(&terms, Occurrence::Required);
    let optional: Vec<String> = select(&terms, Occurrence::Optional);
    let excluded: Vec<String> = select(&terms, Occurrence::Excluded);

    let positive = if required.is_empty() {
        if optional.is_empty() {
            return None;
        }
        format!("({})", optional.join(" OR "))
    } else if optional.is_empty() {
        required.join(" AND ")
    } else {
        // Optional terms only affect ranking once the required ones match
        let any: Vec<String> = required.iter().chain(optional.iter()).cloned().collect();
        format!("{} AND ({})", required.join(" AND "), any.join(" OR "))
    };

    if excluded.is_empty() {
        Some(positive)
    } else {
        Some(format!("({}) NOT ({})", positive, excluded.join(" OR ")))
    }
}

fn select(terms: &[Term], occurrence: Occurrence) -> Vec<String> {
    terms
        .iter()
        .filter(|t| t.occurrence == occurrence)
        .map(Term::to_fts)
        .collect()
}

/// Splits search text into terms, honoring quoted phrases
fn tokenize(text: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let occurrence = match chars.peek() {
            None => break,
            Some('+') => {
                chars.next();
                Occurrence::Required
            }
            Some('-') => {
                chars.next();
                Occurrence::Excluded
            }
            Some(_) => Occurrence::Optional,
        };

        let mut raw = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                raw.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                raw.push(c);
                chars.next();
            }
        }

        let mut prefix = false;
        if chars.peek() == Some(&'*') {
            chars.next();
            prefix = true;
        }
        let raw = match raw.strip_suffix('*') {
            Some(stripped) => {
                prefix = true;
                stripped.to_string()
            }
            None => raw,
        };

        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().any(char::is_alphanumeric) {
            terms.push(Term {
                text,
                prefix,
                occurrence,
            });
        }
    }

    terms
}
