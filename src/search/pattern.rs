use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// How the default case sensitivity is chosen. Inline flags override it where
/// they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSetting {
    /// Sensitive only if the pattern contains an uppercase letter.
    #[default]
    Smart,
    Sensitive,
    Insensitive,
}

impl CaseSetting {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "smart" | "smartcase" => Some(CaseSetting::Smart),
            "sensitive" | "noignorecase" => Some(CaseSetting::Sensitive),
            "insensitive" | "ignorecase" => Some(CaseSetting::Insensitive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Sensitive,
    Insensitive,
}

/// Raw pattern text with its resolved case mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    case: CaseMode,
}

impl Pattern {
    pub fn new(source: impl Into<String>, setting: CaseSetting) -> Self {
        let source = source.into();
        let case = resolve_case(&source, setting);
        Self { source, case }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn case(&self) -> CaseMode {
        self.case
    }

    pub fn compile(&self) -> Result<CompiledPattern, PatternError> {
        let regex = RegexBuilder::new(&self.source)
            .case_insensitive(self.case == CaseMode::Insensitive)
            .build()?;

        Ok(CompiledPattern {
            pattern: self.clone(),
            regex,
        })
    }
}

/// A pattern that compiled successfully and can be handed to the scanner.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: Pattern,
    regex: Regex,
}

impl CompiledPattern {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    Syntax,
    TooBig,
}

/// Why a pattern failed to compile. The message is a single line meant for
/// the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("{description}")]
    Syntax { description: String },

    #[error("pattern too big (compiled size exceeds {limit} bytes)")]
    TooBig { limit: usize },
}

impl PatternError {
    pub fn kind(&self) -> PatternErrorKind {
        match self {
            PatternError::Syntax { .. } => PatternErrorKind::Syntax,
            PatternError::TooBig { .. } => PatternErrorKind::TooBig,
        }
    }
}

impl From<regex::Error> for PatternError {
    fn from(err: regex::Error) -> Self {
        match err {
            regex::Error::CompiledTooBig(limit) => PatternError::TooBig { limit },
            regex::Error::Syntax(message) => PatternError::Syntax {
                description: summarize_diagnostic(&message),
            },
            other => PatternError::Syntax {
                description: summarize_diagnostic(&other.to_string()),
            },
        }
    }
}

// The regex crate renders syntax errors over several lines (pattern, caret,
// "error: ..."); keep only the error line.
fn summarize_diagnostic(message: &str) -> String {
    message
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("error: "))
        .or_else(|| message.lines().map(str::trim).find(|line| !line.is_empty()))
        .unwrap_or("invalid pattern")
        .to_string()
}

/// Picks the default case mode for `source` from the configured setting,
/// where `Smart` looks for uppercase letters. Inline flags such as `(?i)` or
/// `(?-i:...)` are left to the regex engine and apply only where they sit.
pub fn resolve_case(source: &str, setting: CaseSetting) -> CaseMode {
    match setting {
        CaseSetting::Sensitive => CaseMode::Sensitive,
        CaseSetting::Insensitive => CaseMode::Insensitive,
        CaseSetting::Smart => {
            if has_uppercase_literal(source) {
                CaseMode::Sensitive
            } else {
                CaseMode::Insensitive
            }
        }
    }
}

/// Turns literal text (typically the selection) into a pattern that matches
/// exactly that text, forced case-sensitive.
pub fn escape_literal(text: &str) -> String {
    format!("(?-i){}", regex::escape(text))
}

// Uppercase letters outside escapes (`\W`, `\p{Lu}`), group names and flag
// groups (`(?U)`).
fn has_uppercase_literal(source: &str) -> bool {
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('p') | Some('P') => {
                    if chars.peek() == Some(&'{') {
                        for c in chars.by_ref() {
                            if c == '}' {
                                break;
                            }
                        }
                    } else {
                        chars.next();
                    }
                }
                Some(_) | None => {}
            },
            '(' if chars.peek() == Some(&'?') => {
                chars.next();
                if chars.peek() == Some(&'P') {
                    chars.next();
                }
                if chars.peek() == Some(&'<') {
                    for c in chars.by_ref() {
                        if c == '>' {
                            break;
                        }
                    }
                } else {
                    while chars.next_if(|c| c.is_ascii_alphabetic() || *c == '-').is_some() {}
                }
            }
            c if c.is_uppercase() => return true,
            _ => {}
        }
    }

    false
}
