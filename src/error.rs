pub type SqlateResult<T> = std::result::Result<T, SqlateError>;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenizeErrorKind {
    /// A `}}` was found with no open scope to close.
    UnbalancedClose,
    /// A `{{` was never closed before the end of the template.
    UnclosedScope,
    /// A `{{` opened a scope deeper than the supported nesting limit.
    NestingTooDeep { limit: usize },
}

impl std::fmt::Display for TokenizeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedClose => write!(f, "'}}}}' has no matching '{{{{'"),
            Self::UnclosedScope => write!(f, "'{{{{' is never closed"),
            Self::NestingTooDeep { limit } => {
                write!(f, "Scopes nested deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for TokenizeErrorKind {}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenizeError {
    pub line: usize,
    pub column: usize,
    pub kind: TokenizeErrorKind,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tokenize error at line {}, column {}: {}",
            self.line, self.column, self.kind
        )
    }
}

impl std::error::Error for TokenizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The scope has no tokens at all.
    MalformedExpression,
    /// The scope does not start with `[if]`. Only used internally to fall back
    /// to parsing the scope as a plain sequence.
    NotConditional,
    MissingPredicate,
    MissingThenClause,
    UnexpectedKeyword {
        keyword: String,
    },
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedExpression => write!(f, "Expression with no tokens"),
            Self::NotConditional => write!(f, "Expression is not an [if] block"),
            Self::MissingPredicate => write!(f, "[if] must be followed by a predicate"),
            Self::MissingThenClause => write!(f, "[if] must be followed by a [then] clause"),
            Self::UnexpectedKeyword { keyword } => {
                write!(f, "Unexpected '{}' in [if] block", keyword)
            }
        }
    }
}

impl std::error::Error for ParseErrorKind {}

/// A parse failure, located at the scope that failed to parse.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.line, self.column, self.kind
        )
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubstituteError {
    EmptyPredicate,
    MultiTokenPredicate { tokens: Vec<String> },
    InvalidPredicate { predicate: String },
}

impl std::fmt::Display for SubstituteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPredicate => write!(f, "Predicate expression not found"),
            Self::MultiTokenPredicate { tokens } => write!(
                f,
                "Multi-token predicate '{}' is not supported",
                tokens.join(" ")
            ),
            Self::InvalidPredicate { predicate } => write!(
                f,
                "Predicate must be 'true' or 'false', found '{}'",
                predicate
            ),
        }
    }
}

impl std::error::Error for SubstituteError {}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlateError {
    UnsupportedArgsType { found: String },
    Tokenize(TokenizeError),
    Parse(ParseError),
    Substitute(SubstituteError),
}

impl std::fmt::Display for SqlateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedArgsType { found } => {
                write!(f, "Unsupported args type: {}", found)
            }
            Self::Tokenize(error) => write!(f, "tokenizing template: {}", error),
            Self::Parse(error) => write!(f, "building AST: {}", error),
            Self::Substitute(error) => write!(f, "substituting args: {}", error),
        }
    }
}

impl std::error::Error for SqlateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tokenize(error) => Some(error),
            Self::Parse(error) => Some(error),
            Self::Substitute(error) => Some(error),
            Self::UnsupportedArgsType { .. } => None,
        }
    }
}

impl From<TokenizeError> for SqlateError {
    fn from(error: TokenizeError) -> Self {
        Self::Tokenize(error)
    }
}

impl From<ParseError> for SqlateError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<SubstituteError> for SqlateError {
    fn from(error: SubstituteError) -> Self {
        Self::Substitute(error)
    }
}
