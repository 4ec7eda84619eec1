use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{TokenizeError, TokenizeErrorKind};

pub(crate) const SCOPE_OPEN: &str = "{{";
pub(crate) const SCOPE_CLOSE: &str = "}}";
pub(crate) const KEYWORD_IF: &str = "[if]";
pub(crate) const KEYWORD_THEN: &str = "[then]";
pub(crate) const KEYWORD_ELSE: &str = "[else]";

/// Deepest scope nesting `tokenize` accepts. Every later stage recurses once
/// per level, so this bounds their stack use.
pub(crate) const MAX_DEPTH: usize = 128;

pub(crate) fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        KEYWORD_IF | KEYWORD_THEN | KEYWORD_ELSE | SCOPE_OPEN | SCOPE_CLOSE
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Literal(&'a str),
    Tree(TokenTree<'a>),
}

impl<'a> Token<'a> {
    pub(crate) const fn as_literal(&self) -> Option<&'a str> {
        match self {
            Self::Literal(text) => Some(*text),
            Self::Tree(_) => None,
        }
    }
}

/// The tokens of one scope. `line` and `column` locate the `{{` that opened
/// it, or the start of the template for the root scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TokenTree<'a> {
    pub(crate) tokens: Vec<Token<'a>>,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl TokenTree<'_> {
    pub(crate) const fn new(line: usize, column: usize) -> Self {
        Self {
            tokens: Vec::new(),
            line,
            column,
        }
    }
}

struct Word<'a> {
    text: &'a str,
    line: usize,
    column: usize,
}

/// Splits input on runs of whitespace, tracking where each word starts.
struct Words<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column in chars (1-indexed)
    column: usize,
}

impl<'a> Words<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) {
        if let Some((_, current_char)) = self.chars.next() {
            if current_char == '\n' {
                self.line = self.line.saturating_add(1);
                self.column = 1;
            } else {
                self.column = self.column.saturating_add(1);
            }
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.bump();
        }

        let &(start, _) = self.chars.peek()?;
        let (line, column) = (self.line, self.column);

        let mut end = self.input.len();
        while let Some(&(pos, current_char)) = self.chars.peek() {
            if current_char.is_whitespace() {
                end = pos;
                break;
            }
            self.bump();
        }

        Some(Word {
            text: self.input.get(start..end)?,
            line,
            column,
        })
    }
}

/// Builds a tree of tokens from a template string.
///
/// Every `{{` opens a nested scope and every `}}` closes the innermost one.
/// Unbalanced delimiters, and scopes nested more than [`MAX_DEPTH`] deep, are
/// reported here rather than left for the parser.
pub(crate) fn tokenize(input: &str) -> Result<TokenTree<'_>, TokenizeError> {
    let mut root = TokenTree::new(1, 1);
    // Scopes that are open but not yet attached to their parent.
    let mut open: Vec<TokenTree<'_>> = Vec::new();

    for word in Words::new(input) {
        match word.text {
            SCOPE_OPEN => {
                if open.len() >= MAX_DEPTH {
                    return Err(TokenizeError {
                        line: word.line,
                        column: word.column,
                        kind: TokenizeErrorKind::NestingTooDeep { limit: MAX_DEPTH },
                    });
                }
                tracing::trace!(
                    line = word.line,
                    column = word.column,
                    depth = open.len(),
                    "opening scope"
                );
                open.push(TokenTree::new(word.line, word.column));
            }
            SCOPE_CLOSE => {
                let Some(child) = open.pop() else {
                    return Err(TokenizeError {
                        line: word.line,
                        column: word.column,
                        kind: TokenizeErrorKind::UnbalancedClose,
                    });
                };
                tracing::trace!(
                    line = word.line,
                    column = word.column,
                    depth = open.len(),
                    "closing scope"
                );
                open.last_mut()
                    .unwrap_or(&mut root)
                    .tokens
                    .push(Token::Tree(child));
            }
            text => open
                .last_mut()
                .unwrap_or(&mut root)
                .tokens
                .push(Token::Literal(text)),
        }
    }

    if let Some(unclosed) = open.first() {
        return Err(TokenizeError {
            line: unclosed.line,
            column: unclosed.column,
            kind: TokenizeErrorKind::UnclosedScope,
        });
    }

    Ok(root)
}
