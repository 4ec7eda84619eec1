use std::{borrow::Cow, collections::HashMap};

use crate::{ast::AstNode, error::SubstituteError, interface::Args, interface::Value};

/// Prefix that marks a template word as a reference to an argument.
pub(crate) const ACCESS_MARKER: char = '.';

/// Argument values keyed by the exact word that refers to them in a
/// template, e.g. `.IncludeReviews`. Built for a single substitution pass.
pub(crate) struct LookupTable<'v> {
    entries: HashMap<String, &'v Value<'v>>,
}

impl<'v> LookupTable<'v> {
    pub(crate) fn new(args: &'v Args<'_>) -> Self {
        Self {
            entries: args
                .iter()
                .map(|(name, value)| (format!("{ACCESS_MARKER}{name}"), value))
                .collect(),
        }
    }

    fn get(&self, word: &str) -> Option<&'v Value<'v>> {
        self.entries.get(word).copied()
    }
}

fn substitute_word(word: &mut Cow<'_, str>, table: &LookupTable<'_>) {
    if let Some(value) = table.get(word) {
        tracing::trace!(key = %word, %value, "substituting argument");
        *word = Cow::Owned(value.to_string());
    }
}

fn is_boolean(word: &str) -> bool {
    word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false")
}

/// Replaces argument references in `node` with their values, in place.
///
/// Every conditional's predicate must end up as a single `true` or `false`
/// (in any case). Both branches of every conditional are visited, whichever
/// way the predicate goes.
pub(crate) fn substitute(
    node: &mut AstNode<'_>,
    table: &LookupTable<'_>,
) -> Result<(), SubstituteError> {
    match node {
        AstNode::Literal { text } => substitute_word(text, table),
        AstNode::Conditional {
            predicate,
            then_branch,
            else_branch,
        } => {
            match predicate.as_mut_slice() {
                [] => return Err(SubstituteError::EmptyPredicate),
                [word] => {
                    substitute_word(word, table);
                    if !is_boolean(word) {
                        return Err(SubstituteError::InvalidPredicate {
                            predicate: word.to_string(),
                        });
                    }
                }
                words => {
                    return Err(SubstituteError::MultiTokenPredicate {
                        tokens: words.iter().map(ToString::to_string).collect(),
                    });
                }
            }

            substitute(then_branch, table)?;
            if let Some(else_branch) = else_branch {
                substitute(else_branch, table)?;
            }
        }
        AstNode::Sequence(children) => {
            for child in children {
                substitute(child, table)?;
            }
        }
    }

    Ok(())
}
