use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AstNode<'a> {
    /// A single word of template text.
    ///
    /// Borrowed from the template until substitution replaces it with an
    /// argument value, at which point we are forced to allocate.
    Literal { text: Cow<'a, str> },
    /// An `[if] predicate [then] ... [else] ...` block.
    Conditional {
        /// Every literal between `[if]` and `[then]`. Only a single token is
        /// valid, but the check is left to substitution.
        predicate: Vec<Cow<'a, str>>,
        then_branch: Box<AstNode<'a>>,
        else_branch: Option<Box<AstNode<'a>>>,
    },
    /// Nodes rendered in order and joined by single spaces.
    Sequence(Vec<AstNode<'a>>),
}

impl<'a> AstNode<'a> {
    pub(crate) const fn literal(text: &'a str) -> Self {
        Self::Literal {
            text: Cow::Borrowed(text),
        }
    }
}
