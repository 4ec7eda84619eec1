use crate::ast::AstNode;
use crate::error::SqlateResult;
use crate::evaluate::evaluate;
use crate::interface::Args;
use crate::parser::parse;
use crate::substitute::{ACCESS_MARKER, LookupTable, substitute};
use crate::token::tokenize;

/// A Template is a parsed query template that can be rendered many times.
///
/// Templates are created by tokenizing and parsing a template string into an
/// Abstract Syntax Tree (AST). Rendering works on a copy of that tree, so a
/// template can be rendered with any number of argument sets.
///
/// # Example
///
/// ```rust
/// use sqlate::{Args, Template};
///
/// let template =
///     Template::new("SELECT * {{ [if] .IncludeReviews [then] ,json_agg(reviews) AS reviews }} FROM products")
///         .unwrap();
///
/// let args = Args::new().insert("IncludeReviews", true).to_owned();
/// assert_eq!(
///     template.render(&args).unwrap(),
///     "SELECT * ,json_agg(reviews) AS reviews FROM products"
/// );
///
/// let args = Args::new().insert("IncludeReviews", false).to_owned();
/// assert_eq!(template.render(&args).unwrap(), "SELECT * FROM products");
/// ```
#[derive(Debug, Clone)]
pub struct Template<'a> {
    ast: AstNode<'a>,
}

impl<'a> Template<'a> {
    /// Creates a new template by tokenizing and parsing `content`.
    ///
    /// # Errors
    ///
    /// - `SqlateError::Tokenize` if the `{{`/`}}` delimiters are unbalanced or
    ///   nested more than 128 deep.
    /// - `SqlateError::Parse` if a scope is empty or an `[if]` block is
    ///   missing its predicate or `[then]` clause.
    pub fn new(content: &'a str) -> SqlateResult<Self> {
        let tree = tokenize(content)?;
        tracing::trace!(tokens = tree.tokens.len(), "tokenized template");

        let ast = parse(&tree)?;
        tracing::debug!("parsed template");

        Ok(Self { ast })
    }

    /// Renders the template with `args`.
    ///
    /// # Errors
    ///
    /// Returns `SqlateError::Substitute` if any predicate, in any branch, is
    /// not a single word that is or resolves to `true` or `false`.
    pub fn render(&self, args: &Args<'_>) -> SqlateResult<String> {
        let mut ast = self.ast.clone();
        substitute(&mut ast, &LookupTable::new(args))?;
        tracing::debug!(args = args.len(), "substituted args");

        Ok(evaluate(&ast))
    }

    /// Names of the arguments this template refers to, without the leading
    /// `.`, in order of first appearance.
    ///
    /// # Example
    ///
    /// ```
    /// use sqlate::Template;
    ///
    /// let template = Template::new("SELECT * FROM .Table {{ [if] .Paged [then] LIMIT .Limit }}").unwrap();
    /// assert_eq!(template.variables(), vec!["Table", "Paged", "Limit"]);
    /// ```
    pub fn variables(&self) -> Vec<&str> {
        let mut variables = Vec::new();
        collect_variables(&self.ast, &mut variables);
        variables
    }
}

fn push_variable<'b>(word: &'b str, variables: &mut Vec<&'b str>) {
    if let Some(name) = word.strip_prefix(ACCESS_MARKER) {
        if !name.is_empty() && !variables.contains(&name) {
            variables.push(name);
        }
    }
}

fn collect_variables<'b>(node: &'b AstNode<'_>, variables: &mut Vec<&'b str>) {
    match node {
        AstNode::Literal { text } => push_variable(text, variables),
        AstNode::Conditional {
            predicate,
            then_branch,
            else_branch,
        } => {
            for word in predicate {
                push_variable(word, variables);
            }
            collect_variables(then_branch, variables);
            if let Some(else_branch) = else_branch {
                collect_variables(else_branch, variables);
            }
        }
        AstNode::Sequence(children) => {
            for child in children {
                collect_variables(child, variables);
            }
        }
    }
}
