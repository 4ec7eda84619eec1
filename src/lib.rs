mod ast;
mod error;
mod evaluate;
mod interface;
mod parser;
mod substitute;
mod template;
mod token;

// Public exports.
pub use error::{
    ParseError, ParseErrorKind, SqlateError, SqlateResult, SubstituteError, TokenizeError,
    TokenizeErrorKind,
};
pub use interface::{Args, Value};
pub use template::Template;

/// Expands `template` with `args`.
///
/// Arguments are referred to in the template with a leading dot, so the
/// argument `IncludeReviews` is written `.IncludeReviews`. The supported
/// expressions are:
///  - `{{ [if] predicate [then] clause }}`
///  - `{{ [if] predicate [then] clause [else] clause }}`
///
/// where `predicate` is `true`, `false`, or an argument holding one of them.
/// Expressions may be nested inside `[then]` and `[else]` clauses. The output
/// joins the remaining words with single spaces.
///
/// With no `args` the template is returned untouched.
///
/// # Errors
/// - `SqlateError::Tokenize` if the `{{`/`}}` delimiters are unbalanced or
///   nested more than 128 deep.
/// - `SqlateError::Parse` if an expression is empty or malformed.
/// - `SqlateError::Substitute` if a predicate does not resolve to a boolean.
///
/// # Example
///
/// ```
/// use sqlate::{Args, apply};
///
/// let query = "SELECT * {{ [if] .IncludeReviews [then] ,json_agg(reviews) AS reviews }} FROM products";
/// let args = Args::new().insert("IncludeReviews", true).to_owned();
///
/// assert_eq!(
///     apply(query, Some(&args)).unwrap(),
///     "SELECT * ,json_agg(reviews) AS reviews FROM products"
/// );
/// assert_eq!(apply(query, None).unwrap(), query);
/// ```
pub fn apply(template: &str, args: Option<&Args<'_>>) -> SqlateResult<String> {
    let Some(args) = args else {
        tracing::debug!("no args given, returning template unchanged");
        return Ok(template.to_string());
    };

    Template::new(template)?.render(args)
}
