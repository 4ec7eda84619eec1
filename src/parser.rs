use std::borrow::Cow;

use crate::{
    ast::AstNode,
    error::{ParseError, ParseErrorKind},
    token::{KEYWORD_ELSE, KEYWORD_IF, KEYWORD_THEN, SCOPE_OPEN, Token, TokenTree, is_keyword},
};

type ParseResult<T> = Result<T, ParseError>;

/// Which part of an `[if]` block the parser is currently filling.
#[derive(Clone, Copy)]
enum Clause {
    Predicate,
    Then,
    Else,
}

#[inline]
fn make_error(tree: &TokenTree<'_>, kind: ParseErrorKind) -> ParseError {
    ParseError {
        line: tree.line,
        column: tree.column,
        kind,
    }
}

/// Converts a token tree into a single AST node.
///
/// A scope starting with `[if]` becomes a sequence holding one conditional,
/// any other scope becomes a sequence of its parsed tokens.
pub(crate) fn parse<'a>(tree: &TokenTree<'a>) -> ParseResult<AstNode<'a>> {
    match check_conditional(tree) {
        Ok(()) => Ok(AstNode::Sequence(vec![parse_conditional(tree)?])),
        Err(ParseError {
            kind: ParseErrorKind::NotConditional,
            ..
        }) => tree
            .tokens
            .iter()
            .map(parse_token)
            .collect::<ParseResult<Vec<_>>>()
            .map(AstNode::Sequence),
        Err(error) => Err(error),
    }
}

fn parse_token<'a>(token: &Token<'a>) -> ParseResult<AstNode<'a>> {
    match token {
        Token::Literal(text) => Ok(AstNode::literal(*text)),
        Token::Tree(tree) => parse(tree),
    }
}

/// Checks that the scope is a well formed `[if]` block.
///
/// Returns `NotConditional` when the scope does not start with `[if]`, which
/// callers treat as "parse as a plain sequence".
fn check_conditional(tree: &TokenTree<'_>) -> ParseResult<()> {
    let Some(first) = tree.tokens.first() else {
        return Err(make_error(tree, ParseErrorKind::MalformedExpression));
    };

    if first.as_literal() != Some(KEYWORD_IF) {
        return Err(make_error(tree, ParseErrorKind::NotConditional));
    }

    match tree.tokens.get(1).and_then(Token::as_literal) {
        Some(predicate) if !is_keyword(predicate) => {}
        Some(_) | None => return Err(make_error(tree, ParseErrorKind::MissingPredicate)),
    }

    let has_then = tree
        .tokens
        .iter()
        .skip(1)
        .any(|token| token.as_literal() == Some(KEYWORD_THEN));
    if !has_then {
        return Err(make_error(tree, ParseErrorKind::MissingThenClause));
    }

    Ok(())
}

/// Parses a scope already validated by `check_conditional`.
fn parse_conditional<'a>(tree: &TokenTree<'a>) -> ParseResult<AstNode<'a>> {
    let mut clause = Clause::Predicate;
    let mut predicate = Vec::new();
    let mut then_branch = Vec::new();
    let mut else_branch: Option<Vec<AstNode<'a>>> = None;

    for token in tree.tokens.iter().skip(1) {
        match (token, clause) {
            (Token::Literal(KEYWORD_THEN), Clause::Predicate) => clause = Clause::Then,
            (Token::Literal(text), Clause::Predicate) => predicate.push(Cow::Borrowed(*text)),
            (Token::Tree(_), Clause::Predicate) => {
                return Err(make_error(
                    tree,
                    ParseErrorKind::UnexpectedKeyword {
                        keyword: SCOPE_OPEN.to_string(),
                    },
                ));
            }
            (Token::Literal(KEYWORD_ELSE), Clause::Then) => {
                clause = Clause::Else;
                else_branch = Some(Vec::new());
            }
            (
                Token::Literal(keyword @ (KEYWORD_THEN | KEYWORD_ELSE)),
                Clause::Then | Clause::Else,
            ) => {
                return Err(make_error(
                    tree,
                    ParseErrorKind::UnexpectedKeyword {
                        keyword: (*keyword).to_string(),
                    },
                ));
            }
            (token, Clause::Then) => then_branch.push(parse_token(token)?),
            (token, Clause::Else) => else_branch
                .get_or_insert_with(Vec::new)
                .push(parse_token(token)?),
        }
    }

    if matches!(clause, Clause::Predicate) {
        return Err(make_error(tree, ParseErrorKind::MissingThenClause));
    }

    Ok(AstNode::Conditional {
        predicate,
        then_branch: Box::new(AstNode::Sequence(then_branch)),
        else_branch: else_branch.map(|nodes| Box::new(AstNode::Sequence(nodes))),
    })
}
