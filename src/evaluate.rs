use std::borrow::Cow;

use crate::ast::AstNode;

fn is_true(predicate: &[Cow<'_, str>]) -> bool {
    matches!(predicate, [word] if word.eq_ignore_ascii_case("true"))
}

/// Renders a substituted AST to its final text.
///
/// Sequences drop children that render to nothing and join the rest with a
/// single space, which is what collapses the template's original whitespace.
pub(crate) fn evaluate(node: &AstNode<'_>) -> String {
    let mut output = String::new();
    evaluate_into(node, &mut output);
    output
}

fn evaluate_into(node: &AstNode<'_>, output: &mut String) {
    match node {
        AstNode::Literal { text } => output.push_str(text),
        AstNode::Conditional {
            predicate,
            then_branch,
            else_branch,
        } => {
            if is_true(predicate) {
                evaluate_into(then_branch, output);
            } else if let Some(else_branch) = else_branch {
                evaluate_into(else_branch, output);
            }
        }
        AstNode::Sequence(children) => {
            let start = output.len();
            for child in children {
                let mark = output.len();
                if mark > start {
                    output.push(' ');
                }
                let child_start = output.len();
                evaluate_into(child, output);
                if output.len() == child_start {
                    // Nothing rendered, take back the separator.
                    output.truncate(mark);
                }
            }
        }
    }
}
