//! Line parsers for code blocks and block expressions.
//!
//! `elseif` and `else` are parsed as their own lines but attached to the preceding `if` of the same block, so
//! an `if` chain is one expression with its alternatives. `case` and `default` lines are only accepted directly
//! under a `switch`.

use super::parsable::{NextNode, ParsableNode, ParseLineContext};
use crate::ast::{Expression, ExpressionKind, ExpressionList};
use crate::diagnostics::CompileError;

/// Slot of the body of an `if`, `elseif`, `else` or `case` expression.
const BODY: usize = 0;

fn attach_alternative(list: &mut ExpressionList, alternative: Expression) -> Result<NextNode, CompileError> {
    let keyword = match alternative.kind {
        ExpressionKind::Else(_) => "else",
        _ => "elseif",
    };
    let chain = list.expressions.last_mut().and_then(|last| match &mut last.kind {
        ExpressionKind::If(chain) => Some(chain),
        _ => None,
    });
    let Some(chain) = chain else {
        return Err(CompileError::grammar(
            format!("Invalid '{keyword}' expression: 'if' expected before '{keyword}'."),
            alternative.reference,
        ));
    };
    if chain
        .alternatives
        .last()
        .is_some_and(|last| matches!(last.kind, ExpressionKind::Else(_)))
    {
        return Err(CompileError::grammar(
            format!("Invalid '{keyword}' expression: no branch allowed after 'else'."),
            alternative.reference,
        ));
    }
    chain.alternatives.push(alternative);
    // Alternative k of the chain is child slot k + 1 of the `if`, after its body.
    let slot = chain.alternatives.len();
    Ok(NextNode::Child(vec![list.expressions.len() - 1, slot]))
}

impl ParsableNode for ExpressionList {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let expression = match context.parse_line_expression() {
            Ok(expression) => expression,
            Err(error) => {
                context.report(error);
                return NextNode::Ignore;
            }
        };

        let next = match expression.kind {
            ExpressionKind::ElseIf(_) | ExpressionKind::Else(_) => attach_alternative(self, expression),
            ExpressionKind::Case(ref case) => {
                let keyword = if case.value.is_some() { "case" } else { "default" };
                Err(CompileError::grammar(
                    format!("Invalid '{keyword}' expression: only allowed inside a 'switch'."),
                    expression.reference,
                ))
            }
            _ if expression.is_block() => {
                self.expressions.push(expression);
                Ok(NextNode::child(self.expressions.len() - 1))
            }
            _ => {
                self.expressions.push(expression);
                Ok(NextNode::Leaf)
            }
        };
        next.unwrap_or_else(|error| {
            context.report(error);
            NextNode::Ignore
        })
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        self.expressions
            .get_mut(slot)
            .map(|expression| expression as &mut dyn ParsableNode)
    }
}

impl ParsableNode for Expression {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        if !self.is_block() {
            let reference = context.reference();
            context.report(CompileError::grammar(
                format!("Invalid indentation: '{self}' has no body."),
                reference,
            ));
            return NextNode::Ignore;
        }
        match &mut self.kind {
            ExpressionKind::If(chain) => chain.body.parse(context).within(BODY),
            ExpressionKind::ElseIf(branch) => branch.body.parse(context).within(BODY),
            ExpressionKind::Else(branch) => branch.body.parse(context).within(BODY),
            ExpressionKind::Case(case) => case.body.parse(context).within(BODY),
            ExpressionKind::Switch(switch) => {
                let expression = match context.parse_line_expression() {
                    Ok(expression) => expression,
                    Err(error) => {
                        context.report(error);
                        return NextNode::Ignore;
                    }
                };
                if !matches!(expression.kind, ExpressionKind::Case(_)) {
                    context.report(CompileError::grammar(
                        "Invalid 'switch' expression: 'case' or 'default' expected.",
                        expression.reference,
                    ));
                    return NextNode::Ignore;
                }
                switch.cases.push(expression);
                NextNode::child(switch.cases.len() - 1)
            }
            _ => NextNode::Ignore,
        }
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        match &mut self.kind {
            ExpressionKind::If(chain) => {
                if slot == BODY {
                    Some(&mut chain.body as &mut dyn ParsableNode)
                } else {
                    chain
                        .alternatives
                        .get_mut(slot - 1)
                        .map(|alternative| alternative as &mut dyn ParsableNode)
                }
            }
            ExpressionKind::ElseIf(branch) if slot == BODY => Some(&mut branch.body as &mut dyn ParsableNode),
            ExpressionKind::Else(branch) if slot == BODY => Some(&mut branch.body as &mut dyn ParsableNode),
            ExpressionKind::Case(case) if slot == BODY => Some(&mut case.body as &mut dyn ParsableNode),
            ExpressionKind::Switch(switch) => switch.cases.get_mut(slot).map(|case| case as &mut dyn ParsableNode),
            _ => None,
        }
    }
}
