use crate::{
    ast::expressions::{
        AdditiveOperator, ComparisonOperator, EqualityOperator, Expr, ExprKind, FactorOperator,
        FunctionCall, UnaryOperator,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    lookups::BindingPower,
    parser::{ParseResult, Parser, PrimaryFailure},
};

/// Tokens that can start an expression.
pub const EXPRESSION_START: [TokenKind; 10] = [
    TokenKind::Integer,
    TokenKind::String,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
    TokenKind::Identifier,
    TokenKind::LeftParen,
    TokenKind::LeftBracket,
    TokenKind::Minus,
    TokenKind::Not,
];

pub fn parse_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parse_binary_expr(parser, BindingPower::Equality)
}

/// Parses a left-associative chain of operators at level `bp`.
pub fn parse_binary_expr(parser: &mut Parser, bp: BindingPower) -> ParseResult<Expr> {
    if bp >= BindingPower::Unary {
        return parse_unary_expr(parser);
    }

    let operand_bp = bp.tighter();
    let mut left = parse_binary_expr(parser, operand_bp)?;

    while parser.get_bp_lookup().get(&parser.current_token_kind()) == Some(&bp) {
        let operator = parser.advance();
        let right = parse_binary_expr(parser, operand_bp)?;
        left = make_binary(&operator, left, right);
    }

    Ok(left)
}

fn make_binary(operator: &Token, left: Expr, right: Expr) -> Expr {
    let span = Span::between(&left.span, &right.span);
    let left = Box::new(left);
    let right = Box::new(right);

    let kind = match operator.kind {
        TokenKind::Plus | TokenKind::Minus => ExprKind::Additive {
            operator: if operator.kind == TokenKind::Plus {
                AdditiveOperator::Plus
            } else {
                AdditiveOperator::Minus
            },
            left,
            right,
        },
        TokenKind::Star | TokenKind::Slash => ExprKind::Factor {
            operator: if operator.kind == TokenKind::Star {
                FactorOperator::Multiply
            } else {
                FactorOperator::Divide
            },
            left,
            right,
        },
        TokenKind::EqualEqual | TokenKind::BangEqual => ExprKind::Equality {
            operator: if operator.kind == TokenKind::EqualEqual {
                EqualityOperator::Equal
            } else {
                EqualityOperator::NotEqual
            },
            left,
            right,
        },
        _ => ExprKind::Comparison {
            operator: match operator.kind {
                TokenKind::Greater => ComparisonOperator::Greater,
                TokenKind::GreaterEqual => ComparisonOperator::GreaterEqual,
                TokenKind::Less => ComparisonOperator::Less,
                _ => ComparisonOperator::LessEqual,
            },
            left,
            right,
        },
    };

    Expr::new(kind, span)
}

pub fn parse_unary_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let operator = match parser.current_token_kind() {
        TokenKind::Minus => UnaryOperator::Negate,
        TokenKind::Not => UnaryOperator::Not,
        _ => return parse_primary_expr(parser),
    };

    let operator_token = parser.advance();
    let operand = parse_unary_expr(parser)?;
    let span = Span::between(&operator_token.span, &operand.span);

    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

pub fn parse_primary_expr(parser: &mut Parser) -> ParseResult<Expr> {
    match parser.current_token_kind() {
        TokenKind::Integer => {
            let token = parser.advance();
            match token.value.parse::<i64>() {
                Ok(value) => Ok(Expr::new(ExprKind::Integer(value), token.span)),
                Err(_) => {
                    let error = Error::new(
                        ErrorImpl::InvalidInteger {
                            token: token.value.clone(),
                        },
                        token.span.start.clone(),
                    );
                    Ok(Expr::with_errors(
                        ExprKind::Integer(0),
                        token.span,
                        vec![error],
                    ))
                }
            }
        }
        TokenKind::String => {
            let token = parser.advance();
            Ok(Expr::new(ExprKind::String(token.value), token.span))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Ok(Expr::new(
                ExprKind::Boolean(token.kind == TokenKind::True),
                token.span,
            ))
        }
        TokenKind::Null => {
            let token = parser.advance();
            Ok(Expr::new(ExprKind::Null, token.span))
        }
        TokenKind::Identifier => {
            if parser.peek_kind(1) == TokenKind::LeftParen {
                parse_call_expr(parser)
            } else {
                let token = parser.advance();
                Ok(Expr::new(ExprKind::Identifier(token.value), token.span))
            }
        }
        TokenKind::LeftBracket => parse_list_expr(parser),
        TokenKind::LeftParen => parse_grouping_expr(parser),
        _ => Err(PrimaryFailure {
            token: parser.current_token().clone(),
        }),
    }
}

/// Parses a comma separated expression list up to `closing`, which is left unconsumed.
fn parse_expr_list(parser: &mut Parser, closing: TokenKind) -> ParseResult<Vec<Expr>> {
    let mut values = vec![];
    if parser.current_token_kind() == closing {
        return Ok(values);
    }

    loop {
        values.push(parse_expr(parser)?);
        if !parser.match_and_consume(TokenKind::Comma) {
            break;
        }
    }

    Ok(values)
}

/// `name(arg, ...)`
pub fn parse_call_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let name = parser.advance();
    parser.advance();

    let arguments = parse_expr_list(parser, TokenKind::RightParen)?;

    let mut errors = vec![];
    parser.require_or(TokenKind::RightParen, ErrorImpl::UnterminatedArgList, &mut errors);

    let span = parser.span_from(&name.span);
    Ok(Expr::with_errors(
        ExprKind::Call(FunctionCall {
            name: name.value,
            arguments,
            symbol: None,
        }),
        span,
        errors,
    ))
}

/// `[value, ...]`
pub fn parse_list_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let open = parser.advance();

    let values = parse_expr_list(parser, TokenKind::RightBracket)?;

    let mut errors = vec![];
    parser.require_or(TokenKind::RightBracket, ErrorImpl::UnterminatedList, &mut errors);

    let span = parser.span_from(&open.span);
    Ok(Expr::with_errors(ExprKind::List(values), span, errors))
}

/// `( expr )`
pub fn parse_grouping_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let open = parser.advance();
    let inner = parse_expr(parser)?;

    let mut errors = vec![];
    parser.require_or(TokenKind::RightParen, ErrorImpl::UnterminatedParens, &mut errors);

    let span = parser.span_from(&open.span);
    Ok(Expr::with_errors(
        ExprKind::Parenthesized(Box::new(inner)),
        span,
        errors,
    ))
}
