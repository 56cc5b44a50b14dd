use log::debug;

use crate::{
    ast::statements::{FunctionDefinition, Parameter, Stmt, StmtKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    expr::{parse_call_expr, parse_expr, EXPRESSION_START},
    parser::{unexpected_token_error, ParseContext, ParseResult, Parser, PrimaryFailure},
    types::parse_type_literal,
};

/// Keywords where parsing resumes after a failed statement.
const SYNC_KEYWORDS: [TokenKind; 5] = [
    TokenKind::Var,
    TokenKind::For,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::Print,
];

/// Parses one statement. Never fails and always consumes at least one token.
///
/// A primary expression failure anywhere inside the statement turns the whole
/// statement into a syntax error, after which the stream is resynchronised.
pub fn parse_stmt(parser: &mut Parser, context: &ParseContext<'_>) -> Stmt {
    let kind = parser.current_token_kind();
    let handler = match kind {
        TokenKind::Return if !context.in_function() => None,
        _ => parser.get_stmt_lookup().get(&kind).copied(),
    };

    let Some(handler) = handler else {
        let token = parser.advance();
        return syntax_error_stmt(token);
    };

    let start = parser.mark();
    match handler(parser, context) {
        Ok(stmt) => stmt,
        Err(failure) => recover(parser, start, failure),
    }
}

fn syntax_error_stmt(token: Token) -> Stmt {
    let error = unexpected_token_error(&token);
    let span = token.span.clone();
    Stmt::new(StmtKind::SyntaxError(token), span, vec![error])
}

/// Skips to the next synchronisation keyword.
///
/// The offending token is skipped too, unless it is itself a synchronisation
/// keyword and the failed statement already consumed something.
fn recover(parser: &mut Parser, start: usize, failure: PrimaryFailure) -> Stmt {
    let made_progress = parser.mark() > start;
    if !(made_progress && parser.matches(&SYNC_KEYWORDS)) {
        parser.advance();
    }
    while parser.has_tokens() && !parser.matches(&SYNC_KEYWORDS) {
        parser.advance();
    }

    debug!(
        "recovered from unexpected token {:?} at offset {}, resuming at {:?}",
        failure.token.value,
        failure.token.span.start.0,
        parser.current_token().value
    );

    syntax_error_stmt(failure.token)
}

/// `{ stmt* }`
fn parse_body(
    parser: &mut Parser,
    context: &ParseContext<'_>,
    errors: &mut Vec<Error>,
) -> Vec<Stmt> {
    parser.require(TokenKind::LeftBrace, errors);

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::RightBrace {
        body.push(parse_stmt(parser, context));
    }

    parser.require_or(TokenKind::RightBrace, ErrorImpl::UnterminatedBody, errors);
    body
}

/// `print ( expr )`
pub fn parse_print_stmt(parser: &mut Parser, _context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();
    let mut errors = vec![];

    parser.require(TokenKind::LeftParen, &mut errors);
    let value = parse_expr(parser)?;
    parser.require(TokenKind::RightParen, &mut errors);

    Ok(Stmt::new(
        StmtKind::Print(value),
        parser.span_from(&start.span),
        errors,
    ))
}

/// `for ( name in expr ) { body }`
pub fn parse_for_stmt(parser: &mut Parser, context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();
    let mut errors = vec![];

    parser.require(TokenKind::LeftParen, &mut errors);
    let variable = parser.require(TokenKind::Identifier, &mut errors).value;
    parser.require(TokenKind::In, &mut errors);
    let iterable = parse_expr(parser)?;
    parser.require(TokenKind::RightParen, &mut errors);

    let body = parse_body(parser, context, &mut errors);

    Ok(Stmt::new(
        StmtKind::ForEach {
            variable,
            iterable,
            body,
        },
        parser.span_from(&start.span),
        errors,
    ))
}

/// `if ( expr ) { body } [else if ... | else { body }]`
pub fn parse_if_stmt(parser: &mut Parser, context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();
    let mut errors = vec![];

    parser.require(TokenKind::LeftParen, &mut errors);
    let condition = parse_expr(parser)?;
    parser.require(TokenKind::RightParen, &mut errors);

    let then_body = parse_body(parser, context, &mut errors);

    let else_body = if parser.match_and_consume(TokenKind::Else) {
        if parser.current_token_kind() == TokenKind::If {
            // Own statement boundary, so a broken `else if` leaves this `if` intact
            Some(vec![parse_stmt(parser, context)])
        } else {
            Some(parse_body(parser, context, &mut errors))
        }
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_body,
            else_body,
        },
        parser.span_from(&start.span),
        errors,
    ))
}

/// `var name [: type] = expr`
pub fn parse_var_decl_stmt(parser: &mut Parser, _context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();
    let mut errors = vec![];

    let name = parser.require(TokenKind::Identifier, &mut errors).value;

    let explicit_type = if parser.match_and_consume(TokenKind::Colon) {
        Some(parse_type_literal(parser))
    } else {
        None
    };

    parser.require(TokenKind::Equal, &mut errors);
    let value = parse_expr(parser)?;

    Ok(Stmt::new(
        StmtKind::VarDecl {
            name,
            explicit_type,
            value,
        },
        parser.span_from(&start.span),
        errors,
    ))
}

/// `name = expr` or `name(args)`
pub fn parse_identifier_stmt(parser: &mut Parser, _context: &ParseContext<'_>) -> ParseResult<Stmt> {
    match parser.peek_kind(1) {
        TokenKind::LeftParen => {
            let call = parse_call_expr(parser)?;
            let span = call.span.clone();
            Ok(Stmt::new(StmtKind::Call(call), span, vec![]))
        }
        TokenKind::Equal => {
            let name = parser.advance();
            parser.advance();
            let value = parse_expr(parser)?;

            Ok(Stmt::new(
                StmtKind::Assignment {
                    name: name.value,
                    value,
                },
                parser.span_from(&name.span),
                vec![],
            ))
        }
        _ => {
            let token = parser.advance();
            Ok(syntax_error_stmt(token))
        }
    }
}

/// `function name ( [param [: type], ...] ) [: type] { body }`
pub fn parse_fn_decl_stmt(parser: &mut Parser, _context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();
    let mut errors = vec![];

    let name = parser.require(TokenKind::Identifier, &mut errors).value;
    parser.require(TokenKind::LeftParen, &mut errors);

    let mut parameters = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        let parameter_name = parser.advance().value;
        let type_literal = if parser.match_and_consume(TokenKind::Colon) {
            Some(parse_type_literal(parser))
        } else {
            None
        };
        parameters.push(Parameter {
            name: parameter_name,
            type_literal,
        });

        if !parser.match_and_consume(TokenKind::Comma) {
            break;
        }
    }
    parser.require(TokenKind::RightParen, &mut errors);

    let return_type = if parser.match_and_consume(TokenKind::Colon) {
        Some(parse_type_literal(parser))
    } else {
        None
    };

    let body_context = ParseContext::inside_function(&name);
    let body = parse_body(parser, &body_context, &mut errors);

    Ok(Stmt::new(
        StmtKind::FunctionDef(FunctionDefinition {
            symbol: name.clone(),
            name,
            parameters,
            return_type,
            body,
        }),
        parser.span_from(&start.span),
        errors,
    ))
}

/// `return [expr]`, only inside a function body.
pub fn parse_return_stmt(parser: &mut Parser, _context: &ParseContext<'_>) -> ParseResult<Stmt> {
    let start = parser.advance();

    let value = if parser.matches(&EXPRESSION_START) {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::Return(value),
        parser.span_from(&start.span),
        vec![],
    ))
}
