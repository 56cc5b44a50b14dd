//! Type literal parsing.
//!
//! Type names are plain identifiers: `int`, `bool`, `string`, `object`,
//! `void` and `list`, the last one optionally followed by `<T>`.
//! A bare `list` means `list<object>`.

use crate::{
    ast::types::{CatscriptType, TypeLiteral},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses a type literal, reporting unknown names on the literal.
///
/// Unknown names still produce a literal of type OBJECT.
pub fn parse_type_literal(parser: &mut Parser) -> TypeLiteral {
    let mut errors = vec![];

    if parser.current_token_kind() != TokenKind::Identifier {
        let token = parser.current_token().clone();
        errors.push(Error::new(
            ErrorImpl::BadTypeName {
                name: token.value.clone(),
            },
            token.span.start.clone(),
        ));
        return TypeLiteral {
            ty: CatscriptType::Object,
            span: token.span,
            errors,
        };
    }

    let name = parser.advance();
    let ty = match name.value.as_str() {
        "int" => CatscriptType::Int,
        "bool" => CatscriptType::Boolean,
        "string" => CatscriptType::String,
        "object" => CatscriptType::Object,
        "void" => CatscriptType::Void,
        "list" => {
            if parser.match_and_consume(TokenKind::Less) {
                let component = parse_type_literal(parser);
                errors.extend(component.errors);
                // `list<int>= [1]` lexes the closing bracket as part of `>=`
                if parser.current_token_kind() == TokenKind::GreaterEqual {
                    parser.split_current_token(TokenKind::Greater, TokenKind::Equal);
                }
                parser.require(TokenKind::Greater, &mut errors);
                CatscriptType::list_of(component.ty)
            } else {
                CatscriptType::list_of(CatscriptType::Object)
            }
        }
        _ => {
            errors.push(Error::new(
                ErrorImpl::BadTypeName {
                    name: name.value.clone(),
                },
                name.span.start.clone(),
            ));
            CatscriptType::Object
        }
    };

    TypeLiteral {
        ty,
        span: parser.span_from(&name.span),
        errors,
    }
}
