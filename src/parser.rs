//! Tokenizer and reader for s-expressions.
//!
//! Parsing happens in two stages. [`tokenize`] lexes source text into a flat
//! sequence of tokens: `(` and `)` are single tokens, everything else splits
//! on runs of whitespace. The reader then consumes that sequence through a
//! front-to-back cursor, building one [`Expression`] recursively as matched
//! parentheses are consumed. [`parse`] is the public entry point and reads
//! exactly one expression; tokens after the first complete form are ignored,
//! matching one-form-per-line read-loop usage.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::multispace0,
    sequence::preceded,
};

use crate::ast::{Expression, NumberType};
use crate::{Error, MAX_PARSE_DEPTH, ParseError, ParseErrorKind};

/// Lex one token: a parenthesis, or a maximal run of non-whitespace,
/// non-parenthesis characters.
fn lex_token(input: &str) -> IResult<&str, &str> {
    preceded(
        multispace0,
        alt((
            tag("("),
            tag(")"),
            take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')'),
        )),
    )
    .parse(input)
}

/// Split raw source text into a flat sequence of lexical tokens.
///
/// Pure and infallible: empty or whitespace-only input yields an empty
/// sequence. There is no quoting, comment, or escape handling.
pub fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while let Ok((remaining, token)) = lex_token(rest) {
        tokens.push(token);
        rest = remaining;
    }
    tokens
}

/// Cursor over an immutable token sequence, consumed front to back by the
/// recursive reader.
struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: Vec<&'a str>) -> Self {
        TokenCursor { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }
}

fn unexpected_eof() -> Error {
    Error::ParseError(ParseError::new(
        ParseErrorKind::UnexpectedEof,
        "unexpected end of input",
    ))
}

/// Read one expression from the front of the token sequence.
fn read_expression(tokens: &mut TokenCursor<'_>, depth: usize) -> Result<Expression, Error> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(Error::ParseError(ParseError::new(
            ParseErrorKind::TooDeeplyNested,
            format!("expression too deeply nested (max depth: {MAX_PARSE_DEPTH})"),
        )));
    }

    let token = tokens.next().ok_or_else(unexpected_eof)?;
    match token {
        "(" => {
            let mut elements = Vec::new();
            loop {
                match tokens.peek() {
                    Some(")") => {
                        tokens.next();
                        return Ok(Expression::List(elements));
                    }
                    Some(_) => elements.push(read_expression(tokens, depth + 1)?),
                    None => return Err(unexpected_eof()),
                }
            }
        }
        ")" => Err(Error::ParseError(ParseError::new(
            ParseErrorKind::UnexpectedToken,
            "unexpected )",
        ))),
        atom => Ok(read_atom(atom)),
    }
}

/// Tokens that parse as numeric literals become numbers; every other token
/// is a symbol.
fn read_atom(token: &str) -> Expression {
    match token.parse::<NumberType>() {
        Ok(n) => Expression::Number(n),
        Err(_) => Expression::Symbol(token.to_owned()),
    }
}

/// Parse one expression from source text.
pub fn parse(input: &str) -> Result<Expression, Error> {
    let mut tokens = TokenCursor::new(tokenize(input));
    read_expression(&mut tokens, 0)
}
