//! Recursive-descent parser over [`Lexer`] tokens

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::{Dict, Scalar, Value};

/// One `KEY /* comment */ = { ... };` entry of an objects section.
#[derive(Debug)]
pub(crate) struct ParsedRecord {
    pub key: Scalar,
    pub body: Dict,
    /// Offset of the key token
    pub start: usize,
    /// Offset just past the terminating `;`
    pub end: usize,
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, pos: usize) -> Self {
        Self {
            lexer: Lexer::new(src, pos),
            peeked: None,
        }
    }

    fn next(&mut self) -> Result<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Next token that is not a stray comment.
    fn next_significant(&mut self) -> Result<Option<Token>> {
        loop {
            match self.next()? {
                Some(Token {
                    kind: TokenKind::Comment(_),
                    ..
                }) => continue,
                other => return Ok(other),
            }
        }
    }

    fn unexpected(&self, token: Option<&Token>, expected: &str) -> Error {
        match token {
            Some(t) => Error::parse(
                self.lexer.line_of(t.start),
                format!("expected {expected}, found {:?}", t.kind),
            ),
            None => Error::parse(
                self.lexer.line_of(usize::MAX),
                format!("expected {expected}, found end of input"),
            ),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        let token = self.next_significant()?;
        match token {
            Some(t) if t.kind == kind => Ok(t),
            other => Err(self.unexpected(other.as_ref(), expected)),
        }
    }

    /// Attach a directly following `/* comment */` to a scalar.
    fn scalar_from(&mut self, text: String, quoted: bool) -> Result<Scalar> {
        let mut scalar = Scalar {
            text,
            quoted,
            comment: None,
        };
        let annotated = matches!(
            self.peek()?,
            Some(Token {
                kind: TokenKind::Comment(_),
                ..
            })
        );
        if annotated
            && let Some(Token {
                kind: TokenKind::Comment(body),
                ..
            }) = self.next()?
        {
            scalar.comment = Some(body);
        }
        Ok(scalar)
    }

    /// Parse the next record, or `None` at end of input.
    pub fn parse_record(&mut self) -> Result<Option<ParsedRecord>> {
        let Some(token) = self.next_significant()? else {
            return Ok(None);
        };
        let start = token.start;
        let key = match token.kind {
            TokenKind::String { text, quoted } => self.scalar_from(text, quoted)?,
            other => {
                return Err(Error::parse(
                    self.lexer.line_of(start),
                    format!("expected object identifier, found {other:?}"),
                ));
            }
        };
        self.expect(TokenKind::Equals, "'='")?;
        let body = match self.parse_value()? {
            Value::Dict(dict) => dict,
            _ => {
                return Err(Error::parse(
                    self.lexer.line_of(start),
                    format!("record {} is not a dictionary", key.text),
                ));
            }
        };
        let semi = self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Some(ParsedRecord {
            key,
            body,
            start,
            end: semi.end,
        }))
    }

    pub fn parse_value(&mut self) -> Result<Value> {
        let token = self.next_significant()?;
        match token {
            Some(Token {
                kind: TokenKind::String { text, quoted },
                ..
            }) => Ok(Value::Scalar(self.scalar_from(text, quoted)?)),
            Some(Token {
                kind: TokenKind::LBrace,
                ..
            }) => self.parse_dict_body().map(Value::Dict),
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => self.parse_array_body().map(Value::Array),
            other => Err(self.unexpected(other.as_ref(), "value")),
        }
    }

    fn parse_dict_body(&mut self) -> Result<Dict> {
        let mut dict = Dict::new();
        loop {
            let token = self.next_significant()?;
            let key = match token {
                Some(Token {
                    kind: TokenKind::RBrace,
                    ..
                }) => return Ok(dict),
                Some(Token {
                    kind: TokenKind::String { text, quoted },
                    ..
                }) => self.scalar_from(text, quoted)?,
                other => return Err(self.unexpected(other.as_ref(), "key or '}'")),
            };
            self.expect(TokenKind::Equals, "'='")?;
            let value = self.parse_value()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            dict.push(key, value);
        }
    }

    fn parse_array_body(&mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            let closing = matches!(
                self.peek_significant()?,
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                })
            );
            if closing {
                self.next()?;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            match self.next_significant()? {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => return Ok(items),
                other => return Err(self.unexpected(other.as_ref(), "',' or ')'")),
            }
        }
    }

    fn peek_significant(&mut self) -> Result<Option<&Token>> {
        loop {
            let stray = matches!(
                self.peek()?,
                Some(Token {
                    kind: TokenKind::Comment(_),
                    ..
                })
            );
            if !stray {
                return self.peek();
            }
            self.peeked = None;
        }
    }
}
