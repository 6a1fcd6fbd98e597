//! Tokenizer for the OpenStep property-list syntax used by pbxproj files

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Equals,
    Semicolon,
    Comma,
    /// `/* ... */`, trimmed
    Comment(String),
    /// Bare word or quoted string, unescaped
    String { text: String, quoted: bool },
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    /// 1-based line number of a byte offset, for diagnostics.
    pub fn line_of(&self, offset: usize) -> usize {
        self.src[..offset.min(self.src.len())].matches('\n').count() + 1
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                let line_len = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += line_len;
                continue;
            }
            break;
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia();
        let start = self.pos;
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };

        let punct = match first {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '=' => Some(TokenKind::Equals),
            ';' => Some(TokenKind::Semicolon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = punct {
            self.pos += 1;
            return Ok(Some(Token {
                kind,
                start,
                end: self.pos,
            }));
        }

        if rest.starts_with("/*") {
            let close = rest[2..].find("*/").ok_or_else(|| {
                Error::parse(self.line_of(start), "unterminated comment")
            })?;
            let body = rest[2..2 + close].trim().to_string();
            self.pos += close + 4;
            return Ok(Some(Token {
                kind: TokenKind::Comment(body),
                start,
                end: self.pos,
            }));
        }

        if first == '"' {
            let text = self.quoted_string(start)?;
            return Ok(Some(Token {
                kind: TokenKind::String { text, quoted: true },
                start,
                end: self.pos,
            }));
        }

        let len = bare_word_len(rest);
        if len == 0 {
            return Err(Error::parse(
                self.line_of(start),
                format!("unexpected character {first:?}"),
            ));
        }
        self.pos += len;
        Ok(Some(Token {
            kind: TokenKind::String {
                text: rest[..len].to_string(),
                quoted: false,
            },
            start,
            end: self.pos,
        }))
    }

    fn quoted_string(&mut self, start: usize) -> Result<String> {
        let mut text = String::new();
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += idx + 1;
                    return Ok(text);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, other)) => text.push(other),
                    None => break,
                },
                _ => text.push(c),
            }
        }
        Err(Error::parse(self.line_of(start), "unterminated string"))
    }
}

fn bare_word_len(rest: &str) -> usize {
    let mut len = 0;
    for (idx, c) in rest.char_indices() {
        if c.is_whitespace() || matches!(c, '{' | '}' | '(' | ')' | '=' | ';' | ',' | '"') {
            break;
        }
        if rest[idx..].starts_with("/*") || rest[idx..].starts_with("//") {
            break;
        }
        len = idx + c.len_utf8();
    }
    len
}
