use crate::error::ParseError;
use logos::{Lexer, Logos, Span, SpannedIter};
use std::borrow::Cow;

#[derive(Debug, Logos)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"\w+")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Value,

    #[token(",")]
    Comma,
}

#[derive(Debug)]
struct Token {
    pub ty: TokenTy,
    pub span: Span,
}

/// Single `name="value"` pair
///
/// `span` covers the name and is relative to the full header value (scheme token included)
#[derive(Debug)]
pub struct Param<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
    pub span: Span,
}

macro_rules! ensure {
    ($self:expr, $value:expr, $pattern:pat) => {{
        let Some(value) = $value else {
            $self.is_broken = true;
            return Some(Err(ParseError::UnexpectedEnd));
        };

        let value = match value {
            Ok(value) => value,
            Err(span) => {
                $self.is_broken = true;
                return Some(Err($self.unexpected(span)));
            }
        };

        if !matches!(value.ty, $pattern) {
            $self.is_broken = true;
            return Some(Err($self.unexpected(value.span)));
        }

        value
    }};
}

pub struct ParamIter<'a> {
    /// Stream of tokens produced by the lexer
    inner: SpannedIter<'a, TokenTy>,

    /// Reference to the parameter list that was fed to the lexer
    input: &'a str,

    /// Offset of `input` inside the full header value
    offset: usize,

    /// Marker whether we encountered any error or illegal token
    ///
    /// If we did, the iterator will stop yielding any results
    is_broken: bool,
}

impl ParamIter<'_> {
    /// Pull the next token, turning lexer errors into the offending span
    fn next_token(&mut self) -> Option<Result<Token, Span>> {
        let (ty, span) = self.inner.next()?;
        Some(ty.map(|ty| Token { ty, span: span.clone() }).map_err(|()| span))
    }

    fn shift(&self, span: Span) -> Span {
        (span.start + self.offset)..(span.end + self.offset)
    }

    fn unexpected(&self, span: Span) -> ParseError {
        ParseError::UnexpectedToken {
            span: self.shift(span).into(),
        }
    }
}

impl<'a> Iterator for ParamIter<'a> {
    type Item = Result<Param<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_broken {
            return None;
        }

        // A clean end of input is only legal in front of a key
        let key = match self.next_token()? {
            Ok(token) if matches!(token.ty, TokenTy::Key) => token,
            Ok(token) => {
                self.is_broken = true;
                return Some(Err(self.unexpected(token.span)));
            }
            Err(span) => {
                self.is_broken = true;
                return Some(Err(self.unexpected(span)));
            }
        };
        ensure!(self, self.next_token(), TokenTy::Equals);
        let value = ensure!(self, self.next_token(), TokenTy::Value);

        if let Some(next) = self.next_token() {
            ensure!(self, Some(next), TokenTy::Comma);
        }

        let name = &self.input[key.span.clone()];
        let quoted = &self.input[value.span];
        let value = super::unescape(&quoted[1..quoted.len() - 1]);

        Some(Ok(Param {
            name,
            value,
            span: self.shift(key.span),
        }))
    }
}

/// Strip the `Signature` scheme token and tokenize the remaining parameter list
pub fn parse(input: &str) -> Result<ParamIter<'_>, ParseError> {
    let trimmed = input.trim_start();
    let (scheme, params) = trimmed
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((trimmed, ""));

    if !scheme.eq_ignore_ascii_case(crate::SCHEME) {
        return Err(ParseError::MissingScheme);
    }

    Ok(ParamIter {
        inner: Lexer::<'_, TokenTy>::new(params).spanned(),
        input: params,
        offset: input.len() - params.len(),
        is_broken: false,
    })
}
