//!
//! Wire format shared by the `Authorization` and `WWW-Authenticate` header values
//!
//! ```text
//! Signature name="value",name="value",...
//! ```
//!
//! Values are quoted strings (RFC 7230, section 3.2.6). `"` and `\` inside of a value are escaped as quoted-pairs.
//!
//! List values (`headers`, `algorithms`, `discardKeyIds`) separate their items with single spaces.
//! Whitespace and `\` inside of an item are escaped with a backslash on top of that.
//!

use crate::error::ParseError;
use std::{
    borrow::Cow,
    fmt::{self, Display, Write},
    mem,
};

mod parse;

pub use self::parse::{parse, Param};

/// Store the value of a parameter, rejecting a second occurrence
#[inline]
pub fn assign<'a>(slot: &mut Option<Cow<'a, str>>, param: &Param<'a>) -> Result<(), ParseError> {
    if slot.replace(param.value.clone()).is_some() {
        return Err(ParseError::DuplicateParameter {
            name: param.name.to_string(),
            span: param.span.clone().into(),
        });
    }

    Ok(())
}

#[inline]
pub fn unknown(param: &Param<'_>) -> ParseError {
    ParseError::UnknownParameter {
        name: param.name.to_string(),
        span: param.span.clone().into(),
    }
}

fn escape_item(item: &str) -> Cow<'_, str> {
    if !item.contains(|c: char| c == '\\' || c.is_whitespace()) {
        return Cow::Borrowed(item);
    }

    let mut escaped = String::with_capacity(item.len() + 1);
    for c in item.chars() {
        if c == '\\' || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    Cow::Owned(escaped)
}

/// Join list items with single spaces
///
/// Empty items can't be represented and have to be filtered out beforehand
#[inline]
pub fn join<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    itertools::intersperse(items.into_iter().map(escape_item), Cow::Borrowed(" ")).collect()
}

/// Split a list on unescaped whitespace
pub fn split(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut item = String::new();

    let mut chars = list.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // A trailing backslash has nothing to escape and is dropped
            item.extend(chars.next());
        } else if c.is_whitespace() {
            if !item.is_empty() {
                items.push(mem::take(&mut item));
            }
        } else {
            item.push(c);
        }
    }

    if !item.is_empty() {
        items.push(item);
    }

    items
}

/// Resolve the quoted-pairs of a quoted string's content
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            unescaped.extend(chars.next());
        } else {
            unescaped.push(c);
        }
    }

    Cow::Owned(unescaped)
}

/// Writer turning `"` and `\` into quoted-pairs
struct Escaped<'a, 'b>(&'a mut fmt::Formatter<'b>);

impl Write for Escaped<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '"' || c == '\\' {
                self.0.write_char('\\')?;
            }
            self.0.write_char(c)?;
        }

        Ok(())
    }
}

/// Write the scheme token followed by the comma separated parameters
pub fn write_params(f: &mut fmt::Formatter<'_>, params: &[(&str, &dyn Display)]) -> fmt::Result {
    f.write_str(crate::SCHEME)?;
    f.write_char(' ')?;

    for (idx, (name, value)) in params.iter().enumerate() {
        if idx > 0 {
            f.write_char(',')?;
        }

        write!(f, "{name}=\"")?;
        write!(Escaped(f), "{value}")?;
        f.write_char('"')?;
    }

    Ok(())
}
