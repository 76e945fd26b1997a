//!
//! Canonical signing string construction
//!
//! Every listed header becomes one line:
//!
//! ```text
//! GET /index.html HTTP/1.1
//! date: Tue, 07 Jun 2014 20:51:35 GMT
//! accept: text/html, application/json
//! ```
//!
//! The `request-line` pseudo-header contributes the bare request line. Lines are joined with `\n`, without a trailing newline.
//!

use crate::{error::MissingHeaderError, SignableRequest, REQUEST_LINE};

/// Separator between multiple values of the same header
pub const VALUE_SEPARATOR: &[u8] = b", ";

/// Construct the signing string for the ordered header list
///
/// Fails if any of the listed headers has no value on the request
pub fn construct<R, S>(headers: &[S], request: &R) -> Result<Vec<u8>, MissingHeaderError>
where
    R: SignableRequest,
    S: AsRef<str>,
{
    let mut signing_string = Vec::new();

    for (idx, name) in headers.iter().map(AsRef::as_ref).enumerate() {
        if idx > 0 {
            signing_string.push(b'\n');
        }

        if name.eq_ignore_ascii_case(REQUEST_LINE) {
            signing_string.extend_from_slice(request.request_line().as_bytes());
            continue;
        }

        let mut values = request.header_values(name).peekable();
        if values.peek().is_none() {
            return Err(MissingHeaderError::new(name));
        }

        signing_string.extend(name.bytes().map(|byte| byte.to_ascii_lowercase()));
        signing_string.extend_from_slice(b": ");

        for (value_idx, value) in values.enumerate() {
            if value_idx > 0 {
                signing_string.extend_from_slice(VALUE_SEPARATOR);
            }

            signing_string.extend_from_slice(value);
        }
    }

    trace!(len = signing_string.len(), "constructed signing string");

    Ok(signing_string)
}
