use crate::{error::MissingHeaderError, signing_string, DATE, REQUEST_LINE};
use http::{header::HeaderName, request::Parts, HeaderMap, HeaderValue, Method, Uri, Version};
use std::time::SystemTime;

/// Request as seen by the signing string builder and the verifier
pub trait SignableRequest {
    /// Request method (`GET`, `POST`, ...)
    fn method(&self) -> &str;

    /// Request path including the query string
    fn path(&self) -> &str;

    /// Protocol version (`HTTP/1.1`, ...)
    fn protocol(&self) -> &str;

    /// Names of all headers present on the request, each listed once
    fn header_names(&self) -> impl Iterator<Item = &str>;

    /// Values of a header in the order they were received
    ///
    /// Name lookup is case-insensitive
    fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [u8]>;

    /// The request line in `METHOD PATH PROTOCOL` form
    fn request_line(&self) -> String {
        format!("{} {} {}", self.method(), self.path(), self.protocol())
    }

    /// Whether the header has at least one value
    ///
    /// The `request-line` pseudo-header is always present
    fn has_header(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(REQUEST_LINE) || self.header_values(name).next().is_some()
    }

    /// Parsed value of the `Date` header
    fn date(&self) -> Option<SystemTime> {
        let value = self.header_values(DATE).next()?;
        let value = std::str::from_utf8(value).ok()?;
        httpdate::parse_http_date(value).ok()
    }

    /// Signing string for the ordered list of header names
    fn signable_content<S>(&self, headers: &[S]) -> Result<Vec<u8>, MissingHeaderError>
    where
        S: AsRef<str>,
        Self: Sized,
    {
        signing_string::construct(headers, self)
    }
}

#[inline]
fn uri_path(uri: &Uri) -> &str {
    uri.path_and_query()
        .map_or_else(|| uri.path(), |path_and_query| path_and_query.as_str())
}

#[inline]
fn protocol(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_2 {
        "HTTP/2.0"
    } else if version == Version::HTTP_3 {
        "HTTP/3.0"
    } else {
        "HTTP/1.1"
    }
}

#[inline]
fn header_names(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers.keys().map(HeaderName::as_str)
}

#[inline]
fn header_values<'a>(headers: &'a HeaderMap, name: &str) -> impl Iterator<Item = &'a [u8]> {
    headers.get_all(name).iter().map(HeaderValue::as_bytes)
}

impl<B> SignableRequest for http::Request<B> {
    fn method(&self) -> &str {
        Method::as_str(self.method())
    }

    fn path(&self) -> &str {
        uri_path(self.uri())
    }

    fn protocol(&self) -> &str {
        protocol(self.version())
    }

    fn header_names(&self) -> impl Iterator<Item = &str> {
        header_names(self.headers())
    }

    fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [u8]> {
        header_values(self.headers(), name)
    }
}

impl SignableRequest for Parts {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        uri_path(&self.uri)
    }

    fn protocol(&self) -> &str {
        protocol(self.version)
    }

    fn header_names(&self) -> impl Iterator<Item = &str> {
        header_names(&self.headers)
    }

    fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [u8]> {
        header_values(&self.headers, name)
    }
}
