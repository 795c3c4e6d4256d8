//! URL checks and `Location` resolution
//!
//! Only what webhook endpoints need: `http`/`https`, host, optional port and
//! path (query included). No userinfo, no IPv6 literals.

use core::fmt::Write;

use heapless::String;

/// Longest redirect target kept
///
/// Script hosts redirect to result URLs carrying long opaque keys, well past
/// the configured endpoint length.
pub const MAX_LOCATION_LEN: usize = 512;

/// URL parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrlError {
    /// Not `http://` or `https://`
    UnsupportedScheme,
    /// Nothing between `//` and the path
    MissingHost,
    /// Port is not a number in 1..=65535
    InvalidPort,
    /// Resolved URL does not fit the buffer
    TooLong,
}

/// Supported schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub const fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// A parsed URL borrowing from its source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Url<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    pub port: u16,
    /// Path and query as written; may be empty or start with `?`
    pub path: &'a str,
}

impl<'a> Url<'a> {
    /// Parse an absolute URL
    pub fn parse(input: &'a str) -> Result<Self, UrlError> {
        let input = input.trim();
        let (scheme, rest) = if let Some(rest) = strip_prefix_ignore_case(input, "https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(input, "http://") {
            (Scheme::Http, rest)
        } else {
            return Err(UrlError::UnsupportedScheme);
        };

        // Fragments never go on the wire
        let rest = rest.split('#').next().unwrap_or(rest);

        let (authority, path) = match rest.find(['/', '?']) {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port.parse().map_err(|_| UrlError::InvalidPort)?;
                if port == 0 {
                    return Err(UrlError::InvalidPort);
                }
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };

        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    /// Check if the port is the scheme default
    pub fn has_default_port(&self) -> bool {
        self.port == self.scheme.default_port()
    }

    /// Resolve a `Location` header value against this URL
    pub fn resolve(&self, location: &str) -> Result<String<MAX_LOCATION_LEN>, UrlError> {
        let location = location.trim();
        let mut out = String::new();

        let written = if strip_prefix_ignore_case(location, "http://").is_some()
            || strip_prefix_ignore_case(location, "https://").is_some()
        {
            out.push_str(location)
        } else if let Some(rest) = location.strip_prefix("//") {
            write!(out, "{}://{}", self.scheme.as_str(), rest).map_err(|_| ())
        } else {
            self.write_origin(&mut out).map_err(|_| ()).and_then(|_| {
                if location.starts_with('/') {
                    out.push_str(location)
                } else {
                    let base = self.path.split('?').next().unwrap_or("/");
                    let dir = base.rfind('/').map_or("/", |i| &base[..=i]);
                    out.push_str(dir).and_then(|_| out.push_str(location))
                }
            })
        };

        written.map_err(|_| UrlError::TooLong)?;
        Ok(out)
    }

    fn write_origin(&self, out: &mut String<MAX_LOCATION_LEN>) -> core::fmt::Result {
        write!(out, "{}://{}", self.scheme.as_str(), self.host)?;
        if !self.has_default_port() {
            write!(out, ":{}", self.port)?;
        }
        Ok(())
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}
