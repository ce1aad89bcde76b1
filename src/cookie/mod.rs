//! Representation of a cookie read from a cookie file.

pub mod parse;

use std::ops::Deref;

use self::parse::{
    parse_bool, parse_expiry, split_line, validate_domain, validate_name, validate_path,
    validate_value,
};
use error::parser::*;
use time::Timespec;

/// A builder for a cookie.
///
/// Every setter validates its field, so a built cookie has passed all of the field checks.
/// The first failing setter turns the builder into an error and later setters are ignored.
#[derive(Debug)]
pub enum Builder {
    /// A partially constructed cookie.
    Cookie(Draft),

    /// An error.
    Err(Error),
}

impl From<Error> for Builder {
    fn from(e: Error) -> Builder {
        Builder::Err(e)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    /// Create a new cookie builder.
    ///
    /// The default cookie is a non-secure session cookie with an empty value.
    pub fn new() -> Builder {
        Builder::Cookie(Default::default())
    }

    /// Set the domain of the cookie.
    ///
    /// A leading dot makes the cookie apply to all subdomains.
    pub fn domain(self, domain: &str) -> Builder {
        self.map(|draft| {
            validate_domain(domain)?;
            Ok(Draft {
                domain: Some(domain.to_owned()),
                ..
                draft
            })
        })
    }

    /// Set the path the cookie applies to.
    pub fn path(self, path: &str) -> Builder {
        self.map(|draft| {
            validate_path(path)?;
            Ok(Draft {
                path: Some(path.to_owned()),
                ..
                draft
            })
        })
    }

    /// Set the name of the cookie.
    pub fn name(self, name: &str) -> Builder {
        self.map(|draft| {
            validate_name(name)?;
            Ok(Draft {
                name: Some(name.to_owned()),
                ..
                draft
            })
        })
    }

    /// Set the value of the cookie.
    pub fn value(self, value: &str) -> Builder {
        self.map_attributes(|attributes| {
            validate_value(value)?;
            Ok(Attributes {
                value: value.to_owned(),
                ..
                attributes
            })
        })
    }

    /// Set the expiry time of a cookie.
    pub fn expiry(self, expiry: Expires) -> Builder {
        self.map_attributes(|attributes| {
            Ok(Attributes {
                expiry: expiry,
                ..
                attributes
            })
        })
    }

    /// Set the expiry time of a cookie from a count of seconds since the epoch.
    pub fn expiry_str(self, expiry: &str) -> Builder {
        match parse_expiry(expiry) {
            Ok(expiry) => self.expiry(expiry),
            Err(error) => self.fail(error),
        }
    }

    /// Set whether or not the cookie requires a secure connection.
    pub fn secure(self, secure: bool) -> Builder {
        self.map_attributes(|attributes| {
            Ok(Attributes {
                secure: secure,
                ..
                attributes
            })
        })
    }

    /// Set whether the cookie requires a secure connection from a `TRUE` or `FALSE` flag.
    pub fn secure_str(self, secure: &str) -> Builder {
        match parse_bool(secure) {
            Ok(secure) => self.secure(secure),
            Err(error) => self.fail(error),
        }
    }

    /// Set whether a cookie should only be sent of HTTP/HTTPS connections.
    pub fn http_only(self, http_only: bool) -> Builder {
        self.map_attributes(|attributes| {
            Ok(Attributes {
                http_only: http_only,
                ..
                attributes
            })
        })
    }

    /// Build the Cookie.
    ///
    /// The domain, path and name must have been set.
    pub fn build(self) -> Result<Cookie> {
        match self {
            Builder::Cookie(Draft { domain: None, .. }) => {
                bail!(ErrorKind::MissingField(Field::Domain))
            }
            Builder::Cookie(Draft { path: None, .. }) => {
                bail!(ErrorKind::MissingField(Field::Path))
            }
            Builder::Cookie(Draft { name: None, .. }) => {
                bail!(ErrorKind::MissingField(Field::Name))
            }
            Builder::Cookie(Draft {
                domain: Some(domain),
                path: Some(path),
                name: Some(name),
                attributes,
            }) => Ok(Cookie {
                domain: domain,
                path: path,
                name: name,
                attributes: attributes,
            }),
            Builder::Err(error) => Err(error),
        }
    }

    /// Record an error unless the builder has already failed.
    fn fail(self, error: Error) -> Builder {
        match self {
            Builder::Cookie(_) => Builder::Err(error),
            _ => self,
        }
    }

    fn map<F>(self, f: F) -> Builder
    where
        F: FnOnce(Draft) -> Result<Draft>,
    {
        match self {
            Builder::Cookie(draft) => match f(draft) {
                Ok(draft) => Builder::Cookie(draft),
                Err(error) => Builder::Err(error),
            },
            _ => self,
        }
    }

    fn map_attributes<F>(self, f: F) -> Builder
    where
        F: FnOnce(Attributes) -> Result<Attributes>,
    {
        self.map(|draft| {
            Ok(Draft {
                attributes: f(draft.attributes)?,
                ..
                draft
            })
        })
    }
}

/// The fields of a cookie set on a builder so far.
#[derive(Debug, Default)]
pub struct Draft {
    domain: Option<String>,
    path: Option<String>,
    name: Option<String>,
    attributes: Attributes,
}

/// A validated cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Domain the cookie applies to, with a leading dot if it also applies to subdomains.
    domain: String,

    /// Path restriction of the cookie.
    path: String,

    /// Name of the cookie.
    name: String,

    /// The cookie contents and security requirements.
    attributes: Attributes,
}

impl Deref for Cookie {
    type Target = Attributes;

    fn deref(&self) -> &Attributes {
        &self.attributes
    }
}

impl Cookie {
    /// Parse a single line of a cookie file.
    ///
    /// Blank lines and comments produce `None`.
    pub fn parse_line(line: &str) -> Result<Option<Cookie>> {
        let line = match split_line(line)? {
            Some(line) => line,
            None => return Ok(None),
        };

        Builder::new()
            .domain(line.domain())
            .path(line.path())
            .secure_str(line.secure())
            .expiry_str(line.expiry())
            .name(line.name())
            .value(line.value())
            .http_only(line.http_only())
            .build()
            .map(Some)
    }

    /// Get the domain exactly as it appeared in the cookie file.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Get the host the cookie belongs to.
    ///
    /// This is the domain without its leading dot.
    pub fn host(&self) -> &str {
        let domain = self.domain.as_str();
        if domain.starts_with('.') {
            &domain[1..]
        } else {
            domain
        }
    }

    /// Check if the cookie also applies to subdomains of its host.
    pub fn include_subdomains(&self) -> bool {
        self.domain.starts_with('.')
    }

    /// Check if the cookie applies to its host alone.
    pub fn host_only(&self) -> bool {
        !self.include_subdomains()
    }

    /// Get the path the cookie applies to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the name of the cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the (name, value) pair of a cookie.
    pub fn pair(&self) -> (&str, &str) {
        (&self.name, &self.attributes.value)
    }
}

/// The payload of the cookie including security requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Data stored within the cookie.
    value: String,

    /// The expiration time of the cookie in UTC.
    expiry: Expires,

    /// The cookie can only be sent over a TLS connection.
    secure: bool,

    /// The cookie can only be sent via a HTTP (or HTTPS) connection.
    http_only: bool,
}

impl Default for Attributes {
    fn default() -> Attributes {
        Attributes {
            value: String::new(),
            expiry: Expires::Never,
            secure: false,
            http_only: false,
        }
    }
}

impl Attributes {
    /// Get the value of a cookie.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check if the cookie requires a secure connection.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Check if the cookie should only be sent over http requests.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Get the expiry of the cookie.
    pub fn expiry(&self) -> &Expires {
        &self.expiry
    }
}

/// Expiry time of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expires {
    /// The cookie expires at a specified time from UTC.
    AtUtc(Timespec),
    /// The cookie never expires; it lasts for the session.
    Never,
}

impl Default for Expires {
    fn default() -> Expires {
        Expires::Never
    }
}

impl Expires {
    /// Check if this is a session cookie.
    pub fn is_session(&self) -> bool {
        *self == Expires::Never
    }

    /// Seconds since the Unix epoch, if the cookie expires at all.
    pub fn timestamp(&self) -> Option<i64> {
        match *self {
            Expires::AtUtc(time) => Some(time.sec),
            Expires::Never => None,
        }
    }
}
