//! Reader for Netscape-formatted cookie files.
//!
//! Each data line of a cookie file holds seven tab-separated fields:
//!
//! ```text
//! domain  include-subdomains  path  secure  expiry  name  value
//! ```
//!
//! Every field is checked against a strict grammar before a [`Cookie`](cookie/struct.Cookie.html)
//! is produced. Lines prefixed with `#HttpOnly_` describe HTTP-only cookies; any other line
//! starting with `#` is a comment.
//!
//! See <https://curl.se/docs/http-cookies.html> for a description of the format.

#![deny(missing_docs)]

#[macro_use]
extern crate error_chain;
extern crate idna;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
#[cfg(test)]
extern crate proptest;
extern crate psl;
#[cfg(test)]
extern crate tempfile;
extern crate time;
extern crate url;

pub mod cookie;
pub mod error;
pub mod file;
pub mod jar;

pub use cookie::{Builder, Cookie, Expires};
pub use file::{load, load_jar, Loader, OnError};
pub use jar::Jar;
