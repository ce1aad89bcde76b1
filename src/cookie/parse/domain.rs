//! Domains in cookie files follow the host name rules of
//! [RFC1035](https://tools.ietf.org/html/rfc1035#section-2.3.1), relaxed by
//! [RFC1123](https://tools.ietf.org/html/rfc1123#page-13) so that labels may start with a digit.
//!
//! ```text
//! subdomain = [ "." ] label *( "." label )
//! label     = let-dig [ *( let-dig / "-" ) let-dig ]
//! let-dig   = ALPHA / DIGIT
//! ```
//!
//! A single leading dot marks a cookie that also applies to subdomains. A trailing dot, an empty
//! label or a label starting or ending with a hyphen is never accepted.

use std::fmt;

use error::parser::*;

/// Upper bound on the number of labels in a domain.
///
/// Each label costs one level of recursion in the parser.
pub const MAX_LABELS: usize = 127;

/// Classification of the byte under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// The cursor is past the end of the domain.
    End,
    /// `-`
    Hyphen,
    /// `.`
    Dot,
    /// `0-9`
    Digit,
    /// `a-z` or `A-Z`
    Letter,
    /// Anything else, including every byte of a non-ASCII character.
    Invalid,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Token::End => "EOF",
            Token::Hyphen => "HYPHEN",
            Token::Dot => "POINT",
            Token::Digit => "DIGIT",
            Token::Letter => "LETTER",
            Token::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// Classify the byte of `source` at `index`.
pub fn token_at(source: &[u8], index: usize) -> Token {
    match source.get(index) {
        None => Token::End,
        Some(&b'.') => Token::Dot,
        Some(&b'-') => Token::Hyphen,
        Some(byte) if byte.is_ascii_digit() => Token::Digit,
        Some(byte) if byte.is_ascii_alphabetic() => Token::Letter,
        Some(_) => Token::Invalid,
    }
}

/// Check that a string is a valid, optionally dot-prefixed, domain name.
pub fn validate(domain: &str) -> Result<()> {
    Validator::new(domain).parse_subdomain(Expect::Start)
}

/// Where in the domain a subdomain is being parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// The start of the domain, where a single dot may precede the first label.
    Start,
    /// Directly after a label, where exactly one dot must separate it from the next.
    AfterLabel,
}

/// A single pass over a domain.
struct Validator<'s> {
    domain: &'s str,
    pos: usize,
    labels: usize,
}

impl<'s> Validator<'s> {
    fn new(domain: &'s str) -> Validator<'s> {
        Validator {
            domain: domain,
            pos: 0,
            labels: 0,
        }
    }

    /// The token under the cursor.
    fn token(&self) -> Token {
        token_at(self.domain.as_bytes(), self.pos)
    }

    /// The token following the cursor.
    fn peek(&self) -> Token {
        token_at(self.domain.as_bytes(), self.pos + 1)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, position: usize, token: Token) -> Error {
        ErrorKind::InvalidDomain(self.domain.to_owned(), position, token).into()
    }

    fn parse_subdomain(&mut self, expect: Expect) -> Result<()> {
        let token = self.token();
        match expect {
            Expect::Start => {
                if token == Token::Dot {
                    self.advance();
                }
            }
            Expect::AfterLabel => {
                if token != Token::Dot {
                    return Err(self.unexpected(self.pos, token));
                }
                self.advance();
            }
        }
        self.parse_label()
    }

    fn parse_label(&mut self) -> Result<()> {
        self.labels += 1;
        ensure!(
            self.labels <= MAX_LABELS,
            ErrorKind::TooManyLabels(self.domain.to_owned(), MAX_LABELS)
        );

        match self.token() {
            Token::Letter | Token::Digit => self.advance(),
            token => return Err(self.unexpected(self.pos, token)),
        }

        loop {
            match self.token() {
                Token::Letter | Token::Digit => self.advance(),
                // A hyphen must be followed by more of the label.
                Token::Hyphen => match self.peek() {
                    Token::Letter | Token::Digit | Token::Hyphen => self.advance(),
                    next => return Err(self.unexpected(self.pos + 1, next)),
                },
                Token::Dot => return self.parse_subdomain(Expect::AfterLabel),
                Token::End => return Ok(()),
                Token::Invalid => return Err(self.unexpected(self.pos, Token::Invalid)),
            }
        }
    }
}
