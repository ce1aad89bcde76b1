//! Errors produced while reading cookie files.

#![allow(missing_docs)]

error_chain!{
    // Links to other error chains.
    links {
        CookieParse(parser::Error, parser::ErrorKind);
    }

    // Links to other standard errors.
    foreign_links {
        Io(::std::io::Error);
    }

    // Internal error forms.
    errors {
        Line(line: usize, kind: parser::ErrorKind) {
            description("A line of the cookie file was invalid"),
            display("Line {}: {}", line, kind),
        }
        InvalidHost(host: String) {
            description("The host could not be normalised"),
            display("Invalid host: {:?}", host),
        }
        PublicSuffix(domain: String) {
            description("Subdomain cookies may not be set on a public suffix"),
            display("Refusing subdomain cookie for public suffix {:?}", domain),
        }
    }
}

impl Error {
    /// The field-level error behind this error, if there is one.
    pub fn parser_kind(&self) -> Option<&parser::ErrorKind> {
        match *self.kind() {
            ErrorKind::Line(_, ref kind) | ErrorKind::CookieParse(ref kind) => Some(kind),
            _ => None,
        }
    }

    /// The line number of the cookie file the error occurred on.
    pub fn line(&self) -> Option<usize> {
        match *self.kind() {
            ErrorKind::Line(line, _) => Some(line),
            _ => None,
        }
    }
}

/// Errors specific to parsing the cookie.
pub mod parser {
    use std::fmt;
    use std::num::ParseIntError;

    pub use cookie::parse::Token;

    error_chain!{
        errors {
            FieldCount(found: usize) {
                description("A cookie line did not contain exactly seven fields"),
                display("Invalid amount of fields: expected 7, found {}", found),
            }
            InvalidDomain(domain: String, position: usize, token: Token) {
                description("The domain name did not match the label grammar"),
                display(
                    "Domain name validation failed: {:?}, pos {}, unexpected token: {}",
                    domain,
                    position + 1,
                    token
                ),
            }
            TooManyLabels(domain: String, max: usize) {
                description("The domain name had too many labels"),
                display(
                    "Domain name validation failed: {:?} has more than {} labels",
                    domain,
                    max
                ),
            }
            IllegalCharacter(field: Field, input: String, character: char, index: usize) {
                description("A cookie field contained an illegal character"),
                display(
                    "{} {:?}, illegal character \"{}\" at index {}",
                    field,
                    input,
                    character.escape_default(),
                    index
                ),
            }
            InvalidBoolean(input: String) {
                description("A flag was neither TRUE nor FALSE"),
                display("Invalid boolean expression: {}", input),
            }
            InvalidExpiry(input: String, cause: ParseIntError) {
                description("The expiry was not a decimal timestamp"),
                display("Invalid expiry {:?}: {}", input, cause),
            }
            MissingField(field: Field) {
                description("The cookie was built without a required field"),
                display("{} was never set", field),
            }
        }
    }

    impl ErrorKind {
        /// The cookie field the error is about.
        pub fn field(&self) -> Option<Field> {
            match *self {
                ErrorKind::FieldCount(_) => Some(Field::FieldCount),
                ErrorKind::InvalidDomain(..) | ErrorKind::TooManyLabels(..) => Some(Field::Domain),
                ErrorKind::IllegalCharacter(field, ..) => Some(field),
                ErrorKind::InvalidBoolean(_) => Some(Field::Secure),
                ErrorKind::InvalidExpiry(..) => Some(Field::Expiry),
                ErrorKind::MissingField(field) => Some(field),
                _ => None,
            }
        }

        /// The 0-based position of the offending character, if known.
        pub fn position(&self) -> Option<usize> {
            match *self {
                ErrorKind::InvalidDomain(_, position, _) => Some(position),
                ErrorKind::IllegalCharacter(_, _, _, index) => Some(index),
                _ => None,
            }
        }
    }

    /// The fields of a cookie file line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Field {
        /// The domain (first) field.
        Domain,
        /// The path (third) field.
        Path,
        /// The secure flag (fourth) field.
        Secure,
        /// The expiry (fifth) field.
        Expiry,
        /// The name (sixth) field.
        Name,
        /// The value (seventh) field.
        Value,
        /// The line as a whole, split into the wrong number of fields.
        FieldCount,
    }

    impl fmt::Display for Field {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            let name = match *self {
                Field::Domain => "Domain",
                Field::Path => "Path",
                Field::Secure => "Secure",
                Field::Expiry => "Expiry",
                Field::Name => "Name",
                Field::Value => "Value",
                Field::FieldCount => "Field count",
            };
            f.write_str(name)
        }
    }
}
