//! Parsing for the fields of a cookie file line.

mod domain;

pub use self::domain::{token_at, Token, MAX_LABELS};

use super::Expires;
use error::parser::*;
use time::Timespec;

/// Marks a line as describing an HTTP-only cookie rather than a comment.
pub const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// The number of tab-separated fields on a cookie line.
pub const FIELD_COUNT: usize = 7;

/// Character is visible US-ASCII.
///
/// ```text
/// VCHAR = %x21-7E
/// ```
fn is_visible(character: char) -> bool {
    character >= '\x21' && character <= '\x7e'
}

/// Character is a [RFC2616](https://tools.ietf.org/html/rfc2616) separator.
///
/// ```text
/// separator = "(" | ")" | "<" | ">" | "@"
///           | "," | ";" | ":" | "\" | <">
///           | "/" | "[" | "]" | "?" | "="
///           | "{" | "}" | SP | HT
/// ```
///
/// Space and tab are already outside of `VCHAR`.
fn is_separator(character: char) -> bool {
    match character {
        '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '['
        | ']' | '?' | '=' | '{' | '}' => true,
        _ => false,
    }
}

/// Character is a valid [RFC2616](https://tools.ietf.org/html/rfc2616) token character.
fn is_name_char(character: char) -> bool {
    is_visible(character) && !is_separator(character)
}

/// Character is a valid [RFC6265](https://tools.ietf.org/html/rfc6265) cookie-octet.
///
/// ```text
/// cookie-octet = %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
/// ```
fn is_value_char(character: char) -> bool {
    match character {
        '"' | ',' | ';' | '\\' => false,
        character => is_visible(character),
    }
}

/// Character is valid within a cookie path.
///
/// ```text
/// path-value = <any CHAR except CTLs or ";">
/// ```
fn is_path_char(character: char) -> bool {
    is_visible(character) && character != ';'
}

/// Blank characters surrounding a line.
fn is_blank(character: char) -> bool {
    character == '\t' || character == ' '
}

/// Find the first character of a field that fails a test.
fn scan<T>(field: Field, source: &str, test: T) -> Result<()>
where
    T: Fn(char) -> bool,
{
    match source.chars().enumerate().find(|&(_, character)| !test(character)) {
        Some((index, character)) => bail!(ErrorKind::IllegalCharacter(
            field,
            source.to_owned(),
            character,
            index
        )),
        None => Ok(()),
    }
}

/// Check that a domain is a valid, optionally dot-prefixed, domain name.
pub fn validate_domain(source: &str) -> Result<()> {
    domain::validate(source)
}

/// Check that a cookie name only contains token characters.
pub fn validate_name(source: &str) -> Result<()> {
    scan(Field::Name, source, is_name_char)
}

/// Check that a cookie value only contains cookie-octets.
pub fn validate_value(source: &str) -> Result<()> {
    scan(Field::Value, source, is_value_char)
}

/// Check that a cookie path only contains visible characters other than `;`.
pub fn validate_path(source: &str) -> Result<()> {
    scan(Field::Path, source, is_path_char)
}

/// Parse a `TRUE` or `FALSE` flag.
pub fn parse_bool(source: &str) -> Result<bool> {
    match source {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => bail!(ErrorKind::InvalidBoolean(source.to_owned())),
    }
}

/// Parse an expiry given in seconds since the Unix epoch.
///
/// An expiry of `0` marks a session cookie.
pub fn parse_expiry(source: &str) -> Result<Expires> {
    let seconds: i64 = match source.parse() {
        Ok(seconds) => seconds,
        Err(cause) => bail!(ErrorKind::InvalidExpiry(source.to_owned(), cause)),
    };

    if seconds == 0 {
        Ok(Expires::Never)
    } else {
        Ok(Expires::AtUtc(Timespec::new(seconds, 0)))
    }
}

/// A data line of a cookie file split into its fields.
///
/// None of the fields have been validated.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Line<'s> {
    http_only: bool,
    fields: [&'s str; FIELD_COUNT],
}

impl<'s> Line<'s> {
    /// The line carried the `#HttpOnly_` marker.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// The domain field.
    pub fn domain(&self) -> &'s str {
        self.fields[0]
    }

    /// The include-subdomains flag field.
    ///
    /// The flag is positional only; a leading dot on the domain decides whether a cookie applies
    /// to subdomains.
    pub fn include_subdomains(&self) -> &'s str {
        self.fields[1]
    }

    /// The path field.
    pub fn path(&self) -> &'s str {
        self.fields[2]
    }

    /// The secure flag field.
    pub fn secure(&self) -> &'s str {
        self.fields[3]
    }

    /// The expiry field.
    pub fn expiry(&self) -> &'s str {
        self.fields[4]
    }

    /// The name field.
    pub fn name(&self) -> &'s str {
        self.fields[5]
    }

    /// The value field.
    pub fn value(&self) -> &'s str {
        self.fields[6]
    }
}

/// Split a line of a cookie file into its fields.
///
/// Blank lines and comments produce `None`. A line starting with `#HttpOnly_` is not a comment.
pub fn split_line(line: &str) -> Result<Option<Line>> {
    if line.trim_matches(is_blank).is_empty() {
        return Ok(None);
    }

    let (http_only, line) = if line.starts_with(HTTP_ONLY_PREFIX) {
        (true, &line[HTTP_ONLY_PREFIX.len()..])
    } else if line.trim_start_matches(is_blank).starts_with('#') {
        return Ok(None);
    } else {
        (false, line)
    };

    let mut fields = [""; FIELD_COUNT];
    let mut found = 0;
    for field in line.split('\t') {
        if found < FIELD_COUNT {
            fields[found] = field;
        }
        found += 1;
    }
    ensure!(found == FIELD_COUNT, ErrorKind::FieldCount(found));

    Ok(Some(Line {
        http_only: http_only,
        fields: fields,
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    fn illegal(result: Result<()>) -> (Field, char, usize) {
        match result {
            Err(Error(ErrorKind::IllegalCharacter(field, _, character, index), _)) => {
                (field, character, index)
            }
            other => panic!("expected an illegal character, got {:?}", other),
        }
    }

    #[test]
    fn names() {
        for name in ["SID", "lang", "__Host-id", "a.b_c~d!#$%&'*+-^`|", ""].iter() {
            assert!(validate_name(name).is_ok(), "{:?} was rejected", name);
        }

        let separators = "()<>@,;:\"\\/[]?={}";
        for separator in separators.chars() {
            let name = format!("ab{}", separator);
            assert_eq!(illegal(validate_name(&name)), (Field::Name, separator, 2));
        }

        assert_eq!(illegal(validate_name("a b")), (Field::Name, ' ', 1));
        assert_eq!(illegal(validate_name("a\x7f")), (Field::Name, '\x7f', 1));
        assert_eq!(illegal(validate_name("Grüße")), (Field::Name, 'ü', 2));
    }

    #[test]
    fn values() {
        for value in ["31d4d96e407aad42", "en-US", "a=b:c/d?e", "{}[]()<>@", ""].iter() {
            assert!(validate_value(value).is_ok(), "{:?} was rejected", value);
        }

        assert_eq!(illegal(validate_value("\"quoted\"")), (Field::Value, '"', 0));
        assert_eq!(illegal(validate_value("a,b")), (Field::Value, ',', 1));
        assert_eq!(illegal(validate_value("a;b")), (Field::Value, ';', 1));
        assert_eq!(illegal(validate_value("a\\b")), (Field::Value, '\\', 1));
        assert_eq!(illegal(validate_value("a b")), (Field::Value, ' ', 1));
        assert_eq!(illegal(validate_value("樹林")), (Field::Value, '樹', 0));
    }

    #[test]
    fn paths() {
        for path in ["/", "/path/to/page.html", "/a,b\"c\\d", ""].iter() {
            assert!(validate_path(path).is_ok(), "{:?} was rejected", path);
        }

        assert_eq!(illegal(validate_path("/a;b")), (Field::Path, ';', 2));
        assert_eq!(illegal(validate_path("/a b")), (Field::Path, ' ', 2));
        assert_eq!(illegal(validate_path("/\t")), (Field::Path, '\t', 1));
    }

    #[test]
    fn illegal_character_message() {
        let error = validate_name("ab;").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Name \"ab;\", illegal character \";\" at index 2"
        );
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_bool("TRUE").unwrap(), true);
        assert_eq!(parse_bool("FALSE").unwrap(), false);

        for flag in ["true", "False", "1", "yes", "", " TRUE"].iter() {
            match parse_bool(flag) {
                Err(Error(ErrorKind::InvalidBoolean(ref input), _)) => assert_eq!(input, flag),
                other => panic!("{:?} parsed as {:?}", flag, other),
            }
        }
    }

    #[test]
    fn expiries() {
        assert_eq!(parse_expiry("0").unwrap(), Expires::Never);
        assert_eq!(parse_expiry("1").unwrap(), Expires::AtUtc(Timespec::new(1, 0)));
        assert_eq!(
            parse_expiry("2147483647").unwrap(),
            Expires::AtUtc(Timespec::new(2147483647, 0))
        );
        assert_eq!(parse_expiry("-1").unwrap(), Expires::AtUtc(Timespec::new(-1, 0)));

        for expiry in ["", "never", "1.5", "99999999999999999999"].iter() {
            let error = parse_expiry(expiry).unwrap_err();
            assert_eq!(error.kind().field(), Some(Field::Expiry));
        }
    }

    #[test]
    fn blank_and_comment_lines() {
        for line in ["", " ", "\t \t", "# Netscape HTTP Cookie File", "  \t# indented"].iter() {
            assert_eq!(split_line(line).unwrap(), None, "{:?} was not skipped", line);
        }
    }

    #[test]
    fn split_fields() {
        let line = split_line("example.net\tFALSE\t/\tTRUE\t0\tSID\t123")
            .unwrap()
            .unwrap();
        assert_eq!(line.http_only(), false);
        assert_eq!(line.domain(), "example.net");
        assert_eq!(line.include_subdomains(), "FALSE");
        assert_eq!(line.path(), "/");
        assert_eq!(line.secure(), "TRUE");
        assert_eq!(line.expiry(), "0");
        assert_eq!(line.name(), "SID");
        assert_eq!(line.value(), "123");
    }

    #[test]
    fn http_only_marker() {
        let line = split_line("#HttpOnly_.httponly.net\tTRUE\t/\tFALSE\t0\tid\tx")
            .unwrap()
            .unwrap();
        assert_eq!(line.http_only(), true);
        assert_eq!(line.domain(), ".httponly.net");

        // An indented marker is a comment.
        assert_eq!(split_line(" #HttpOnly_a\tb\tc\td\te\tf\tg").unwrap(), None);
    }

    #[test]
    fn field_counts() {
        let lines = [
            ("example.net", 1),
            ("example.net\tFALSE\t/\tTRUE\t0\tSID", 6),
            ("example.net\tFALSE\t/\tTRUE\t0\tSID\t123\textra", 8),
            ("#HttpOnly_example.net\tFALSE", 2),
        ];

        for &(line, count) in lines.iter() {
            match split_line(line) {
                Err(Error(ErrorKind::FieldCount(found), _)) => assert_eq!(found, count),
                other => panic!("{:?} split as {:?}", line, other),
            }
        }
    }
}
