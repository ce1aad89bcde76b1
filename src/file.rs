//! Reading whole cookie files.
//!
//! Lines are numbered from 1. A line that fails validation either aborts the read or is logged
//! and skipped, depending on the loader's [`OnError`](enum.OnError.html) setting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cookie::Cookie;
use error::*;
use jar::Jar;

/// Read every cookie from the file at `path`, failing on the first invalid line.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Cookie>> {
    Loader::new().load(path)
}

/// Read every cookie from the file at `path` into a jar, failing on the first invalid line.
///
/// Each cookie is registered under its domain without the leading dot.
pub fn load_jar<P: AsRef<Path>>(path: P) -> Result<Jar> {
    Loader::new().load_jar(path)
}

/// What to do with a line that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Stop reading and return the error.
    Abort,
    /// Log the error and carry on with the next line.
    Skip,
}

impl Default for OnError {
    fn default() -> OnError {
        OnError::Abort
    }
}

/// Reads cookie files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    on_error: OnError,
}

impl Loader {
    /// Create a loader that aborts on the first invalid line.
    pub fn new() -> Loader {
        Default::default()
    }

    /// Set how invalid lines are handled.
    pub fn on_error(self, on_error: OnError) -> Loader {
        Loader {
            on_error: on_error,
        }
    }

    /// Read every cookie from a reader.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<Vec<Cookie>> {
        let mut cookies = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            match Cookie::parse_line(&line?) {
                Ok(Some(cookie)) => {
                    debug!("Line {}: cookie {:?} for {}", number, cookie.name(), cookie.domain());
                    cookies.push(cookie);
                }
                Ok(None) => trace!("Line {}: blank or comment", number),
                Err(::error::parser::Error(kind, _)) => {
                    let error = Error::from(ErrorKind::Line(number, kind));
                    match self.on_error {
                        OnError::Abort => return Err(error),
                        OnError::Skip => warn!("Skipping invalid cookie: {}", error),
                    }
                }
            }
        }

        debug!("Read {} cookies", cookies.len());
        Ok(cookies)
    }

    /// Read every cookie from the file at `path`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Cookie>> {
        let path = path.as_ref();
        debug!("Loading cookies from {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read every cookie from a reader into a jar.
    ///
    /// Cookies the jar refuses, for being set on a public suffix or on a host that cannot be
    /// normalised, are logged and left out.
    pub fn read_jar<R: BufRead>(&self, reader: R) -> Result<Jar> {
        let mut jar = Jar::new();

        for cookie in self.read(reader)? {
            let host = cookie.host().to_owned();
            match jar.add_cookie(&host, cookie) {
                Ok(()) => {}
                Err(Error(ErrorKind::PublicSuffix(domain), _)) => {
                    warn!("Leaving out subdomain cookie for public suffix {}", domain);
                }
                Err(Error(ErrorKind::InvalidHost(host), _)) => {
                    warn!("Leaving out cookie for invalid host {:?}", host);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(jar)
    }

    /// Read every cookie from the file at `path` into a jar.
    pub fn load_jar<P: AsRef<Path>>(&self, path: P) -> Result<Jar> {
        let path = path.as_ref();
        debug!("Loading cookie jar from {}", path.display());
        let file = File::open(path)?;
        self.read_jar(BufReader::new(file))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use error::parser::Field;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use url::Url;

    fn fixture(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn names(cookies: &[Cookie]) -> Vec<&str> {
        cookies.iter().map(|cookie| cookie.name()).collect()
    }

    #[test]
    fn load_valid_file() {
        let cookies = load(fixture("valid.txt")).unwrap();
        assert_eq!(names(&cookies), vec!["session", "lang", "SID"]);

        let http_only = &cookies[0];
        assert_eq!(http_only.domain(), "httponly.net");
        assert!(http_only.http_only());
        assert!(!cookies[1].http_only());
        assert!(cookies[1].include_subdomains());
    }

    #[test]
    fn load_jar_per_host() {
        let jar = load_jar(fixture("valid.txt")).unwrap();
        assert_eq!(jar.len(), 3);

        for host in ["example.net", "httponly.net"].iter() {
            let url = Url::parse(&format!("http://{}", host)).unwrap();
            assert_eq!(jar.url_matches(&url).count(), 1, "{}", host);
        }
    }

    #[test]
    fn abort_reports_line_number() {
        let text = "# Netscape HTTP Cookie File\n\
                    \n\
                    example.net\tFALSE\t/\tFALSE\t0\tok\t1\n\
                    example.net\tFALSE\t/\tFALSE\t0\tbad name\t2\n";
        let error = Loader::new().read(Cursor::new(text)).unwrap_err();

        assert_eq!(error.line(), Some(4));
        let kind = error.parser_kind().unwrap();
        assert_eq!(kind.field(), Some(Field::Name));
        assert_eq!(kind.position(), Some(3));
        assert_eq!(
            error.to_string(),
            "Line 4: Name \"bad name\", illegal character \" \" at index 3"
        );
    }

    #[test]
    fn skip_invalid_lines() {
        let text = "example.net\tFALSE\t/\tFALSE\t0\tfirst\t1\n\
                    example.net.\tFALSE\t/\tFALSE\t0\tbad\t2\n\
                    only\tthree\tfields\n\
                    example.net\tFALSE\t/\tFALSE\t0\tlast\t3\n";
        let cookies = Loader::new()
            .on_error(OnError::Skip)
            .read(Cursor::new(text))
            .unwrap();

        assert_eq!(names(&cookies), vec!["first", "last"]);
    }

    #[test]
    fn crlf_line_endings() {
        let text = "example.net\tFALSE\t/\tFALSE\t0\tid\tvalue\r\n";
        let cookies = Loader::new().read(Cursor::new(text)).unwrap();
        assert_eq!(cookies[0].value(), "value");
    }

    #[test]
    fn jar_leaves_out_public_suffix_cookies() {
        let text = ".co.uk\tTRUE\t/\tFALSE\t0\tsuper\t1\n\
                    example.co.uk\tFALSE\t/\tFALSE\t0\tfine\t2\n";
        let jar = Loader::new().read_jar(Cursor::new(text)).unwrap();
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn jar_leaves_out_unnormalisable_hosts() {
        let text = "xn--a.net\tFALSE\t/\tFALSE\t0\tbroken\t1\n\
                    example.net\tFALSE\t/\tFALSE\t0\tfine\t2\n";
        let jar = Loader::new().read_jar(Cursor::new(text)).unwrap();
        assert_eq!(jar.len(), 1);

        let url = Url::parse("http://example.net/").unwrap();
        let names: Vec<_> = jar.url_matches(&url).map(|cookie| cookie.name()).collect();
        assert_eq!(names, vec!["fine"]);
    }

    #[test]
    fn load_from_temporary_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "#HttpOnly_.example.org\tTRUE\t/\tTRUE\t0\ttoken\tabc").unwrap();
        writeln!(file, "example.org\tFALSE\t/\tFALSE\t1\tsoon\txyz").unwrap();
        file.flush().unwrap();

        let cookies = load(file.path()).unwrap();
        assert_eq!(names(&cookies), vec!["token", "soon"]);
        assert!(cookies[0].http_only() && cookies[0].secure());
        assert_eq!(cookies[1].expiry().timestamp(), Some(1));
    }

    #[test]
    fn missing_file() {
        let error = load(fixture("does-not-exist.txt")).unwrap_err();
        match *error.kind() {
            ErrorKind::Io(_) => {}
            ref other => panic!("expected an io error, got {:?}", other),
        }
    }
}
