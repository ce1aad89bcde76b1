//! A cookie jar.
//!
//! The jar holds the cookies read from a cookie file and hands out the ones that apply to a
//! request.
//!
//! The jar is structured as a tree representing the domains and the paths for which it has
//! stored values. The jar contains a root domain which branches out into its
//! subdomains. Similarly, each domain contains its root path which branches out into its
//! sub-paths.
//!
//! Expired cookies are neither evicted nor filtered out.

use std::collections::HashMap;
use std::iter;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use idna::domain_to_ascii;
use psl::{List, Psl};
use url::{Host, Url};

use cookie::Cookie;
use error::*;

/// A jar containing the cookies seen so far.
#[derive(Debug, Default)]
pub struct Jar {
    domain: Domain,
    hosts: HashMap<IpAddr, Path>,
    len: usize,
}

impl Jar {
    /// Create a new empty jar.
    pub fn new() -> Jar {
        Default::default()
    }

    /// Add a cookie to the jar under a given host.
    ///
    /// A cookie that applies to subdomains may not be registered under a public suffix. Such a
    /// cookie is refused with `PublicSuffix`, where Go's `net/http/cookiejar` would instead keep
    /// it as a host-only cookie.
    ///
    /// A cookie with the same host, path and name as one already in the jar replaces it.
    pub fn add_cookie(&mut self, host: &str, cookie: Cookie) -> Result<()> {
        let host = parse_host(host)?;
        let path = cookie.path().to_owned();
        let path_segments = path_segments(&path);
        let added = match host {
            Host::Domain(domain) => {
                ensure!(
                    cookie.host_only() || !is_public_suffix(&domain),
                    ErrorKind::PublicSuffix(domain)
                );
                let domain_segments: Vec<_> = domain.split('.').collect();
                self.domain.add_cookie(domain_segments, path_segments, cookie)
            }
            Host::Ipv4(addr) => self.update_host(IpAddr::V4(addr), path_segments, cookie),
            Host::Ipv6(addr) => self.update_host(IpAddr::V6(addr), path_segments, cookie),
        };

        if added {
            self.len += 1;
        }
        Ok(())
    }

    /// Update a cookie for a host.
    fn update_host<'s, S>(&mut self, host: IpAddr, segments: S, cookie: Cookie) -> bool
    where
        S: Iterator<Item = &'s str>,
    {
        self.hosts.entry(host)
            .or_insert_with(Path::default)
            .add_cookie(segments, cookie)
    }

    /// Get the matching cookies for a Url.
    ///
    /// Secure cookies only match `https` URLs.
    pub fn url_matches<'j>(&'j self, url: &Url) -> Box<Iterator<Item = &'j Cookie> + 'j> {
        let secure = url.scheme() == "https";
        let segments = path_segments(url.path());
        let matches = match url.host() {
            Some(Host::Domain(domain)) => {
                let domain_segments: Vec<_> = domain.trim_matches('.').split('.').collect();
                self.domain.match_url(domain_segments, segments)
            }
            Some(Host::Ipv4(addr)) => self.host_matches(IpAddr::V4(addr), segments),
            Some(Host::Ipv6(addr)) => self.host_matches(IpAddr::V6(addr), segments),
            None => Box::new(iter::empty()),
        };

        Box::new(matches.filter(move |cookie| secure || !cookie.secure()))
    }

    /// Get the cookies matching a request for a path on a host.
    pub fn matches<'j>(&'j self, host: &str, path: &str, secure: bool)
        -> Result<Box<Iterator<Item = &'j Cookie> + 'j>>
    {
        let segments = path_segments(path);
        let matches = match parse_host(host)? {
            Host::Domain(domain) => {
                let domain_segments: Vec<_> = domain.split('.').collect();
                self.domain.match_url(domain_segments, segments)
            }
            Host::Ipv4(addr) => self.host_matches(IpAddr::V4(addr), segments),
            Host::Ipv6(addr) => self.host_matches(IpAddr::V6(addr), segments),
        };

        Ok(Box::new(matches.filter(move |cookie| secure || !cookie.secure())))
    }

    /// Get all of the matches for a specific host.
    fn host_matches<'j, 's, S>(&'j self, host: IpAddr, segments: S)
        -> Box<Iterator<Item = &'j Cookie> + 'j>
    where
        S: Iterator<Item = &'s str>,
    {
        if let Some(host) = self.hosts.get(&host) {
            host.match_url(segments, HostMatch::Exact)
        } else {
            Box::new(iter::empty())
        }
    }

    /// The number of cookies in the jar.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Normalise a host to either an address or a lowercase ASCII domain.
fn parse_host(host: &str) -> Result<Host> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(Host::Ipv4(addr));
    }
    if host.starts_with('[') && host.ends_with(']') {
        if let Ok(addr) = host[1..host.len() - 1].parse::<Ipv6Addr>() {
            return Ok(Host::Ipv6(addr));
        }
    }

    let domain = match domain_to_ascii(host.trim_matches('.')) {
        Ok(domain) => domain,
        Err(_) => bail!(ErrorKind::InvalidHost(host.to_owned())),
    };
    ensure!(!domain.is_empty(), ErrorKind::InvalidHost(host.to_owned()));
    Ok(Host::Domain(domain))
}

/// Check if a domain is a public suffix such as `net` or `co.uk`.
fn is_public_suffix(domain: &str) -> bool {
    List.suffix(domain.as_bytes())
        .map_or(false, |suffix| suffix.as_bytes() == domain.as_bytes())
}

/// The non-empty segments of a path.
fn path_segments<'p>(path: &'p str) -> impl Iterator<Item = &'p str> + Clone + 'p {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// The given URL is an exact host match.
#[derive(PartialEq, Eq, Clone, Copy)]
enum HostMatch {
    Exact,
    Suffix,
}

/// The heirarchy of domains.
#[derive(Debug, Default)]
struct Domain {
    path: Path,
    children: HashMap<String, Domain>,
}

impl Domain {
    /// Add a cookie to a domain.
    pub fn add_cookie<'p, P>(&mut self, mut segments: Vec<&str>, path: P, cookie: Cookie) -> bool
    where
        P: Iterator<Item = &'p str>,
    {
        if let Some(child) = segments.pop() {
            self.children.entry(child.to_owned())
                .or_insert_with(Domain::default)
                .add_cookie(segments, path, cookie)
        } else {
            self.path.add_cookie(path, cookie)
        }
    }

    /// Get all of the cookies that match a given request.
    pub fn match_url<'c, 'p, P>(&'c self, mut segments: Vec<&str>, path: P)
        -> Box<Iterator<Item = &'c Cookie> + 'c>
    where
        P: Iterator<Item = &'p str> + Clone,
    {
        if let Some(child) = segments.pop() {
            let iter = self.path.match_url(path.clone(), HostMatch::Suffix);
            if let Some(child) = self.children.get(child) {
                Box::new(iter.chain(child.match_url(segments, path)))
            } else {
                Box::new(iter)
            }
        } else {
            Box::new(self.path.match_url(path, HostMatch::Exact))
        }
    }
}

/// The heriarchy of paths.
#[derive(Debug, Default)]
struct Path {
    cookies: HashMap<String, Cookie>,
    children: HashMap<String, Path>,
}

impl Path {
    /// Add a cookie to the matching path.
    ///
    /// Returns false if the cookie replaced one of the same name.
    pub fn add_cookie<'s, S>(&mut self, mut segments: S, cookie: Cookie) -> bool
    where
        S: Iterator<Item = &'s str>,
    {
        if let Some(child) = segments.next() {
            self.children
                .entry(child.to_owned())
                .or_insert_with(Path::default)
                .add_cookie(segments, cookie)
        } else {
            self.cookies.insert(cookie.name().to_owned(), cookie).is_none()
        }
    }

    /// Get all of the cookies that match a given request.
    pub fn match_url<'c, 's, S>(&'c self, mut segments: S, host: HostMatch)
        -> Box<Iterator<Item = &'c Cookie> + 'c>
    where
        S: Iterator<Item = &'s str>,
    {
        let iter = self.cookies.values()
            .filter(move |cookie| match host {
                HostMatch::Exact => true,
                HostMatch::Suffix => !cookie.host_only(),
            });

        if let Some(child) = segments.next() {
            if let Some(child) = self.children.get(child) {
                Box::new(iter.chain(child.match_url(segments, host)))
            } else {
                Box::new(iter)
            }
        } else {
            Box::new(iter)
        }
    }
}
