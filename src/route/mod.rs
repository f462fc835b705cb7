use crate::handler::BoxHandler;
use crate::helpers;
use crate::regex_generator::{generate_exact_match_regex, generate_prefix_match_regex};
use crate::types::RouteParams;
use http::Method;
use regex::Regex;
use std::fmt::{self, Debug, Formatter};

/// A compiled route pattern such as `/api/:id`.
///
/// A pattern is a list of `/`-separated segments. Segments starting with `:` are named parameters which match
/// one or more word characters or hyphens; every other segment matches literally. Exact patterns accept one
/// optional trailing slash, so `/api/:id` matches both `/api/5` and `/api/5/`.
///
/// # Examples
///
/// ```
/// use waypost::RoutePattern;
///
/// let pattern = RoutePattern::exact("/users/:userId/books/:bookId").unwrap();
/// assert_eq!(pattern.param_names(), &["userId", "bookId"]);
///
/// let m = pattern.matches("/users/alice/books/42/").unwrap();
/// assert_eq!(m.params.get("bookId").unwrap(), "42");
/// assert!(pattern.matches("/users/alice").is_none());
/// ```
#[derive(Clone)]
pub struct RoutePattern {
    path: String,
    regex: Regex,
    param_names: Vec<String>,
    prefix: bool,
}

/// The result of a successful structural match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'p> {
    /// The part of the candidate the pattern covered.
    pub matched: &'p str,
    /// The captured parameters, keyed by their declared names.
    pub params: RouteParams,
}

impl RoutePattern {
    /// Compiles a pattern that has to match a whole path.
    pub fn exact<P: Into<String>>(path: P) -> crate::Result<RoutePattern> {
        let path = path.into();
        let (regex, param_names) = generate_exact_match_regex(&path)?;
        Ok(RoutePattern {
            path,
            regex,
            param_names,
            prefix: false,
        })
    }

    /// Compiles a pattern that matches the start of a path, ending on a segment boundary.
    pub fn prefix<P: Into<String>>(path: P) -> crate::Result<RoutePattern> {
        let path = path.into();
        let (regex, param_names) = generate_prefix_match_regex(&path)?;
        Ok(RoutePattern {
            path,
            regex,
            param_names,
            prefix: true,
        })
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The parameter names in the order they appear in the pattern.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Matches `candidate` against the pattern and captures its parameters.
    pub fn matches<'p>(&self, candidate: &'p str) -> Option<PatternMatch<'p>> {
        let caps = self.regex.captures(candidate)?;
        let whole = caps.get(0)?;

        if self.prefix && !helpers::is_segment_boundary(&candidate[whole.end()..]) {
            return None;
        }

        let mut params = RouteParams::with_capacity(self.param_names.len());
        let mut groups = caps.iter();
        // Skip the first group, it's the whole match.
        groups.next();
        for name in &self.param_names {
            if let Some(Some(g)) = groups.next() {
                params.set(name.as_str(), g.as_str());
            }
        }

        Some(PatternMatch {
            matched: whole.as_str(),
            params,
        })
    }
}

impl Debug for RoutePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ path: {:?}, regex: {:?}, params: {:?}, prefix: {} }}",
            self.path,
            self.regex.as_str(),
            self.param_names,
            self.prefix
        )
    }
}

/// Which methods a route entry accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Only this method.
    Only(Method),
    /// Any method. Used by mounted sub-routes, which enforce methods themselves.
    All,
}

impl MethodFilter {
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Only(m) => m == method,
            MethodFilter::All => true,
        }
    }
}

/// A single registration: a method filter, a compiled pattern and the handler to run.
///
/// Entries are created by [`Router::register`](./struct.Router.html#method.register) and
/// [`Router::mount`](./struct.Router.html#method.mount), or by the [`RouterBuilder`](./struct.RouterBuilder.html).
pub struct Route<C> {
    pub(crate) pattern: RoutePattern,
    pub(crate) method: MethodFilter,
    pub(crate) handler: BoxHandler<C>,
}

impl<C> Route<C> {
    pub(crate) fn new(pattern: RoutePattern, method: MethodFilter, handler: BoxHandler<C>) -> Route<C> {
        Route {
            pattern,
            method,
            handler,
        }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    pub fn handler(&self) -> &BoxHandler<C> {
        &self.handler
    }
}

impl<C> Debug for Route<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ path: {:?}, method: {:?}, prefix: {} }}",
            self.pattern.as_str(),
            self.method,
            self.pattern.is_prefix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_captures_params() {
        let pattern = RoutePattern::exact("/api/:id").unwrap();
        let m = pattern.matches("/api/noobmaster69").unwrap();
        assert_eq!(m.matched, "/api/noobmaster69");
        assert_eq!(m.params.get("id").unwrap(), "noobmaster69");
        assert!(pattern.matches("/api").is_none());
        assert!(pattern.matches("/other/5").is_none());
    }

    #[test]
    fn prefix_match_respects_segment_boundary() {
        let pattern = RoutePattern::prefix("/v1").unwrap();
        assert_eq!(pattern.matches("/v1/api").unwrap().matched, "/v1");
        assert_eq!(pattern.matches("/v1").unwrap().matched, "/v1");
        assert!(pattern.matches("/v10/api").is_none());
        assert!(pattern.matches("/api/v1").is_none());
    }

    #[test]
    fn root_prefix_matches_everything() {
        let pattern = RoutePattern::prefix("/").unwrap();
        assert_eq!(pattern.matches("/anything/here").unwrap().matched, "");
    }

    #[test]
    fn method_filter() {
        assert!(MethodFilter::All.accepts(&Method::DELETE));
        assert!(MethodFilter::Only(Method::GET).accepts(&Method::GET));
        assert!(!MethodFilter::Only(Method::GET).accepts(&Method::POST));
    }
}
