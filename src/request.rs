use crate::helpers;
use crate::types::{RouteParams, ServerContext};
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use std::fmt::{self, Debug, Formatter};
use std::net::SocketAddr;

/// A buffered HTTP request as seen by route handlers and middlewares.
///
/// It carries the shared [`ServerContext`](./struct.ServerContext.html) of type `C` and the
/// parameters captured while the request was routed. A `Request` belongs to exactly one exchange;
/// handlers receive it by value.
///
/// The body can be read once with [`take_body`](#method.take_body). Code that needs to peek at it,
/// like the logging middleware, must put it back with [`set_body`](#method.set_body).
pub struct Request<C> {
    method: Method,
    uri: Uri,
    path: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    params: RouteParams,
    context: ServerContext<C>,
    remote_addr: Option<SocketAddr>,
    // The part of `path` already matched by the routers this request was mounted through.
    consumed_prefix: String,
}

impl<C> Request<C> {
    /// Creates a request with an empty body and no headers.
    pub fn new(method: Method, uri: Uri, context: ServerContext<C>) -> Request<C> {
        let path = helpers::percent_decode_request_path(uri.path());

        Request {
            method,
            uri,
            path,
            headers: HeaderMap::new(),
            body: Some(Bytes::new()),
            params: RouteParams::new(),
            context,
            remote_addr: None,
            consumed_prefix: String::new(),
        }
    }

    /// Creates a request from an `http::Request` whose body is already buffered.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use waypost::{Request, ServerContext};
    ///
    /// let raw = http::Request::builder()
    ///     .method("POST")
    ///     .uri("/api/5?verbose=1")
    ///     .body(Bytes::from_static(b"hello"))
    ///     .unwrap();
    ///
    /// let mut req = Request::from_http(raw, ServerContext::new(()));
    /// assert_eq!(req.path(), "/api/5");
    /// assert_eq!(req.uri().query(), Some("verbose=1"));
    /// assert_eq!(req.take_body(), "hello");
    /// ```
    pub fn from_http(req: http::Request<Bytes>, context: ServerContext<C>) -> Request<C> {
        let (parts, body) = req.into_parts();
        let mut req = Request::new(parts.method, parts.uri, context);
        req.headers = parts.headers;
        req.body = Some(body);
        req
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URI, including the query string.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The percent-decoded path used for route matching.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Takes the request body out of the request. A second call returns an empty body.
    pub fn take_body(&mut self) -> Bytes {
        self.body.take().unwrap_or_default()
    }

    /// Replaces the request body.
    pub fn set_body<B: Into<Bytes>>(&mut self, body: B) {
        self.body = Some(body.into());
    }

    /// Checks whether the body is still unread.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// All the parameters captured while routing this request.
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Returns the value captured for the route parameter `name`.
    pub fn param<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the value captured for the route parameter `name`, or `default` when there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypost::{Request, ServerContext};
    ///
    /// let req = Request::new(http::Method::GET, "/".parse().unwrap(), ServerContext::new(()));
    /// assert_eq!(req.param_or("id", "0"), "0");
    /// ```
    pub fn param_or<'a, N: AsRef<str>>(&'a self, name: N, default: &'a str) -> &'a str {
        self.param(name).unwrap_or(default)
    }

    /// The shared server context.
    pub fn context(&self) -> &C {
        self.context.data()
    }

    /// A handle to the shared server context which can outlive this request.
    pub fn server_context(&self) -> &ServerContext<C> {
        &self.context
    }

    /// The address of the peer, when the request came from a socket.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn set_remote_addr(&mut self, addr: SocketAddr) {
        self.remote_addr = Some(addr);
    }

    /// The part of the path matched by the mount points this request was routed through.
    pub fn consumed_prefix(&self) -> &str {
        &self.consumed_prefix
    }

    pub(crate) fn params_mut(&mut self) -> &mut RouteParams {
        &mut self.params
    }

    pub(crate) fn push_consumed_prefix(&mut self, matched: &str) {
        self.consumed_prefix.push_str(matched);
    }

    /// The part of the path that the current router still has to match.
    pub(crate) fn unmatched_path(&self) -> &str {
        self.path.strip_prefix(self.consumed_prefix.as_str()).unwrap_or(&self.path)
    }
}

impl<C> Debug for Request<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("consumed_prefix", &self.consumed_prefix)
            .finish()
    }
}
