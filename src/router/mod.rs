use crate::handler::{BoxHandler, Handler, HandlerFuture};
use crate::request::Request;
use crate::response::Response;
use crate::route::{MethodFilter, Route, RoutePattern};
use crate::Error;
use http::{Method, StatusCode};
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use self::builder::RouterBuilder;

mod builder;

/// The outcome of resolving a request against a [`Router`](./struct.Router.html).
pub enum Resolution<'r, C> {
    /// A route matched both the path and the method.
    Matched(&'r BoxHandler<C>),
    /// No route matched the path.
    NotFound,
    /// The first route matching the path was registered for a different method.
    MethodNotAllowed,
    /// The path is `/` and no root handler was registered.
    RootNotImplemented,
}

impl<C> Resolution<'_, C> {
    /// The status code written when resolution fails.
    pub fn failure_status(&self) -> Option<StatusCode> {
        match self {
            Resolution::Matched(_) => None,
            Resolution::NotFound => Some(StatusCode::NOT_FOUND),
            Resolution::MethodNotAllowed => Some(StatusCode::METHOD_NOT_ALLOWED),
            Resolution::RootNotImplemented => Some(StatusCode::NOT_IMPLEMENTED),
        }
    }
}

impl<C> Debug for Resolution<'_, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched(_) => f.write_str("Matched"),
            Resolution::NotFound => f.write_str("NotFound"),
            Resolution::MethodNotAllowed => f.write_str("MethodNotAllowed"),
            Resolution::RootNotImplemented => f.write_str("RootNotImplemented"),
        }
    }
}

/// An ordered route table.
///
/// Routes are matched in registration order and the first route whose pattern matches the path wins, whatever
/// its method. If that route was registered for another method the request gets `405 Method Not Allowed`; later
/// routes are never consulted. Registering a second method for an identical pattern therefore yields an
/// unreachable route: register one handler per pattern and branch on the method inside it if needed.
///
/// The path `/` is special: it always goes to the root handler, or gets `501 Not Implemented` when there is none.
///
/// A `Router` is itself a [`Handler`](./trait.Handler.html), so it can be [mounted](#method.mount) under a
/// prefix of another router. The mounted router sees the full request path; its own patterns are written as if
/// they were rooted at `/` and are matched against what follows the mount prefix.
///
/// The router seals itself the first time it resolves a request. Any registration after that fails with
/// [`Error::Sealed`](./enum.Error.html#variant.Sealed).
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use waypost::{Request, Response, Router};
///
/// fn api() -> Router<()> {
///     Router::builder()
///         .get("/books/:bookId", |req: Request<()>, mut res: Response| async move {
///             res.write_text(StatusCode::OK, format!("book {}", req.param_or("bookId", "?")));
///             res
///         })
///         .build()
///         .unwrap()
/// }
///
/// let router: Router<()> = Router::builder().mount("/api", api()).build().unwrap();
/// # let _ = router;
/// ```
pub struct Router<C> {
    root: Option<BoxHandler<C>>,
    routes: Vec<Route<C>>,
    sealed: AtomicBool,
}

impl<C: Send + Sync + 'static> Router<C> {
    /// Creates an empty router with no root handler.
    pub fn new() -> Router<C> {
        Router {
            root: None,
            routes: Vec::new(),
            sealed: AtomicBool::new(false),
        }
    }

    /// Returns a [`RouterBuilder`](./struct.RouterBuilder.html) to create a router.
    pub fn builder() -> RouterBuilder<C> {
        RouterBuilder::new()
    }

    /// A router whose root answers `404 Not Found` and which has no other routes.
    pub fn fallback() -> Router<C> {
        let mut router = Router::new();
        router.root = Some(Arc::new(crate::handler_fn(|_: Request<C>, mut res: Response| async move {
            res.write_text(StatusCode::NOT_FOUND, "");
            res
        })));
        router
    }

    /// Registers `handler` for `method` on `pattern`.
    ///
    /// The pattern `/` installs the root handler instead. Only the first root registration takes effect; later
    /// ones are ignored.
    pub fn register<P, H>(&mut self, method: Method, pattern: P, handler: H) -> crate::Result<()>
    where
        P: Into<String>,
        H: Handler<C>,
    {
        let pattern = pattern.into();
        self.check_not_sealed(&pattern)?;

        if is_root_pattern(&pattern) {
            if self.root.is_none() {
                self.root = Some(Arc::new(handler));
            } else {
                tracing::debug!(%method, "root handler already registered, ignoring the new one");
            }
            return Ok(());
        }

        let pattern = RoutePattern::exact(pattern)?;
        tracing::trace!(%method, path = pattern.as_str(), "registering route");
        self.routes
            .push(Route::new(pattern, MethodFilter::Only(method), Arc::new(handler)));
        Ok(())
    }

    /// Delegates every path starting with `prefix` to `handler`, whatever the method.
    ///
    /// `prefix` matches on segment boundaries, so `/v1` covers `/v1` and `/v1/api` but not `/v10`. It may contain
    /// parameters, which are captured before `handler` runs.
    pub fn mount<P, H>(&mut self, prefix: P, handler: H) -> crate::Result<()>
    where
        P: Into<String>,
        H: Handler<C>,
    {
        let prefix = prefix.into();
        self.check_not_sealed(&prefix)?;

        let pattern = RoutePattern::prefix(prefix)?;
        tracing::trace!(path = pattern.as_str(), "mounting sub-route");
        self.routes.push(Route::new(pattern, MethodFilter::All, Arc::new(handler)));
        Ok(())
    }

    /// The registered routes, in matching order. The root handler is not part of this list.
    pub fn routes(&self) -> &[Route<C>] {
        &self.routes
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Stops accepting registrations.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Finds the handler for `req`.
    ///
    /// On a match the captured parameters are written into the request, and for mounted routes the matched
    /// prefix is recorded so nested routers continue where this one stopped.
    pub fn resolve(&self, req: &mut Request<C>) -> Resolution<'_, C> {
        self.seal();

        let target = req.unmatched_path();
        // An empty remainder only means root when a mount consumed the whole path.
        let at_root = target == "/" || (target.is_empty() && !req.consumed_prefix().is_empty());
        if at_root {
            return match self.root {
                Some(ref handler) => Resolution::Matched(handler),
                None => Resolution::RootNotImplemented,
            };
        }

        let mut found = None;
        for (idx, route) in self.routes.iter().enumerate() {
            if let Some(m) = route.pattern.matches(target) {
                found = Some((idx, m.params, m.matched.to_owned()));
                break;
            }
        }

        let (idx, params, matched) = match found {
            Some(found) => found,
            None => return Resolution::NotFound,
        };

        let route = &self.routes[idx];
        if !route.method.accepts(req.method()) {
            return Resolution::MethodNotAllowed;
        }

        for (name, value) in params.iter() {
            req.params_mut().set(name.as_str(), value.as_str());
        }
        if route.pattern.is_prefix() {
            req.push_consumed_prefix(&matched);
        }

        Resolution::Matched(&route.handler)
    }

    /// Runs `req` through the router with a fresh response and returns the response.
    pub async fn exec(&self, req: Request<C>) -> Response {
        self.handle(req, Response::new()).await
    }

    fn check_not_sealed(&self, pattern: &str) -> crate::Result<()> {
        if self.is_sealed() {
            return Err(Error::Sealed {
                pattern: pattern.to_owned(),
            });
        }
        Ok(())
    }
}

impl<C: Send + Sync + 'static> Handler<C> for Router<C> {
    fn handle<'a>(&'a self, mut req: Request<C>, mut res: Response) -> HandlerFuture<'a> {
        Box::pin(async move {
            let resolution = self.resolve(&mut req);

            match resolution {
                Resolution::Matched(handler) => handler.handle(req, res).await,
                failure => {
                    if let Some(status) = failure.failure_status() {
                        tracing::debug!(
                            parent: res.span(),
                            method = %req.method(),
                            path = req.path(),
                            outcome = ?failure,
                            "route resolution failed"
                        );
                        res.write_text(status, "");
                    }
                    res
                }
            }
        })
    }
}

impl<C: Send + Sync + 'static> Default for Router<C> {
    fn default() -> Self {
        Router::new()
    }
}

impl<C> Debug for Router<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ root: {}, routes: {:?}, sealed: {} }}",
            self.root.is_some(),
            self.routes,
            self.sealed.load(Ordering::Relaxed)
        )
    }
}

fn is_root_pattern(pattern: &str) -> bool {
    pattern.starts_with('/') && pattern.trim_end_matches('/').is_empty()
}
