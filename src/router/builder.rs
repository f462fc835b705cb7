use crate::handler::{handler_fn, Handler};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use http::Method;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// Builder for the [`Router`](./struct.Router.html) type.
///
/// Registration errors are kept until [`build`](#method.build) so routes can be chained; the first error wins and
/// every call after it is skipped.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use waypost::{Request, Response, Router};
///
/// async fn home(_: Request<()>, mut res: Response) -> Response {
///     res.write_text(StatusCode::OK, "home");
///     res
/// }
///
/// let router: Router<()> = Router::builder().get("/", home).build().unwrap();
/// # let _ = router;
/// ```
pub struct RouterBuilder<C> {
    inner: crate::Result<Router<C>>,
}

impl<C: Send + Sync + 'static> RouterBuilder<C> {
    /// Creates a new `RouterBuilder` instance with an empty router.
    pub fn new() -> RouterBuilder<C> {
        RouterBuilder {
            inner: Ok(Router::new()),
        }
    }

    /// Creates a new [`Router`](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<Router<C>> {
        self.inner
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(&mut Router<C>) -> crate::Result<()>,
    {
        RouterBuilder {
            inner: self.inner.and_then(|mut router| {
                func(&mut router)?;
                Ok(router)
            }),
        }
    }
}

impl<C: Send + Sync + 'static> RouterBuilder<C> {
    /// Adds a new route with `GET` method and the handler at the specified path.
    pub fn get<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.add(path, Method::GET, handler)
    }

    /// Adds a new route with `POST` method and the handler at the specified path.
    pub fn post<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.add(path, Method::POST, handler)
    }

    /// Adds a new route with `PUT` method and the handler at the specified path.
    pub fn put<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.add(path, Method::PUT, handler)
    }

    /// Adds a new route with `PATCH` method and the handler at the specified path.
    pub fn patch<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.add(path, Method::PATCH, handler)
    }

    /// Adds a new route with `DELETE` method and the handler at the specified path.
    pub fn delete<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.add(path, Method::DELETE, handler)
    }

    /// Adds a new route with the specified method and an async function or closure as handler.
    pub fn add<P, H, R>(self, path: P, method: Method, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        self.route(method, path, handler_fn(handler))
    }

    /// Adds a new route with the specified method and any [`Handler`](./trait.Handler.html).
    pub fn route<P, H>(self, method: Method, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Handler<C>,
    {
        self.and_then(move |router| router.register(method, path, handler))
    }

    /// Mounts `handler`, typically another router, under `prefix`.
    ///
    /// The mounted router matches its own patterns against the rest of the path after `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use waypost::{Request, Response, Router};
    ///
    /// let api: Router<()> = Router::builder()
    ///     .get("/books", |_: Request<()>, mut res: Response| async move {
    ///         res.write_text(StatusCode::OK, "List of books");
    ///         res
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// // Handles `GET /api/books`.
    /// let router = Router::builder().mount("/api", api).build().unwrap();
    /// # let _ = router;
    /// ```
    pub fn mount<P, H>(self, prefix: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Handler<C>,
    {
        self.and_then(move |router| router.mount(prefix, handler))
    }
}

impl<C: Send + Sync + 'static> Default for RouterBuilder<C> {
    fn default() -> Self {
        RouterBuilder::new()
    }
}

impl<C> Debug for RouterBuilder<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner {
            Ok(ref router) => write!(f, "RouterBuilder {:?}", router),
            Err(ref err) => write!(f, "RouterBuilder {{ error: {} }}", err),
        }
    }
}
