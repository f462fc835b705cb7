use crate::handler::{BoxHandler, Handler};
use crate::request::Request;
use crate::response::Response;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

pub use self::cors::Cors;
pub use self::logger::Logger;
pub use self::post::PostMiddleware;
pub use self::pre::PreMiddleware;

mod cors;
mod logger;
mod post;
mod pre;

type Transform<C> = Arc<dyn Fn(BoxHandler<C>) -> BoxHandler<C> + Send + Sync + 'static>;

/// A function turning one [`Handler`](./trait.Handler.html) into another, to add behavior before and after it.
///
/// Middlewares are combined with a [`Chain`](./struct.Chain.html). Besides the fully general
/// [`Middleware::new`](#method.new) there are shortcuts for request-only ([`pre`](#method.pre)) and
/// response-only ([`post`](#method.post)) transforms, and two built-ins: [`logger`](#method.logger) and
/// [`cors`](#method.cors).
pub struct Middleware<C> {
    transform: Transform<C>,
}

impl<C: Send + Sync + 'static> Middleware<C> {
    /// Creates a middleware from a handler transform.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use waypost::{handler_fn, BoxHandler, Handler, Middleware, Request, Response};
    ///
    /// let timing: Middleware<()> = Middleware::new(|inner: BoxHandler<()>| -> BoxHandler<()> {
    ///     Arc::new(handler_fn(move |req: Request<()>, res: Response| {
    ///         let inner = inner.clone();
    ///         async move {
    ///             let started = std::time::Instant::now();
    ///             let res = inner.handle(req, res).await;
    ///             println!("took {:?}", started.elapsed());
    ///             res
    ///         }
    ///     }))
    /// });
    /// # let _ = timing;
    /// ```
    pub fn new<F>(transform: F) -> Middleware<C>
    where
        F: Fn(BoxHandler<C>) -> BoxHandler<C> + Send + Sync + 'static,
    {
        Middleware {
            transform: Arc::new(transform),
        }
    }

    /// Creates a middleware which transforms the request before the wrapped handler sees it.
    pub fn pre<H, R>(handler: H) -> Middleware<C>
    where
        H: Fn(Request<C>) -> R + Send + Sync + 'static,
        R: Future<Output = Request<C>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Middleware::new(move |inner: BoxHandler<C>| -> BoxHandler<C> {
            Arc::new(PreMiddleware::new(Arc::clone(&handler), inner))
        })
    }

    /// Creates a middleware which transforms the response after the wrapped handler produced it.
    pub fn post<H, R>(handler: H) -> Middleware<C>
    where
        H: Fn(Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Middleware::new(move |inner: BoxHandler<C>| -> BoxHandler<C> {
            Arc::new(PostMiddleware::new(Arc::clone(&handler), inner))
        })
    }

    /// Logs every request before it is handled and every response after.
    ///
    /// The request body is read for the log record and put back, so the wrapped handler can still read it.
    pub fn logger() -> Middleware<C> {
        Middleware::new(|inner: BoxHandler<C>| -> BoxHandler<C> { Arc::new(Logger::new(inner)) })
    }

    /// Sets `Access-Control-Allow-Origin: *` on every response.
    pub fn cors() -> Middleware<C> {
        Middleware::new(|inner: BoxHandler<C>| -> BoxHandler<C> { Arc::new(Cors::new(inner)) })
    }

    /// Wraps `handler` with this middleware.
    pub fn wrap(&self, handler: BoxHandler<C>) -> BoxHandler<C> {
        (self.transform)(handler)
    }
}

impl<C> Clone for Middleware<C> {
    fn clone(&self) -> Self {
        Middleware {
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<C> Debug for Middleware<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}

/// An ordered list of middlewares.
///
/// [`wrap`](#method.wrap) composes them around a terminal handler so that the first middleware is the outermost
/// one: with `[a, b]` the execution order is `a` before, `b` before, the handler, `b` after, `a` after. An empty
/// chain returns the handler unchanged.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use waypost::{Chain, Middleware, Router};
///
/// let router: Router<()> = Router::builder().build().unwrap();
/// let app = Chain::new()
///     .with(Middleware::logger())
///     .with(Middleware::cors())
///     .wrap(Arc::new(router));
/// # let _ = app;
/// ```
pub struct Chain<C> {
    middlewares: Vec<Middleware<C>>,
}

impl<C: Send + Sync + 'static> Chain<C> {
    pub fn new() -> Chain<C> {
        Chain {
            middlewares: Vec::new(),
        }
    }

    /// Appends `middleware` as the innermost middleware so far.
    pub fn with(mut self, middleware: Middleware<C>) -> Chain<C> {
        self.middlewares.push(middleware);
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Composes the middlewares around `terminal`.
    pub fn wrap(&self, terminal: BoxHandler<C>) -> BoxHandler<C> {
        self.middlewares
            .iter()
            .rev()
            .fold(terminal, |handler, middleware| middleware.wrap(handler))
    }

    /// Composes the middlewares around any handler.
    pub fn wrap_handler<H: Handler<C>>(&self, terminal: H) -> BoxHandler<C> {
        self.wrap(Arc::new(terminal))
    }
}

impl<C: Send + Sync + 'static> Default for Chain<C> {
    fn default() -> Self {
        Chain::new()
    }
}

impl<C> Clone for Chain<C> {
    fn clone(&self) -> Self {
        Chain {
            middlewares: self.middlewares.clone(),
        }
    }
}

impl<C> Debug for Chain<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Chain {{ middlewares: {} }}", self.middlewares.len())
    }
}

/// Builds a [`Chain`](./struct.Chain.html) from middlewares given outermost first.
pub fn chain<C, I>(middlewares: I) -> Chain<C>
where
    C: Send + Sync + 'static,
    I: IntoIterator<Item = Middleware<C>>,
{
    Chain {
        middlewares: middlewares.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler_fn;
    use crate::types::ServerContext;
    use http::{Method, StatusCode};
    use std::sync::Mutex;

    type Journal = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, journal: Journal) -> Middleware<()> {
        Middleware::new(move |inner: BoxHandler<()>| -> BoxHandler<()> {
            let journal = journal.clone();
            Arc::new(handler_fn(move |req: Request<()>, res: Response| {
                let inner = inner.clone();
                let journal = journal.clone();
                async move {
                    journal.lock().unwrap().push(format!("{}-pre", name));
                    let res = inner.handle(req, res).await;
                    journal.lock().unwrap().push(format!("{}-post", name));
                    res
                }
            }))
        })
    }

    fn terminal(journal: Journal) -> BoxHandler<()> {
        Arc::new(handler_fn(move |_: Request<()>, mut res: Response| {
            let journal = journal.clone();
            async move {
                journal.lock().unwrap().push("H".to_owned());
                res.set_status(StatusCode::OK);
                res
            }
        }))
    }

    fn req() -> Request<()> {
        Request::new(Method::GET, "/".parse().unwrap(), ServerContext::new(()))
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let journal: Journal = Arc::default();
        let app = chain(vec![recording("A", journal.clone()), recording("B", journal.clone())])
            .wrap(terminal(journal.clone()));

        let res = app.handle(req(), Response::new()).await;
        assert_eq!(res.status(), Some(StatusCode::OK));
        assert_eq!(*journal.lock().unwrap(), vec!["A-pre", "B-pre", "H", "B-post", "A-post"]);
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let journal: Journal = Arc::default();
        let handler = terminal(journal.clone());
        let wrapped = Chain::new().wrap(handler.clone());
        assert!(Arc::ptr_eq(&handler, &wrapped));
    }

    #[tokio::test]
    async fn pre_and_post_helpers() {
        let app = Chain::new()
            .with(Middleware::pre(|mut req: Request<()>| async move {
                req.set_body("rewritten");
                req
            }))
            .with(Middleware::post(|mut res: Response| async move {
                res.write("!");
                res
            }))
            .wrap_handler(handler_fn(|mut req: Request<()>, mut res: Response| async move {
                let body = req.take_body();
                res.write_text(StatusCode::OK, String::from_utf8_lossy(&body));
                res
            }));

        let res = app.handle(req(), Response::new()).await;
        assert_eq!(res.body(), b"rewritten!");
    }
}
