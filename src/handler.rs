use crate::request::Request;
use crate::response::Response;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by [`Handler::handle`](./trait.Handler.html#tymethod.handle).
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// A shared, type-erased handler. Middlewares consume and produce these.
pub type BoxHandler<C> = Arc<dyn Handler<C>>;

/// Anything that can process a request: a plain function, a [`Router`](./struct.Router.html), or a handler
/// wrapped by middlewares.
///
/// A handler takes the request by value, writes into the response accumulator and hands the accumulator back
/// when it is done.
pub trait Handler<C>: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request<C>, res: Response) -> HandlerFuture<'a>;
}

impl<C: 'static> Handler<C> for Arc<dyn Handler<C>> {
    fn handle<'a>(&'a self, req: Request<C>, res: Response) -> HandlerFuture<'a> {
        (**self).handle(req, res)
    }
}

/// A handler backed by an async function or closure. Use [`handler_fn`](./fn.handler_fn.html) to create one.
pub struct HandlerFn<F> {
    f: F,
}

/// Turns an async function or closure into a [`Handler`](./trait.Handler.html).
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use waypost::{handler_fn, Request, Response};
///
/// let hello = handler_fn(|req: Request<()>, mut res: Response| async move {
///     res.write_text(StatusCode::OK, format!("hello {}", req.param_or("name", "stranger")));
///     res
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<C, F, R>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
    R: Future<Output = Response> + Send + 'static,
{
    HandlerFn { f }
}

impl<C, F, R> Handler<C> for HandlerFn<F>
where
    C: 'static,
    F: Fn(Request<C>, Response) -> R + Send + Sync + 'static,
    R: Future<Output = Response> + Send + 'static,
{
    fn handle<'a>(&'a self, req: Request<C>, res: Response) -> HandlerFuture<'a> {
        Box::pin((self.f)(req, res))
    }
}

impl<F> Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerFn")
    }
}
