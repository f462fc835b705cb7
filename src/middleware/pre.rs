use crate::handler::{BoxHandler, Handler, HandlerFuture};
use crate::request::Request;
use crate::response::Response;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type TransformFn<C> = dyn Fn(Request<C>) -> TransformReturn<C> + Send + Sync + 'static;
type TransformReturn<C> = Pin<Box<dyn Future<Output = Request<C>> + Send + 'static>>;

/// A handler which runs a request transform and then the wrapped handler. Created by
/// [`Middleware::pre`](./struct.Middleware.html#method.pre).
pub struct PreMiddleware<C> {
    transform: Arc<TransformFn<C>>,
    inner: BoxHandler<C>,
}

impl<C: Send + Sync + 'static> PreMiddleware<C> {
    pub(crate) fn new<H, R>(handler: Arc<H>, inner: BoxHandler<C>) -> PreMiddleware<C>
    where
        H: Fn(Request<C>) -> R + Send + Sync + 'static,
        R: Future<Output = Request<C>> + Send + 'static,
    {
        let transform: Arc<TransformFn<C>> =
            Arc::new(move |req: Request<C>| -> TransformReturn<C> { Box::pin(handler(req)) });
        PreMiddleware { transform, inner }
    }
}

impl<C: Send + Sync + 'static> Handler<C> for PreMiddleware<C> {
    fn handle<'a>(&'a self, req: Request<C>, res: Response) -> HandlerFuture<'a> {
        Box::pin(async move {
            let req = (self.transform)(req).await;
            self.inner.handle(req, res).await
        })
    }
}

impl<C> Debug for PreMiddleware<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PreMiddleware")
    }
}
