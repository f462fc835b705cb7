use crate::handler::{BoxHandler, Handler, HandlerFuture};
use crate::request::Request;
use crate::response::Response;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type TransformFn = dyn Fn(Response) -> TransformReturn + Send + Sync + 'static;
type TransformReturn = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A handler which runs the wrapped handler and then a response transform. Created by
/// [`Middleware::post`](./struct.Middleware.html#method.post).
pub struct PostMiddleware<C> {
    transform: Arc<TransformFn>,
    inner: BoxHandler<C>,
}

impl<C: Send + Sync + 'static> PostMiddleware<C> {
    pub(crate) fn new<H, R>(handler: Arc<H>, inner: BoxHandler<C>) -> PostMiddleware<C>
    where
        H: Fn(Response) -> R + Send + Sync + 'static,
        R: Future<Output = Response> + Send + 'static,
    {
        let transform: Arc<TransformFn> = Arc::new(move |res: Response| -> TransformReturn { Box::pin(handler(res)) });
        PostMiddleware { transform, inner }
    }
}

impl<C: Send + Sync + 'static> Handler<C> for PostMiddleware<C> {
    fn handle<'a>(&'a self, req: Request<C>, res: Response) -> HandlerFuture<'a> {
        Box::pin(async move {
            let res = self.inner.handle(req, res).await;
            (self.transform)(res).await
        })
    }
}

impl<C> Debug for PostMiddleware<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PostMiddleware")
    }
}
