use crate::handler::{BoxHandler, Handler, HandlerFuture};
use crate::request::Request;
use crate::response::Response;
use std::fmt::{self, Debug, Formatter};

/// Logs the request before the wrapped handler runs and the response after it.
///
/// Reading the body for the log record consumes it, so the logger puts the same bytes back before delegating.
pub struct Logger<C> {
    inner: BoxHandler<C>,
}

impl<C: Send + Sync + 'static> Logger<C> {
    pub fn new(inner: BoxHandler<C>) -> Logger<C> {
        Logger { inner }
    }
}

impl<C: Send + Sync + 'static> Handler<C> for Logger<C> {
    fn handle<'a>(&'a self, mut req: Request<C>, res: Response) -> HandlerFuture<'a> {
        Box::pin(async move {
            let body = req.take_body();

            tracing::info!(
                parent: res.span(),
                method = %req.method(),
                path = %req.uri(),
                headers = ?req.headers(),
                body = %String::from_utf8_lossy(&body),
                "request"
            );

            req.set_body(body);
            let res = self.inner.handle(req, res).await;

            tracing::info!(
                parent: res.span(),
                status = res.status().map(|s| s.as_u16()).unwrap_or(0),
                headers = ?res.headers(),
                body = %String::from_utf8_lossy(res.body()),
                "response"
            );

            res
        })
    }
}

impl<C> Debug for Logger<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Logger")
    }
}

#[cfg(test)]
mod tests {
    use crate::{handler_fn, Chain, Handler, Middleware, Request, Response, ServerContext};
    use bytes::Bytes;
    use http::StatusCode;

    #[tokio::test]
    async fn body_stays_readable_for_the_handler() {
        let app = Chain::new()
            .with(Middleware::logger())
            .wrap_handler(handler_fn(|mut req: Request<()>, mut res: Response| async move {
                let body = req.take_body();
                res.write_text(StatusCode::OK, String::from_utf8_lossy(&body));
                res
            }));

        let raw = http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Bytes::from_static(b"{\"hello\":\"world\"}"))
            .unwrap();
        let req = Request::from_http(raw, ServerContext::new(()));

        let res = app.handle(req, Response::new()).await;
        assert_eq!(res.status(), Some(StatusCode::OK));
        assert_eq!(res.body(), b"{\"hello\":\"world\"}");
    }
}
