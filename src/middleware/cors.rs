use crate::handler::{BoxHandler, Handler, HandlerFuture};
use crate::request::Request;
use crate::response::Response;
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use std::fmt::{self, Debug, Formatter};

/// Allows every origin by setting `Access-Control-Allow-Origin: *` before the wrapped handler runs.
///
/// The wrapped handler may still override the header.
pub struct Cors<C> {
    inner: BoxHandler<C>,
}

impl<C: Send + Sync + 'static> Cors<C> {
    pub fn new(inner: BoxHandler<C>) -> Cors<C> {
        Cors { inner }
    }
}

impl<C: Send + Sync + 'static> Handler<C> for Cors<C> {
    fn handle<'a>(&'a self, req: Request<C>, mut res: Response) -> HandlerFuture<'a> {
        res.headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        self.inner.handle(req, res)
    }
}

impl<C> Debug for Cors<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Cors")
    }
}

#[cfg(test)]
mod tests {
    use crate::{Chain, Handler, Middleware, Request, Response, Router, ServerContext};
    use http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn sets_allow_all_origin_even_on_failures() {
        let router: Router<()> = Router::builder().build().unwrap();
        let app = Chain::new().with(Middleware::cors()).wrap_handler(router);

        let req = Request::new(Method::GET, "/missing".parse().unwrap(), ServerContext::new(()));
        let res = app.handle(req, Response::new()).await;

        assert_eq!(res.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
