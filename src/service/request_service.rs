use crate::config::Config;
use crate::handler::{BoxHandler, Handler};
use crate::request::Request;
use crate::response::Response;
use crate::types::ServerContext;
use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::service::Service;
use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use tracing::Instrument;

/// Processes the requests of one connection: buffers the body, runs the middleware-wrapped router and turns the
/// resulting [`Response`](./struct.Response.html) into an `http::Response`.
///
/// Every request gets exactly one response. Failures are turned into status codes, never into service errors.
pub struct RequestService<C> {
    pub(crate) handler: BoxHandler<C>,
    pub(crate) context: ServerContext<C>,
    pub(crate) max_request_body: usize,
    pub(crate) max_response_body: Option<usize>,
    pub(crate) remote_addr: SocketAddr,
}

impl<C, B> Service<http::Request<B>> for RequestService<C>
where
    C: Send + Sync + 'static,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = self.handler.clone();
        let context = self.context.clone();
        let max_request_body = self.max_request_body;
        let max_response_body = self.max_response_body;
        let remote_addr = self.remote_addr;

        let span = tracing::info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            remote_addr = %remote_addr,
        );

        let fut = async move {
            let (parts, body) = req.into_parts();

            let body = match Limited::new(body, max_request_body).collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    let status = if err.downcast_ref::<LengthLimitError>().is_some() {
                        StatusCode::PAYLOAD_TOO_LARGE
                    } else {
                        StatusCode::BAD_REQUEST
                    };
                    tracing::warn!(error = %err, %status, "couldn't read the request body");

                    let mut res = Response::with_span(tracing::Span::current());
                    res.write_text(status, "");
                    return Ok(res.into_http());
                }
            };

            let mut req = Request::from_http(http::Request::from_parts(parts, body), context);
            req.set_remote_addr(remote_addr);

            let mut res = Response::with_span(tracing::Span::current());
            res.set_body_limit(max_response_body);

            let res = handler.handle(req, res).await;
            tracing::debug!(status = res.status().map(|s| s.as_u16()).unwrap_or(0), "request processed");

            Ok(res.into_http())
        };

        Box::pin(fut.instrument(span))
    }
}

impl<C> Debug for RequestService<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RequestService {{ remote_addr: {} }}", self.remote_addr)
    }
}

/// Creates a [`RequestService`](./struct.RequestService.html) per connection, all sharing one handler and one
/// server context.
pub struct RequestServiceBuilder<C> {
    handler: BoxHandler<C>,
    context: ServerContext<C>,
    max_request_body: usize,
    max_response_body: Option<usize>,
}

impl<C: Send + Sync + 'static> RequestServiceBuilder<C> {
    pub fn new(handler: BoxHandler<C>, context: ServerContext<C>, config: &Config) -> Self {
        RequestServiceBuilder {
            handler,
            context,
            max_request_body: config.max_request_body,
            max_response_body: config.max_response_body,
        }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<C> {
        RequestService {
            handler: self.handler.clone(),
            context: self.context.clone(),
            max_request_body: self.max_request_body,
            max_response_body: self.max_response_body,
            remote_addr,
        }
    }
}

impl<C> Debug for RequestServiceBuilder<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RequestServiceBuilder {{ max_request_body: {}, max_response_body: {:?} }}",
            self.max_request_body, self.max_response_body
        )
    }
}
