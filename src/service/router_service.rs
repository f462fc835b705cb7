use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::service::Service;
use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::future::{ready, Ready};
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// A [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) which hands out one
/// [`RequestService`](./struct.RequestService.html) per accepted connection.
///
/// [`Server`](./struct.Server.html) drives it; it is public for applications that run their own accept loop.
///
/// # Examples
///
/// ```no_run
/// use hyper::service::Service;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
/// use waypost::{Config, RequestServiceBuilder, Router, RouterService, ServerContext};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let router: Router<()> = Router::builder().build()?;
///     let builder = RequestServiceBuilder::new(Arc::new(router), ServerContext::new(()), &Config::default());
///     let service = Arc::new(RouterService::new(builder));
///
///     let listener = TcpListener::bind("127.0.0.1:3001").await?;
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = service.call(&stream).await.unwrap();
///             let io = TokioIo::new(stream);
///             if let Err(err) = Builder::new(TokioExecutor::new()).serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
pub struct RouterService<C> {
    builder: RequestServiceBuilder<C>,
}

impl<C: Send + Sync + 'static> RouterService<C> {
    pub fn new(builder: RequestServiceBuilder<C>) -> RouterService<C> {
        RouterService { builder }
    }
}

impl<C: Send + Sync + 'static> Service<&TcpStream> for RouterService<C> {
    type Response = RequestService<C>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = conn
            .peer_addr()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 0)));
        ready(Ok(self.builder.build(addr)))
    }
}

impl<C> Debug for RouterService<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RouterService {{ builder: {:?} }}", self.builder)
    }
}
