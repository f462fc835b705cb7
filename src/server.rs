use crate::config::Config;
use crate::middleware::Chain;
use crate::router::Router;
use crate::service::{RequestServiceBuilder, RouterService};
use crate::types::ServerContext;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Serves a [`Router`](./struct.Router.html) over HTTP.
///
/// The server owns the shared [`ServerContext`](./struct.ServerContext.html), the router and the middleware
/// [`Chain`](./struct.Chain.html). It spawns one task per connection; the router and the context are read-only
/// from then on.
///
/// Without a router the server answers every request with `404 Not Found`. Without middlewares the router is
/// called directly.
///
/// # Examples
///
/// ```no_run
/// use http::StatusCode;
/// use waypost::{Chain, Config, Middleware, Request, Response, Router, Server};
///
/// struct App {
///     name: &'static str,
/// }
///
/// #[tokio::main]
/// async fn main() -> waypost::Result<()> {
///     waypost::logging::init();
///
///     let router = Router::builder()
///         .get("/", |req: Request<App>, mut res: Response| async move {
///             res.write_text(StatusCode::OK, req.context().name);
///             res
///         })
///         .build()?;
///
///     Server::new(Config::default(), App { name: "demo" })
///         .router(router)
///         .middleware(Chain::new().with(Middleware::logger()))
///         .serve()
///         .await
/// }
/// ```
pub struct Server<C> {
    config: Config,
    context: ServerContext<C>,
    router: Option<Router<C>>,
    chain: Chain<C>,
}

impl<C: Send + Sync + 'static> Server<C> {
    pub fn new(config: Config, context: C) -> Server<C> {
        Server::with_context(config, ServerContext::new(context))
    }

    /// Creates a server around an existing shared context.
    pub fn with_context(config: Config, context: ServerContext<C>) -> Server<C> {
        Server {
            config,
            context,
            router: None,
            chain: Chain::new(),
        }
    }

    pub fn router(mut self, router: Router<C>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn middleware(mut self, chain: Chain<C>) -> Self {
        self.chain = chain;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Binds `host:port` from the configuration and serves until Ctrl-C.
    pub async fn serve(self) -> crate::Result<()> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        self.serve_with_shutdown(listener, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "couldn't listen for the interrupt signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serves connections from `listener` until `signal` completes.
    ///
    /// When the signal fires the listener is closed. Connections that are already open are left to finish on their
    /// own tasks.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> crate::Result<()>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!("middlewares are setting up");
        let service = Arc::new(self.into_service());
        tracing::info!(address = %local_addr, "server listening on http://{}/", local_addr);

        tokio::pin!(signal);

        loop {
            tokio::select! {
                _ = &mut signal => {
                    tracing::info!("shutdown signal received, closing the listener");
                    break;
                }
                accepted = listener.accept() => {
                    let stream = match accepted {
                        Ok((stream, _)) => stream,
                        Err(err) => {
                            tracing::warn!(error = %err, "error accepting connection");
                            // Errors like EMFILE persist until a connection closes.
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };

                    let service = Arc::clone(&service);
                    tokio::spawn(async move {
                        let request_service = match service.call(&stream).await {
                            Ok(request_service) => request_service,
                            Err(never) => match never {},
                        };

                        let io = TokioIo::new(stream);
                        let builder = Builder::new(TokioExecutor::new());
                        if let Err(err) = builder.serve_connection(io, request_service).await {
                            tracing::debug!(error = %err, "error serving connection");
                        }
                    });
                }
            }
        }

        Ok(())
    }

    fn into_service(self) -> RouterService<C> {
        let router = self.router.unwrap_or_else(Router::fallback);
        let handler = self.chain.wrap(Arc::new(router));
        RouterService::new(RequestServiceBuilder::new(handler, self.context, &self.config))
    }
}

impl<C> Debug for Server<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Server {{ config: {:?}, router: {:?}, chain: {:?} }}",
            self.config, self.router, self.chain
        )
    }
}
