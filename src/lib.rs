//! `waypost` is a small HTTP routing and middleware core built on [hyper](https://hyper.rs/).
//!
//! Its core features:
//!
//! - Ordered, predictable route matching: first structural match wins
//!
//! - Named route parameters (`/users/:userId`) with an optional trailing slash
//!
//! - Mountable sub-routers: a [`Router`] is a [`Handler`] like any other
//!
//! - Composable middlewares with a deterministic outside-in order
//!
//! - One typed, read-only application context shared by every request
//!
//! ## Basic Example
//!
//! ```no_run
//! use http::StatusCode;
//! use waypost::{Chain, Config, Middleware, Request, Response, Router, Server};
//!
//! // Define an app state to share it across the route handlers and middlewares.
//! struct State {
//!     visits_label: &'static str,
//! }
//!
//! // A handler for "/" page.
//! async fn home_handler(req: Request<State>, mut res: Response) -> Response {
//!     res.write_text(StatusCode::OK, req.context().visits_label);
//!     res
//! }
//!
//! // A handler for "/users/:userId" page.
//! async fn user_handler(req: Request<State>, mut res: Response) -> Response {
//!     let user_id = req.param_or("userId", "unknown");
//!     res.write_text(StatusCode::OK, format!("Hello {}", user_id));
//!     res
//! }
//!
//! fn router() -> waypost::Result<Router<State>> {
//!     Router::builder()
//!         .get("/", home_handler)
//!         .get("/users/:userId", user_handler)
//!         .build()
//! }
//!
//! #[tokio::main]
//! async fn main() -> waypost::Result<()> {
//!     waypost::logging::init();
//!
//!     Server::new(Config::default(), State { visits_label: "Home page" })
//!         .router(router()?)
//!         .middleware(Chain::new().with(Middleware::logger()).with(Middleware::cors()))
//!         .serve()
//!         .await
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Paths
//!
//! A route path is a list of `/`-separated segments. A segment starting with `:` is a route parameter which
//! matches one or more word characters or hyphens; everything else matches literally. A single trailing slash is
//! always accepted, so `/health` also matches `/health/`.
//!
//! Routes are tried in the order they were registered, and the first one whose path matches decides the outcome.
//! If its method differs from the request's the answer is `405 Method Not Allowed`, even if a later route with the
//! same path would accept the method:
//!
//! ```
//! use http::StatusCode;
//! use waypost::{Request, Response, Router};
//!
//! async fn ok(_: Request<()>, mut res: Response) -> Response {
//!     res.set_status(StatusCode::OK);
//!     res
//! }
//!
//! let router = Router::builder()
//!     .get("/items", ok)
//!     // Never reached: `GET /items` above matches `/items` first.
//!     .post("/items", ok)
//!     .build()
//!     .unwrap();
//! # let _ = router;
//! ```
//!
//! The path `/` is reserved for the root handler. When none is registered the router answers `501 Not Implemented`.
//! Paths matching no route get `404 Not Found`.
//!
//! ### Route Parameters
//!
//! ```txt
//! Route path: /users/:userName/books/:bookName
//! Request URL: http://localhost:8080/users/alice/books/HarryPotter
//! req.params() returns: { "userName": "alice", "bookName": "HarryPotter" }
//! ```
//!
//! Malformed patterns, such as a parameter declared twice, make [`RouterBuilder::build`] fail, so a broken route
//! table stops the application at startup instead of misrouting requests.
//!
//! ### Mounting Routers
//!
//! [`RouterBuilder::mount`] delegates every path below a prefix to another handler, typically another router.
//! The mounted router receives the full request path and matches its own patterns against what follows the
//! prefix:
//!
//! ```
//! use http::StatusCode;
//! use waypost::{Request, Response, Router};
//!
//! fn api_router() -> Router<()> {
//!     Router::builder()
//!         .get("/books/:bookId", |req: Request<()>, mut res: Response| async move {
//!             res.write_text(StatusCode::OK, format!("Show book: {}", req.param_or("bookId", "?")));
//!             res
//!         })
//!         .build()
//!         .unwrap()
//! }
//!
//! // Handles `GET /api/books/:bookId`.
//! let router = Router::builder().mount("/api", api_router()).build().unwrap();
//! # let _ = router;
//! ```
//!
//! ## Middleware
//!
//! A [`Middleware`] turns a handler into another handler. A [`Chain`] applies a list of them so the first one is
//! the outermost: for `[a, b]` the order is `a` before, `b` before, the handler, `b` after, `a` after.
//! [`Middleware::logger`] and [`Middleware::cors`] are built in.
//!
//! ## Error Handling
//!
//! Only setup can fail with an [`Error`]. Once requests flow, every failure becomes a response: resolution
//! failures get 404, 405 or 501, a failed JSON serialization gets 500, and body write failures are logged.

pub use self::config::Config;
pub use self::error::Error;
pub use self::handler::{handler_fn, BoxHandler, Handler, HandlerFn, HandlerFuture};
pub use self::middleware::{chain, Chain, Cors, Logger, Middleware, PostMiddleware, PreMiddleware};
pub use self::request::Request;
pub use self::response::Response;
pub use self::route::{MethodFilter, PatternMatch, Route, RoutePattern};
pub use self::router::{Resolution, Router, RouterBuilder};
pub use self::server::Server;
pub use self::service::{RequestService, RequestServiceBuilder, RouterService};
pub use self::types::{RouteParams, ServerContext};

mod config;
mod error;
mod handler;
mod helpers;
pub mod logging;
mod middleware;
pub mod prelude;
mod regex_generator;
mod request;
mod response;
mod route;
mod router;
mod server;
mod service;
mod types;

/// A Result type often returned from methods that can have waypost errors.
pub type Result<T> = std::result::Result<T, Error>;
