use http::StatusCode;
use serde::Serialize;
use waypost::{Chain, Config, Middleware, Request, Response, Router, Server};

// Define an app state to share it across the route handlers and middlewares.
struct State {
    service_name: &'static str,
}

#[derive(Serialize)]
struct Book<'a> {
    id: &'a str,
    author: &'a str,
}

// A handler for "/" page.
async fn home_handler(req: Request<State>, mut res: Response) -> Response {
    res.write_text(StatusCode::OK, format!("{} is up", req.context().service_name));
    res
}

// A handler for "/users/:userId" page.
async fn user_handler(req: Request<State>, mut res: Response) -> Response {
    let user_id = req.param_or("userId", "stranger");
    res.write_text(StatusCode::OK, format!("Hello {}", user_id));
    res
}

// Mounted under "/api", so it answers "/api/books/:bookId".
async fn book_handler(req: Request<State>, mut res: Response) -> Response {
    let book = Book {
        id: req.param_or("bookId", "0"),
        author: "unknown",
    };
    res.write_json(StatusCode::OK, &book);
    res
}

fn router() -> waypost::Result<Router<State>> {
    let api = Router::builder().get("/books/:bookId", book_handler).build()?;

    Router::builder()
        .get("/", home_handler)
        .get("/users/:userId", user_handler)
        .mount("/api", api)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    waypost::logging::init_with_filter(&config.log_filter);

    Server::new(config, State { service_name: "waypost-demo" })
        .router(router()?)
        .middleware(Chain::new().with(Middleware::logger()).with(Middleware::cors()))
        .serve()
        .await?;

    Ok(())
}
