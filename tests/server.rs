use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use waypost::{chain, BoxHandler, Chain, Config, Handler, Middleware, Request, Response, Router};

use self::support::{header, into_text, serve, serve_with_config};

mod support;

struct App {
    name: &'static str,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Echo {
    id: String,
    app: String,
    body: String,
}

fn router() -> Router<App> {
    let api = Router::builder()
        .post("/echo/:id", |mut req: Request<App>, mut res: Response| async move {
            let body = req.take_body();
            let echo = Echo {
                id: req.param_or("id", "0").to_owned(),
                app: req.context().name.to_owned(),
                body: String::from_utf8_lossy(&body).into_owned(),
            };
            res.write_json(StatusCode::CREATED, &echo);
            res
        })
        .build()
        .unwrap();

    Router::builder()
        .get("/", |_: Request<App>, mut res: Response| async move {
            res.write_text(StatusCode::OK, "home");
            res
        })
        .get("/health", |_: Request<App>, mut res: Response| async move {
            res.write_text(StatusCode::OK, "ok");
            res
        })
        .mount("/api", api)
        .build()
        .unwrap()
}

#[tokio::test]
async fn serves_routes_over_tcp() {
    let serve = serve(App { name: "test-app" }, router(), Chain::new()).await;

    let resp = serve.send("GET", "/health/", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), Some("text/plain"));
    assert_eq!(into_text(resp.into_body()).await, "ok");

    let resp = serve.send("POST", "/api/echo/noobmaster69", "payload").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(header(&resp, "content-type"), Some("application/json"));
    let echo: Echo = serde_json::from_str(&into_text(resp.into_body()).await).unwrap();
    assert_eq!(
        echo,
        Echo {
            id: "noobmaster69".to_owned(),
            app: "test-app".to_owned(),
            body: "payload".to_owned(),
        }
    );

    serve.shutdown().await;
}

#[tokio::test]
async fn resolution_failures_have_terminal_statuses() {
    let serve = serve(App { name: "x" }, router(), Chain::new()).await;

    assert_eq!(serve.send("GET", "/missing", "").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(serve.send("DELETE", "/health", "").await.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(serve.send("GET", "/api/echo/1", "").await.status(), StatusCode::METHOD_NOT_ALLOWED);

    serve.shutdown().await;
}

#[tokio::test]
async fn root_without_handler_is_501() {
    let router: Router<App> = Router::builder()
        .get("/health", |_: Request<App>, res: Response| async move { res })
        .build()
        .unwrap();
    let serve = serve(App { name: "x" }, router, Chain::new()).await;

    assert_eq!(serve.send("GET", "/", "").await.status(), StatusCode::NOT_IMPLEMENTED);

    serve.shutdown().await;
}

#[tokio::test]
async fn middlewares_run_in_declared_order() {
    let journal = Arc::new(Mutex::new(Vec::<String>::new()));

    let tag = |name: &'static str| {
        let journal = journal.clone();
        Middleware::new(move |inner: BoxHandler<App>| -> BoxHandler<App> {
            let journal = journal.clone();
            Arc::new(waypost::handler_fn(move |req: Request<App>, res: Response| {
                let inner = inner.clone();
                let journal = journal.clone();
                async move {
                    journal.lock().unwrap().push(format!("{}-pre", name));
                    let res = inner.handle(req, res).await;
                    journal.lock().unwrap().push(format!("{}-post", name));
                    res
                }
            }))
        })
    };

    let middlewares = chain(vec![Middleware::cors(), Middleware::logger(), tag("A"), tag("B")]);
    let serve = serve(App { name: "x" }, router(), middlewares).await;

    let resp = serve.send("GET", "/", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    assert_eq!(into_text(resp.into_body()).await, "home");
    assert_eq!(*journal.lock().unwrap(), vec!["A-pre", "B-pre", "B-post", "A-post"]);

    serve.shutdown().await;
}

#[tokio::test]
async fn request_body_limit_is_enforced() {
    let config = Config {
        max_request_body: 8,
        ..Config::default()
    };
    let serve = serve_with_config(config, App { name: "x" }, router(), Chain::new()).await;

    let resp = serve.send("POST", "/api/echo/1", "far more than eight bytes").await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let resp = serve.send("POST", "/api/echo/1", "tiny").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    serve.shutdown().await;
}
