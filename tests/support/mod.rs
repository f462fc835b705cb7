#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};
use tokio::task::JoinHandle;
use waypost::{Chain, Config, Router, Server};

pub struct Serve {
    addr: SocketAddr,
    tx: Sender<()>,
    handle: JoinHandle<waypost::Result<()>>,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        http::request::Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    /// Sends `body` to `route` and waits for the response head.
    pub async fn send(&self, method: &str, route: &str, body: &'static str) -> http::Response<Incoming> {
        let req = self
            .new_request(method, route)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap();
        self.client.request(req).await.unwrap()
    }

    pub async fn shutdown(self) {
        self.tx.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn serve<C>(context: C, router: Router<C>, chain: Chain<C>) -> Serve
where
    C: Send + Sync + 'static,
{
    serve_with_config(Config::default(), context, router, chain).await
}

pub async fn serve_with_config<C>(config: Config, context: C, router: Router<C>, chain: Chain<C>) -> Serve
where
    C: Send + Sync + 'static,
{
    // Bind a TCP listener to an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = Server::new(config, context).router(router).middleware(chain);
    let handle = tokio::spawn(server.serve_with_shutdown(listener, async move {
        let _ = rx.await;
    }));

    let client = Client::builder(TokioExecutor::new()).build_http();

    Serve {
        addr,
        tx,
        handle,
        client,
    }
}

pub fn header<'a>(res: &'a http::Response<Incoming>, name: &str) -> Option<&'a str> {
    res.headers().get(name).and_then(|v| v.to_str().ok())
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
