use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderMap, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use tracing::Span;

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";

/// The response accumulator a handler writes into.
///
/// A fresh `Response` is created for every exchange and threaded through the middlewares and the route
/// handler. Nothing is sent until the whole chain has finished; the server then copies the headers, the
/// status and the body onto the wire.
///
/// Writes are best-effort: a failure while writing the body is logged to the response's span and does not
/// change the status.
pub struct Response {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
    body_limit: Option<usize>,
    span: Span,
}

impl Response {
    pub fn new() -> Response {
        Response::with_span(Span::none())
    }

    /// Creates a response whose log events are recorded inside `span`.
    pub fn with_span(span: Span) -> Response {
        Response {
            status: None,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            body_limit: None,
            span,
        }
    }

    /// Caps the body at `limit` bytes. Writes past the cap are dropped and logged.
    pub fn set_body_limit(&mut self, limit: Option<usize>) {
        self.body_limit = limit;
    }

    /// The status set by a handler, or `None` if nobody called [`set_status`](#method.set_status).
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The span this response logs into.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Appends `bytes` to the body.
    pub fn write<B: AsRef<[u8]>>(&mut self, bytes: B) {
        let bytes = bytes.as_ref();

        let accepted = match self.body_limit {
            Some(limit) => limit.saturating_sub(self.body.len()).min(bytes.len()),
            None => bytes.len(),
        };

        self.body.extend_from_slice(&bytes[..accepted]);

        if accepted < bytes.len() {
            tracing::error!(
                parent: &self.span,
                dropped = bytes.len() - accepted,
                limit = ?self.body_limit,
                "response body write failed: body limit exceeded"
            );
        }
    }

    /// Sets a `text/plain` content type, the status and the body in one step.
    pub fn write_text<T: AsRef<str>>(&mut self, status: StatusCode, text: T) {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        self.set_status(status);
        self.write(text.as_ref());
    }

    /// Serializes `value` as JSON and writes it with an `application/json` content type.
    ///
    /// If serialization fails the status becomes `500 Internal Server Error` and the error is logged.
    /// Whatever was serialized before the failure is still written, so the body may be truncated JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use std::collections::HashMap;
    /// use waypost::Response;
    ///
    /// let mut res = Response::new();
    /// res.write_json(StatusCode::OK, &HashMap::from([("k", "v")]));
    /// assert_eq!(res.status(), Some(StatusCode::OK));
    /// assert_eq!(res.body(), br#"{"k":"v"}"#);
    /// ```
    pub fn write_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        self.set_status(status);

        let mut buf = Vec::with_capacity(128);
        if let Err(err) = serde_json::to_writer(&mut buf, value) {
            self.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::error!(parent: &self.span, error = %err, "failed to serialize JSON response body");
        }

        self.write(&buf);
    }

    /// Converts the accumulated response into an `http::Response`. An unset status becomes `200 OK`.
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *res.headers_mut() = self.headers;
        res
    }
}

impl Default for Response {
    fn default() -> Self {
        Response::new()
    }
}

impl Debug for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ status: {:?}, headers: {:?}, body: {:?} }}",
            self.status,
            self.headers,
            String::from_utf8_lossy(&self.body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use std::collections::HashMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[derive(Serialize)]
    struct Partial {
        ok: u8,
        broken: Unserializable,
    }

    #[test]
    fn new_response_has_no_status() {
        let res = Response::new();
        assert_eq!(res.status(), None);
        assert!(res.body().is_empty());
    }

    #[test]
    fn write_appends() {
        let mut res = Response::new();
        res.write("hello ");
        res.write(b"world");
        assert_eq!(res.body(), b"hello world");
        assert_eq!(res.status(), None);
    }

    #[test]
    fn write_text_sets_everything() {
        let mut res = Response::new();
        res.write_text(StatusCode::CREATED, "done");
        assert_eq!(res.status(), Some(StatusCode::CREATED));
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(res.body(), b"done");
    }

    #[test]
    fn write_json_round_trips() {
        let mut res = Response::new();
        res.write_json(StatusCode::OK, &HashMap::from([("k", "v")]));
        assert_eq!(res.status(), Some(StatusCode::OK));
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");

        let decoded: HashMap<String, String> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(decoded, HashMap::from([("k".to_owned(), "v".to_owned())]));
    }

    #[test]
    fn write_json_failure_downgrades_to_500_and_keeps_partial_body() {
        let mut res = Response::new();
        res.write_json(StatusCode::OK, &Partial { ok: 1, broken: Unserializable });
        assert_eq!(res.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(res.body().starts_with(br#"{"ok":1"#));
    }

    #[test]
    fn body_limit_drops_overflow_without_touching_status() {
        let mut res = Response::new();
        res.set_body_limit(Some(4));
        res.set_status(StatusCode::OK);
        res.write("abc");
        res.write("def");
        assert_eq!(res.body(), b"abcd");
        assert_eq!(res.status(), Some(StatusCode::OK));
    }

    #[test]
    fn into_http_defaults_to_ok() {
        let mut res = Response::new();
        res.headers_mut().append("x-a", HeaderValue::from_static("1"));
        res.headers_mut().append("x-a", HeaderValue::from_static("2"));
        let res = res.into_http();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get_all("x-a").iter().count(), 2);
    }
}
