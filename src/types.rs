use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// The parameters captured from a request path, keyed by the names declared in the route pattern.
///
/// For the route `/users/:userName/books/:bookName` and the path `/users/alice/books/HarryPotter`
/// it holds `{ "userName": "alice", "bookName": "HarryPotter" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Creates an empty parameter map.
    pub fn new() -> RouteParams {
        RouteParams(HashMap::new())
    }

    /// Creates an empty parameter map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(HashMap::with_capacity(capacity))
    }

    /// Sets a parameter, replacing any earlier value with the same name.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.0.insert(param_name.into(), param_val.into());
    }

    /// Returns the value captured for `param_name`.
    pub fn get<N: AsRef<str>>(&self, param_name: N) -> Option<&String> {
        self.0.get(param_name.as_ref())
    }

    /// Checks whether a parameter named `param_name` was captured.
    pub fn has<N: AsRef<str>>(&self, param_name: N) -> bool {
        self.0.contains_key(param_name.as_ref())
    }

    /// The number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over the parameter names.
    pub fn params_names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// An iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// The application value shared read-only by every request a server processes.
///
/// It is created once, before the server starts, and every [`Request`](./struct.Request.html) carries a cheap
/// clone of it. There is no way to mutate it afterwards; applications that need shared mutable state put
/// their own synchronised types inside `C`.
///
/// # Examples
///
/// ```
/// use waypost::ServerContext;
///
/// struct State {
///     greeting: &'static str,
/// }
///
/// let ctx = ServerContext::new(State { greeting: "hello" });
/// let shared = ctx.clone();
/// assert_eq!(shared.greeting, "hello");
/// ```
pub struct ServerContext<C>(Arc<C>);

impl<C> ServerContext<C> {
    pub fn new(data: C) -> ServerContext<C> {
        ServerContext(Arc::new(data))
    }

    /// Returns the shared value.
    pub fn data(&self) -> &C {
        &self.0
    }
}

impl<C> Clone for ServerContext<C> {
    fn clone(&self) -> Self {
        ServerContext(Arc::clone(&self.0))
    }
}

impl<C> Deref for ServerContext<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.0
    }
}

impl<C: Default> Default for ServerContext<C> {
    fn default() -> Self {
        ServerContext::new(C::default())
    }
}

impl<C: Debug> Debug for ServerContext<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServerContext").field(&*self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_writes_overwrite_params() {
        let mut params = RouteParams::new();
        params.set("id", "1");
        params.set("id", "2");
        assert_eq!(params.get("id").map(String::as_str), Some("2"));
        assert_eq!(params.len(), 1);
        assert!(params.has("id"));
        assert!(!params.has("name"));
    }

    #[test]
    fn context_clones_share_one_value() {
        let ctx = ServerContext::new(vec![1, 2, 3]);
        let other = ctx.clone();
        assert!(std::ptr::eq(ctx.data(), other.data()));
        assert_eq!(other.len(), 3);
    }
}
