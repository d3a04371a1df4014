//! [`Router`](crate::Router) collects route registrations and freezes them
//! into a [`RoutingTable`](crate::RoutingTable) that serves requests.
//!
//! ```rust,no_run
//! use httptree::{Router, Params};
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn hello(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     let params = req.extensions().get::<Params>().unwrap();
//!     Ok(Response::new(format!("Hello, {}", params.get("user").unwrap()).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let table = Router::default()
//!         .get("/", index)
//!         .get("/hello/:user", hello)
//!         .build();
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(table.into_service())
//!         .await;
//! }
//!```
//!
//! The registered path, against which the router matches incoming requests, can
//! contain two types of parameters:
//! ```ignore
//!  Syntax    Type
//!  :name     named parameter
//!  *name     catch-all parameter
//! ```
//!
//! Named parameters are dynamic path segments. They match anything until the
//! next '/' or the path end:
//! ```ignore
//!  Path: /blog/:category/:post
//!
//!  Requests:
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/request-routers/           no match, but the router would redirect
//!   /blog/rust/                           no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! Catch-all parameters match anything until the path end. Since they match
//! anything until the end, catch-all parameters must always be the final path
//! element, directly after a '/':
//! ```ignore
//!  Path: /files/*filepath
//!
//!  Requests:
//!   /files/                             match: filepath=""
//!   /files/LICENSE                      match: filepath="LICENSE"
//!   /files/templates/article.html       match: filepath="templates/article.html"
//!   /files                              no match, but the router would redirect
//! ```
//!
//! Static segments take precedence over parameters in the same position, so
//! `/users/new` and `/users/:id` can both be registered.
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{future, ready};
use hyper::header::{self, HeaderValue};
use hyper::service::Service;
use hyper::{Body, Method, Request, Response, StatusCode};

use crate::config::RouterConfig;
use crate::error::{InsertError, MergeError};
use crate::handler::{Handler, HandlerFuture, Next};
use crate::merge;
use crate::params::Params;
use crate::route::{Route, RouteInfo, RouteOption};
use crate::tree::Node;

/// Router collects routes during application setup.
///
/// Once every route is registered, [`Router::build`] turns it into a
/// read-only [`RoutingTable`].
pub struct Router {
    tree: Node,
    routes: BTreeMap<String, Arc<Route>>,
    methods: HashSet<Method>,
    config: RouterConfig,
    global_options: Option<Box<dyn Handler>>,
    not_found: Option<Box<dyn Handler>>,
    method_not_allowed: Option<Box<dyn Handler>>,
}

/// A successful lookup.
#[derive(Debug)]
pub struct Match<'t> {
    pub route: &'t Arc<Route>,
    pub params: Params,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            tree: Node::root(),
            routes: BTreeMap::new(),
            methods: HashSet::new(),
            config,
            global_options: None,
            not_found: None,
            method_not_allowed: None,
        }
    }

    /// Registers `handler` for `method` and `pattern`, applying `options` in
    /// order.
    ///
    /// Registering the same method and pattern again replaces the earlier
    /// route.
    /// ```rust
    /// use httptree::{options, Router};
    /// use hyper::{Response, Body, Method};
    ///
    /// let mut router = Router::default();
    /// let route = router
    ///     .add_route(Method::GET, "/teapot/:id", |_| async {
    ///         Ok(Response::new(Body::from("I am a teapot!")))
    ///     }, [options::name("teapot"), options::int("id")])
    ///     .unwrap();
    ///
    /// assert_eq!(route.params(), ["id"]);
    /// ```
    pub fn add_route<I>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler + 'static,
        options: I,
    ) -> Result<Arc<Route>, InsertError>
    where
        I: IntoIterator<Item = RouteOption>,
    {
        let mut route = Route::new(method.clone(), pattern, Arc::new(handler))?;
        for option in options {
            route.apply(option);
        }

        for constraint in route.constraints() {
            if !route.params().iter().any(|param| param == constraint.name()) {
                tracing::warn!(
                    %method,
                    pattern,
                    param = constraint.name(),
                    "constraint names a parameter the pattern does not declare"
                );
            }
        }

        let route = Arc::new(route);
        self.tree.insert(method.clone(), pattern, route.clone())?;

        let key = format!("{}:{}", method, pattern);
        if self.routes.insert(key, route.clone()).is_some() {
            tracing::warn!(%method, pattern, "route registered twice, replacing the earlier handler");
        } else {
            tracing::debug!(%method, pattern, name = route.name(), "route registered");
        }
        self.methods.insert(method);

        Ok(route)
    }

    /// Insert a handler into the router for a specific path at the specified method.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed or conflicts with a registered one.
    /// ```rust
    /// use httptree::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .handle("/teapot", Method::GET, |_| async {
    ///         Ok(Response::new(Body::from("I am a teapot!")))
    ///     });
    /// ```
    pub fn handle(mut self, path: &str, method: Method, handler: impl Handler + 'static) -> Self {
        if let Err(err) = self.add_route(method, path, handler, None) {
            panic!("{}", err);
        }
        self
    }

    /// Register a handler for `GET` requests
    pub fn get(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::GET, handler)
    }

    /// Register a handler for `HEAD` requests
    pub fn head(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::HEAD, handler)
    }

    /// Register a handler for `OPTIONS` requests
    pub fn options(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::OPTIONS, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::POST, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::PUT, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::PATCH, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::DELETE, handler)
    }

    /// Combines every route registered for exactly `pattern` into one route
    /// whose handler picks the original handler by request method.
    ///
    /// Requires [`RouterConfig::merge_routes`] and at least two routes.
    /// ```rust
    /// use httptree::{Router, RouterConfig};
    /// use hyper::{Response, Body, Method};
    ///
    /// let mut router = Router::default()
    ///     .merge_routes_enabled()
    ///     .get("/items/:id", |_| async { Ok(Response::new(Body::from("read"))) })
    ///     .delete("/items/:id", |_| async { Ok(Response::new(Body::from("gone"))) });
    ///
    /// let merged = router.merge_routes("/items/:id").unwrap();
    /// assert_eq!(merged.merged().len(), 2);
    /// ```
    pub fn merge_routes(&mut self, pattern: &str) -> Result<Arc<Route>, MergeError> {
        if !self.config.merge_routes {
            return Err(MergeError::Disabled);
        }

        let sources = self
            .routes
            .iter()
            .filter(|(key, _)| key.split_once(':').map(|(_, p)| p) == Some(pattern))
            .map(|(_, route)| route.clone())
            .collect::<Vec<_>>();

        if sources.len() < 2 {
            return Err(MergeError::TooFewRoutes {
                pattern: pattern.to_owned(),
                found: sources.len(),
            });
        }

        let merged = Arc::new(merge::merge(sources));
        for method in merged.methods() {
            self.tree.insert(method.clone(), pattern, merged.clone())?;
        }

        tracing::info!(
            pattern,
            methods = ?merged.methods(),
            middleware = merged.middleware().len(),
            "merged routes"
        );

        Ok(merged)
    }

    /// Looks up the route for `method` and `path`.
    ///
    /// Returns `None` when nothing matches, including when a route matches
    /// structurally but one of its constraints rejects a parameter value.
    pub fn find_route(&self, method: &Method, path: &str) -> Option<Match<'_>> {
        let mut params = Params::default();
        match self.tree.find(method, path.as_bytes(), &mut params) {
            Some(route) => Some(Match { route, params }),
            None => {
                tracing::trace!(%method, path, "no route found");
                None
            }
        }
    }

    /// Returns a list of the allowed methods for a specific path
    /// ```rust
    /// use httptree::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/home", |_| async {
    ///         Ok(Response::new(Body::from("Welcome!")))
    ///     })
    ///     .post("/home", |_| async {
    ///         Ok(Response::new(Body::from("Welcome!")))
    ///     });
    ///
    /// let allowed = router.allowed("/home");
    /// assert!(allowed.contains(&"GET"));
    /// assert!(allowed.contains(&"POST"));
    /// assert!(allowed.contains(&"OPTIONS"));
    /// # assert_eq!(allowed.len(), 3);
    /// ```
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        let mut allowed = self
            .methods
            .iter()
            .filter(|&method| method != Method::OPTIONS)
            .filter(|&method| path == "*" || self.find_route(method, path).is_some())
            .map(Method::as_str)
            .collect::<Vec<_>>();

        if !allowed.is_empty() {
            allowed.sort_unstable();
            allowed.push(Method::OPTIONS.as_str())
        }

        allowed
    }

    /// A summary of every registered route, ordered by method and pattern.
    pub fn route_info(&self) -> Vec<RouteInfo> {
        self.routes.values().map(|route| route.info()).collect()
    }

    /// The registered routes carrying `tag`.
    pub fn routes_by_tag(&self, tag: &str) -> Vec<Arc<Route>> {
        self.routes
            .values()
            .filter(|route| route.has_tag(tag))
            .cloned()
            .collect()
    }

    /// The first registered route with the given name.
    pub fn route_by_name(&self, name: &str) -> Option<&Arc<Route>> {
        self.routes.values().find(|route| route.name() == Some(name))
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Enables automatic redirection if the current route can't be matched but a
    /// handler for the path with (without) the trailing slash exists.
    /// For example if `/foo/` is requested but a route only exists for `/foo`, the
    /// client is redirected to `/foo` with HTTP status code 301 for `GET` requests
    /// and 308 for all other request methods.
    pub fn redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.config.redirect_trailing_slash = enabled;
        self
    }

    /// If enabled, the router checks if another method is allowed for the
    /// current route, if the current request can not be routed.
    /// If this is the case, the request is answered with `MethodNotAllowed`
    /// and HTTP status code 405.
    /// If no other Method is allowed, the request is delegated to the `NotFound`
    /// handler.
    pub fn handle_method_not_allowed(mut self, enabled: bool) -> Self {
        self.config.handle_method_not_allowed = enabled;
        self
    }

    /// If enabled, the router automatically replies to `OPTIONS` requests.
    /// Custom `OPTIONS` handlers take priority over automatic replies.
    pub fn handle_options(mut self, enabled: bool) -> Self {
        self.config.handle_options = enabled;
        self
    }

    /// Allows [`Router::merge_routes`].
    pub fn merge_routes_enabled(mut self) -> Self {
        self.config.merge_routes = true;
        self
    }

    /// An optional handler that is called on automatic `OPTIONS` requests.
    /// The handler is only called if `handle_options` is true and no `OPTIONS`
    /// handler for the specific path was set.
    pub fn global_options(mut self, handler: impl Handler + 'static) -> Self {
        self.global_options = Some(Box::new(handler));
        self
    }

    /// Configurable handler which is called when no matching route is
    /// found.
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Box::new(handler));
        self
    }

    /// A configurable handler which is called when a request
    /// cannot be routed and `handle_method_not_allowed` is true.
    pub fn method_not_allowed(mut self, handler: impl Handler + 'static) -> Self {
        self.method_not_allowed = Some(Box::new(handler));
        self
    }

    /// Freezes the router. No routes can be added to the returned table.
    pub fn build(self) -> RoutingTable {
        tracing::info!(routes = self.routes.len(), "routing table built");
        RoutingTable(Arc::new(self))
    }
}

/// The default configuration, see [`RouterConfig::default`].
impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

/// A frozen, cheaply cloneable set of routes that can be shared between
/// request handling threads.
#[derive(Clone)]
pub struct RoutingTable(Arc<Router>);

impl RoutingTable {
    /// See [`Router::find_route`].
    pub fn find_route(&self, method: &Method, path: &str) -> Option<Match<'_>> {
        self.0.find_route(method, path)
    }

    /// See [`Router::allowed`].
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        self.0.allowed(path)
    }

    pub fn route_info(&self) -> Vec<RouteInfo> {
        self.0.route_info()
    }

    pub fn routes_by_tag(&self, tag: &str) -> Vec<Arc<Route>> {
        self.0.routes_by_tag(tag)
    }

    pub fn route_by_name(&self, name: &str) -> Option<&Arc<Route>> {
        self.0.route_by_name(name)
    }

    pub fn config(&self) -> &RouterConfig {
        self.0.config()
    }

    /// Converts the table into a `Service` which you can serve directly with `Hyper`.
    /// If you have an existing `Service` that you want to incorporate a table into, see
    /// [`RoutingTable::serve`](crate::RoutingTable::serve).
    /// ```rust,no_run
    /// # use httptree::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let table = Router::default().build();
    ///
    /// // Convert it into a service...
    /// let service = table.into_service();
    ///
    /// // Serve with hyper
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(service)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(RouterService(self))
    }

    /// An asynchronous function from a `Request` to a `Response`. You will generally not need to use
    /// this function directly, and instead use
    /// [`RoutingTable::into_service`](crate::RoutingTable::into_service). However, it may be useful when
    /// incorporating the router into a larger service.
    ///
    /// The bound [`Params`] are stored in the request extensions before the
    /// route's middleware and handler run.
    pub fn serve(&self, mut req: Request<Body>) -> ResponseFut {
        let router = &self.0;

        let found = router
            .find_route(req.method(), req.uri().path())
            .map(|found| (found.route.clone(), found.params));

        if let Some((route, params)) = found {
            req.extensions_mut().insert(params);
            return ResponseFutKind::Boxed(Next::new(route).run(req)).into();
        }

        let path = req.uri().path();

        if req.method() != Method::CONNECT && path != "/" && router.config.redirect_trailing_slash {
            let fixed = match path.strip_suffix('/') {
                Some(trimmed) => trimmed.to_owned(),
                None => [path, "/"].concat(),
            };

            if router.find_route(req.method(), &fixed).is_some() {
                let code = match *req.method() {
                    // Moved Permanently, request with GET method
                    Method::GET => StatusCode::MOVED_PERMANENTLY,
                    // Permanent Redirect, request with same method
                    _ => StatusCode::PERMANENT_REDIRECT,
                };

                let location = match req.uri().query() {
                    Some(query) => format!("{}?{}", fixed, query),
                    None => fixed,
                };

                return ResponseFutKind::Redirect(location, code).into();
            }
        }

        if req.method() == Method::OPTIONS && router.config.handle_options {
            let allow = router.allowed(path);

            if !allow.is_empty() {
                return match router.global_options {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::Options(allow.join(", ")).into(),
                };
            }
        } else if router.config.handle_method_not_allowed {
            let allow = router.allowed(path);

            if !allow.is_empty() {
                return match router.method_not_allowed {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::MethodNotAllowed(allow.join(", ")).into(),
                };
            }
        }

        match router.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(RoutingTable);

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.0.serve(req)
    }
}

pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

enum ResponseFutKind {
    Boxed(HandlerFuture),
    Redirect(String, StatusCode),
    MethodNotAllowed(String),
    Options(String),
    NotFound,
}

fn empty(status: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = status;
    res
}

fn with_header(mut res: Response<Body>, name: header::HeaderName, value: &str) -> Response<Body> {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            res.headers_mut().insert(name, value);
            res
        }
        Err(_) => empty(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match self.kind {
            ResponseFutKind::Boxed(ref mut fut) => ready!(fut.as_mut().poll(cx)),
            ResponseFutKind::Redirect(ref path, code) => {
                Ok(with_header(empty(code), header::LOCATION, path))
            }
            ResponseFutKind::NotFound => Ok(empty(StatusCode::NOT_FOUND)),
            ResponseFutKind::Options(ref allowed) => {
                Ok(with_header(empty(StatusCode::OK), header::ALLOW, allowed))
            }
            ResponseFutKind::MethodNotAllowed(ref allowed) => Ok(with_header(
                empty(StatusCode::METHOD_NOT_ALLOWED),
                header::ALLOW,
                allowed,
            )),
        };

        Poll::Ready(ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::options;

    async fn ok(_: Request<Body>) -> hyper::Result<Response<Body>> {
        Ok(Response::new(Body::empty()))
    }

    fn add(router: &mut Router, method: Method, pattern: &str, opts: Vec<RouteOption>) -> Arc<Route> {
        router.add_route(method, pattern, ok, opts).unwrap()
    }

    #[test]
    fn static_exactness() {
        let mut router = Router::default();
        let patterns = ["/", "/about", "/about/team", "/contact", "/a/b/c/d"];
        for pattern in patterns {
            add(&mut router, Method::GET, pattern, vec![]);
        }

        for pattern in patterns {
            let found = router.find_route(&Method::GET, pattern).unwrap();
            assert_eq!(found.route.pattern(), pattern);
            assert!(found.params.is_empty());
            assert!(Arc::ptr_eq(
                found.route,
                &router.routes[&format!("GET:{}", pattern)]
            ));
        }
    }

    #[test]
    fn parameter_extraction() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/users/:id", vec![]);

        let found = router.find_route(&Method::GET, "/users/42").unwrap();
        assert_eq!(found.params.get("id"), Some("42"));
        assert_eq!(found.params.len(), 1);
    }

    #[test]
    fn catch_all_extraction() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/files/*path", vec![]);

        let found = router.find_route(&Method::GET, "/files/a/b/c").unwrap();
        assert_eq!(found.params.get("path"), Some("a/b/c"));
    }

    #[test]
    fn constraint_enforcement() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/users/:id", vec![options::int("id")]);

        assert!(router.find_route(&Method::GET, "/users/abc").is_none());
        let found = router.find_route(&Method::GET, "/users/7").unwrap();
        assert_eq!(found.params.get("id"), Some("7"));
    }

    #[test]
    fn regex_constraint() {
        let mut router = Router::default();
        let slug = options::regex("slug", "[a-z0-9-]+").unwrap();
        add(&mut router, Method::GET, "/posts/:slug", vec![slug]);

        assert!(router.find_route(&Method::GET, "/posts/hello-world").is_some());
        assert!(router.find_route(&Method::GET, "/posts/Hello_World").is_none());
    }

    #[test]
    fn sibling_disambiguation() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/users/:id", vec![]);
        add(&mut router, Method::GET, "/users/profile", vec![]);

        let found = router.find_route(&Method::GET, "/users/profile").unwrap();
        assert_eq!(found.route.pattern(), "/users/profile");
        assert!(found.params.is_empty());

        let found = router.find_route(&Method::GET, "/users/12").unwrap();
        assert_eq!(found.route.pattern(), "/users/:id");
    }

    #[test]
    fn idempotent_overwrite() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/users/:id", vec![options::name("first")]);
        add(&mut router, Method::GET, "/users/:id/posts", vec![]);
        add(&mut router, Method::GET, "/users/:id", vec![options::name("second")]);

        let found = router.find_route(&Method::GET, "/users/1").unwrap();
        assert_eq!(found.route.name(), Some("second"));
        assert!(router.find_route(&Method::GET, "/users/1/posts").is_some());
        assert_eq!(router.route_info().len(), 2);
        assert!(router.route_by_name("first").is_none());
    }

    #[test]
    fn fatal_on_conflict() {
        let mut router = Router::default();
        add(&mut router, Method::GET, "/users/:id/edit", vec![]);

        let err = router
            .add_route(Method::GET, "/users/:name/show", ok, None)
            .unwrap_err();
        assert!(matches!(err, InsertError::Conflict { .. }));
        assert!(router.route_info().iter().all(|info| info.pattern != "/users/:name/show"));
    }

    #[test]
    #[should_panic(expected = "conflicts with existing wildcard")]
    fn chained_registration_panics_on_conflict() {
        let _ = Router::default().get("/users/:id", ok).get("/users/:name", ok);
    }

    #[test]
    #[should_panic(expected = "expect pattern beginning with '/'")]
    fn chained_registration_panics_on_relative_pattern() {
        let _ = Router::default().get("users", ok);
    }

    #[test]
    fn methods_are_independent() {
        let router = Router::default()
            .get("/items", ok)
            .post("/items", ok)
            .delete("/items/:id", ok);

        assert!(router.find_route(&Method::POST, "/items").is_some());
        assert!(router.find_route(&Method::PUT, "/items").is_none());
        assert!(router.find_route(&Method::DELETE, "/items/3").is_some());
        assert!(router.find_route(&Method::GET, "/items/3").is_none());
    }

    #[test]
    fn allowed_methods() {
        let router = Router::default()
            .get("/items", ok)
            .post("/items", ok)
            .delete("/items/:id", ok)
            .options("/items", ok);

        assert_eq!(router.allowed("/items"), ["GET", "POST", "OPTIONS"]);
        assert_eq!(router.allowed("/items/1"), ["DELETE", "OPTIONS"]);
        assert_eq!(router.allowed("*"), ["DELETE", "GET", "POST", "OPTIONS"]);
        assert!(router.allowed("/nothing").is_empty());
    }

    #[test]
    fn introspection() {
        let mut router = Router::default();
        add(
            &mut router,
            Method::GET,
            "/users/:id",
            vec![options::name("user"), options::tags(["users", "public"])],
        );
        add(&mut router, Method::POST, "/users", vec![options::tags(["users"])]);
        add(&mut router, Method::GET, "/health", vec![]);

        let info = router.route_info();
        let keys = info
            .iter()
            .map(|info| format!("{} {}", info.method, info.pattern))
            .collect::<Vec<_>>();
        assert_eq!(keys, ["GET /health", "GET /users/:id", "POST /users"]);

        let users = router.routes_by_tag("users");
        assert_eq!(users.len(), 2);
        assert_eq!(router.routes_by_tag("public").len(), 1);
        assert!(router.routes_by_tag("admin").is_empty());

        let user = router.route_by_name("user").unwrap();
        assert_eq!(user.pattern(), "/users/:id");
    }

    #[test]
    fn merge_disabled_by_default() {
        let mut router = Router::default().get("/items", ok).post("/items", ok);
        assert_eq!(router.merge_routes("/items").unwrap_err(), MergeError::Disabled);
    }

    #[test]
    fn merge_needs_two_routes() {
        let mut router = Router::default()
            .merge_routes_enabled()
            .get("/items", ok)
            .post("/items/:id", ok);

        assert_eq!(
            router.merge_routes("/items").unwrap_err(),
            MergeError::TooFewRoutes {
                pattern: "/items".to_owned(),
                found: 1
            }
        );
    }

    #[test]
    fn merge_selects_the_exact_pattern() {
        let mut router = Router::default()
            .merge_routes_enabled()
            .get("/items", ok)
            .post("/items", ok)
            .get("/items/:id", ok)
            .delete("/items/:id", ok);

        let merged = router.merge_routes("/items").unwrap();
        assert_eq!(merged.methods(), [&Method::GET, &Method::POST]);
        assert!(merged.merged().iter().all(|route| route.pattern() == "/items"));

        let item = router.find_route(&Method::GET, "/items/1").unwrap();
        assert!(!item.route.is_merged());

        assert_eq!(
            router.merge_routes("/item").unwrap_err(),
            MergeError::TooFewRoutes {
                pattern: "/item".to_owned(),
                found: 0
            }
        );
    }

    #[test]
    fn merge_replaces_tree_leaves() {
        let mut router = Router::new(RouterConfig {
            merge_routes: true,
            ..RouterConfig::default()
        });
        add(&mut router, Method::GET, "/items/:id", vec![options::int("id"), options::priority(2)]);
        add(&mut router, Method::PUT, "/items/:id", vec![options::int("id")]);
        add(&mut router, Method::GET, "/items/:id/history", vec![]);

        let merged = router.merge_routes("/items/:id").unwrap();
        assert_eq!(merged.merged().len(), 2);
        assert_eq!(merged.priority(), 2);

        for method in [Method::GET, Method::PUT] {
            let found = router.find_route(&method, "/items/5").unwrap();
            assert!(Arc::ptr_eq(found.route, &merged));
        }
        assert!(router.find_route(&Method::GET, "/items/five").is_none());

        // other patterns sharing the prefix are untouched
        let history = router.find_route(&Method::GET, "/items/5/history").unwrap();
        assert!(!history.route.is_merged());

        // the registry still lists what was declared
        assert_eq!(router.route_info().len(), 3);

        let again = router.merge_routes("/items/:id").unwrap();
        assert_eq!(again.merged().len(), 2);
    }

    #[test]
    fn table_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>(_: &T) {}

        let table = Router::default().get("/users/:id", ok).build();
        assert_send_sync(&table);

        let handles = (0..4)
            .map(|i| {
                let table = table.clone();
                std::thread::spawn(move || {
                    let path = format!("/users/{}", i);
                    let found = table.find_route(&Method::GET, &path).unwrap();
                    found.params.get("id").map(str::to_owned)
                })
            })
            .collect::<Vec<_>>();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Some(i.to_string()));
        }
    }
}
