//! Registered endpoints and the options used to configure them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hyper::Method;
use serde::Serialize;

use crate::constraint::RouteConstraint;
use crate::error::InsertError;
use crate::handler::{Handler, Middleware};
use crate::params::Params;
use crate::tree;

/// One registered `(method, pattern)` pair.
///
/// A route is created once at registration time and never changes afterwards.
/// Merging produces a new route instead of editing existing ones.
pub struct Route {
    method: Method,
    pattern: String,
    handler: Arc<dyn Handler>,
    middleware: Vec<Arc<dyn Middleware>>,
    constraints: HashMap<String, RouteConstraint>,
    name: Option<String>,
    params: Vec<String>,
    priority: i32,
    tags: Vec<String>,
    merged: Vec<Arc<Route>>,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        pattern: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<Self, InsertError> {
        let pattern = pattern.into();
        let params = tree::wildcard_names(&pattern)?;

        Ok(Self {
            method,
            pattern,
            handler,
            middleware: Vec::new(),
            constraints: HashMap::new(),
            name: None,
            params,
            priority: 0,
            tags: Vec::new(),
            merged: Vec::new(),
        })
    }

    pub(crate) fn with_parts(
        template: &Route,
        handler: Arc<dyn Handler>,
        middleware: Vec<Arc<dyn Middleware>>,
        constraints: HashMap<String, RouteConstraint>,
        priority: i32,
        tags: Vec<String>,
        merged: Vec<Arc<Route>>,
    ) -> Self {
        Self {
            method: template.method.clone(),
            pattern: template.pattern.clone(),
            handler,
            middleware,
            constraints,
            name: None,
            params: template.params.clone(),
            priority,
            tags,
            merged,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern exactly as it was registered, e.g. `/users/:id/files/*path`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Middleware in execution order, outermost first.
    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    pub fn constraint(&self, param: &str) -> Option<&RouteConstraint> {
        self.constraints.get(param)
    }

    pub fn constraints(&self) -> impl Iterator<Item = &RouteConstraint> {
        self.constraints.values()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parameter names in pattern order, matching the order lookups bind them.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The source routes of a merged route, highest priority first. Empty
    /// for a route that was registered directly.
    pub fn merged(&self) -> &[Arc<Route>] {
        &self.merged
    }

    pub fn is_merged(&self) -> bool {
        !self.merged.is_empty()
    }

    /// Every method this route answers to.
    pub fn methods(&self) -> Vec<&Method> {
        if self.merged.is_empty() {
            vec![&self.method]
        } else {
            self.merged.iter().map(|route| &route.method).collect()
        }
    }

    /// Returns true if every bound parameter satisfies its constraint.
    pub fn validate(&self, params: &Params) -> bool {
        params.iter().all(|(key, value)| {
            self.constraints
                .get(key)
                .map_or(true, |constraint| constraint.is_match(value))
        })
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            method: self.method.to_string(),
            pattern: self.pattern.clone(),
            name: self.name.clone(),
            params: self.params.clone(),
            tags: self.tags.clone(),
            priority: self.priority,
            constraints: {
                let mut constraints = self
                    .constraints
                    .values()
                    .map(|c| (c.name().to_owned(), c.pattern().to_owned()))
                    .collect::<Vec<_>>();
                constraints.sort();
                constraints
            },
            middleware: self.middleware.len(),
        }
    }

    pub(crate) fn apply(&mut self, option: RouteOption) {
        match option {
            RouteOption::Name(name) => self.name = Some(name),
            RouteOption::Middleware(middleware) => self.middleware.extend(middleware),
            RouteOption::Constraint(constraint) => {
                self.constraints
                    .insert(constraint.name().to_owned(), constraint);
            }
            RouteOption::Priority(priority) => self.priority = priority,
            RouteOption::Tags(tags) => {
                for tag in tags {
                    if !self.has_tag(&tag) {
                        self.tags.push(tag);
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("constraints", &self.constraints)
            .field("middleware", &self.middleware.len())
            .field("priority", &self.priority)
            .field("tags", &self.tags)
            .field("merged", &self.merged.len())
            .finish()
    }
}

/// A serializable summary of a route for documentation and ops tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
    pub name: Option<String>,
    pub params: Vec<String>,
    pub tags: Vec<String>,
    pub priority: i32,
    /// `(parameter, pattern)` pairs, sorted by parameter.
    pub constraints: Vec<(String, String)>,
    pub middleware: usize,
}

/// A single setting applied to a route at registration, in order.
///
/// Build these with the functions in [`options`](crate::options).
pub enum RouteOption {
    Name(String),
    Middleware(Vec<Arc<dyn Middleware>>),
    Constraint(RouteConstraint),
    Priority(i32),
    Tags(Vec<String>),
}

/// Constructors for [`RouteOption`].
///
/// ```rust
/// use httptree::{options, Router};
/// use hyper::{Body, Method, Request, Response};
///
/// async fn user(_: Request<Body>) -> hyper::Result<Response<Body>> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let mut router = Router::default();
/// let route = router
///     .add_route(Method::GET, "/users/:id", user, [
///         options::name("user"),
///         options::int("id"),
///         options::tags(["users"]),
///     ])
///     .unwrap();
///
/// assert_eq!(route.name(), Some("user"));
/// assert!(route.has_tag("users"));
/// ```
pub mod options {
    use std::sync::Arc;

    use super::RouteOption;
    use crate::constraint::RouteConstraint;
    use crate::error::InsertError;
    use crate::handler::Middleware;

    pub fn name(name: impl Into<String>) -> RouteOption {
        RouteOption::Name(name.into())
    }

    pub fn middleware(middleware: impl Middleware + 'static) -> RouteOption {
        RouteOption::Middleware(vec![Arc::new(middleware)])
    }

    /// Middleware shared between routes. Merging counts the same `Arc` once.
    pub fn shared_middleware<I>(middleware: I) -> RouteOption
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        RouteOption::Middleware(middleware.into_iter().collect())
    }

    pub fn constraint(constraint: RouteConstraint) -> RouteOption {
        RouteOption::Constraint(constraint)
    }

    pub fn int(param: impl Into<String>) -> RouteOption {
        constraint(RouteConstraint::int(param))
    }

    pub fn uuid(param: impl Into<String>) -> RouteOption {
        constraint(RouteConstraint::uuid(param))
    }

    pub fn alpha(param: impl Into<String>) -> RouteOption {
        constraint(RouteConstraint::alpha(param))
    }

    /// A custom expression constraint. Fails if the expression does not compile.
    pub fn regex(param: impl Into<String>, pattern: &str) -> Result<RouteOption, InsertError> {
        let param = param.into();
        RouteConstraint::regex(param.clone(), pattern)
            .map(constraint)
            .map_err(|err| InsertError::InvalidConstraint {
                param,
                message: err.to_string(),
            })
    }

    pub fn priority(priority: i32) -> RouteOption {
        RouteOption::Priority(priority)
    }

    pub fn tags<I, T>(tags: I) -> RouteOption
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        RouteOption::Tags(tags.into_iter().map(Into::into).collect())
    }
}
