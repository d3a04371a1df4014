//! Folding several single-method routes of one pattern into one route.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future;
use hyper::{header, Body, Method, Request, Response, StatusCode};

use crate::constraint::RouteConstraint;
use crate::handler::{Handler, HandlerFuture, Middleware};
use crate::route::Route;

/// Dispatches to the handler of the source route registered for the
/// request's method.
pub(crate) struct MergedHandler {
    handlers: Vec<(Method, Arc<dyn Handler>)>,
}

impl Handler for MergedHandler {
    fn handle(&self, req: Request<Body>) -> HandlerFuture {
        let handler = self
            .handlers
            .iter()
            .find(|(method, _)| method == req.method())
            .map(|(_, handler)| handler);

        match handler {
            Some(handler) => handler.handle(req),
            None => {
                let allow = self
                    .handlers
                    .iter()
                    .map(|(method, _)| method.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                let mut res = Response::new(Body::empty());
                *res.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
                if let Ok(allow) = allow.parse() {
                    res.headers_mut().insert(header::ALLOW, allow);
                }
                Box::pin(future::ok::<_, hyper::Error>(res))
            }
        }
    }
}

/// Builds the merged route for `sources`, which must share one pattern.
///
/// Sources are ordered by descending route priority, and that order decides
/// which source wins wherever one has to be picked.
pub(crate) fn merge(mut sources: Vec<Arc<Route>>) -> Route {
    sources.sort_by(|a, b| b.priority().cmp(&a.priority()));

    let handler = MergedHandler {
        handlers: sources
            .iter()
            .map(|route| (route.method().clone(), route.handler().clone()))
            .collect(),
    };

    let mut middleware: Vec<Arc<dyn Middleware>> = Vec::new();
    for route in &sources {
        for m in route.middleware() {
            if !middleware.iter().any(|seen| Arc::ptr_eq(seen, m)) {
                middleware.push(m.clone());
            }
        }
    }

    let mut constraints: HashMap<String, RouteConstraint> = HashMap::new();
    for route in &sources {
        for constraint in route.constraints() {
            match constraints.get(constraint.name()) {
                None => {
                    constraints.insert(constraint.name().to_owned(), constraint.clone());
                }
                Some(existing) if existing.kind() != constraint.kind() => {
                    tracing::warn!(
                        pattern = route.pattern(),
                        param = constraint.name(),
                        "conflicting constraint types, accepting any value"
                    );
                    constraints.insert(
                        constraint.name().to_owned(),
                        RouteConstraint::any(constraint.name()),
                    );
                }
                Some(_) => {}
            }
        }
    }

    let priority = sources.iter().map(|route| route.priority()).max().unwrap_or(0);

    let mut tags: Vec<String> = Vec::new();
    for tag in sources.iter().flat_map(|route| route.tags()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let template = sources[0].clone();
    Route::with_parts(
        &template,
        Arc::new(handler),
        middleware,
        constraints,
        priority,
        tags,
        sources,
    )
}
