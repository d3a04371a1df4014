use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::{Body, Request, Response};

use crate::route::Route;

/// The future returned by handlers and middleware.
pub type HandlerFuture = Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>;

/// Represents a HTTP handler function.
/// This trait is implemented for asynchronous functions that take a `Request` and return a
/// `Result<Response<Body>, hyper::Error>`
/// ```rust
/// # use httptree::Handler;
/// # use hyper::{Request, Response, Body};
/// async fn hello(_: Request<Body>) -> Result<Response<Body>, hyper::Error> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let handler: Box<dyn Handler> = Box::new(hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, req: Request<Body>) -> HandlerFuture;
}

impl<F, R> Handler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync,
    R: Future<Output = Result<Response<Body>, hyper::Error>> + Send + Sync + 'static,
{
    fn handle(&self, req: Request<Body>) -> HandlerFuture {
        Box::pin(self(req))
    }
}

/// A function wrapping the handler of a route.
///
/// Middleware receives the request and the rest of the chain as [`Next`]. It
/// can answer on its own or call [`Next::run`] and post-process the response.
/// ```rust
/// # use httptree::{Middleware, Next};
/// # use hyper::{Request, Response, Body};
/// async fn server_header(req: Request<Body>, next: Next) -> hyper::Result<Response<Body>> {
///     let mut res = next.run(req).await?;
///     res.headers_mut().insert("server", "httptree".parse().unwrap());
///     Ok(res)
/// }
///
/// let middleware: Box<dyn Middleware> = Box::new(server_header);
/// ```
pub trait Middleware: Send + Sync {
    fn handle(&self, req: Request<Body>, next: Next) -> HandlerFuture;
}

impl<F, R> Middleware for F
where
    F: Fn(Request<Body>, Next) -> R + Send + Sync,
    R: Future<Output = Result<Response<Body>, hyper::Error>> + Send + Sync + 'static,
{
    fn handle(&self, req: Request<Body>, next: Next) -> HandlerFuture {
        Box::pin(self(req, next))
    }
}

/// The remainder of a route's middleware chain, ending with its handler.
///
/// The first middleware of a route is the outermost one.
pub struct Next {
    route: Arc<Route>,
    index: usize,
}

impl Next {
    pub(crate) fn new(route: Arc<Route>) -> Self {
        Self { route, index: 0 }
    }

    /// Runs the next middleware, or the handler once the chain is exhausted.
    pub fn run(self, req: Request<Body>) -> HandlerFuture {
        match self.route.middleware().get(self.index).cloned() {
            Some(middleware) => {
                let next = Next {
                    route: self.route,
                    index: self.index + 1,
                };
                middleware.handle(req, next)
            }
            None => self.route.handler().handle(req),
        }
    }
}
