//! # httptree
//!
//! httptree is a lightweight HTTP request router built on a compressed
//! dynamic trie (radix tree).
//!
//! Routes are registered by method and pattern. Patterns may contain named
//! parameters and a trailing catch-all, and each parameter may carry a
//! constraint that its value has to satisfy. Once every route is registered
//! the router is frozen into a [`RoutingTable`] that can be shared freely
//! between request handling threads.
//!
//! ## Features
//!
//! **Parameters in your routing pattern:** Stop parsing the requested URL path, just give the path segment a name and the router delivers the dynamic value to you.
//!
//! **Static routes before parameters:** `/users/new` and `/users/:id` can live side by side. The literal segment always wins when it matches, the parameter catches everything else.
//!
//! **Constraints:** Attach an integer, UUID, alphabetic or custom regex rule to any parameter. A request whose value breaks the rule is treated like any other unmatched request.
//!
//! **Route merging:** Routes that share a pattern across several methods can be folded into one route with a single middleware chain.
//!
//! **High Performance:** The tree makes heavy use of *common prefixes*, and children are ordered by how many routes pass through them, so the busiest branches are checked first.
//!
//! ## Usage
//!
//! Here is a simple example:
//!
//! ```rust,no_run
//! use httptree::{options, Params, Router};
//! use hyper::{Body, Method, Request, Response, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn user(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     let params = req.extensions().get::<Params>().unwrap();
//!     Ok(Response::new(format!("User {}", params.get("id").unwrap()).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut router = Router::default().get("/", index);
//!     router
//!         .add_route(Method::GET, "/users/:id", user, [options::int("id")])
//!         .unwrap();
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.build().into_service())
//!         .await;
//! }
//! ```
//!
//! ### Named parameters
//!
//! `:id` is a *named parameter*. The values are accessible via `req.extensions().get::<Params>()`.
//!
//! Named parameters only match a single, non-empty path segment:
//!
//! ```ignore
//! Pattern: /user/:user
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! ### Catch-All parameters
//!
//! The second type are *catch-all* parameters and have the form `*name`. Like the name suggests, they match everything. Therefore they must always be at the **end** of the pattern, right after a `/`:
//!
//! ```ignore
//! Pattern: /src/*filepath
//!
//!  /src/                     match
//!  /src/somefile.go          match
//!  /src/subdir/somefile.go   match
//! ```
//!
//! ### Configuration errors
//!
//! A malformed or conflicting pattern is rejected when it is registered.
//! [`Router::add_route`] returns an [`InsertError`], while the chained helpers
//! such as [`Router::get`] panic with the same message.

#![forbid(unsafe_code)]

mod config;
mod constraint;
mod error;
mod handler;
mod merge;
mod params;
mod route;
mod tree;

#[doc(hidden)]
pub mod router;

#[doc(inline)]
pub use router::{Match, Router, RoutingTable};

pub use config::RouterConfig;
pub use constraint::{ConstraintKind, RouteConstraint};
pub use error::{ConfigError, InsertError, MergeError};
pub use handler::{Handler, HandlerFuture, Middleware, Next};
pub use params::{Param, Params};
pub use route::{options, Route, RouteInfo, RouteOption};
