#![feature(test)]

extern crate httptree;
extern crate test;

use httptree::{options, Router, RoutingTable};
use hyper::{Body, Method, Request, Response};
use test::Bencher;

async fn ok(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::empty()))
}

// a slice of the github API
fn routes() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/authorizations"),
        (Method::GET, "/authorizations/:id"),
        (Method::POST, "/authorizations"),
        (Method::DELETE, "/authorizations/:id"),
        (Method::GET, "/applications/:client_id/tokens/:access_token"),
        (Method::DELETE, "/applications/:client_id/tokens"),
        (Method::GET, "/events"),
        (Method::GET, "/repos/:owner/:repo/events"),
        (Method::GET, "/networks/:owner/:repo/events"),
        (Method::GET, "/orgs/:org/events"),
        (Method::GET, "/users/:user/received_events"),
        (Method::GET, "/users/:user/received_events/public"),
        (Method::GET, "/users/:user/events"),
        (Method::GET, "/users/:user/events/public"),
        (Method::GET, "/users/:user/events/orgs/:org"),
        (Method::GET, "/feeds"),
        (Method::GET, "/notifications"),
        (Method::GET, "/repos/:owner/:repo/notifications"),
        (Method::PUT, "/notifications"),
        (Method::GET, "/notifications/threads/:id"),
        (Method::GET, "/user/starred"),
        (Method::GET, "/user/starred/:owner/:repo"),
        (Method::GET, "/repos/:owner/:repo/stargazers"),
        (Method::GET, "/users/:user/starred"),
        (Method::GET, "/gists/:id/star"),
        (Method::GET, "/repos/:owner/:repo/contents/*path"),
        (Method::GET, "/users/new"),
        (Method::GET, "/users/:user"),
    ]
}

fn table() -> RoutingTable {
    let mut router = Router::default();
    for (method, pattern) in routes() {
        router.add_route(method, pattern, ok, None).unwrap();
    }
    router
        .add_route(Method::GET, "/gists/:id", ok, [options::int("id")])
        .unwrap();
    router.build()
}

#[bench]
fn bench_static(b: &mut Bencher) {
    let table = table();

    b.iter(|| {
        test::black_box(table.find_route(&Method::GET, "/user/starred"));
        test::black_box(table.find_route(&Method::GET, "/notifications"));
        test::black_box(table.find_route(&Method::GET, "/users/new"));
    });
}

#[bench]
fn bench_params(b: &mut Bencher) {
    let table = table();

    b.iter(|| {
        test::black_box(table.find_route(&Method::GET, "/repos/rust-lang/rust/stargazers"));
        test::black_box(table.find_route(&Method::GET, "/users/gordon/events/orgs/acme"));
        test::black_box(table.find_route(&Method::GET, "/gists/1234"));
    });
}

#[bench]
fn bench_catch_all(b: &mut Bencher) {
    let table = table();

    b.iter(|| {
        test::black_box(table.find_route(
            &Method::GET,
            "/repos/rust-lang/rust/contents/src/libcore/lib.rs",
        ));
    });
}

#[bench]
fn bench_miss(b: &mut Bencher) {
    let table = table();

    b.iter(|| {
        test::black_box(table.find_route(&Method::GET, "/users/gordon/unknown"));
        test::black_box(table.find_route(&Method::GET, "/gists/not-a-number"));
    });
}
