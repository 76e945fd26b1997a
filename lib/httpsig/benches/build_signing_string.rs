use criterion::{criterion_group, criterion_main, Criterion};
use http::{Method, Request, Uri};
use httpsig::signing_string;
use std::hint::black_box;

const HEADERS: &[&str] = &["request-line", "host", "date", "content-type", "digest", "content-length"];

fn build_signing_string(c: &mut Criterion) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(Uri::from_static("/foo?param=value&pet=dog"))
        .header("Host", "example.com")
        .header("Date", "Sun, 05 Jan 2014 21:31:40 GMT")
        .header("Content-Type", "application/json")
        .header(
            "Digest",
            "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=",
        )
        .header("Content-Length", "18")
        .body(())
        .unwrap();

    c.bench_function("build_signing_string", |b| {
        b.iter(|| signing_string::construct(black_box(HEADERS), black_box(&request)));
    });
}

criterion_group!(benches, build_signing_string);
criterion_main!(benches);
