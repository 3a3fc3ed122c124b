use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use formflow_xml::{build_request, parse, parse_scheduling, Node, NodeMap};

const VALIDATION_XML: &str = "<response><validation><valid>Y</valid>\
    <customer><name>Pat</name></customer></validation></response>";

fn scheduling_xml(slots: usize) -> String {
    let slots: String = (0..slots)
        .map(|i| format!("<slot><date>2024-05-{:02}</date><time>AM</time></slot>", i % 28 + 1))
        .collect();
    format!("<response><scheduling><fsr>F1</fsr><slots>{slots}</slots></scheduling></response>")
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("formflow_parse_validation", |b| {
        b.iter(|| parse(black_box(VALIDATION_XML)))
    });
}

fn bench_scheduling(c: &mut Criterion) {
    let xml = scheduling_xml(60);
    c.bench_function("formflow_normalize_scheduling_60", |b| {
        b.iter(|| parse_scheduling(black_box(&xml)))
    });
}

fn bench_build(c: &mut Criterion) {
    let mut request = NodeMap::new();
    request.insert("@action", "schedule");
    request.insert("caNo", "1234567890");
    request.insert(
        "slot",
        Node::List((0..20).map(|i| Node::from(format!("2024-05-{:02}", i + 1))).collect()),
    );
    c.bench_function("formflow_build_request", |b| {
        b.iter(|| build_request(black_box(&request)))
    });
}

criterion_group!(benches, bench_parse, bench_scheduling, bench_build);
criterion_main!(benches);
