use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use proteus::adapters::mock_generator::MockGenerator;
use proteus::domain::{SchemaNode, DEFAULT_MAX_DEPTH};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

fn user_schema() -> Value {
    json!({
        "type": "object", "required": true,
        "children": [
            { "name": "id", "type": "int", "required": true },
            { "name": "email", "type": "string", "required": true, "mock": { "faker": "email" } },
            { "name": "name", "type": "string", "mock": { "faker": "full_name" } },
            { "name": "score", "type": "float" },
            { "name": "tags", "type": "array", "element": { "type": "string" } },
            { "name": "address", "type": "object", "children": [
                { "name": "city", "type": "string", "mock": { "faker": "city" } },
                { "name": "zip", "type": "string", "mock": { "pattern": "#####" } }
            ] }
        ]
    })
}

fn nested_schema(depth: usize) -> Value {
    let mut doc = json!({ "type": "int", "required": true });
    for i in 0..depth {
        doc = json!({
            "name": format!("level{}", i),
            "type": "object", "required": true,
            "children": [doc, { "name": "flag", "type": "boolean" }]
        });
    }
    doc
}

fn benchmark_parse(c: &mut Criterion) {
    let doc = user_schema();
    c.bench_function("parse_user_schema", |b| {
        b.iter(|| SchemaNode::from_value(black_box(&doc), DEFAULT_MAX_DEPTH).unwrap())
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let generator = MockGenerator::default();
    let node = SchemaNode::from_value(&user_schema(), DEFAULT_MAX_DEPTH).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("generate_user", |b| {
        b.iter(|| generator.generate(black_box(Some(&node)), &mut rng).unwrap())
    });
}

fn benchmark_nesting(c: &mut Criterion) {
    let generator = MockGenerator::default();
    let mut group = c.benchmark_group("generate_nested");

    for depth in [2, 8, 16] {
        let doc = nested_schema(depth);
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &doc, |b, doc| {
            b.iter(|| generator.generate_document(Some(doc), &mut rng).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_generate, benchmark_nesting);
criterion_main!(benches);
