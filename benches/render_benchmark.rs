//! Benchmarks for rich-text rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic documents of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use richtext::model::{Entity, Node, NodeType, ReferenceTable, RichText};
use richtext::render::{to_html, to_markdown, DocumentWalker, RenderContext};

/// Creates a document with the given number of sections, each a heading, a
/// paragraph with a line break, a quote and an embedded asset.
fn create_test_document(sections: usize) -> RichText {
    let mut content = Vec::with_capacity(sections * 4);
    let mut table = ReferenceTable::new();

    for i in 0..sections {
        content.push(Node::heading(2, vec![Node::text(format!("Section {}", i + 1))]));
        content.push(Node::paragraph(vec![
            Node::text("Benchmark content for richtext\nrendering performance."),
            Node::hyperlink("https://example.com", vec![Node::text("link")]),
        ]));
        content.push(Node::quote(vec![Node::paragraph(vec![Node::text(
            "Quoted text",
        )])]));

        let id = format!("asset-{}", i);
        content.push(Node::reference(NodeType::EmbeddedAssetBlock, id.as_str()));
        table = table.with_asset(
            Entity::new(id, "Asset")
                .with_field("url", format!("/images/{}.png", i))
                .with_field("title", "Figure"),
        );
    }

    // Rendered through the literal fallback.
    content.push(Node::reference(NodeType::EmbeddedEntryBlock, "missing"));

    match RichText::new(Node::document(content), table) {
        Ok(doc) => doc,
        Err(e) => panic!("invalid benchmark document: {}", e),
    }
}

/// Benchmark walking documents at various sizes.
fn bench_render(c: &mut Criterion) {
    let walker = DocumentWalker::new();
    let mut group = c.benchmark_group("render");

    for sections in [1, 10, 100].iter() {
        let doc = create_test_document(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| walker.render(black_box(&doc), &RenderContext::root()));
        });
    }

    group.finish();
}

/// Benchmark serialising an output tree.
fn bench_serialize(c: &mut Criterion) {
    let doc = create_test_document(50);
    let output = match DocumentWalker::new().render(&doc, &RenderContext::root()) {
        Ok(result) => result.output,
        Err(e) => panic!("render failed: {}", e),
    };

    c.bench_function("to_html", |b| {
        b.iter(|| to_html(black_box(&output)));
    });

    c.bench_function("to_markdown", |b| {
        b.iter(|| to_markdown(black_box(&output)));
    });
}

/// Benchmark parallel batch rendering.
fn bench_batch(c: &mut Criterion) {
    let walker = DocumentWalker::new();
    let docs: Vec<RichText> = (0..32).map(|_| create_test_document(10)).collect();

    c.bench_function("render_batch_32", |b| {
        b.iter(|| walker.render_batch(black_box(&docs), &RenderContext::root()));
    });
}

criterion_group!(benches, bench_render, bench_serialize, bench_batch);
criterion_main!(benches);
