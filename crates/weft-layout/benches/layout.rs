//! Benchmarks for flex distribution, span flow and full layout passes.

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use weft_layout::{
    FlexItem, LayoutEngine, MonospaceMetrics, SpanContext, SpanLayout, ViewTree, distribute,
};
use weft_style::StyleModel;
use weft_types::{Color, FlexRounding, Font, LayoutConfig};

fn bench_flex(c: &mut Criterion) {
    let mut group = c.benchmark_group("flex_distribute");

    for n in [8, 64, 512] {
        let items: Vec<FlexItem> = (0..n)
            .map(|i| FlexItem::new((i % 7) as f32 * 10.0, (i % 3) as f32, 1.0))
            .collect();
        for rounding in [FlexRounding::Exact, FlexRounding::LargestRemainder] {
            group.bench_with_input(
                BenchmarkId::new(format!("{rounding:?}"), n),
                &items,
                |b, items| {
                    b.iter(|| distribute(items, n as f32 * 20.0, rounding));
                },
            );
        }
    }

    group.finish();
}

/// A paragraph of `words` short words.
fn paragraph(words: usize) -> String {
    (0..words)
        .map(|i| ["lorem", "ipsum", "dolor", "sit", "amet"][i % 5])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_span(c: &mut Criterion) {
    let mut group = c.benchmark_group("span_layout");
    let metrics = MonospaceMetrics::default();
    let config = LayoutConfig::default();
    let sizes = HashMap::new();
    let ctx = SpanContext {
        metrics: &metrics,
        config: &config,
        sizes: &sizes,
    };

    for words in [50, 500, 5000] {
        let mut span = SpanLayout::new();
        span.add_text(&paragraph(words), Font::default(), Color::BLACK);

        group.bench_function(BenchmarkId::new("uncached", words), |b| {
            b.iter(|| {
                span.invalidate();
                span.layout(480.0, &ctx).lines.len()
            });
        });
        group.bench_function(BenchmarkId::new("cached", words), |b| {
            b.iter(|| span.layout(480.0, &ctx).lines.len());
        });
    }

    group.finish();
}

/// A vbox of `n` rows, each an hbox of three flexed cells with a text span.
fn build_rows(n: usize) -> (ViewTree, weft_layout::ViewId) {
    let mut tree = ViewTree::new();
    let mut root_style = StyleModel::new();
    root_style.set_layout_vbox();
    let root = tree.add_view(root_style);
    for i in 0..n {
        let mut row_style = StyleModel::new();
        row_style.set_layout_hbox();
        row_style.set_padding(2.0);
        let row = tree.add_view(row_style);
        tree.add_child(root, row);
        for _ in 0..3 {
            let mut cell_style = StyleModel::new();
            cell_style.set_flex(1.0, 1.0);
            let cell = tree.add_view(cell_style);
            tree.add_child(row, cell);
            let text = format!("Row {i} {}", paragraph(6));
            tree.add_span_text(cell, &text, Font::default(), Color::BLACK);
        }
    }
    (tree, root)
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_tree");
    let metrics = MonospaceMetrics::default();
    let config = LayoutConfig::default();
    let engine = LayoutEngine::new(&metrics, &config);

    for n in [10, 100, 500] {
        let (mut tree, root) = build_rows(n);
        group.bench_function(BenchmarkId::new("rows", n), |b| {
            b.iter(|| engine.layout(&mut tree, root, 480.0, None));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flex, bench_span, bench_tree);
criterion_main!(benches);
