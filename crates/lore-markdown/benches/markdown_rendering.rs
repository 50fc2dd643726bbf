//! Benchmarks for markdown rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lore_markdown::MarkdownEngine;

/// Generate a wiki page with headings, lists, a table and formatted paragraphs.
fn generate_markdown(sections: usize, rows_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * (200 + rows_per_section * 80));
    md.push_str("# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n"));
        md.push_str(&format!(
            "Section {i} has **bold**, *italic*, ***both*** and `code`.\n"
        ));
        md.push_str("- first\n- second\n- [link](#sectionWiki/Skills/Mining)\n\n");
        md.push_str("| Attribute | Value |\n|-----------|-------|\n");
        for j in 0..rows_per_section {
            md.push_str(&format!("| Row {j} | **{j}** |\n"));
        }
        md.push('\n');
    }
    md
}

fn bench_render_simple(c: &mut Criterion) {
    let engine = MarkdownEngine::new();

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| engine.render("# Hello\n\nSimple content."));
    });
}

fn bench_render_with_title(c: &mut Criterion) {
    let engine = MarkdownEngine::new().with_title_extraction();
    let markdown = generate_markdown(10, 3);

    c.bench_function("render_with_title_10_sections", |b| {
        b.iter(|| engine.render_document(&markdown));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let engine = MarkdownEngine::new();

    let mut group = c.benchmark_group("render_by_size");

    for (sections, rows) in [(5, 2), (20, 5), (50, 10)] {
        let markdown = generate_markdown(sections, rows);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{rows}r")),
            &markdown,
            |b, md| b.iter(|| engine.render(md)),
        );
    }

    group.finish();
}

fn bench_render_inline_heavy(c: &mut Criterion) {
    let line = "***a*** **b** *c* `d` [e](#sectionWiki/E) ".repeat(50);

    c.bench_function("render_inline_heavy_line", |b| {
        b.iter(|| lore_markdown::render_inline(&line));
    });
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_with_title,
    bench_render_varying_sizes,
    bench_render_inline_heavy,
);

criterion_main!(benches);
