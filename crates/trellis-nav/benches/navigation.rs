//! Benchmarks for navigation rendering.

use std::fmt::Write;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trellis_nav::{NavOptions, PageEntry, SiteIndex, render_breadcrumbs, render_prev_next};
use trellis_outline::OutlineTree;

/// Indented outline with `breadth` children per entry down to `depth`.
fn create_outline(depth: usize, breadth: usize) -> String {
    fn create_level(out: &mut String, prefix: &str, level: usize, depth: usize, breadth: usize) {
        if level > depth {
            return;
        }
        for i in 0..breadth {
            let name = format!("{prefix}{i}");
            let _ = writeln!(out, "{}{name}", "\t".repeat(level - 1));
            create_level(out, &format!("{name}-"), level + 1, depth, breadth);
        }
    }

    let mut out = String::new();
    create_level(&mut out, "page-", 1, depth, breadth);
    out
}

fn create_site(tree: &OutlineTree) -> SiteIndex {
    tree.preorder().into_iter().fold(SiteIndex::new(), |site, id| {
        let name = &tree.node(id).name;
        let folder = name.rsplit_once('-').map_or("", |(folder, _)| folder);
        site.with_page(
            PageEntry::new(name.clone(), name.to_uppercase(), format!("{name}.html"))
                .with_folder(folder),
        )
    })
}

fn bench_breadcrumbs(c: &mut Criterion) {
    let mut group = c.benchmark_group("breadcrumbs");

    for (depth, breadth) in [(2, 10), (4, 5), (6, 3)] {
        let tree = trellis_outline::parse(&create_outline(depth, breadth)).unwrap();
        let site = create_site(&tree);
        let options = NavOptions::default();
        let deepest = format!("page-{}", vec!["0"; depth].join("-"));

        group.bench_with_input(
            BenchmarkId::new("deepest", format!("{depth}x{breadth}")),
            &deepest,
            |b, page| b.iter(|| render_breadcrumbs(&tree, &site, page, &options)),
        );
        group.bench_with_input(
            BenchmarkId::new("toc", format!("{depth}x{breadth}")),
            &"toc",
            |b, page| b.iter(|| render_breadcrumbs(&tree, &site, page, &options)),
        );
    }

    group.finish();
}

fn bench_prev_next(c: &mut Criterion) {
    let tree = trellis_outline::parse(&create_outline(2, 50)).unwrap();
    let site = create_site(&tree);
    let options = NavOptions::default();

    c.bench_function("prev_next_wide_folder", |b| {
        b.iter(|| render_prev_next(&site, "page-25-25", &options));
    });
}

criterion_group!(benches, bench_breadcrumbs, bench_prev_next);
criterion_main!(benches);
