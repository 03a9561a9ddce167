// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `trellis_layout` layout passes and hit testing.
//!
//! By default this uses a deterministic synthetic tree shaped like a widget gallery: a header
//! and a 10x10 grid of cells, each cell overlaying a background, an icon and a label. To
//! benchmark a real scene, set `TRELLIS_TREE_JSON` to the path of a JSON dump matching
//! `DumpNode`: leaves keep their size, nodes with children stack them vertically.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use trellis_layout::{
    ElementBehavior, ElementId, ElementTree, LayoutCx, LayoutProperties, Panel, PanelLayout,
};
use trellis_property::PropertyRegistry;

const ENV_JSON_PATH: &str = "TRELLIS_TREE_JSON";
const AVAILABLE: Size = Size::new(1200.0, 800.0);

#[derive(Clone, Debug, Deserialize)]
struct DumpNode {
    width: f64,
    height: f64,
    #[serde(default)]
    children: Vec<DumpNode>,
}

/// A leaf with a fixed desired size.
struct Leaf(Size);

impl ElementBehavior for Leaf {
    fn measure_override(&mut self, _cx: &mut LayoutCx<'_>, _available: Size) -> Size {
        self.0
    }
}

/// Stacks children top to bottom.
struct Stack;

impl PanelLayout for Stack {
    fn measure_children(&mut self, cx: &mut LayoutCx<'_>, _available: Size) -> Size {
        cx.children().iter().fold(Size::ZERO, |acc, &child| {
            let desired = cx.desired_size(child);
            Size::new(acc.width.max(desired.width), acc.height + desired.height)
        })
    }

    fn arrange_children(&mut self, cx: &mut LayoutCx<'_>, final_rect: Rect) -> Size {
        let mut y = 0.0;
        for child in cx.children() {
            let height = cx.desired_size(child).height;
            cx.arrange_child(child, Rect::new(0.0, y, final_rect.width(), y + height));
            y += height;
        }
        final_rect.size()
    }
}

/// Places children in fixed-size cells, `columns` per row.
struct Grid {
    columns: usize,
    cell: Size,
    gap: f64,
}

impl PanelLayout for Grid {
    fn measure_children(&mut self, cx: &mut LayoutCx<'_>, _available: Size) -> Size {
        let rows = cx.child_count().div_ceil(self.columns);
        Size::new(
            (self.cell.width + self.gap) * self.columns as f64,
            (self.cell.height + self.gap) * rows as f64,
        )
    }

    fn arrange_children(&mut self, cx: &mut LayoutCx<'_>, final_rect: Rect) -> Size {
        for (index, child) in cx.children().into_iter().enumerate() {
            let col = (index % self.columns) as f64;
            let row = (index / self.columns) as f64;
            let origin = Point::new(
                col * (self.cell.width + self.gap),
                row * (self.cell.height + self.gap),
            );
            cx.arrange_child(child, Rect::from_origin_size(origin, self.cell));
        }
        final_rect.size()
    }
}

fn empty_tree() -> ElementTree {
    let mut registry = PropertyRegistry::new();
    let properties = LayoutProperties::register(&mut registry);
    ElementTree::new(Arc::new(registry), properties)
}

fn add(tree: &mut ElementTree, parent: ElementId, behavior: impl ElementBehavior) -> ElementId {
    let id = tree.insert(behavior);
    tree.push_child(parent, id)
        .unwrap_or_else(|e| panic!("failed to build bench tree: {e}"));
    id
}

/// Builds the synthetic gallery. Returns the tree, its root and every leaf.
fn build_synthetic_gallery() -> (ElementTree, ElementId, Vec<ElementId>) {
    let mut tree = empty_tree();
    let mut leaves = Vec::new();
    let root = tree.insert(Panel::with_layout(Stack));
    leaves.push(add(&mut tree, root, Leaf(Size::new(1000.0, 60.0))));

    let cell = Size::new(96.0, 64.0);
    let grid = add(
        &mut tree,
        root,
        Panel::with_layout(Grid {
            columns: 10,
            cell,
            gap: 4.0,
        }),
    );
    for _ in 0..100 {
        let item = add(&mut tree, grid, Panel::new());
        leaves.push(add(&mut tree, item, Leaf(cell)));
        leaves.push(add(&mut tree, item, Leaf(Size::new(32.0, 32.0))));
        leaves.push(add(&mut tree, item, Leaf(Size::new(80.0, 16.0))));
    }
    (tree, root, leaves)
}

fn build_tree_from_json(path: &Path) -> (ElementTree, ElementId, Vec<ElementId>) {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
    let dump: DumpNode =
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("invalid JSON {path:?}: {e}"));
    let mut tree = empty_tree();
    let mut leaves = Vec::new();
    let root = build_subtree_from_dump(&mut tree, &mut leaves, &dump);
    (tree, root, leaves)
}

fn build_subtree_from_dump(
    tree: &mut ElementTree,
    leaves: &mut Vec<ElementId>,
    node: &DumpNode,
) -> ElementId {
    if node.children.is_empty() {
        let id = tree.insert(Leaf(Size::new(node.width, node.height)));
        leaves.push(id);
        return id;
    }
    let id = tree.insert(Panel::with_layout(Stack));
    for child in &node.children {
        let child = build_subtree_from_dump(tree, leaves, child);
        tree.push_child(id, child)
            .unwrap_or_else(|e| panic!("failed to build bench tree: {e}"));
    }
    id
}

fn build() -> (ElementTree, ElementId, Vec<ElementId>) {
    match std::env::var_os(ENV_JSON_PATH) {
        Some(path) => build_tree_from_json(Path::new(&path)),
        None => build_synthetic_gallery(),
    }
}

fn bench_layout(c: &mut Criterion) {
    let (mut tree, root, leaves) = build();
    eprintln!("layout bench tree: {} elements, {} leaves", tree.len(), leaves.len());

    let mut group = c.benchmark_group("layout");

    group.bench_function("first_pass", |b| {
        b.iter_batched(
            build,
            |(mut tree, root, _)| black_box(tree.update_layout(root, AVAILABLE).is_ok()),
            BatchSize::LargeInput,
        );
    });

    tree.update_layout(root, AVAILABLE)
        .unwrap_or_else(|e| panic!("layout failed: {e}"));
    group.bench_function("up_to_date", |b| {
        b.iter(|| black_box(tree.update_layout(root, AVAILABLE).is_ok()));
    });

    let leaf = leaves[leaves.len() / 2];
    group.bench_function("after_leaf_invalidation", |b| {
        b.iter(|| {
            let _ = tree.invalidate_measure(leaf);
            black_box(tree.update_layout(root, AVAILABLE).is_ok())
        });
    });

    group.finish();

    let mut group = c.benchmark_group("hit_test");
    let points = [
        ("header", Point::new(10.0, 10.0)),
        ("grid_cell", Point::new(530.0, 400.0)),
        ("miss", Point::new(1190.0, 790.0)),
    ];
    for (name, point) in points {
        group.bench_with_input(BenchmarkId::new("target", name), &point, |b, &point| {
            b.iter(|| black_box(tree.hit_test(Some(root), point)));
        });
        group.bench_with_input(BenchmarkId::new("path", name), &point, |b, &point| {
            b.iter(|| black_box(tree.hit_test_path(Some(root), point)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
