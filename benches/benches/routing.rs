// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `trellis_responder` route dispatch.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

use kurbo::{Point, Size};
use trellis_layout::{ElementBehavior, ElementTree, LayoutCx, LayoutProperties, Panel};
use trellis_property::{OwnerType, PropertyRegistry};
use trellis_responder::adapters::element_tree::route_at_point;
use trellis_responder::{
    EventRouter, Interceptor, RouteContext, RoutedEventArgs, RoutedEventRegistry, RoutingStrategy,
};

struct Button;

/// Passes the route depth from pre to post through the data bag.
struct DepthProbe;

impl Interceptor<u32> for DepthProbe {
    fn pre_process(&mut self, cx: &mut RouteContext<u32>) -> bool {
        cx.insert("depth", cx.route().len());
        true
    }

    fn post_process(&mut self, cx: &mut RouteContext<u32>) {
        black_box(cx.remove::<usize>("depth"));
    }
}

struct Fill;

impl ElementBehavior for Fill {
    fn measure_override(&mut self, _cx: &mut LayoutCx<'_>, available: Size) -> Size {
        available
    }
}

fn bench_routing(c: &mut Criterion) {
    let mut events = RoutedEventRegistry::new();
    let owner = OwnerType::of::<Button>();
    let click = events.register::<u32>(owner, "Click", RoutingStrategy::Bubble);
    let preview = events.register::<u32>(owner, "PreviewClick", RoutingStrategy::Tunnel);

    let mut group = c.benchmark_group("route_event");
    for depth in [4_u32, 16, 64] {
        let path: Vec<u32> = (0..depth).collect();
        let target = depth - 1;

        let mut router = EventRouter::new();
        for &element in &path {
            for event in [click, preview] {
                router.add_handler(
                    element,
                    event,
                    |_, args| {
                        args.payload += 1;
                        Ok(())
                    },
                    false,
                );
            }
        }

        group.bench_with_input(BenchmarkId::new("bubble", depth), &path, |b, path| {
            b.iter(|| {
                let mut args = RoutedEventArgs::new(click, target, 0);
                black_box(router.route_event(&mut args, path).invoked)
            });
        });

        group.bench_with_input(BenchmarkId::new("tunnel", depth), &path, |b, path| {
            b.iter(|| {
                let mut args = RoutedEventArgs::new(preview, target, 0);
                black_box(router.route_event(&mut args, path).invoked)
            });
        });

        router.add_interceptor(DepthProbe);
        group.bench_with_input(
            BenchmarkId::new("bubble_intercepted", depth),
            &path,
            |b, path| {
                b.iter(|| {
                    let mut args = RoutedEventArgs::new(click, target, 0);
                    black_box(router.route_event(&mut args, path).invoked)
                });
            },
        );
    }
    group.finish();

    // Hit test and route in one step, as pointer input does.
    let mut registry = PropertyRegistry::new();
    let properties = LayoutProperties::register(&mut registry);
    let mut tree = ElementTree::new(Arc::new(registry), properties);
    let root = tree.insert(Panel::new());
    let mut parent = root;
    for _ in 0..8 {
        let panel = tree.insert(Panel::new());
        tree.push_child(parent, panel)
            .unwrap_or_else(|e| panic!("failed to build bench tree: {e}"));
        parent = panel;
    }
    let leaf = tree.insert(Fill);
    tree.push_child(parent, leaf)
        .unwrap_or_else(|e| panic!("failed to build bench tree: {e}"));
    tree.update_layout(root, Size::new(400.0, 300.0))
        .unwrap_or_else(|e| panic!("layout failed: {e}"));

    let mut router = EventRouter::new();
    router.add_handler(root, click, |_, _| Ok(()), false);
    router.add_handler(leaf, click, |_, _| Ok(()), false);

    c.bench_function("route_at_point/depth_10", |b| {
        b.iter(|| {
            let routed = route_at_point(
                &tree,
                &mut router,
                Some(root),
                Point::new(200.0, 150.0),
                click,
                0,
            );
            black_box(routed.map(|r| r.report.invoked))
        });
    });
}

criterion_group!(benches, bench_routing);
criterion_main!(benches);
