// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_dynamic_list::{
    Axis, DynamicList, ElementSizing, HeadlessHost, ListConfig, ListDataSource, ListHost,
};

const VIEWPORT: f64 = 600.0;

/// Rows between 16 and 47 units tall, in a repeating pattern.
struct Rows(usize);

impl ListDataSource for Rows {
    fn num_elements(&self) -> Option<usize> {
        Some(self.0)
    }

    fn element_extent(&self, index: usize, _axis: Axis) -> f64 {
        16.0 + ((index * 7) % 32) as f64
    }
}

fn build(count: usize, estimate: Option<f64>) -> DynamicList<HeadlessHost, Rows> {
    let mut host = HeadlessHost::vertical(Size::new(320.0, VIEWPORT));
    let content = host.content().unwrap();
    let row = host.insert(content, Size::new(320.0, 24.0));
    let item = match estimate {
        Some(estimate) => ElementSizing::fixed(row).variable(false, estimate),
        None => ElementSizing::fixed(row),
    };
    let config = ListConfig {
        item,
        ..ListConfig::default()
    };
    DynamicList::new(host, Rows(count), (), config)
}

fn scroll_to(list: &mut DynamicList<HeadlessHost, Rows>, position: f64) {
    list.host_mut().set_scroll_position(position);
    let offset = list.host().scroll_offset();
    list.on_scroll_offset_changed(offset);
}

fn bench_dynamic_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_dynamic_list");
    group.sample_size(50);

    for &count in &[1_000_usize, 100_000_usize] {
        group.bench_function(format!("refresh_fixed(n={count})"), |b| {
            b.iter_batched(
                || build(count, None),
                |mut list| {
                    list.refresh_content();
                    black_box(list.visible_range());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("refresh_estimated(n={count})"), |b| {
            b.iter_batched(
                || build(count, Some(24.0)),
                |mut list| {
                    list.refresh_content();
                    black_box(list.visible_range());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("scroll_sweep_fixed(n={count})"), |b| {
            b.iter_batched(
                || {
                    let mut list = build(count, None);
                    list.refresh_content();
                    list
                },
                |mut list| {
                    for step in 0..200 {
                        scroll_to(&mut list, -f64::from(step) * 37.0);
                    }
                    black_box(list.visible_range());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("scroll_sweep_estimated(n={count})"), |b| {
            b.iter_batched(
                || {
                    let mut list = build(count, Some(24.0));
                    list.refresh_content();
                    list
                },
                |mut list| {
                    for step in 0..200 {
                        scroll_to(&mut list, -f64::from(step) * 37.0);
                    }
                    black_box(list.host().content_extent());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("append_at_end(n=10_000,+100x10)", |b| {
        b.iter_batched(
            || {
                let mut list = build(10_000, Some(24.0));
                let content = list.host().content().unwrap();
                list.host_mut()
                    .set_pivot(content, kurbo::Vec2::new(0.0, 1.0));
                list.refresh_content();
                list
            },
            |mut list| {
                for _ in 0..100 {
                    list.data_mut().0 += 10;
                    list.add_elements_to_end(10, true).unwrap();
                }
                black_box(list.visible_range());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_dynamic_list);
criterion_main!(benches);
