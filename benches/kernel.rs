// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate mandelzoom;
extern crate num;

use criterion::{black_box, Criterion};
use mandelzoom::{colour, escape_time};
use num::Complex;

// A 64x64 sweep of the base window, the same mix of instant escapes
// and full-budget interior points a real render grinds through.
fn escape_time_over_the_base_window(c: &mut Criterion) {
    c.bench_function("escape_time 64x64 at 256", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for y in 0..64 {
                for x in 0..64 {
                    let point = Complex::new(
                        f64::from(x) * 4.0 / 63.0 - 2.0,
                        f64::from(y) * 4.0 / 63.0 - 2.0,
                    );
                    total += u64::from(escape_time(black_box(point), 256));
                }
            }
            total
        })
    });
}

fn colour_banding(c: &mut Criterion) {
    c.bench_function("colour 0..1024", |b| {
        b.iter(|| {
            (0..1024u32)
                .map(|count| u32::from(colour(black_box(count))[0]))
                .sum::<u32>()
        })
    });
}

criterion_group!(benches, escape_time_over_the_base_window, colour_banding);
criterion_main!(benches);
