// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-point arithmetic: escape-time iteration and the banded
//! coloring derived from it.  Everything here is pure and
//! deterministic, which is what lets the scheduler hand points to
//! workers in any order and still produce identical images.

use num::Complex;

/// One colored sample, tagged with the pixel it belongs to so row
/// results can arrive at the assembler in any order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelResult {
    /// Horizontal pixel position.
    pub x: u32,
    /// Vertical pixel position.
    pub y: u32,
    /// The banded RGB color for this sample's escape count.
    pub colour: [u8; 3],
}

/// The number of iterations `z = z*z + c` takes to pull `c` out of
/// the radius-2 circle, capped at `limit`.  A count of `limit` means
/// the point never escaped within the budget; that result is
/// indistinguishable from an escape on the very last check, so the
/// count alone never proves set membership.
pub fn escape_time(c: Complex<f64>, limit: u32) -> u32 {
    let mut z = Complex { re: 0.0, im: 0.0 };
    for i in 0..limit {
        if z.norm_sqr() > 4.0 {
            return i;
        }
        z = z * z + c;
    }
    limit
}

/// The banded color for an escape count.  The channels cycle at
/// different periods (64, 32 and 16 counts), which is what gives the
/// classic ringed look around the set.
pub fn colour(count: u32) -> [u8; 3] {
    [
        ((count % 64) * 4) as u8,
        ((count % 32) * 8) as u8,
        ((count % 16) * 16) as u8,
    ]
}
