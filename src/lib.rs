#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelzoom renderer
//!
//! Renders the Mandelbrot set either as a single still image or as
//! the frames of a zoom animation.  The classic escape-time recipe:
//! every pixel names a point `c` on the complex plane, and the number
//! of times `z = z*z + c` can be iterated before `z` leaves the
//! radius-2 circle becomes that pixel's color.
//!
//! The work is embarrassingly parallel but expensive per pixel, so
//! both render modes push their work through the same scheduler: a
//! bounded FIFO queue of tasks (rows for a still, whole frames for an
//! animation) with one stop sentinel per worker at the end.  A fixed
//! pool of scoped threads pulls from the queue while the orchestrator
//! blocks on an acknowledgment barrier until every enqueued task has
//! been confirmed.  Workers never share result buffers; stills are
//! merged from per-worker buffers after the barrier, and animation
//! frames are written to disk by the worker that rendered them.
//! Every stage is deterministic, so the same configuration always
//! produces the same bytes, whatever the worker count.

#[macro_use]
extern crate failure;

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod config;
pub mod errors;
pub mod kernel;
pub mod planes;
pub mod scheduler;

pub use config::{Animation, RenderConfig, RenderMode};
pub use errors::RenderError;
pub use kernel::{colour, escape_time, PixelResult};
pub use planes::{PlaneMapper, Viewport};
pub use scheduler::{render_animation, render_image, Task};
