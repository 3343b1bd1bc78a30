// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The work scheduler and the two render drivers built on it.
//!
//! Both modes share one shape: fill a bounded FIFO channel with every
//! task the run needs, append one `Stop` sentinel per worker so the
//! end of the queue sits behind all real work, spawn the workers under
//! a scope, then block on an acknowledgment channel until every
//! enqueued item (sentinels included) has been confirmed.  That drain
//! is the sole termination signal.  There is no timeout: a worker that
//! dies without confirming leaves the render waiting rather than
//! producing a corrupt image.
//!
//! Still renders collect per-worker result buffers, carried out
//! through the join handles and merged only after the barrier, so no
//! pixel collection is ever shared between threads.  Animation renders
//! never centralize pixels at all: each worker assembles and persists
//! its own frames.

extern crate crossbeam;

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use crossbeam::thread::ScopedJoinHandle;
use failure::Error;
use image::{Rgb, RgbImage};
use itertools::iproduct;
use std::path::Path;

use config::{Animation, RenderConfig};
use errors::RenderError;
use kernel::{colour, escape_time, PixelResult};
use planes::{PlaneMapper, Viewport};

/// One unit of work pulled from the task queue.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Task {
    /// Compute every pixel of row `y` of a still image.
    Row(u32),
    /// Render and persist one animation frame.
    Frame {
        /// Position of the frame in the animation, starting at zero.
        /// Doubles as the zoom numerator: the frame's window is the
        /// base window shrunk by `2^(index / divisor)`.
        index: u32,
        /// Zoom divisor shared by the whole animation,
        /// `zoom_factor * framerate`.
        divisor: f64,
    },
    /// Sentinel: the queue holds nothing further, stop pulling.
    Stop,
}

/// Renders one still of the zoom-zero viewport around the configured
/// focus, split across `workers` threads one row at a time.  Blocks
/// until every row has been acknowledged, then merges the per-worker
/// buffers into the returned image.
pub fn render_image(config: &RenderConfig, workers: usize) -> Result<RgbImage, RenderError> {
    assert!(workers > 0, "a render needs at least one worker");
    let viewport = Viewport::centered(0.0, 1.0, config.focus);
    let mapper = PlaneMapper::new(config.width, config.height, viewport)?;

    let rows = config.height as usize;
    let (task_tx, task_rx) = bounded(rows + workers);
    for y in 0..config.height {
        task_tx
            .send(Task::Row(y))
            .expect("task queue rejected a row");
    }
    for _ in 0..workers {
        task_tx
            .send(Task::Stop)
            .expect("task queue rejected a sentinel");
    }
    drop(task_tx);

    let (ack_tx, ack_rx) = unbounded();
    let iterations = config.iterations;

    let buffers = crossbeam::scope(|spawner| {
        let mapper = &mapper;
        let handles: Vec<ScopedJoinHandle<Vec<PixelResult>>> = (0..workers)
            .map(|_| {
                let tasks = task_rx.clone();
                let acks = ack_tx.clone();
                spawner.spawn(move |_| image_worker(mapper, iterations, tasks, acks))
            })
            .collect();
        drop(ack_tx);

        for _ in 0..rows + workers {
            if ack_rx.recv().is_err() {
                return Err(RenderError::WorkerFailure(
                    "worker pool went away before every row was acknowledged".to_string(),
                ));
            }
        }

        let mut buffers = Vec::with_capacity(workers);
        for handle in handles {
            buffers.push(handle.join().map_err(|_| {
                RenderError::WorkerFailure("worker thread panicked".to_string())
            })?);
        }
        Ok(buffers)
    })
    .map_err(|_| RenderError::WorkerFailure("worker thread panicked".to_string()))??;

    Ok(assemble(config.width, config.height, buffers))
}

fn image_worker(
    mapper: &PlaneMapper,
    iterations: u32,
    tasks: Receiver<Task>,
    acks: Sender<()>,
) -> Vec<PixelResult> {
    let mut points = Vec::new();
    loop {
        match tasks.recv() {
            Ok(Task::Row(y)) => {
                for x in 0..mapper.width {
                    let count = escape_time(mapper.pixel_to_point(x, y), iterations);
                    points.push(PixelResult {
                        x,
                        y,
                        colour: colour(count),
                    });
                }
                let _ = acks.send(());
            }
            Ok(Task::Stop) => {
                let _ = acks.send(());
                break;
            }
            Ok(Task::Frame { .. }) => unreachable!("still renders never enqueue frame tasks"),
            // The queue closes only after the sentinels drain.
            Err(_) => break,
        }
    }
    points
}

/// Merge per-worker result buffers into the final image.  Rows
/// partition the grid, so each pixel is written exactly once no matter
/// how tasks were interleaved across workers.
fn assemble(width: u32, height: u32, buffers: Vec<Vec<PixelResult>>) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for buffer in buffers {
        for point in buffer {
            image.put_pixel(point.x, point.y, Rgb(point.colour));
        }
    }
    image
}

/// Renders every frame of a zoom animation into `directory`, one frame
/// per task across `workers` threads.  Frame `i` covers the base
/// window shrunk by `2^(i / (zoom_factor * framerate))` and is saved
/// as `{i:04}.png`.  Workers persist their own frames; a frame that
/// fails to write aborts the run after the surviving workers drain
/// their remaining tasks.
pub fn render_animation(
    config: &RenderConfig,
    animation: &Animation,
    workers: usize,
    directory: &Path,
) -> Result<(), RenderError> {
    assert!(workers > 0, "a render needs at least one worker");
    // Degenerate dimensions surface here, before any frame is queued,
    // not as a failure inside every worker.
    PlaneMapper::new(
        config.width,
        config.height,
        Viewport::centered(0.0, 1.0, config.focus),
    )?;

    let frames = animation.seconds * animation.framerate;
    let divisor = animation.zoom_factor * f64::from(animation.framerate);

    let (task_tx, task_rx) = bounded(frames as usize + workers);
    for index in 0..frames {
        task_tx
            .send(Task::Frame { index, divisor })
            .expect("task queue rejected a frame");
    }
    for _ in 0..workers {
        task_tx
            .send(Task::Stop)
            .expect("task queue rejected a sentinel");
    }
    drop(task_tx);

    let (ack_tx, ack_rx) = unbounded();

    crossbeam::scope(|spawner| {
        for _ in 0..workers {
            let tasks = task_rx.clone();
            let acks = ack_tx.clone();
            spawner.spawn(move |_| animation_worker(config, directory, tasks, acks));
        }
        drop(ack_tx);

        for _ in 0..frames as usize + workers {
            match ack_rx.recv() {
                Ok(Ok(())) => {}
                Ok(Err(cause)) => {
                    return Err(RenderError::WorkerFailure(cause.to_string()));
                }
                Err(_) => {
                    return Err(RenderError::WorkerFailure(
                        "worker pool went away before every frame was acknowledged".to_string(),
                    ));
                }
            }
        }
        Ok(())
    })
    .map_err(|_| RenderError::WorkerFailure("worker thread panicked".to_string()))??;

    Ok(())
}

fn animation_worker(
    config: &RenderConfig,
    directory: &Path,
    tasks: Receiver<Task>,
    acks: Sender<Result<(), Error>>,
) {
    loop {
        match tasks.recv() {
            Ok(Task::Frame { index, divisor }) => {
                let outcome = write_frame(config, directory, index, divisor);
                let failed = outcome.is_err();
                let _ = acks.send(outcome);
                if failed {
                    // A failed worker stops pulling work; its siblings
                    // drain whatever is left in the queue.
                    break;
                }
            }
            Ok(Task::Stop) => {
                let _ = acks.send(Ok(()));
                break;
            }
            Ok(Task::Row(_)) => unreachable!("animation renders never enqueue row tasks"),
            Err(_) => break,
        }
    }
}

/// Render one frame and persist it under the zero-padded name the
/// frame sequence uses.
fn write_frame(
    config: &RenderConfig,
    directory: &Path,
    index: u32,
    divisor: f64,
) -> Result<(), Error> {
    let viewport = Viewport::centered(f64::from(index), divisor, config.focus);
    let mapper = PlaneMapper::new(config.width, config.height, viewport)?;
    let mut frame = RgbImage::new(config.width, config.height);
    for (y, x) in iproduct!(0..config.height, 0..config.width) {
        let count = escape_time(mapper.pixel_to_point(x, y), config.iterations);
        frame.put_pixel(x, y, Rgb(colour(count)));
    }
    frame.save(directory.join(format!("{:04}.png", index)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate tempfile;

    use super::*;
    use config::RenderMode;
    use num::Complex;
    use std::fs;

    fn still(iterations: u32, width: u32, height: u32) -> RenderConfig {
        RenderConfig::new(
            iterations,
            width,
            height,
            Complex::new(0.0, 0.0),
            RenderMode::Image,
        )
        .unwrap()
    }

    #[test]
    fn assemble_places_results_wherever_they_came_from() {
        let buffers = vec![
            vec![
                PixelResult {
                    x: 0,
                    y: 0,
                    colour: [1, 2, 3],
                },
                PixelResult {
                    x: 1,
                    y: 1,
                    colour: [4, 5, 6],
                },
            ],
            vec![PixelResult {
                x: 1,
                y: 0,
                colour: [7, 8, 9],
            }],
            vec![],
        ];
        let image = assemble(2, 2, buffers);
        assert_eq!(image.get_pixel(0, 0), &Rgb([1, 2, 3]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([4, 5, 6]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([7, 8, 9]));
        assert_eq!(image.get_pixel(0, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn a_still_render_covers_the_whole_grid() {
        let config = still(16, 4, 4);
        let image = render_image(&config, 2).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
        // Every corner of the base window escapes on the first check.
        assert_eq!(image.get_pixel(0, 0), &Rgb(colour(1)));
        assert_eq!(image.get_pixel(3, 0), &Rgb(colour(1)));
        assert_eq!(image.get_pixel(0, 3), &Rgb(colour(1)));
        assert_eq!(image.get_pixel(3, 3), &Rgb(colour(1)));
    }

    #[test]
    fn degenerate_dimensions_fail_before_any_work_is_queued() {
        let config = still(16, 1, 1);
        assert_eq!(
            render_image(&config, 1).unwrap_err(),
            RenderError::DegenerateDimension {
                width: 1,
                height: 1,
            }
        );
    }

    #[test]
    fn an_empty_animation_writes_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        let animation = Animation {
            seconds: 0,
            framerate: 2,
            zoom_factor: 1.0,
        };
        let config = RenderConfig::new(
            16,
            4,
            4,
            Complex::new(0.0, 0.0),
            RenderMode::Video(animation),
        )
        .unwrap();
        render_animation(&config, &animation, 2, dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn an_unwritable_directory_is_a_worker_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let animation = Animation {
            seconds: 1,
            framerate: 2,
            zoom_factor: 1.0,
        };
        let config = RenderConfig::new(
            16,
            4,
            4,
            Complex::new(0.0, 0.0),
            RenderMode::Video(animation),
        )
        .unwrap();
        match render_animation(&config, &animation, 2, &missing) {
            Err(RenderError::WorkerFailure(_)) => {}
            other => panic!("expected a worker failure, got {:?}", other),
        }
    }
}
