//! The error taxonomy for the whole renderer.  Configuration problems
//! are caught once, before any work is scheduled; the only runtime
//! failure mode left after that is a worker dying mid-task, which is
//! fatal to the run.

/// Everything that can go wrong between reading a configuration and
/// writing the last pixel.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// A raw configuration field could not be parsed as the type the
    /// field requires.
    #[fail(display = "{} must be {}", field, expected)]
    ConfigType {
        /// Which field was rejected.
        field: &'static str,
        /// What the field accepts.
        expected: &'static str,
    },

    /// A numeric field parsed but failed the power-of-two rule.
    #[fail(display = "{} must be base 2, got {}", field, value)]
    ConfigValue {
        /// Which field was rejected.
        field: &'static str,
        /// The offending value.
        value: u32,
    },

    /// The image dimensions leave nothing to interpolate across: a
    /// width or height of one or zero would divide by zero in the
    /// coordinate mapper.
    #[fail(
        display = "degenerate image size {}x{}: both dimensions must exceed one pixel",
        width, height
    )]
    DegenerateDimension {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A worker died or reported an error mid-task.  Never retried;
    /// whatever frames were already persisted stay on disk.
    #[fail(display = "worker failure: {}", _0)]
    WorkerFailure(String),
}
