//! The relationship between the pixel grid and the complex plane.
//! A `Viewport` is the rectangle of the complex plane currently on
//! screen, derived from a zoom level and a focus point; a
//! `PlaneMapper` stretches the pixel grid across a viewport so every
//! pixel names one sample point.

use num::Complex;

use errors::RenderError;

/// The rectangle of the complex plane mapped onto the pixel grid.
/// Derived once per image (or per frame) and never mutated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge, on the real axis.
    pub min_x: f64,
    /// Right edge, on the real axis.
    pub max_x: f64,
    /// Bottom edge, on the imaginary axis.
    pub min_y: f64,
    /// Top edge, on the imaginary axis.
    pub max_y: f64,
}

impl Viewport {
    /// The window of the complex plane seen at a zoom level, centered
    /// on `focus`.  Zoom zero is the whole `[-2, 2]` square around the
    /// focus; every unit of `zoom / factor` halves the window's
    /// extent.  `factor` lets animation frames pass their frame index
    /// as the numerator and the shared zoom divisor as the
    /// denominator; still images pass 1.
    pub fn centered(zoom: f64, factor: f64, focus: Complex<f64>) -> Viewport {
        let scale = (zoom / factor).exp2();
        Viewport {
            min_x: -2.0 / scale + focus.re,
            max_x: 2.0 / scale + focus.re,
            min_y: -2.0 / scale + focus.im,
            max_y: 2.0 / scale + focus.im,
        }
    }
}

/// Maps pixels of a `width` x `height` grid to sample points inside a
/// viewport.  Pixel (0, 0) lands exactly on the viewport's lower-left
/// corner and the opposite corner pixel exactly on its upper-right;
/// everything between interpolates linearly.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Grid width in pixels.
    pub width: u32,
    /// Grid height in pixels.
    pub height: u32,
    /// The complex-plane window the grid spans.
    pub viewport: Viewport,
}

impl PlaneMapper {
    /// Constructor.  Rejects dimensions that leave nothing to
    /// interpolate across, since the mapping divides by `width - 1`
    /// and `height - 1`.
    pub fn new(width: u32, height: u32, viewport: Viewport) -> Result<PlaneMapper, RenderError> {
        if width <= 1 || height <= 1 {
            return Err(RenderError::DegenerateDimension { width, height });
        }
        Ok(PlaneMapper {
            width,
            height,
            viewport,
        })
    }

    /// The complex-plane sample point under pixel `(x, y)`.  Pure
    /// arithmetic on the stored viewport; identical arguments always
    /// produce identical points.
    pub fn pixel_to_point(&self, x: u32, y: u32) -> Complex<f64> {
        Complex::new(
            x as f64 * (self.viewport.max_x - self.viewport.min_x) / (self.width - 1) as f64
                + self.viewport.min_x,
            y as f64 * (self.viewport.max_y - self.viewport.min_y) / (self.height - 1) as f64
                + self.viewport.min_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_zero_is_the_base_window() {
        let vp = Viewport::centered(0.0, 1.0, Complex::new(0.0, 0.0));
        assert_eq!(
            vp,
            Viewport {
                min_x: -2.0,
                max_x: 2.0,
                min_y: -2.0,
                max_y: 2.0,
            }
        );
    }

    #[test]
    fn the_focus_translates_the_window() {
        let vp = Viewport::centered(0.0, 1.0, Complex::new(1.0, -0.5));
        assert_eq!(
            vp,
            Viewport {
                min_x: -1.0,
                max_x: 3.0,
                min_y: -2.5,
                max_y: 1.5,
            }
        );
    }

    #[test]
    fn each_zoom_level_halves_the_window() {
        let vp = Viewport::centered(1.0, 1.0, Complex::new(0.0, 0.0));
        assert_eq!(
            vp,
            Viewport {
                min_x: -1.0,
                max_x: 1.0,
                min_y: -1.0,
                max_y: 1.0,
            }
        );
        let vp = Viewport::centered(2.0, 1.0, Complex::new(0.0, 0.0));
        assert_eq!(
            vp,
            Viewport {
                min_x: -0.5,
                max_x: 0.5,
                min_y: -0.5,
                max_y: 0.5,
            }
        );
    }

    #[test]
    fn the_divisor_rescales_the_zoom_numerator() {
        let focus = Complex::new(0.25, 0.25);
        assert_eq!(
            Viewport::centered(4.0, 2.0, focus),
            Viewport::centered(2.0, 1.0, focus)
        );
        assert_eq!(
            Viewport::centered(0.0, 16.0, focus),
            Viewport::centered(0.0, 1.0, focus)
        );
    }

    #[test]
    fn mapper_rejects_degenerate_dimensions() {
        let vp = Viewport::centered(0.0, 1.0, Complex::new(0.0, 0.0));
        assert_eq!(
            PlaneMapper::new(1, 4, vp).unwrap_err(),
            RenderError::DegenerateDimension {
                width: 1,
                height: 4,
            }
        );
        assert_eq!(
            PlaneMapper::new(4, 0, vp).unwrap_err(),
            RenderError::DegenerateDimension {
                width: 4,
                height: 0,
            }
        );
    }

    #[test]
    fn corner_pixels_land_on_the_window_corners() {
        let vp = Viewport::centered(0.0, 1.0, Complex::new(0.0, 0.0));
        let pm = PlaneMapper::new(4, 4, vp).unwrap();
        assert_eq!(pm.pixel_to_point(0, 0), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(3, 3), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(3, 0), Complex::new(2.0, -2.0));
        assert_eq!(pm.pixel_to_point(0, 3), Complex::new(-2.0, 2.0));
    }

    #[test]
    fn interior_pixels_interpolate_linearly() {
        let vp = Viewport::centered(0.0, 1.0, Complex::new(0.0, 0.0));
        let pm = PlaneMapper::new(5, 5, vp).unwrap();
        assert_eq!(pm.pixel_to_point(2, 2), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(1, 3), Complex::new(-1.0, 1.0));
        assert_eq!(pm.pixel_to_point(3, 1), Complex::new(1.0, -1.0));
    }

    #[test]
    fn mapping_is_deterministic() {
        let vp = Viewport::centered(3.0, 2.0, Complex::new(-0.74, 0.11));
        let first = PlaneMapper::new(64, 32, vp).unwrap();
        let second = PlaneMapper::new(64, 32, vp).unwrap();
        for y in 0..32 {
            for x in 0..64 {
                assert_eq!(first.pixel_to_point(x, y), second.pixel_to_point(x, y));
            }
        }
    }
}
