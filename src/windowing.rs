//! Window level/width handling.
//!
//! A [`Window`] maps a band of Hounsfield values onto the 8-bit display
//! range. Its canonical form is `(level, width)`; the `(min, max)` bounds are
//! always derived from it, so the two views can never drift apart.

use std::ops::RangeInclusive;

/// Narrowest window the control accepts, in HU.
pub const MIN_WIDTH: f64 = 1.0;

/// Range used for the sliders before any slice has been loaded.
const FALLBACK_DATA_RANGE: (f64, f64) = (-1024.0, 3071.0);

/// Saturating linear map of `value` from `[min, max]` onto `[0, 255]`.
///
/// `max` must be strictly greater than `min`; [`Window`] guarantees this.
pub fn window_transform(value: f64, min: f64, max: f64) -> u8 {
    debug_assert!(max > min, "window_transform called with max <= min");

    let clamped = value.clamp(min, max);
    let normalized = (clamped - min) / (max - min);
    (normalized * 255.0).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    level: f64,
    width: f64,
}

impl Window {
    pub fn new(level: f64, width: f64) -> Self {
        // also catches NaN
        let width = if width >= MIN_WIDTH { width } else { MIN_WIDTH };
        Self { level, width }
    }

    /// Builds a window from HU bounds. A `max` closer than [`MIN_WIDTH`] to
    /// `min` is pushed up to keep the window valid.
    pub fn from_bounds(min: f64, max: f64) -> Self {
        let max = if max - min >= MIN_WIDTH {
            max
        } else {
            min + MIN_WIDTH
        };
        Self {
            level: (max + min) / 2.0,
            width: max - min,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn min(&self) -> f64 {
        self.level - self.width / 2.0
    }

    pub fn max(&self) -> f64 {
        self.level + self.width / 2.0
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min(), self.max())
    }

    pub fn apply(&self, hu: f64) -> u8 {
        window_transform(hu, self.min(), self.max())
    }

    /// Default window for a slice whose HU values span `[min, max]`.
    pub fn spanning(min: f64, max: f64) -> Self {
        Self::new((min + max) / 2.0, max - min)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(40.0, 400.0)
    }
}

/// Which pair of values the window sliders edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    LevelWidth,
    MinMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowParam {
    Level,
    Width,
    Min,
    Max,
}

/// Slider ranges for the window controls.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowLimits {
    pub level: RangeInclusive<f64>,
    pub width: RangeInclusive<f64>,
    pub bounds: RangeInclusive<f64>,
}

impl WindowLimits {
    /// Limits derived from the data range, widened so `window` always fits.
    pub fn for_data(data_range: Option<(f64, f64)>, window: Window) -> Self {
        let (data_min, data_max) = data_range.unwrap_or(FALLBACK_DATA_RANGE);
        let span = (data_max - data_min).max(MIN_WIDTH);

        let level_lo = data_min.min(window.level()).floor();
        let level_hi = data_max.max(window.level()).ceil();
        let width_hi = span.max(window.width()).ceil();
        let bounds_lo = data_min.min(window.min()).floor();
        let bounds_hi = data_max.max(window.max()).ceil();

        Self {
            level: level_lo..=level_hi.max(level_lo + MIN_WIDTH),
            width: MIN_WIDTH..=width_hi.max(MIN_WIDTH + 1.0),
            bounds: bounds_lo..=bounds_hi.max(bounds_lo + MIN_WIDTH),
        }
    }
}

/// Holds the current window and applies user edits to it.
///
/// Every edit returns `true` when the window actually changed, which is the
/// caller's cue to re-render.
#[derive(Debug, Clone)]
pub struct WindowControl {
    window: Window,
    default_window: Window,
    mode: WindowMode,
    sensitivity: f64,
}

impl WindowControl {
    pub fn new(default_window: Window, sensitivity: f64) -> Self {
        Self {
            window: default_window,
            default_window,
            mode: WindowMode::default(),
            sensitivity,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WindowMode) {
        self.mode = mode;
    }

    /// Installs a new default (e.g. for a freshly opened series) and jumps to it.
    pub fn reset_to(&mut self, window: Window) -> bool {
        self.default_window = window;
        self.replace(window)
    }

    pub fn reset(&mut self) -> bool {
        self.replace(self.default_window)
    }

    pub fn set(&mut self, param: WindowParam, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }

        let current = self.window;
        let next = match param {
            WindowParam::Level => Window::new(value, current.width()),
            WindowParam::Width => Window::new(current.level(), value),
            WindowParam::Min => {
                let max = current.max();
                Window::from_bounds(value.min(max - MIN_WIDTH), max)
            }
            WindowParam::Max => {
                let min = current.min();
                Window::from_bounds(min, value.max(min + MIN_WIDTH))
            }
        };
        self.replace(next)
    }

    pub fn nudge(&mut self, param: WindowParam, delta: f64) -> bool {
        let current = match param {
            WindowParam::Level => self.window.level(),
            WindowParam::Width => self.window.width(),
            WindowParam::Min => self.window.min(),
            WindowParam::Max => self.window.max(),
        };
        self.set(param, current + delta)
    }

    /// Pointer drag: horizontal motion shifts the level, dragging up widens.
    pub fn drag(&mut self, dx: f64, dy: f64) -> bool {
        if (dx == 0.0 && dy == 0.0) || !dx.is_finite() || !dy.is_finite() {
            return false;
        }

        let current = self.window;
        let level = current.level() + (dx * self.sensitivity).round();
        let width = current.width() - (dy * self.sensitivity).round();
        self.replace(Window::new(level, width))
    }

    fn replace(&mut self, next: Window) -> bool {
        if next == self.window {
            return false;
        }
        self.window = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_window_maps_bounds_and_center() {
        let window = Window::from_bounds(-100.0, 400.0);
        assert_eq!(window.width(), 500.0);
        assert_eq!(window.level(), 150.0);

        assert_eq!(window.apply(-100.0), 0);
        assert_eq!(window.apply(400.0), 255);
        assert_eq!(window.apply(150.0), 128);
    }

    #[test]
    fn transform_saturates_outside_window() {
        assert_eq!(window_transform(-5000.0, -100.0, 400.0), 0);
        assert_eq!(window_transform(-101.0, -100.0, 400.0), 0);
        assert_eq!(window_transform(401.0, -100.0, 400.0), 255);
        assert_eq!(window_transform(1e9, -100.0, 400.0), 255);
    }

    #[test]
    fn transform_is_monotonic_over_sweep() {
        let windows = [(-100.0, 400.0), (-1000.0, -999.0), (0.0, 4095.0), (-160.0, 240.0)];
        for (min, max) in windows {
            let mut previous = 0u8;
            let mut value = min - 50.0;
            while value <= max + 50.0 {
                let output = window_transform(value, min, max);
                assert!(output >= previous, "not monotonic at {value} for {min}..{max}");
                if value <= min {
                    assert_eq!(output, 0);
                }
                if value >= max {
                    assert_eq!(output, 255);
                }
                previous = output;
                value += 0.5;
            }
        }
    }

    #[test]
    fn level_width_and_bounds_round_trip_exactly() {
        for level2 in (-2048..=2048).step_by(37) {
            for width in (1..=4000).step_by(113) {
                let level = level2 as f64 / 2.0;
                let window = Window::new(level, width as f64);
                let (min, max) = window.bounds();
                let back = Window::from_bounds(min, max);
                assert_eq!(back.level(), level);
                assert_eq!(back.width(), width as f64);
                assert_eq!(back.bounds(), (min, max));
            }
        }
    }

    #[test]
    fn constructors_keep_width_positive() {
        assert_eq!(Window::new(0.0, 0.0).width(), MIN_WIDTH);
        assert_eq!(Window::new(0.0, -20.0).width(), MIN_WIDTH);
        assert_eq!(Window::new(0.0, f64::NAN).width(), MIN_WIDTH);

        let collapsed = Window::from_bounds(50.0, 50.0);
        assert_eq!(collapsed.bounds(), (50.0, 51.0));
        let inverted = Window::from_bounds(50.0, 10.0);
        assert_eq!(inverted.width(), MIN_WIDTH);
    }

    #[test]
    fn min_edit_keeps_max_from_current_window() {
        let mut control = WindowControl::new(Window::new(40.0, 400.0), 1.0);
        assert!(control.set(WindowParam::Min, -100.0));
        assert_eq!(control.window().bounds(), (-100.0, 240.0));

        assert!(control.set(WindowParam::Max, 400.0));
        assert_eq!(control.window().bounds(), (-100.0, 400.0));
        assert_eq!(control.window().level(), 150.0);
        assert_eq!(control.window().width(), 500.0);

        assert!(control.set(WindowParam::Level, 0.0));
        assert_eq!(control.window().bounds(), (-250.0, 250.0));
    }

    #[test]
    fn edits_cannot_collapse_the_window() {
        let mut control = WindowControl::new(Window::from_bounds(0.0, 100.0), 1.0);

        assert!(control.set(WindowParam::Min, 500.0));
        assert_eq!(control.window().bounds(), (99.0, 100.0));

        assert!(!control.set(WindowParam::Max, -500.0));
        assert_eq!(control.window().bounds(), (99.0, 100.0));

        assert!(!control.set(WindowParam::Width, 0.0));
        assert_eq!(control.window().width(), MIN_WIDTH);
        assert!(!control.set(WindowParam::Level, f64::NAN));
    }

    #[test]
    fn unchanged_edit_reports_no_change() {
        let mut control = WindowControl::new(Window::default(), 1.0);
        assert!(!control.set(WindowParam::Level, 40.0));
        assert!(!control.reset());
        assert!(control.nudge(WindowParam::Width, 1.0));
        assert_eq!(control.window().width(), 401.0);
        assert!(control.reset());
        assert_eq!(control.window(), Window::default());
    }

    #[test]
    fn drag_moves_level_horizontally_and_width_vertically() {
        let mut control = WindowControl::new(Window::new(40.0, 400.0), 2.0);
        assert!(control.drag(5.0, -10.0));
        assert_eq!(control.window().level(), 50.0);
        assert_eq!(control.window().width(), 420.0);
        assert!(!control.drag(0.0, 0.0));
    }

    #[test]
    fn reset_to_installs_new_default() {
        let mut control = WindowControl::new(Window::default(), 1.0);
        assert!(control.reset_to(Window::new(300.0, 1500.0)));
        control.set(WindowParam::Level, 0.0);
        control.reset();
        assert_eq!(control.window(), Window::new(300.0, 1500.0));
    }

    #[test]
    fn limits_cover_data_and_current_window() {
        let window = Window::new(1000.0, 6000.0);
        let limits = WindowLimits::for_data(Some((-1024.0, 2000.0)), window);
        assert_eq!(*limits.level.start(), -1024.0);
        assert_eq!(*limits.level.end(), 2000.0);
        assert_eq!(*limits.width.end(), 6000.0);
        assert_eq!(*limits.bounds.start(), -2000.0);
        assert_eq!(*limits.bounds.end(), 4000.0);

        let flat = WindowLimits::for_data(Some((7.0, 7.0)), Window::spanning(7.0, 7.0));
        assert!(flat.level.start() < flat.level.end());
        assert!(flat.width.start() < flat.width.end());
    }
}
