use serde::{Deserialize, Serialize};

use crate::core::ValueFormatter;
use crate::error::{ChartError, ChartResult};

pub(crate) const VALUE_AXIS_TARGET_SPACING_PX: f64 = 50.0;
pub(crate) const VALUE_AXIS_MIN_TICKS: usize = 3;
pub(crate) const VALUE_AXIS_MAX_TICKS: usize = 8;

const MAX_STEP_WIDENINGS: usize = 32;
const STEP_EPSILON: f64 = 1e-9;

/// Default label count for a value axis spanning `axis_span_px`.
pub(crate) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Smallest value of the 1-2-5 progression that is `>= raw`.
fn nice_step(raw: f64) -> f64 {
    let power = raw.log10().floor();
    let base = 10_f64.powi(power as i32);
    let fraction = raw / base;
    let nice = if fraction <= 1.0 + STEP_EPSILON {
        1.0
    } else if fraction <= 2.0 + STEP_EPSILON {
        2.0
    } else if fraction <= 5.0 + STEP_EPSILON {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Next value of the 1-2-5 progression after `step`.
fn widen_step(step: f64) -> f64 {
    let power = step.log10().floor();
    let base = 10_f64.powi(power as i32);
    let fraction = (step / base).round();
    if fraction < 2.0 {
        2.0 * base
    } else if fraction < 5.0 {
        5.0 * base
    } else {
        10.0 * base
    }
}

/// Value-axis range with human-readable tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NiceScale {
    min: f64,
    max: f64,
    step: f64,
    tick_count: usize,
}

impl NiceScale {
    pub fn new(data_min: f64, data_max: f64, label_count: usize) -> ChartResult<Self> {
        Self::with_bounds(data_min, data_max, label_count, None, None)
    }

    /// Builds the rendered range for data in `[data_min, data_max]`.
    ///
    /// Explicit bounds replace the rounded side; the step is then spread
    /// evenly between the final bounds.
    pub fn with_bounds(
        data_min: f64,
        data_max: f64,
        label_count: usize,
        explicit_min: Option<f64>,
        explicit_max: Option<f64>,
    ) -> ChartResult<Self> {
        for (name, value) in [
            ("data min", Some(data_min)),
            ("data max", Some(data_max)),
            ("axis min", explicit_min),
            ("axis max", explicit_max),
        ] {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ChartError::validation(format!(
                        "{name} must be finite, got {value}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (explicit_min, explicit_max) {
            if min >= max {
                return Err(ChartError::validation(format!(
                    "axis min {min} must be lower than axis max {max}"
                )));
            }
        }

        let label_count = label_count.max(2);
        let intervals_wanted = label_count - 1;

        let (mut low, mut high) = if data_min <= data_max {
            (data_min, data_max)
        } else {
            (data_max, data_min)
        };
        if low == high {
            if low == 0.0 {
                high = 1.0;
            } else {
                low -= 0.5;
                high += 0.5;
            }
        }
        if let Some(min) = explicit_min {
            low = min;
            if high <= low {
                high = low + 1.0;
            }
        }
        if let Some(max) = explicit_max {
            high = max;
            if low >= high {
                low = high - 1.0;
            }
        }

        if let (Some(min), Some(max)) = (explicit_min, explicit_max) {
            let step = (max - min) / intervals_wanted as f64;
            return Ok(Self {
                min,
                max,
                step,
                tick_count: label_count,
            });
        }

        let mut step = nice_step((high - low) / intervals_wanted as f64);
        let mut min = low;
        let mut max = high;
        let mut intervals = intervals_wanted;
        for _ in 0..MAX_STEP_WIDENINGS {
            min = explicit_min.unwrap_or_else(|| (low / step + STEP_EPSILON).floor() * step);
            max = explicit_max.unwrap_or_else(|| (high / step - STEP_EPSILON).ceil() * step);
            intervals = (((max - min) / step) - STEP_EPSILON).ceil().max(1.0) as usize;
            if intervals <= intervals_wanted {
                break;
            }
            step = widen_step(step);
        }

        while intervals < intervals_wanted {
            if explicit_max.is_none() {
                max += step;
            } else {
                min -= step;
            }
            intervals += 1;
        }

        if explicit_min.is_some() || explicit_max.is_some() {
            step = (max - min) / intervals as f64;
        }

        Ok(Self {
            min,
            max,
            step,
            tick_count: intervals + 1,
        })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Tick values in ascending order.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        (0..self.tick_count)
            .map(|index| {
                if index + 1 == self.tick_count {
                    self.max
                } else {
                    self.min + self.step * index as f64
                }
            })
            .collect()
    }

    /// Labels aligned with [`NiceScale::ticks`].
    ///
    /// With `label_skip > 0` every `label_skip + 1`-th label counted from the
    /// top is kept, plus the bottom label; skipped slots are `None`.
    #[must_use]
    pub fn labels(&self, formatter: &ValueFormatter, label_skip: usize) -> Vec<Option<String>> {
        let last = self.tick_count.saturating_sub(1);
        self.ticks()
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let from_top = last - index;
                if index == 0 || from_top % (label_skip + 1) == 0 {
                    Some(formatter.format(value))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Linear mapping where `px_start` corresponds to `min`.
    #[must_use]
    pub fn value_to_pixel(&self, value: f64, px_start: f64, px_end: f64) -> f64 {
        px_start + (value - self.min) / (self.max - self.min) * (px_end - px_start)
    }

    /// Vertical mapping: `min` sits at `px_bottom`, `max` at `px_top`.
    #[must_use]
    pub fn value_to_vertical_pixel(&self, value: f64, px_top: f64, px_bottom: f64) -> f64 {
        px_bottom - (value - self.min) / (self.max - self.min) * (px_bottom - px_top)
    }
}

/// Category axis positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScale {
    count: usize,
    boundary_gap: bool,
}

impl CategoryScale {
    #[must_use]
    pub fn new(count: usize, boundary_gap: bool) -> Self {
        Self {
            count,
            boundary_gap,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn boundary_gap(&self) -> bool {
        self.boundary_gap
    }

    /// Width of one category band across `span_px`.
    #[must_use]
    pub fn band_width(&self, span_px: f64) -> f64 {
        if self.count == 0 {
            return span_px;
        }
        span_px / self.count as f64
    }

    /// Offset of category `index` from the axis start.
    ///
    /// Band centers with a boundary gap, evenly spread edge-to-edge otherwise.
    #[must_use]
    pub fn position(&self, index: usize, span_px: f64) -> f64 {
        if self.boundary_gap {
            return (index as f64 + 0.5) * self.band_width(span_px);
        }
        if self.count <= 1 {
            return span_px / 2.0;
        }
        index as f64 * span_px / (self.count - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{axis_tick_target_count, nice_step, widen_step};

    #[test]
    fn nice_steps_follow_one_two_five() {
        assert_eq!(nice_step(172.9), 200.0);
        assert_eq!(nice_step(0.3), 0.5);
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(widen_step(200.0), 500.0);
        assert_eq!(widen_step(500.0), 1000.0);
        assert_eq!(widen_step(1.0), 2.0);
    }

    #[test]
    fn tick_target_count_is_clamped() {
        assert_eq!(axis_tick_target_count(0.0, 50.0, 3, 8), 3);
        assert_eq!(axis_tick_target_count(300.0, 50.0, 3, 8), 7);
        assert_eq!(axis_tick_target_count(10_000.0, 50.0, 3, 8), 8);
    }
}
