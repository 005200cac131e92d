//! Plain-glyph line charts, one row per year.
//!
//! Values map onto a fixed number of columns. Series are drawn in order, so
//! later series overwrite earlier glyphs that land in the same column.

/// One plotted series. `None` leaves the row untouched for this series.
pub struct Series<'a> {
    pub label: &'a str,
    pub glyph: char,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    width: usize,
}

impl Scale {
    /// Fit the range of `values` onto `width` columns; `None` without values.
    pub fn fit(
        values: impl IntoIterator<Item = f64>,
        width: usize,
        include_zero: bool,
    ) -> Option<Self> {
        let (mut min, mut max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if max - min < f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        Some(Self {
            min,
            max,
            width: width.max(2),
        })
    }

    pub fn column(&self, value: f64) -> usize {
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        (t * (self.width - 1) as f64).round() as usize
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

#[derive(Debug, Clone)]
pub struct Chart {
    pub scale: Scale,
    pub rows: Vec<(i32, String)>,
    pub legend: Vec<(char, String)>,
}

/// Lay out `series` against `years`. Returns `None` when nothing is plottable.
pub fn plot(years: &[i32], series: &[Series<'_>], width: usize, zero_axis: bool) -> Option<Chart> {
    let values = series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied());
    let scale = Scale::fit(values, width, zero_axis)?;

    let axis = zero_axis.then(|| scale.column(0.0));
    let rows = years
        .iter()
        .enumerate()
        .map(|(i, &year)| {
            let mut cells = vec![' '; scale.width()];
            if let Some(col) = axis {
                cells[col] = '|';
            }
            for s in series {
                if let Some(Some(v)) = s.values.get(i) {
                    if v.is_finite() {
                        cells[scale.column(*v)] = s.glyph;
                    }
                }
            }
            (year, cells.into_iter().collect())
        })
        .collect();

    let legend = series.iter().map(|s| (s.glyph, s.label.to_string())).collect();
    Some(Chart {
        scale,
        rows,
        legend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_extremes_to_edges() {
        let scale = Scale::fit([10.0, 20.0], 11, false).unwrap();
        assert_eq!(scale.column(10.0), 0);
        assert_eq!(scale.column(15.0), 5);
        assert_eq!(scale.column(20.0), 10);
        assert_eq!(scale.column(99.0), 10);
    }

    #[test]
    fn flat_values_get_a_unit_range() {
        let scale = Scale::fit([5.0, 5.0], 11, false).unwrap();
        assert_eq!(scale.min, 4.0);
        assert_eq!(scale.max, 6.0);
        assert_eq!(scale.column(5.0), 5);
    }

    #[test]
    fn zero_axis_extends_range() {
        let scale = Scale::fit([20.0, 30.0], 11, true).unwrap();
        assert_eq!(scale.min, 0.0);
        assert_eq!(scale.column(0.0), 0);
    }

    #[test]
    fn no_values_no_scale() {
        assert!(Scale::fit(std::iter::empty(), 10, true).is_none());
    }

    #[test]
    fn later_series_draw_on_top() {
        let chart = plot(
            &[2020, 2021],
            &[
                Series {
                    label: "Gap",
                    glyph: '*',
                    values: vec![Some(0.0), Some(10.0)],
                },
                Series {
                    label: "Anomaly",
                    glyph: '!',
                    values: vec![None, Some(10.0)],
                },
            ],
            11,
            false,
        )
        .unwrap();

        assert_eq!(chart.rows[0], (2020, "*          ".to_string()));
        assert_eq!(chart.rows[1], (2021, "          !".to_string()));
        assert_eq!(chart.legend[1], ('!', "Anomaly".to_string()));
    }

    #[test]
    fn zero_axis_is_drawn_beneath_values() {
        let chart = plot(
            &[2020],
            &[Series {
                label: "Gap",
                glyph: '*',
                values: vec![Some(-5.0)],
            }],
            11,
            true,
        )
        .unwrap();
        // Range is [-5, 0]: value at the left edge, axis at the right.
        assert_eq!(chart.rows[0].1, "*         |");
    }
}
