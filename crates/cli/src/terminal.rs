use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use civdash_compute::Dashboard;
use civdash_core::AnnotatedPoint;

use crate::chart::{plot, Chart, Series};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const DIM: Color = Color::DarkGrey;
    const METRIC: Color = Color::Cyan;
    const ALERT: Color = Color::Red;
    const FEMALE: Color = Color::Yellow;
    const MALE: Color = Color::Blue;
    const ERROR: Color = Color::Red;
}

const TITLE: &str = "Civil Society Dashboard (MVP)";
const CAPTION: &str = "Open data → simple model signals → explainable visuals";

/// Renders dashboards to stdout.
pub struct Terminal {
    chart_width: usize,
}

impl Terminal {
    pub fn new(chart_width: usize) -> Self {
        Self { chart_width }
    }

    /// Clear the screen before a watch-mode redraw.
    pub fn clear(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    pub fn render(&self, dash: &Dashboard) -> Result<()> {
        self.print_header()?;
        self.print_metrics(dash)?;
        self.print_rule()?;
        self.print_participation_chart(&dash.points)?;
        self.print_gap_chart(&dash.points)?;
        self.print_table(&dash.points)?;
        Ok(())
    }

    fn print_header(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", TITLE)),
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n\n", CAPTION)),
            ResetColor,
        )?;
        Ok(())
    }

    fn print_metrics(&self, dash: &Dashboard) -> Result<()> {
        let h = &dash.headline;
        let anomaly_color = if h.latest_is_anomaly {
            Colors::ALERT
        } else {
            Colors::METRIC
        };
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<24}{:<28}{}\n",
                "Latest year", "Latest gender gap (M−F)", "Anomaly flagged?"
            )),
            SetForegroundColor(Colors::METRIC),
            Print(format!("{:<24}{:<28}", h.latest_year, h.gap_label())),
            SetForegroundColor(anomaly_color),
            Print(format!("{}\n", h.anomaly_label())),
            ResetColor,
        )?;
        Ok(())
    }

    fn print_rule(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", "─".repeat(self.chart_width + 8))),
            ResetColor,
        )?;
        Ok(())
    }

    fn print_participation_chart(&self, points: &[AnnotatedPoint]) -> Result<()> {
        let years: Vec<i32> = points.iter().map(|p| p.year).collect();
        let chart = plot(
            &years,
            &[
                Series {
                    label: "Female (%)",
                    glyph: 'F',
                    values: points.iter().map(|p| Some(p.female)).collect(),
                },
                Series {
                    label: "Male (%)",
                    glyph: 'M',
                    values: points.iter().map(|p| Some(p.male)).collect(),
                },
            ],
            self.chart_width,
            false,
        );
        self.print_chart(
            "Labour force participation rate (15+): Female vs Male",
            chart.as_ref(),
            "Rate (%)",
        )
    }

    fn print_gap_chart(&self, points: &[AnnotatedPoint]) -> Result<()> {
        let years: Vec<i32> = points.iter().map(|p| p.year).collect();
        let chart = plot(
            &years,
            &[
                Series {
                    label: "Gap (M−F)",
                    glyph: '*',
                    values: points.iter().map(|p| Some(p.gap)).collect(),
                },
                Series {
                    label: "Trend (rolling avg)",
                    glyph: '~',
                    values: points.iter().map(|p| Some(p.trend)).collect(),
                },
                Series {
                    label: "Anomaly",
                    glyph: '!',
                    values: points
                        .iter()
                        .map(|p| p.is_anomaly.then_some(p.gap))
                        .collect(),
                },
            ],
            self.chart_width,
            true,
        );
        self.print_chart(
            "Gender gap (M−F) with trend + anomaly flags",
            chart.as_ref(),
            "Gap (percentage points)",
        )
    }

    fn print_chart(&self, title: &str, chart: Option<&Chart>, unit: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", title)),
            ResetColor,
        )?;

        let Some(chart) = chart else {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print("(no data)\n"),
                ResetColor,
            )?;
            return Ok(());
        };

        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(axis_label(chart, unit)),
            ResetColor,
        )?;
        for (year, cells) in &chart.rows {
            execute!(stdout, Print(format!("{:>6} ", year)))?;
            for c in cells.chars() {
                let color = match c {
                    'F' => Some(Colors::FEMALE),
                    'M' => Some(Colors::MALE),
                    '!' => Some(Colors::ALERT),
                    '~' => Some(Colors::METRIC),
                    '|' => Some(Colors::DIM),
                    _ => None,
                };
                match color {
                    Some(color) => execute!(
                        stdout,
                        SetForegroundColor(color),
                        Print(c),
                        ResetColor
                    )?,
                    None => execute!(stdout, Print(c))?,
                }
            }
            execute!(stdout, Print("\n"))?;
        }

        let legend = chart
            .legend
            .iter()
            .map(|(glyph, label)| format!("{} {}", glyph, label))
            .collect::<Vec<_>>()
            .join("   ");
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("       {}\n", legend)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn print_table(&self, points: &[AnnotatedPoint]) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::HEADER),
            Print("Underlying data\n"),
            ResetColor,
        )?;
        for (i, line) in table_lines(points).iter().enumerate() {
            let flagged = i > 0 && points.get(i - 1).is_some_and(|p| p.is_anomaly);
            if i == 0 {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print(line),
                    Print("\n"),
                    ResetColor
                )?;
            } else if flagged {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::ALERT),
                    Print(line),
                    Print("\n"),
                    ResetColor
                )?;
            } else {
                execute!(stdout, Print(line), Print("\n"))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Min/max labels above a chart's plotting area.
fn axis_label(chart: &Chart, unit: &str) -> String {
    let lo = format!("{:.1}", chart.scale.min);
    let hi = format!("{:.1}", chart.scale.max);
    let pad = chart.scale.width().saturating_sub(lo.len() + hi.len());
    format!("{:>6} {}{}{}   {}\n", "", lo, " ".repeat(pad), hi, unit)
}

/// Header line followed by one line per point.
pub fn table_lines(points: &[AnnotatedPoint]) -> Vec<String> {
    let mut lines = Vec::with_capacity(points.len() + 1);
    lines.push(format!(
        "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "year", "female", "male", "gap", "trend", "anomaly"
    ));
    for p in points {
        lines.push(format!(
            "{:>6} {:>8.1} {:>8.1} {:>8.1} {:>8.2} {:>8}",
            p.year, p.female, p.male, p.gap, p.trend, p.is_anomaly
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use civdash_core::TimeSeriesPoint;

    #[test]
    fn table_has_header_and_rows() {
        let points = vec![
            AnnotatedPoint::from_point(&TimeSeriesPoint::new(2020, 40.0, 70.0), 30.0, true),
            AnnotatedPoint::from_point(&TimeSeriesPoint::new(2021, 44.0, 70.5), 28.25, false),
        ];
        let lines = table_lines(&points);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("anomaly"));
        assert!(lines[1].starts_with("  2020"));
        assert!(lines[1].ends_with("true"));
        assert!(lines[2].contains("26.5"));
        assert!(lines[2].ends_with("false"));
    }

    #[test]
    fn axis_label_spans_chart_width() {
        let chart = plot(
            &[2020],
            &[Series {
                label: "x",
                glyph: '*',
                values: vec![Some(10.0)],
            }],
            20,
            true,
        )
        .unwrap();
        let label = axis_label(&chart, "pp");
        assert!(label.contains("0.0"));
        assert!(label.contains("10.0"));
        assert!(label.trim_end().ends_with("pp"));
    }
}
