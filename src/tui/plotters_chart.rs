//! Plotters-powered sentiment history chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::SentimentChannel;

/// Line segments for one channel. Missing values split a channel into
/// several segments.
pub type ChannelLines = (SentimentChannel, Vec<Vec<(f64, f64)>>);

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct HistoryChart<'a> {
    pub lines: &'a [ChannelLines],
    /// Timestamp label per record index, used for x ticks.
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

/// Label of the record closest to `x`, or empty when out of range.
pub fn label_at(labels: &[String], x: f64) -> String {
    if !x.is_finite() || x < -0.5 {
        return String::new();
    }
    labels.get(x.round() as usize).cloned().unwrap_or_default()
}

impl<'a> Widget for HistoryChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| label_at(self.labels, *v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (channel, segments) in self.lines {
                let (r, g, b) = channel.rgb();
                let color = RGBColor(r, g, b);
                for segment in segments {
                    if let [point] = segment.as_slice() {
                        // A lone value between gaps still deserves a dot.
                        chart.draw_series(std::iter::once(Pixel::new(*point, color)))?;
                    } else {
                        chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup_rounds_to_nearest_record() {
        let labels = vec!["Feb 29, 05:00".to_string(), "Mar 01, 05:00".to_string()];
        assert_eq!(label_at(&labels, 0.2), "Feb 29, 05:00");
        assert_eq!(label_at(&labels, 0.6), "Mar 01, 05:00");
        assert_eq!(label_at(&labels, 5.0), "");
        assert_eq!(label_at(&labels, -3.0), "");
        assert_eq!(label_at(&labels, f64::NAN), "");
    }
}
