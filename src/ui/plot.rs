use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Line, LineStyle, Plot, PlotPoint, PlotPoints, Text, VLine};

use crate::color;
use crate::encode::distribution::DistributionSummary;

/// Vertical position of the median label, as a fraction of the y range.
const MEDIAN_LABEL_AT: f64 = 0.95;
/// The patient label sits just below the median label.
const MARKER_LABEL_AT: f64 = 0.90;

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Distribution row (three histograms, left to right)
// ---------------------------------------------------------------------------

pub fn distribution_row(ui: &mut Ui, distributions: &[DistributionSummary; 3]) {
    ui.columns(3, |cols: &mut [Ui]| {
        for (col, summary) in cols.iter_mut().zip(distributions.iter()) {
            distribution_plot(col, summary);
        }
    });
}

/// Histogram with density overlay, median line and optional patient line.
pub fn distribution_plot(ui: &mut Ui, summary: &DistributionSummary) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(summary.title());
    });

    let histogram = summary.histogram();
    let bars: Vec<Bar> = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(histogram.bin_center(i), count as f64).width(histogram.bin_width)
        })
        .collect();
    let density = summary.density_curve(&histogram);

    let peak = density
        .iter()
        .map(|p| p[1])
        .fold(histogram.max_count() as f64, f64::max);
    let y_top = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    Plot::new(format!("distribution_{}", summary.column))
        .height(PLOT_HEIGHT)
        .x_axis_label(summary.column.as_str())
        .y_axis_label("Count")
        .include_y(0.0)
        .include_y(y_top)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::bar_color()));

            if !density.is_empty() {
                let points: PlotPoints = density.into_iter().collect();
                plot_ui.line(Line::new(points).color(color::density_color()).width(1.5));
            }

            plot_ui.vline(
                VLine::new(summary.median)
                    .color(color::median_color())
                    .style(LineStyle::dashed_loose())
                    .width(1.5),
            );
            plot_ui.text(
                Text::new(
                    PlotPoint::new(summary.median, y_top * MEDIAN_LABEL_AT),
                    RichText::new(summary.median_label()).color(color::median_color()),
                )
                .anchor(Align2::RIGHT_BOTTOM),
            );

            if let (Some(value), Some(label)) = (summary.marker_value, summary.marker_label()) {
                plot_ui.vline(VLine::new(value).color(color::marker_color()).width(1.5));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(value, y_top * MARKER_LABEL_AT),
                        RichText::new(label).color(color::marker_color()),
                    )
                    .anchor(Align2::RIGHT_BOTTOM),
                );
            }
        });
}
