// ============================================================
// CHART LAYOUTS
// ============================================================
// One SVG layout per chart kind: line, bar, scatter, histogram

use crate::domain::chart::ChartKind;
use crate::domain::error::{AppError, Result};

use super::axis::{extent, Axis};
use super::canvas::{Anchor, Canvas, TextStyle};

const SERIES_COLOR: &str = "#1f77b4";
const FRAME_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#e5e5e5";

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 56.0;

/// Number of histogram buckets
const HIST_BINS: usize = 10;

/// Input for one chart: a column's values plus, for scatter charts,
/// the named column used as x axis.
#[derive(Debug, Clone, Copy)]
pub struct ChartData<'a> {
    pub kind: ChartKind,
    pub column: &'a str,
    pub values: &'a [f64],
    pub x_axis: Option<(&'a str, &'a [f64])>,
}

/// Pixel rectangle of the plotting area
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn for_canvas(canvas: &Canvas) -> Self {
        Self {
            left: MARGIN_LEFT,
            right: canvas.width - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: canvas.height - MARGIN_BOTTOM,
        }
    }

    fn x(&self, axis: &Axis, value: f64) -> f64 {
        axis.data_to_pixel(value, self.left, self.right)
    }

    fn y(&self, axis: &Axis, value: f64) -> f64 {
        axis.data_to_pixel(value, self.bottom, self.top)
    }
}

pub fn render_svg(chart: &ChartData<'_>, width: f64, height: f64) -> Result<String> {
    let mut canvas = Canvas::new(width, height);
    match chart.kind {
        ChartKind::Line => draw_line(&mut canvas, chart),
        ChartKind::Bar => draw_bar(&mut canvas, chart),
        ChartKind::Scatter => draw_scatter(&mut canvas, chart)?,
        ChartKind::Hist => draw_hist(&mut canvas, chart),
    }
    Ok(canvas.finish_svg())
}

fn value_axis(values: &[f64], include_zero: bool) -> Axis {
    let (mut lo, mut hi) = extent(values).unwrap_or((0.0, 1.0));
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    Axis::auto_linear(lo, hi, 6)
}

fn draw_line(canvas: &mut Canvas, chart: &ChartData<'_>) {
    let frame = Frame::for_canvas(canvas);
    let last = chart.values.len().saturating_sub(1) as f64;
    let x_axis = Axis::auto_linear(0.0, last, 8);
    let y_axis = value_axis(chart.values, false);
    draw_axes(canvas, &frame, &x_axis, &y_axis, &chart.kind.title(chart.column));

    let points: Vec<(f64, f64)> = chart
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (frame.x(&x_axis, i as f64), frame.y(&y_axis, *v)))
        .collect();
    if points.len() == 1 {
        canvas.circle(points[0].0, points[0].1, 2.5, SERIES_COLOR);
    } else {
        canvas.polyline(&points, SERIES_COLOR, 1.5);
    }
}

fn draw_bar(canvas: &mut Canvas, chart: &ChartData<'_>) {
    let frame = Frame::for_canvas(canvas);
    let x_axis = Axis::categorical(chart.values.len());
    let y_axis = value_axis(chart.values, true);
    draw_axes(canvas, &frame, &x_axis, &y_axis, &chart.kind.title(chart.column));

    let baseline = frame.y(&y_axis, 0.0);
    for (i, v) in chart.values.iter().enumerate() {
        let x0 = frame.x(&x_axis, i as f64 - 0.25);
        let x1 = frame.x(&x_axis, i as f64 + 0.25);
        let top = frame.y(&y_axis, *v);
        canvas.rect(
            x0,
            top.min(baseline),
            (x1 - x0).max(0.5),
            (baseline - top).abs(),
            SERIES_COLOR,
            None,
        );
    }
}

fn draw_scatter(canvas: &mut Canvas, chart: &ChartData<'_>) -> Result<()> {
    let (x_name, xs) = chart.x_axis.ok_or_else(|| {
        AppError::RenderError(format!("Scatter plot for '{}' has no x column", chart.column))
    })?;
    if xs.len() != chart.values.len() {
        return Err(AppError::RenderError(format!(
            "Scatter plot for '{}' has {} x values and {} y values",
            chart.column,
            xs.len(),
            chart.values.len()
        )));
    }

    let frame = Frame::for_canvas(canvas);
    let x_axis = value_axis(xs, false).with_label(x_name);
    let y_axis = value_axis(chart.values, false).with_label(chart.column);
    draw_axes(canvas, &frame, &x_axis, &y_axis, &chart.kind.title(chart.column));

    for (x, y) in xs.iter().zip(chart.values) {
        canvas.circle(frame.x(&x_axis, *x), frame.y(&y_axis, *y), 3.5, SERIES_COLOR);
    }
    Ok(())
}

fn draw_hist(canvas: &mut Canvas, chart: &ChartData<'_>) {
    let frame = Frame::for_canvas(canvas);
    let (edges, counts) = histogram(chart.values, HIST_BINS);
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let x_axis = Axis::auto_linear(edges[0], edges[HIST_BINS], 8);
    let y_axis = Axis::auto_linear(0.0, max_count as f64, 6).with_label("Frequency");
    draw_axes(canvas, &frame, &x_axis, &y_axis, &chart.kind.title(chart.column));

    let baseline = frame.y(&y_axis, 0.0);
    for (i, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let x0 = frame.x(&x_axis, edges[i]);
        let x1 = frame.x(&x_axis, edges[i + 1]);
        let top = frame.y(&y_axis, *count as f64);
        canvas.rect(
            x0,
            top,
            (x1 - x0).max(0.5),
            baseline - top,
            SERIES_COLOR,
            Some("#ffffff"),
        );
    }
}

/// Equal-width histogram over the finite values.
///
/// Returns `bins + 1` edges and `bins` counts. The last bucket is closed on
/// the right. A constant column spans `[v - 0.5, v + 0.5]` (widened to 5% of
/// `v` where 0.5 is below the float resolution), an empty one `[0, 1]`.
fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let bins = bins.max(1);
    let (lo, hi) = match extent(values) {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => {
            let pad = if lo - 0.5 < lo { 0.5 } else { lo.abs() * 0.05 };
            ((lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX))
        }
        Some(range) => range,
    };

    let span = hi - lo;
    let width = if span.is_finite() {
        span / bins as f64
    } else {
        hi / bins as f64 - lo / bins as f64
    };
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0usize; bins];
    for v in values.iter().filter(|v| v.is_finite()) {
        let offset = v - lo;
        let position = if offset.is_finite() {
            offset / width
        } else {
            v / width - lo / width
        };
        let idx = (position.floor().max(0.0) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (edges, counts)
}

fn draw_axes(canvas: &mut Canvas, frame: &Frame, x_axis: &Axis, y_axis: &Axis, title: &str) {
    let tick_style = TextStyle {
        size: 10.0,
        ..TextStyle::default()
    };

    for (pos, label) in y_axis.tick_positions.iter().zip(&y_axis.tick_labels) {
        let y = frame.y(y_axis, *pos);
        canvas.line(frame.left, y, frame.right, y, GRID_COLOR, 0.8);
        canvas.line(frame.left - 4.0, y, frame.left, y, FRAME_COLOR, 0.8);
        canvas.text(
            frame.left - 7.0,
            y + 3.5,
            label,
            &TextStyle {
                anchor: Anchor::End,
                ..tick_style.clone()
            },
        );
    }

    for (pos, label) in x_axis.tick_positions.iter().zip(&x_axis.tick_labels) {
        let x = frame.x(x_axis, *pos);
        canvas.line(x, frame.bottom, x, frame.bottom + 4.0, FRAME_COLOR, 0.8);
        canvas.text(x, frame.bottom + 16.0, label, &tick_style);
    }

    canvas.rect(
        frame.left,
        frame.top,
        frame.right - frame.left,
        frame.bottom - frame.top,
        "none",
        Some(FRAME_COLOR),
    );

    canvas.text(
        (frame.left + frame.right) / 2.0,
        frame.top - 16.0,
        title,
        &TextStyle {
            size: 13.0,
            bold: true,
            ..TextStyle::default()
        },
    );

    if !x_axis.label.is_empty() {
        canvas.text(
            (frame.left + frame.right) / 2.0,
            frame.bottom + 40.0,
            &x_axis.label,
            &TextStyle::default(),
        );
    }
    if !y_axis.label.is_empty() {
        let x = frame.left - 52.0;
        let y = (frame.top + frame.bottom) / 2.0;
        canvas.text_rotated(x, y, &y_axis.label, &TextStyle::default(), -90.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart<'a>(kind: ChartKind, values: &'a [f64]) -> ChartData<'a> {
        ChartData {
            kind,
            column: "A",
            values,
            x_axis: None,
        }
    }

    #[test]
    fn histogram_ten_buckets() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let (edges, counts) = histogram(&values, HIST_BINS);

        assert_eq!(edges.len(), 11);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[10], 10.0);
        // Max value falls into the last, right-closed bucket
        assert_eq!(counts, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 2]);
    }

    #[test]
    fn histogram_constant_and_empty() {
        let (edges, counts) = histogram(&[3.0, 3.0], HIST_BINS);
        assert_eq!(edges[0], 2.5);
        assert_eq!(edges[10], 3.5);
        assert_eq!(counts.iter().sum::<usize>(), 2);
        assert_eq!(counts[5], 2);

        let (edges, counts) = histogram(&[], HIST_BINS);
        assert_eq!((edges[0], edges[10]), (0.0, 1.0));
        assert!(counts.iter().all(|c| *c == 0));
    }

    #[test]
    fn histogram_extreme_magnitudes() {
        let (edges, counts) = histogram(&[1e25, 1e25], HIST_BINS);
        assert!(edges[0] < 1e25 && edges[HIST_BINS] > 1e25);
        assert_eq!(counts.iter().sum::<usize>(), 2);

        let (edges, counts) = histogram(&[-1.7e308, 0.0, 1.7e308], HIST_BINS);
        assert!(edges.iter().all(|e| e.is_finite()));
        assert_eq!(counts[0], 1);
        assert_eq!(counts[HIST_BINS - 1], 1);
        assert_eq!(counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn extreme_values_render_finite_coordinates() {
        let constant = [1e25; 4];
        let spread = [-1.7e308, 0.0, 1.7e308];
        for values in [&constant[..], &spread[..]] {
            for kind in ChartKind::ALL {
                let mut data = chart(kind, values);
                data.x_axis = Some(("X", values));
                let svg = render_svg(&data, 640.0, 480.0).unwrap();
                assert!(!svg.contains("NaN") && !svg.contains("inf"), "{} chart", kind);
            }
        }
    }

    #[test]
    fn every_kind_renders_title() {
        let values = [1.0, 2.0, 3.0];
        for kind in ChartKind::ALL {
            let mut data = chart(kind, &values);
            data.x_axis = Some(("X", &values[..]));
            let svg = render_svg(&data, 640.0, 480.0).unwrap();
            assert!(svg.contains(&kind.title("A")), "missing title for {}", kind);
        }
    }

    #[test]
    fn scatter_requires_matching_x_column() {
        let values = [1.0, 2.0];
        let missing = render_svg(&chart(ChartKind::Scatter, &values), 640.0, 480.0);
        assert!(matches!(missing, Err(AppError::RenderError(_))));

        let short = [1.0];
        let mut data = chart(ChartKind::Scatter, &values);
        data.x_axis = Some(("X", &short[..]));
        assert!(matches!(
            render_svg(&data, 640.0, 480.0),
            Err(AppError::RenderError(_))
        ));
    }

    #[test]
    fn empty_and_single_value_columns_render() {
        assert!(render_svg(&chart(ChartKind::Line, &[]), 640.0, 480.0).is_ok());
        assert!(render_svg(&chart(ChartKind::Bar, &[]), 640.0, 480.0).is_ok());
        let single = render_svg(&chart(ChartKind::Line, &[4.0]), 640.0, 480.0).unwrap();
        assert!(single.contains("<circle"));
    }

    #[test]
    fn bar_chart_draws_one_bar_per_row() {
        let svg = render_svg(&chart(ChartKind::Bar, &[1.0, -2.0, 3.0]), 640.0, 480.0).unwrap();
        let bars = svg.matches(&format!(r#"fill="{}""#, SERIES_COLOR)).count();
        assert_eq!(bars, 3);
    }
}
