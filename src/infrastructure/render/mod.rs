// ============================================================
// CHART RENDERING
// ============================================================
// Chart layouts drawn as SVG, rasterized to PNG with resvg

mod axis;
mod canvas;
mod charts;
mod png;

pub use charts::ChartData;

use crate::domain::error::Result;

/// Turns one chart description into encoded image bytes
pub trait ChartRenderer {
    fn render(&self, chart: &ChartData<'_>) -> Result<Vec<u8>>;
}

/// Renders 640x480 PNG charts
#[derive(Debug, Clone)]
pub struct PngChartRenderer {
    width: f64,
    height: f64,
    scale: f32,
}

impl Default for PngChartRenderer {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            scale: 1.0,
        }
    }
}

impl PngChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output pixel density multiplier (1.0 = 640x480)
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, chart: &ChartData<'_>) -> Result<Vec<u8>> {
        let svg = charts::render_svg(chart, self.width, self.height)?;
        png::svg_to_png(&svg, self.scale)
    }
}
