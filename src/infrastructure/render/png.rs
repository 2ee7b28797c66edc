use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};

use crate::domain::error::{AppError, Result};

/// System fonts, loaded once per process.
static FONT_DB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!("Loaded {} font faces for chart text", db.len());
    Arc::new(db)
});

/// Convert an SVG document to PNG bytes, scaling its size by `scale`.
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb = FONT_DB.clone();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| AppError::RenderError(format!("Invalid chart SVG: {}", e)))?;

    let size = tree.size();
    let w = (size.width() * scale).ceil() as u32;
    let h = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| AppError::RenderError(format!("Cannot allocate {}x{} pixmap", w, h)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| AppError::RenderError(format!("PNG encoding failed: {}", e)))
}
