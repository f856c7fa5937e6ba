//! Rasterize country icons (SVG files) for surfaces without a vector path,
//! such as the desktop viewer.

use std::fs;
use std::path::Path;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::ChartError;

/// Premultiplied RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Render the SVG at `path` so its longer side is `size_px`, keeping the
/// aspect ratio.
pub fn rasterize_icon<P: AsRef<Path>>(path: P, size_px: u32) -> Result<IconImage, ChartError> {
    let path = path.as_ref();
    let icon_err = |reason: String| ChartError::Icon {
        path: path.display().to_string(),
        reason,
    };
    let data = fs::read(path).map_err(|e| icon_err(e.to_string()))?;
    let tree = Tree::from_data(&data, &Options::default()).map_err(|e| icon_err(e.to_string()))?;

    let size = tree.size();
    let scale = size_px.max(1) as f32 / size.width().max(size.height());
    let width = ((size.width() * scale).round() as u32).max(1);
    let height = ((size.height() * scale).round() as u32).max(1);
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| icon_err(format!("cannot allocate {width}x{height} pixmap")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(IconImage {
        width,
        height,
        rgba: pixmap.take(),
    })
}
