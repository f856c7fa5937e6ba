//! Public types for the visualization module.

use std::path::Path;

/// Output formats a chart can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Scene SVG with SMIL bar transitions and icons.
    AnimatedSvg,
    /// Plotters-drawn SVG (no icons, no animation).
    StaticSvg,
    /// Plotters-drawn bitmap.
    Png,
    /// HTML page with the stacking toggle and one chart per mode.
    Html,
}

impl OutputKind {
    /// Infer from the file extension. `static_svg` selects the plotters SVG path.
    pub fn from_path(path: &Path, static_svg: bool) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" if static_svg => Some(OutputKind::StaticSvg),
            "svg" => Some(OutputKind::AnimatedSvg),
            "png" => Some(OutputKind::Png),
            "html" | "htm" => Some(OutputKind::Html),
            _ => None,
        }
    }
}
