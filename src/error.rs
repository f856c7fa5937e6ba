//! Error kinds surfaced by the transform, layout, and rendering stages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A consumption row names a country that the code table does not know.
    #[error("no country name for code `{code}`")]
    MissingCountryName { code: String },

    /// The `Value` column could not be parsed as a number.
    #[error("invalid value `{text}` for {code}/{subject}")]
    InvalidValue {
        code: String,
        subject: String,
        text: String,
    },

    #[error("no country records to chart")]
    EmptyDataset,

    #[error("unknown stacking mode `{0}` (expected stacked, separated, or percentage)")]
    UnknownStackMode(String),

    /// No usable font for the raster/static export path.
    #[error("font unavailable: {0}")]
    Font(String),

    /// A country icon could not be read or rasterized.
    #[error("icon {path}: {reason}")]
    Icon { path: String, reason: String },

    /// Backend failure while drawing with plotters.
    #[error("render failed: {0}")]
    Render(String),
}
