use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// The plotting backend refused a drawing operation.
    #[error("raster drawing failed: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// A single chart could not be captured from the host.
    #[error("capture of chart '{chart_id}' failed: {reason}")]
    Capture { chart_id: String, reason: String },

    #[error("chart '{chart_id}' has a degenerate size {width}x{height}")]
    EmptyImage {
        chart_id: String,
        width: u32,
        height: u32,
    },
}
