//! Presentation adapter: display frames, wide-to-long reshaping, chart
//! rendering and the assembled dashboard document.

mod chart;
mod dashboard;
mod format;
mod frame;
mod long_form;
mod svg;

use thiserror::Error;

use crate::core::ProjectionError;

pub use chart::{
    CHART_HEIGHT, CHART_WIDTH, ChartPoint, ChartSeries, ChartSurface, PALETTE, SeriesChart,
    render_series_chart,
};
pub use dashboard::{Assumption, Dashboard, Section, build_dashboard};
pub use format::{format_cell, format_grouped, format_percent};
pub use frame::{Frame, FrameColumn, ValueKind, columns, macro_frame, personal_frame};
pub use long_form::{LongRecord, to_long_form};
pub use svg::{SvgSurface, chart_to_svg};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("column `{name}` has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
