//! File-producing sinks for charts and exported report pages.

pub mod page_sinks;
pub mod svg_chart_sink;

pub use page_sinks::{SvgPageSink, TextPageSink};
pub use svg_chart_sink::SvgChartSink;
