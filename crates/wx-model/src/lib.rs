pub mod row;
pub mod summary;

pub use row::{
    CanonicalMetrics, CanonicalRow, DataType, FLAT_COLUMNS, FlatRow, MetricTriple, PIPELINE_TZ,
    SourceTag,
};
pub use summary::FlatSummary;
