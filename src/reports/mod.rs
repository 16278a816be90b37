pub mod aggregator;
pub mod report_service;
pub mod series_builder;
pub mod series_model;

#[cfg(test)]
mod series_builder_tests;

pub use aggregator::{aggregate_series, AggregateInput};
pub use report_service::{ReportService, ReportServiceTrait};
pub use series_builder::build_daily_series;
pub use series_model::{
    AggregateReport, AggregateSummary, DailySeriesPoint, HeaderMetrics, VaultSummaryRow,
    VaultsSummary,
};
