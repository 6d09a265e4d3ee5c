//! Report writing port.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::QuantlabError;
use crate::domain::strategy::StrategyParams;

/// Port for writing the augmented per-bar table of an analysis run.
pub trait ReportPort {
    fn write(
        &self,
        report: &AnalysisReport,
        params: &StrategyParams,
        output_path: &str,
    ) -> Result<(), QuantlabError>;
}
