//! The voter difficulty pipeline
//!
//! Load → statistics on the raw table → column selection → derivation →
//! voter filter → write. [`transform`] is the in-memory core; [`run`] adds
//! loading and writing.

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use indicatif::ProgressBar;
use log::{info, warn};

use crate::config::PipelineConfig;
use crate::derive::derive_all;
use crate::error::{Result, SurveyError};
use crate::filter::VoterFilter;
use crate::loader::read_survey;
use crate::models::derived::VoterRecord;
use crate::models::respondent::RawRespondent;
use crate::statistics::{StatisticsCollector, SurveyStatistics};
use crate::utils::logging::{create_stage_spinner, finish_progress_bar, log_report};
use crate::writer::{ArtifactPaths, write_artifacts};

/// Everything the pipeline produces before writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Rows of the analytic table, in input order
    pub records: Vec<VoterRecord>,
    /// Statistics on the raw table
    pub statistics: SurveyStatistics,
    /// Respondents removed by the voter filter
    pub excluded: usize,
    /// Retained voters without a voter difficulty level
    pub missing_voter_difficulty: usize,
}

impl PipelineOutput {
    /// Retained respondents who were presumed voters
    #[must_use]
    pub fn presumed_count(&self) -> usize {
        self.records.iter().filter(|r| r.presumed).count()
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Where the artifacts were written
    pub paths: ArtifactPaths,
    /// Rows in the input
    pub respondents: usize,
    /// Rows in the analytic table
    pub voters: usize,
    /// Of which presumed voters
    pub presumed: usize,
}

/// Run the in-memory part of the pipeline on a loaded survey table
pub fn transform(raw_table: &RecordBatch) -> Result<PipelineOutput> {
    let statistics = StatisticsCollector::collect(raw_table)?;

    let respondents = RawRespondent::from_batch(raw_table)?;
    let derived = derive_all(&respondents)?;

    let registration_failures = derived.iter().filter(|d| d.is_registration_failure()).count();
    if registration_failures != statistics.registration_failure_count {
        warn!(
            "Registration failure count mismatch: {registration_failures} derived, {} in statistics",
            statistics.registration_failure_count
        );
    }

    let outcome = VoterFilter::new().apply(derived);

    Ok(PipelineOutput {
        records: outcome.retained,
        statistics,
        excluded: outcome.excluded,
        missing_voter_difficulty: outcome.missing_voter_difficulty,
    })
}

/// Run the full pipeline: load, transform and write both artifacts
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    run_with_progress(config, false)
}

/// Run the full pipeline, optionally showing a stage spinner on the console
pub fn run_with_progress(config: &PipelineConfig, show_progress: bool) -> Result<PipelineReport> {
    let spinner = create_stage_spinner(show_progress);
    run_with_spinner(config, &spinner)
}

/// Run every stage under `spinner`, which is finished whether or not the run succeeds
fn run_with_spinner(config: &PipelineConfig, spinner: &ProgressBar) -> Result<PipelineReport> {
    let result = run_stages(config, spinner);
    match &result {
        Ok(_) => finish_progress_bar(spinner, Some("Done")),
        Err(_) => finish_progress_bar(spinner, None),
    }
    result
}

fn run_stages(config: &PipelineConfig, spinner: &ProgressBar) -> Result<PipelineReport> {
    let start = Instant::now();

    spinner.set_message("Loading survey data");
    let raw_table = read_survey(config.input_path(), Some(config.batch_size))?;

    spinner.set_message("Deriving voter difficulty");
    let output = transform(&raw_table)?;
    log_report(&output.statistics.generate_summary());

    if output.records.is_empty() && config.fail_on_empty_voters {
        return Err(SurveyError::EmptyVoterSet {
            total: raw_table.num_rows(),
        });
    }

    spinner.set_message("Writing artifacts");
    let paths = write_artifacts(config, &output.records, &output.statistics)?;

    let report = PipelineReport {
        paths,
        respondents: raw_table.num_rows(),
        voters: output.records.len(),
        presumed: output.presumed_count(),
    };
    info!(
        "Pipeline finished in {:?}: {} of {} respondents retained ({} presumed voters)",
        start.elapsed(),
        report.voters,
        report.respondents,
        report.presumed
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{SurveyBatchBuilder, respondent};

    #[test]
    fn test_transform_scenarios() {
        let batch = SurveyBatchBuilder::new()
            .push(respondent(1).voted(2))
            .push(respondent(2).not_registered_intending())
            .push(respondent(3).forgot())
            .push(respondent(4).nonresponse())
            .build();

        let output = transform(&batch).unwrap();
        let ids: Vec<i64> = output
            .records
            .iter()
            .filter_map(|r| r.case_id().as_integer())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(output.excluded, 2);
        assert_eq!(output.presumed_count(), 1);
        assert_eq!(output.statistics.total_respondents, 4);
        assert_eq!(output.statistics.registration_failure_count, 1);
    }

    #[test]
    fn test_empty_voter_set_fails_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.parquet");
        let batch = SurveyBatchBuilder::new().push(respondent(1).forgot()).build();
        crate::utils::test::write_parquet(&input, &batch);

        let config = PipelineConfig::new(&input, dir.path().join("out"))
            .with_fail_on_empty_voters(true);
        assert!(matches!(
            run(&config),
            Err(SurveyError::EmptyVoterSet { total: 1 })
        ));

        // Default configuration only warns
        let config = PipelineConfig::new(&input, dir.path().join("out"));
        let report = run(&config).unwrap();
        assert_eq!(report.voters, 0);
        assert!(report.paths.table.is_file());
    }

    #[test]
    fn test_spinner_finished_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path().join("missing.parquet"), dir.path().join("out"));

        let spinner = ProgressBar::hidden();
        assert!(run_with_spinner(&config, &spinner).is_err());
        assert!(spinner.is_finished());

        let input = dir.path().join("survey.parquet");
        let batch = SurveyBatchBuilder::new().push(respondent(1).forgot()).build();
        crate::utils::test::write_parquet(&input, &batch);
        let config = PipelineConfig::new(&input, dir.path().join("out"))
            .with_fail_on_empty_voters(true);

        let spinner = ProgressBar::hidden();
        assert!(run_with_spinner(&config, &spinner).is_err());
        assert!(spinner.is_finished());
    }

    #[test]
    fn test_spinner_finished_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.parquet");
        let batch = SurveyBatchBuilder::new().push(respondent(1).voted(1)).build();
        crate::utils::test::write_parquet(&input, &batch);

        let spinner = ProgressBar::hidden();
        let config = PipelineConfig::new(&input, dir.path().join("out"));
        assert_eq!(run_with_spinner(&config, &spinner).unwrap().voters, 1);
        assert!(spinner.is_finished());
    }
}
