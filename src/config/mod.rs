//! Configuration for the voter difficulty pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

/// Default location of the survey extract
pub const DEFAULT_INPUT_PATH: &str = "data/survey.parquet";

/// Default directory receiving both artifacts
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default file name of the analytic table
pub const DEFAULT_TABLE_FILE: &str = "voter_difficulty.parquet";

/// Default file name of the statistics bundle
pub const DEFAULT_STATISTICS_FILE: &str = "voter_difficulty_statistics.json";

/// Default number of rows per batch when reading Parquet
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Survey extract to read
    pub input_path: PathBuf,
    /// Directory that receives both artifacts
    pub output_dir: PathBuf,
    /// File name of the analytic table inside `output_dir`
    pub table_file_name: String,
    /// File name of the statistics bundle inside `output_dir`
    pub statistics_file_name: String,
    /// Rows per batch when reading the input
    pub batch_size: usize,
    /// Abort instead of warning when no respondent survives the voter filter
    pub fail_on_empty_voters: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            table_file_name: DEFAULT_TABLE_FILE.to_string(),
            statistics_file_name: DEFAULT_STATISTICS_FILE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            fail_on_empty_voters: false,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration for the given input file and output directory
    #[must_use]
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the reader batch size (zero is replaced by the default)
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        self
    }

    /// Make an empty voter set fatal
    #[must_use]
    pub const fn with_fail_on_empty_voters(mut self, fail: bool) -> Self {
        self.fail_on_empty_voters = fail;
        self
    }

    /// Full path of the analytic table
    #[must_use]
    pub fn table_path(&self) -> PathBuf {
        self.output_dir.join(&self.table_file_name)
    }

    /// Full path of the statistics bundle
    #[must_use]
    pub fn statistics_path(&self) -> PathBuf {
        self.output_dir.join(&self.statistics_file_name)
    }

    /// The input file
    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Input: {}", self.input_path.display())?;
        writeln!(f, "  Output Directory: {}", self.output_dir.display())?;
        writeln!(f, "  Table: {}", self.table_file_name)?;
        writeln!(f, "  Statistics: {}", self.statistics_file_name)?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        write!(f, "  Fail On Empty Voter Set: {}", self.fail_on_empty_voters)
    }
}
