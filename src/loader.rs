//! Survey file loading

use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::Result;
use crate::error::util::safe_open_file;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Read a survey extract into a single record batch
///
/// All columns are read; projection to the source columns happens in the
/// column selector so that statistics can still see the full raw table.
pub fn read_survey(path: &Path, batch_size: Option<usize>) -> Result<RecordBatch> {
    log_operation_start("Reading survey data from", path);
    let start = Instant::now();

    let file = safe_open_file(path, "reading survey data")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_size.unwrap_or(DEFAULT_BATCH_SIZE))
        .build()?;
    let schema = reader.schema();

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let table = concat_batches(&schema, &batches)?;

    log_operation_complete("read", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}
