use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembler::TripleAssembler;
use crate::batch::{Batch, BatchGrouper, FinalBatchPolicy};
use crate::clock::Clock;
use crate::config::ExtractConfig;
use crate::emitter::TabularEmitter;
use crate::error::{ExtractError, Result};
use crate::interpolate::interpolate;
use crate::model::{EcgSample, RawRow, Sample};
use crate::record_source::{prepare_rows, query_rows, VitalStore};
use crate::signal::SignalKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOptions {
    pub clock: Clock,
    pub final_batch: FinalBatchPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Batches interpolated and written, including a flushed final batch.
    pub batches: usize,
    pub samples_written: usize,
    /// Size of the last batch, written only under [`FinalBatchPolicy::Flush`].
    pub final_batch_samples: usize,
    pub final_batch_flushed: bool,
    /// Accelerometer rows left over after the last complete triple.
    pub dropped_rows: usize,
}

/// Groups samples into batches, interpolates each closed batch and appends it
/// to `emitter`. Stops at the first error.
pub fn run_batches<S, I, W>(
    samples: I,
    emitter: &mut TabularEmitter<W, S>,
    opts: StreamOptions,
) -> Result<StreamSummary>
where
    S: Sample,
    I: Iterator<Item = Result<S>>,
    W: Write,
{
    let mut grouper = BatchGrouper::new();
    let mut summary = StreamSummary::default();

    for sample in samples {
        if let Some(batch) = grouper.push(sample?) {
            emit_batch(batch, emitter, opts.clock, &mut summary)?;
        }
    }

    summary.final_batch_samples = grouper.pending_len();
    if let Some(batch) = grouper.finish(opts.final_batch) {
        emit_batch(batch, emitter, opts.clock, &mut summary)?;
        summary.final_batch_flushed = true;
    }
    Ok(summary)
}

fn emit_batch<S: Sample, W: Write>(
    mut batch: Batch<S>,
    emitter: &mut TabularEmitter<W, S>,
    clock: Clock,
    summary: &mut StreamSummary,
) -> Result<()> {
    interpolate(&mut batch.samples, batch.begin, batch.end, clock)?;
    emitter.append(&batch.samples)?;
    tracing::debug!(
        begin = batch.begin,
        end = batch.end,
        count = batch.samples.len(),
        "Batch emitted"
    );
    summary.batches += 1;
    summary.samples_written += batch.samples.len();
    Ok(())
}

/// Full chain for one signal: raw rows in, CSV out. Returns the writer after
/// flushing so callers can inspect in-memory output.
pub fn run_stream<I, W>(
    kind: SignalKind,
    rows: I,
    out: W,
    opts: StreamOptions,
) -> Result<(StreamSummary, W)>
where
    I: Iterator<Item = Result<RawRow>>,
    W: Write,
{
    match kind {
        SignalKind::Ecg => {
            let mut emitter = TabularEmitter::new(out)?;
            let samples = rows.map(|row| row.and_then(|r| EcgSample::from_row(&r, opts.clock)));
            let summary = run_batches(samples, &mut emitter, opts)?;
            Ok((summary, emitter.finish()?))
        }
        SignalKind::Accel => {
            let mut emitter = TabularEmitter::new(out)?;
            let mut assembler = TripleAssembler::new(rows, opts.clock);
            let mut summary = run_batches(assembler.by_ref(), &mut emitter, opts)?;
            summary.dropped_rows = assembler.dropped_rows();
            Ok((summary, emitter.finish()?))
        }
    }
}

/// Worker body: own connection, own statement, own output file.
pub fn extract_signal(
    store: &VitalStore,
    kind: SignalKind,
    output: &Path,
    opts: StreamOptions,
) -> Result<StreamSummary> {
    let conn = store.connect()?;
    let mut stmt = prepare_rows(&conn)?;
    let file = File::create(output).map_err(|e| ExtractError::access(output, e))?;
    let rows = query_rows(&mut stmt, kind)?;
    tracing::info!(signal = %kind, output = %output.display(), "Stream started");
    let (summary, file) = run_stream(kind, rows, file, opts)?;
    file.sync_all().map_err(|e| ExtractError::access(output, e))?;
    Ok(summary)
}

#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub kind: SignalKind,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct StreamOutcome {
    pub kind: SignalKind,
    pub output: PathBuf,
    pub result: Result<StreamSummary>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<StreamOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn outcome(&self, kind: SignalKind) -> Option<&StreamOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }
}

/// Runs every job on its own blocking worker and waits for all of them.
///
/// A failing stream does not stop its siblings; its error is carried back
/// in the report.
pub async fn run_jobs(
    store: Arc<VitalStore>,
    jobs: Vec<ExtractJob>,
    opts: StreamOptions,
) -> RunReport {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let store = Arc::clone(&store);
            let kind = job.kind;
            let output = job.output.clone();
            let handle =
                tokio::task::spawn_blocking(move || extract_signal(&store, kind, &output, opts));
            (job, handle)
        })
        .collect();

    let mut report = RunReport::default();
    for (job, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ExtractError::Worker(e)),
        };
        match &result {
            Ok(summary) => tracing::info!(
                signal = %job.kind,
                batches = summary.batches,
                samples = summary.samples_written,
                final_batch_samples = summary.final_batch_samples,
                final_batch_flushed = summary.final_batch_flushed,
                dropped_rows = summary.dropped_rows,
                "Stream finished"
            ),
            Err(e) => tracing::error!(
                signal = %job.kind,
                output = %job.output.display(),
                error = %e,
                "Stream failed"
            ),
        }
        report.outcomes.push(StreamOutcome {
            kind: job.kind,
            output: job.output,
            result,
        });
    }
    report
}

/// Opens the input database and extracts both signals concurrently.
pub async fn extract(config: &ExtractConfig) -> Result<RunReport> {
    let store = Arc::new(VitalStore::open(&config.input)?);
    let jobs = SignalKind::ALL
        .into_iter()
        .map(|kind| ExtractJob {
            kind,
            output: config.output_path(kind),
        })
        .collect();
    Ok(run_jobs(store, jobs, config.stream_options()).await)
}
