use std::io::Write;
use std::marker::PhantomData;

use crate::error::{ExtractError, Result};
use crate::model::Sample;

/// Append-only CSV output for one stream. The header is written on
/// construction, rows follow batch by batch.
pub struct TabularEmitter<W: Write, S> {
    writer: csv::Writer<W>,
    rows_written: usize,
    _sample: PhantomData<fn(&S)>,
}

impl<W: Write, S: Sample> TabularEmitter<W, S> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(S::HEADER)?;
        Ok(Self {
            writer,
            rows_written: 0,
            _sample: PhantomData,
        })
    }

    pub fn append(&mut self, samples: &[S]) -> Result<()> {
        for sample in samples {
            self.writer.serialize(sample)?;
        }
        self.rows_written += samples.len();
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes buffered rows and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ExtractError::Write(e.into_error().into()))
    }
}
