use crate::model::Sample;

const BATCH_CAPACITY: usize = 200;

/// What to do with the last batch of a stream, which never sees a later
/// timestamp to close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalBatchPolicy {
    /// Leave it out of the output.
    #[default]
    Drop,
    /// Emit it with `end == begin`, so every sample gets the coarse second.
    Flush,
}

/// Samples sharing one coarse timestamp, closed by the next boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<S> {
    pub begin: i64,
    pub end: i64,
    pub samples: Vec<S>,
}

/// Splits an ordered sample stream into [`Batch`]es by coarse timestamp.
#[derive(Debug)]
pub struct BatchGrouper<S> {
    boundary: Option<i64>,
    pending: Vec<S>,
}

impl<S: Sample> Default for BatchGrouper<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> BatchGrouper<S> {
    pub fn new() -> Self {
        Self {
            boundary: None,
            pending: Vec::with_capacity(BATCH_CAPACITY),
        }
    }

    /// Adds a sample, returning the previous batch if this sample opens a new one.
    ///
    /// A timestamp lower than the current boundary stays in the current batch.
    pub fn push(&mut self, sample: S) -> Option<Batch<S>> {
        let ts = sample.coarse_timestamp();
        let closed = match self.boundary {
            Some(begin) if ts > begin => {
                self.boundary = Some(ts);
                let samples =
                    std::mem::replace(&mut self.pending, Vec::with_capacity(BATCH_CAPACITY));
                Some(Batch {
                    begin,
                    end: ts,
                    samples,
                })
            }
            Some(_) => None,
            None => {
                self.boundary = Some(ts);
                None
            }
        };
        self.pending.push(sample);
        closed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn finish(self, policy: FinalBatchPolicy) -> Option<Batch<S>> {
        let begin = self.boundary?;
        match policy {
            FinalBatchPolicy::Drop => None,
            FinalBatchPolicy::Flush => Some(Batch {
                begin,
                end: begin,
                samples: self.pending,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::model::{EcgSample, RawRow};

    fn sample(ts: i64, tie: i64) -> EcgSample {
        EcgSample::from_row(&RawRow::new(ts, tie, tie as f64), Clock::Utc).unwrap()
    }

    fn group(stamps: &[i64]) -> (Vec<Batch<EcgSample>>, BatchGrouper<EcgSample>) {
        let mut grouper = BatchGrouper::new();
        let closed: Vec<Batch<EcgSample>> = stamps
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| grouper.push(sample(*ts, i as i64)))
            .collect();
        (closed, grouper)
    }

    #[test]
    fn batch_closes_on_greater_timestamp() {
        let (closed, grouper) = group(&[5, 5, 5, 6, 6, 6]);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].begin, 5);
        assert_eq!(closed[0].end, 6);
        let ties: Vec<i64> = closed[0].samples.iter().map(|s| s.z_fok_timestamp).collect();
        assert_eq!(ties, vec![0, 1, 2]);
        assert_eq!(grouper.pending_len(), 3);
    }

    #[test]
    fn gaps_use_next_boundary_as_end() {
        let (closed, _) = group(&[10, 13, 13, 20]);
        let bounds: Vec<(i64, i64, usize)> = closed
            .iter()
            .map(|b| (b.begin, b.end, b.samples.len()))
            .collect();
        assert_eq!(bounds, vec![(10, 13, 1), (13, 20, 2)]);
    }

    #[test]
    fn lower_timestamp_stays_in_current_batch() {
        let (closed, grouper) = group(&[8, 7, 8, 9]);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].samples.len(), 3);
        assert_eq!(grouper.pending_len(), 1);
    }

    #[test]
    fn final_batch_dropped_by_default() {
        let (_, grouper) = group(&[1, 1, 2]);
        assert!(grouper.finish(FinalBatchPolicy::default()).is_none());
    }

    #[test]
    fn final_batch_flush_is_zero_width() {
        let (_, grouper) = group(&[1, 1, 2, 2]);
        let last = grouper.finish(FinalBatchPolicy::Flush).unwrap();
        assert_eq!((last.begin, last.end, last.samples.len()), (2, 2, 2));
    }

    #[test]
    fn empty_stream_has_no_final_batch() {
        let grouper: BatchGrouper<EcgSample> = BatchGrouper::new();
        assert!(grouper.finish(FinalBatchPolicy::Flush).is_none());
    }
}
