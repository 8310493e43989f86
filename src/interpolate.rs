use crate::clock::Clock;
use crate::error::{ExtractError, Result};
use crate::model::Sample;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Instant of sample `index` out of `len` spread evenly over `[begin, end)`,
/// as `(seconds, nanoseconds)`.
///
/// Computed in integer nanoseconds so offsets are monotone and `end` itself is
/// never reached when `end > begin`.
pub fn fine_instant(begin: i64, end: i64, index: usize, len: usize) -> Result<(i64, u32)> {
    if len == 0 {
        return Err(ExtractError::EmptyBatch);
    }
    let span_ns = (i128::from(end) - i128::from(begin)) * NANOS_PER_SEC;
    let offset_ns = span_ns * index as i128 / len as i128;
    let total_ns = i128::from(begin) * NANOS_PER_SEC + offset_ns;
    Ok((
        total_ns.div_euclid(NANOS_PER_SEC) as i64,
        total_ns.rem_euclid(NANOS_PER_SEC) as u32,
    ))
}

/// Assigns every sample of a finalized batch its fine timestamp.
pub fn interpolate<S: Sample>(batch: &mut [S], begin: i64, end: i64, clock: Clock) -> Result<()> {
    let len = batch.len();
    if len == 0 {
        return Err(ExtractError::EmptyBatch);
    }
    for (index, sample) in batch.iter_mut().enumerate() {
        let (secs, nanos) = fine_instant(begin, end, index, len)?;
        sample.set_fine_timestamp(clock.format_fine(secs, nanos)?);
    }
    Ok(())
}
