use crate::clock::Clock;
use crate::error::Result;
use crate::model::{AccelSample, RawRow};

/// Rows per accelerometer sample (x, y, z).
pub const AXES: usize = 3;

/// Folds every three consecutive accelerometer rows into one [`AccelSample`].
///
/// Rows are assumed to arrive as x, y, z for each physical sample; nothing
/// checks that a triple shares a timestamp. A trailing partial triple is
/// dropped and counted in [`TripleAssembler::dropped_rows`].
pub struct TripleAssembler<I> {
    rows: I,
    clock: Clock,
    dropped_rows: usize,
}

impl<I> TripleAssembler<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    pub fn new(rows: I, clock: Clock) -> Self {
        Self {
            rows,
            clock,
            dropped_rows: 0,
        }
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

impl<I> Iterator for TripleAssembler<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<AccelSample>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut window = [RawRow::default(); AXES];
        for (filled, slot) in window.iter_mut().enumerate() {
            match self.rows.next() {
                Some(Ok(row)) => *slot = row,
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.dropped_rows += filled;
                    return None;
                }
            }
        }
        Some(AccelSample::from_triple(&window, self.clock))
    }
}
