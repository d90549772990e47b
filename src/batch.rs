//! Batch partitions: contiguous same-batch ranges over a point container.

use std::ops::Range;

use crate::error::{Result, SearchError};

/// Validated split of a point container into contiguous batches.
///
/// Internally stored as `num_batches + 1` offsets `o`, batch `i` covering the
/// half-open range `o[i]..o[i + 1]`. The first offset is always 0 and the last
/// is the container length, so every index belongs to exactly one batch.
/// Empty batches are allowed.
///
/// # Examples
/// ```
/// use radius_neighbors::BatchPartition;
///
/// let from_offsets = BatchPartition::from_offsets(&[0, 2, 5], 5).unwrap();
/// let from_lengths = BatchPartition::from_lengths(&[2, 3], 5).unwrap();
/// assert_eq!(from_offsets, from_lengths);
/// assert_eq!(from_offsets.range(1), 2..5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchPartition {
    offsets: Vec<usize>,
}

impl BatchPartition {
    /// One batch covering all `len` points
    pub fn single(len: usize) -> Self {
        Self {
            offsets: vec![0, len],
        }
    }

    /// Builds a partition from half-open offsets (`num_batches + 1` entries).
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidBatchOffsets`] if the array is empty, an
    /// offset is negative, the offsets decrease, the first offset is not 0 or
    /// the last offset is not `len`.
    pub fn from_offsets(offsets: &[i32], len: usize) -> Result<Self> {
        if offsets.is_empty() {
            return Err(invalid(0, "offset array is empty"));
        }

        let mut converted = Vec::with_capacity(offsets.len());
        for (position, &offset) in offsets.iter().enumerate() {
            let offset = usize::try_from(offset)
                .map_err(|_| invalid(position, format!("negative offset {}", offset)))?;
            if let Some(&prev) = converted.last() {
                if offset < prev {
                    return Err(invalid(
                        position,
                        format!("offset {} is smaller than previous offset {}", offset, prev),
                    ));
                }
            }
            converted.push(offset);
        }

        Self::from_validated_prefix(converted, len)
    }

    /// Builds a partition from per-batch lengths (`num_batches` entries).
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidBatchOffsets`] if a length is negative or
    /// the lengths do not sum to `len`.
    pub fn from_lengths(lengths: &[i32], len: usize) -> Result<Self> {
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        offsets.push(0_usize);
        let mut total = 0_usize;
        for (position, &length) in lengths.iter().enumerate() {
            let length = usize::try_from(length)
                .map_err(|_| invalid(position, format!("negative batch length {}", length)))?;
            total = total
                .checked_add(length)
                .ok_or_else(|| invalid(position, "batch lengths overflow"))?;
            offsets.push(total);
        }

        if total != len {
            return Err(invalid(
                lengths.len().saturating_sub(1),
                format!("batch lengths sum to {} but the container holds {} points", total, len),
            ));
        }
        Ok(Self { offsets })
    }

    fn from_validated_prefix(offsets: Vec<usize>, len: usize) -> Result<Self> {
        if offsets[0] != 0 {
            return Err(invalid(0, format!("first offset is {}, expected 0", offsets[0])));
        }
        let last = offsets.len() - 1;
        if offsets[last] != len {
            return Err(invalid(
                last,
                format!("last offset is {} but the container holds {} points", offsets[last], len),
            ));
        }
        Ok(Self { offsets })
    }

    /// Number of batches
    pub fn num_batches(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of points covered by the partition
    pub fn total_len(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    /// Index range of batch `batch`.
    ///
    /// # Panics
    /// Panics if `batch >= self.num_batches()`.
    pub fn range(&self, batch: usize) -> Range<usize> {
        self.offsets[batch]..self.offsets[batch + 1]
    }

    /// Iterator over all batch ranges in order
    pub fn ranges(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        self.offsets.windows(2).map(|w| w[0]..w[1])
    }

    /// The raw offsets (`num_batches + 1` entries)
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Batch that contains point `index`, if any.
    ///
    /// Empty batches never contain a point, so the last batch whose start is
    /// `<= index` and whose end is `> index` wins.
    pub fn batch_of(&self, index: usize) -> Option<usize> {
        if index >= self.total_len() {
            return None;
        }
        let upper = self.offsets.partition_point(|&o| o <= index);
        Some(upper - 1)
    }
}

fn invalid(position: usize, message: impl Into<String>) -> SearchError {
    SearchError::InvalidBatchOffsets {
        position,
        message: message.into(),
    }
}

/// Checks that two partitions can be paired batch by batch.
pub(crate) fn check_batch_counts(queries: &BatchPartition, supports: &BatchPartition) -> Result<()> {
    if queries.num_batches() != supports.num_batches() {
        return Err(SearchError::BatchCountMismatch {
            query_batches: queries.num_batches(),
            support_batches: supports.num_batches(),
        });
    }
    Ok(())
}
