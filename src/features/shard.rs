use crate::error::{PipelineError, PipelineResult};

/// Splits a slice into `num_shards` contiguous, near-equal groups.
///
/// The leading `len % num_shards` shards carry one extra element, so shard
/// sizes never differ by more than one and input order is preserved across
/// the concatenation of all shards. Deterministic for a given input and
/// shard count; shards may legitimately be empty when there are more shards
/// than records.
pub fn partition<T>(records: &[T], num_shards: usize) -> PipelineResult<Vec<&[T]>> {
    if num_shards == 0 {
        return Err(PipelineError::InvalidInput(
            "shard count must be at least 1".to_string(),
        ));
    }

    let base = records.len() / num_shards;
    let remainder = records.len() % num_shards;

    let mut shards = Vec::with_capacity(num_shards);
    let mut start = 0;
    for shard_idx in 0..num_shards {
        let size = base + usize::from(shard_idx < remainder);
        shards.push(&records[start..start + size]);
        start += size;
    }

    Ok(shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_partition() {
        let records: Vec<u32> = (0..8).collect();
        let shards = partition(&records, 4).unwrap();
        assert_eq!(shards.len(), 4);
        assert!(shards.iter().all(|s| s.len() == 2));
    }

    #[test]
    fn test_uneven_partition_covers_everything_once() {
        let records: Vec<u32> = (0..10).collect();
        let shards = partition(&records, 3).unwrap();

        let sizes: Vec<usize> = shards.iter().map(|s| s.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let flattened: Vec<u32> = shards.iter().flat_map(|s| s.iter().copied()).collect();
        assert_eq!(flattened, records);
    }

    #[test]
    fn test_shard_sizes_differ_by_at_most_one() {
        for len in 0..25usize {
            let records: Vec<usize> = (0..len).collect();
            for n in 1..8 {
                let shards = partition(&records, n).unwrap();
                let min = shards.iter().map(|s| s.len()).min().unwrap();
                let max = shards.iter().map(|s| s.len()).max().unwrap();
                assert!(max - min <= 1, "len={} shards={}", len, n);
            }
        }
    }

    #[test]
    fn test_more_shards_than_records() {
        let records = vec![1, 2];
        let shards = partition(&records, 5).unwrap();
        assert_eq!(shards.len(), 5);
        assert_eq!(shards[0], &[1]);
        assert_eq!(shards[1], &[2]);
        assert!(shards[2..].iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_zero_shards_is_invalid() {
        let records = vec![1];
        assert!(matches!(
            partition(&records, 0),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
