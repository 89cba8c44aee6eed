use crate::{
    error::{PipelineError, PipelineResult},
    features::FeatureSpace,
    models::{EncodedDataset, Interaction, SparseVector},
};

/// Encodes records as sparse rows over the feature space.
///
/// Each row carries exactly three non-zeros: 1.0 at the user slot, 1.0 at the
/// item slot, and `days_since_first` at the trailing slot `D - 1`. Rows come
/// out in input order; downstream sharding relies on that.
pub fn encode(records: &[Interaction], space: &FeatureSpace) -> PipelineResult<EncodedDataset> {
    let dim = space.dim();
    let recency_slot = (dim - 1) as u32;

    let mut rows = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for record in records {
        let user_slot = space.user_slot(&record.user_id).ok_or_else(|| {
            PipelineError::UnknownEntity(format!("user {} has no feature slot", record.user_id))
        })?;
        let item_slot = space.item_slot(&record.item_id).ok_or_else(|| {
            PipelineError::UnknownEntity(format!("item {} has no feature slot", record.item_id))
        })?;

        rows.push(SparseVector {
            indices: vec![user_slot as u32, item_slot as u32, recency_slot],
            values: vec![1.0, 1.0, record.days_since_first],
        });
        labels.push(record.rating as f32);
    }

    Ok(EncodedDataset { rows, labels, dim })
}
