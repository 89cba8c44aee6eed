use std::collections::HashMap;

use crate::{
    error::{PipelineError, PipelineResult},
    models::Interaction,
};

/// Dense slot assignment for surviving users and items.
///
/// Users occupy slots `[0, U)`, items `[U, U + V)`, and one extra slot at
/// `D - 1` carries the scalar recency feature, so `D = U + V + 1`. Slots are
/// assigned in first-seen order over the filtered input, which makes the
/// mapping a deterministic function of that input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    user_slots: HashMap<String, usize>,
    item_slots: HashMap<String, usize>,
}

impl FeatureSpace {
    /// Builds user and item indices from filtered records.
    pub fn build(records: &[Interaction]) -> PipelineResult<Self> {
        let mut user_slots: HashMap<String, usize> = HashMap::new();
        for record in records {
            let next = user_slots.len();
            user_slots.entry(record.user_id.clone()).or_insert(next);
        }

        if user_slots.is_empty() {
            return Err(PipelineError::EmptyInput(
                "no users survived filtering".to_string(),
            ));
        }

        let num_users = user_slots.len();
        let mut item_slots: HashMap<String, usize> = HashMap::new();
        for record in records {
            let next = num_users + item_slots.len();
            item_slots.entry(record.item_id.clone()).or_insert(next);
        }

        if item_slots.is_empty() {
            return Err(PipelineError::EmptyInput(
                "no items survived filtering".to_string(),
            ));
        }

        tracing::info!(
            users = user_slots.len(),
            items = item_slots.len(),
            feature_dim = num_users + item_slots.len() + 1,
            "Feature space built"
        );

        Ok(Self {
            user_slots,
            item_slots,
        })
    }

    pub fn num_users(&self) -> usize {
        self.user_slots.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_slots.len()
    }

    /// Feature dimension `D`, including the trailing recency slot.
    pub fn dim(&self) -> usize {
        self.num_users() + self.num_items() + 1
    }

    pub fn user_slot(&self, user_id: &str) -> Option<usize> {
        self.user_slots.get(user_id).copied()
    }

    pub fn item_slot(&self, item_id: &str) -> Option<usize> {
        self.item_slots.get(item_id).copied()
    }

    /// Reverse lookup for decoding encoded rows back to ids.
    pub fn user_for_slot(&self, slot: usize) -> Option<&str> {
        self.user_slots
            .iter()
            .find(|(_, s)| **s == slot)
            .map(|(id, _)| id.as_str())
    }

    pub fn item_for_slot(&self, slot: usize) -> Option<&str> {
        self.item_slots
            .iter()
            .find(|(_, s)| **s == slot)
            .map(|(id, _)| id.as_str())
    }
}
