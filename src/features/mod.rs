/// Feature Matrix Builder
///
/// Turns cleaned interaction records into sparse `(matrix, labels)` pairs for
/// an external factorization-machine learner: activity filtering, dense slot
/// assignment, a recency feature, a per-user leave-last-out split, sparse
/// encoding, and contiguous sharding. Every pass is a pure function over its
/// input; nothing here touches I/O.
pub mod encode;
pub mod filter;
pub mod index;
pub mod recency;
pub mod shard;
pub mod split;

pub use encode::encode;
pub use filter::filter_entities;
pub use index::FeatureSpace;
pub use recency::compute_recency;
pub use shard::partition;
pub use split::split_holdout;
