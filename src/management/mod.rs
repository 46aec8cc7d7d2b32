mod aggregate;
mod checkpoint;
mod store;

pub use aggregate::Aggregator;
pub use aggregate::KeyedEntities;
pub use aggregate::rank_appearances;
pub use aggregate::rank_entities;
pub use aggregate::unique_entities;
pub use checkpoint::CheckpointManager;
pub use checkpoint::CheckpointRow;
pub use store::QueryResult;
pub use store::Store;
