pub mod collections;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod schema;

pub use crate::domain::model::{SeedBatch, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
