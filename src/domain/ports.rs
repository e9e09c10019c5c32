use crate::core::report::ImportReport;
use crate::domain::model::{Collection, SeedBatch, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn seed_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn report_path(&self) -> &str;
    fn dry_run(&self) -> bool;
    fn collection_filter(&self) -> Option<Collection>;
    /// Seed file name for a collection, relative to `seed_dir`.
    fn file_for(&self, collection: Collection) -> String;
    fn is_enabled(&self, collection: Collection) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SeedBatch>>;
    async fn transform(&self, batches: Vec<SeedBatch>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<ImportReport>;
}
