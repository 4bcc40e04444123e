use crate::domain::model::{Atlas, AtlasDefaults, BuildOutcome, Dialect, ParseMode, RawAtlas};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_dir(&self) -> Option<&str>;
    fn dialects(&self) -> &[Dialect];
    fn parse_mode(&self) -> ParseMode;
    fn defaults(&self) -> &AtlasDefaults;
}

/// 把 plist 文字轉成 [`RawAtlas`] 的解析策略
pub trait FrameExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, text: &str) -> Result<RawAtlas>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawAtlas>;
    async fn transform(&self, raw: RawAtlas) -> Result<BuildOutcome>;
    async fn load(&self, atlas: &Atlas) -> Result<Vec<String>>;
}
