use crate::core::builder::ModelBuilder;
use crate::core::extract::{extractor_for, normalize_newlines};
use crate::core::{Atlas, BuildOutcome, ConfigProvider, FrameExtractor, Pipeline, RawAtlas, Storage};
use crate::utils::error::{AtlasError, Result};

/// plist 檔案 → 標準模型 → 各引擎 JSON
pub struct AtlasPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) extractor: Box<dyn FrameExtractor>,
    pub(crate) builder: ModelBuilder,
}

impl<S: Storage, C: ConfigProvider> AtlasPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let extractor = extractor_for(config.parse_mode());
        let builder = ModelBuilder::new(config.defaults().clone());
        Self {
            storage,
            config,
            extractor,
            builder,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn FrameExtractor>) -> Self {
        self.extractor = extractor;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AtlasPipeline<S, C> {
    async fn extract(&self) -> Result<RawAtlas> {
        let input = self.config.input_path();
        tracing::info!("📂 Reading plist: {}", input);

        if !self.storage.exists(input).await {
            return Err(AtlasError::InputNotFound {
                path: input.to_string(),
            });
        }

        let bytes = self.storage.read_file(input).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| AtlasError::parse(format!("input is not valid UTF-8: {}", e)))?;
        let text = normalize_newlines(text.trim_start_matches('\u{feff}'));

        tracing::debug!(
            "Extracting with {} extractor ({} bytes)",
            self.extractor.name(),
            text.len()
        );
        self.extractor.extract(&text)
    }

    async fn transform(&self, raw: RawAtlas) -> Result<BuildOutcome> {
        self.builder.build(raw)
    }

    async fn load(&self, atlas: &Atlas) -> Result<Vec<String>> {
        let input = self.config.input_path();

        // 全部 dialect 先渲染完成再寫檔，任何一個失敗都不會留下部分輸出
        let documents = self
            .config
            .dialects()
            .iter()
            .map(|dialect| {
                let path = dialect.output_path(input, self.config.output_dir());
                tracing::debug!("Rendering {} dialect", dialect);
                Ok((path, dialect.render(atlas)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outputs = Vec::with_capacity(documents.len());
        for (path, json) in documents {
            self.storage.write_file(&path, json.as_bytes()).await?;
            tracing::debug!("Wrote {} ({} bytes)", path, json.len());
            outputs.push(path);
        }
        Ok(outputs)
    }
}
