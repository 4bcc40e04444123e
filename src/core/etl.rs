use crate::core::builder::ModelBuilder;
use crate::core::extract::{extractor_for, normalize_newlines};
use crate::core::Pipeline;
use crate::domain::model::{AtlasDefaults, BuildOutcome, FrameWarning, ParseMode};
use crate::utils::error::Result;

/// 一次轉換的結果摘要
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub outputs: Vec<String>,
    pub frames: usize,
    pub skipped: Vec<FrameWarning>,
}

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ConversionReport> {
        tracing::info!("🔍 Extracting frames...");
        let raw = self.pipeline.extract().await?;
        tracing::info!("✅ Extracted {} frames", raw.frames.len());

        let outcome = self.pipeline.transform(raw).await?;
        tracing::info!(
            "Built {} frames ({} skipped)",
            outcome.atlas.len(),
            outcome.warnings.len()
        );

        let outputs = self.pipeline.load(&outcome.atlas).await?;
        for output in &outputs {
            tracing::info!("📁 Output saved to: {}", output);
        }

        Ok(ConversionReport {
            outputs,
            frames: outcome.atlas.len(),
            skipped: outcome.warnings,
        })
    }
}

/// 不經過 Storage，直接在記憶體中把 plist 文字轉成標準模型
pub fn build_atlas(text: &str, mode: ParseMode, defaults: AtlasDefaults) -> Result<BuildOutcome> {
    let raw = extractor_for(mode).extract(&normalize_newlines(text))?;
    ModelBuilder::new(defaults).build(raw)
}
