pub mod plist;
pub mod strict;
pub mod tolerant;

use crate::domain::model::{ParseMode, RawAtlas};
use crate::domain::ports::FrameExtractor;
use crate::utils::error::{AtlasError, Result};

pub use strict::StrictExtractor;
pub use tolerant::TolerantExtractor;

// 同一欄位在 format 3 與舊版 format 1/2 的 key 名稱
pub(crate) const TEXTURE_RECT_KEYS: &[&str] = &["textureRect", "frame"];
pub(crate) const SOURCE_SIZE_KEYS: &[&str] = &["spriteSourceSize", "sourceSize"];
pub(crate) const OFFSET_KEYS: &[&str] = &["spriteOffset", "offset"];
pub(crate) const SPRITE_SIZE_KEYS: &[&str] = &["spriteSize"];
pub(crate) const ROTATED_KEYS: &[&str] = &["textureRotated", "rotated"];
pub(crate) const TRIMMED_KEYS: &[&str] = &["spriteTrimmed"];

pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// 解析成功但沒有任何 frame 屬於內容錯誤
pub(crate) fn ensure_frames(atlas: RawAtlas) -> Result<RawAtlas> {
    if atlas.frames.is_empty() {
        return Err(AtlasError::EmptyContent);
    }
    Ok(atlas)
}

/// 先用 strict 解析，格式錯誤時改用 tolerant 掃描
#[derive(Debug, Default)]
pub struct FallbackExtractor {
    primary: StrictExtractor,
    fallback: TolerantExtractor,
}

impl FrameExtractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn extract(&self, text: &str) -> Result<RawAtlas> {
        match self.primary.extract(text) {
            Err(AtlasError::ParseFailure { message }) => {
                tracing::warn!(
                    "⚠️  Strict plist decode failed ({}), falling back to tolerant scan",
                    message
                );
                match self.fallback.extract(text) {
                    Err(AtlasError::EmptyContent) => Err(AtlasError::ParseFailure { message }),
                    other => other,
                }
            }
            other => other,
        }
    }
}

pub fn extractor_for(mode: ParseMode) -> Box<dyn FrameExtractor> {
    match mode {
        ParseMode::Auto => Box::new(FallbackExtractor::default()),
        ParseMode::Strict => Box::new(StrictExtractor),
        ParseMode::Tolerant => Box::new(TolerantExtractor),
    }
}
