use super::{
    ensure_frames, OFFSET_KEYS, ROTATED_KEYS, SOURCE_SIZE_KEYS, SPRITE_SIZE_KEYS,
    TEXTURE_RECT_KEYS, TRIMMED_KEYS,
};
use crate::domain::model::{RawAtlas, RawFrame, RawMetadata, IMAGE_EXTENSIONS};
use crate::domain::ports::FrameExtractor;
use crate::utils::error::{AtlasError, Result};
use regex::Regex;

/// 以正規表示式掃描原始文字：只有圖片副檔名結尾且後接 `<dict>` 的 `<key>`
/// 才算 frame，欄位只在該 frame 自己的區塊內搜尋
#[derive(Debug, Default, Clone, Copy)]
pub struct TolerantExtractor;

fn pattern(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| AtlasError::parse(format!("invalid scan pattern: {}", e)))
}

fn string_pattern(key: &str) -> Result<Regex> {
    pattern(&format!(
        r"(?is)<key>\s*{}\s*</key>\s*<string>(.*?)</string>",
        regex::escape(key)
    ))
}

fn flag_pattern(key: &str) -> Result<Regex> {
    pattern(&format!(
        r"(?is)<key>\s*{}\s*</key>\s*<(true|false)\s*/>",
        regex::escape(key)
    ))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

struct Lookup {
    patterns: Vec<Regex>,
}

impl Lookup {
    fn strings(keys: &[&str]) -> Result<Self> {
        Ok(Self {
            patterns: keys.iter().map(|k| string_pattern(k)).collect::<Result<_>>()?,
        })
    }

    fn flags(keys: &[&str]) -> Result<Self> {
        Ok(Self {
            patterns: keys.iter().map(|k| flag_pattern(k)).collect::<Result<_>>()?,
        })
    }

    fn find(&self, block: &str) -> Option<String> {
        self.patterns.iter().find_map(|re| capture(re, block))
    }

    fn find_flag(&self, block: &str) -> Option<bool> {
        self.find(block).map(|v| v.eq_ignore_ascii_case("true"))
    }
}

struct FrameScanner {
    block: Regex,
    texture_rect: Lookup,
    sprite_source_size: Lookup,
    sprite_offset: Lookup,
    sprite_size: Lookup,
    rotated: Lookup,
    trimmed: Lookup,
}

impl FrameScanner {
    fn new() -> Result<Self> {
        Ok(Self {
            block: pattern(&format!(
                r"(?is)<key>([^<]+?\.(?:{}))\s*</key>\s*<dict>(.*?)</dict>",
                IMAGE_EXTENSIONS.join("|")
            ))?,
            texture_rect: Lookup::strings(TEXTURE_RECT_KEYS)?,
            sprite_source_size: Lookup::strings(SOURCE_SIZE_KEYS)?,
            sprite_offset: Lookup::strings(OFFSET_KEYS)?,
            sprite_size: Lookup::strings(SPRITE_SIZE_KEYS)?,
            rotated: Lookup::flags(ROTATED_KEYS)?,
            trimmed: Lookup::flags(TRIMMED_KEYS)?,
        })
    }

    fn scan(&self, text: &str, atlas: &mut RawAtlas) {
        for caps in self.block.captures_iter(text) {
            let block = &caps[2];
            atlas.insert_frame(RawFrame {
                name: caps[1].trim().to_string(),
                texture_rect: self.texture_rect.find(block),
                sprite_source_size: self.sprite_source_size.find(block),
                sprite_offset: self.sprite_offset.find(block),
                sprite_size: self.sprite_size.find(block),
                rotated: self.rotated.find_flag(block),
                trimmed: self.trimmed.find_flag(block),
            });
        }
    }
}

/// `<key>metadata</key>` 之後的文字，找不到時用整份文件
fn metadata_scope(text: &str) -> &str {
    match text.find("<key>metadata</key>") {
        Some(start) => &text[start..],
        None => text,
    }
}

fn scan_metadata(text: &str) -> Result<RawMetadata> {
    let scope = metadata_scope(text);

    let size = pattern(r"(?i)<key>size</key>\s*<string>(\{[\d,\s]+\})</string>")?;
    let version = pattern(r"(?i)<key>version</key>\s*<string>([\d.]+)</string>")?;
    let scale = pattern(
        r"(?i)<key>scale</key>\s*<(?:real|integer|string)>([^<]+)</(?:real|integer|string)>",
    )?;
    let target = pattern(r"(?is)<key>target</key>\s*<dict>(.*?)</dict>")?;
    let file_name = string_pattern("textureFileName")?;
    let file_extension = string_pattern("textureFileExtension")?;

    let mut metadata = RawMetadata {
        size: capture(&size, scope),
        version: capture(&version, scope),
        scale: capture(&scale, scope),
        ..Default::default()
    };

    let target_block = target.captures(scope).map(|caps| caps[1].to_string());
    match target_block
        .as_deref()
        .and_then(|block| capture(&file_name, block).map(|name| (block, name)))
    {
        Some((block, name)) => {
            metadata.texture_file_name = Some(name);
            metadata.texture_file_extension = capture(&file_extension, block);
        }
        None => metadata.texture_file_name = capture(&file_name, scope),
    }
    Ok(metadata)
}

impl FrameExtractor for TolerantExtractor {
    fn name(&self) -> &'static str {
        "tolerant"
    }

    fn extract(&self, text: &str) -> Result<RawAtlas> {
        let mut atlas = RawAtlas::default();
        FrameScanner::new()?.scan(text, &mut atlas);
        atlas.metadata = scan_metadata(text)?;

        tracing::debug!("Tolerant scan found {} frames", atlas.frames.len());
        ensure_frames(atlas)
    }
}
