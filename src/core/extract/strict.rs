use super::plist::{parse_plist, PlistValue};
use super::{
    ensure_frames, OFFSET_KEYS, ROTATED_KEYS, SOURCE_SIZE_KEYS, SPRITE_SIZE_KEYS,
    TEXTURE_RECT_KEYS, TRIMMED_KEYS,
};
use crate::domain::model::{RawAtlas, RawFrame, RawMetadata};
use crate::domain::ports::FrameExtractor;
use crate::utils::error::{AtlasError, Result};

/// 從完整解析的 plist 樹讀取圖集，`frames` 底下每個 key 都是 frame 名稱
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictExtractor;

fn first<'v>(dict: &'v PlistValue, keys: &[&str]) -> Option<&'v PlistValue> {
    keys.iter().find_map(|key| dict.get(key))
}

fn first_string(dict: &PlistValue, keys: &[&str]) -> Option<String> {
    first(dict, keys)
        .and_then(PlistValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_frame(name: &str, value: &PlistValue) -> RawFrame {
    let mut frame = RawFrame::new(name.trim());
    if value.as_dict().is_none() {
        tracing::debug!("Frame '{}' is not a dict", name);
        return frame;
    }

    frame.texture_rect = first_string(value, TEXTURE_RECT_KEYS);
    frame.sprite_source_size = first_string(value, SOURCE_SIZE_KEYS);
    frame.sprite_offset = first_string(value, OFFSET_KEYS);
    frame.sprite_size = first_string(value, SPRITE_SIZE_KEYS);
    frame.rotated = first(value, ROTATED_KEYS).and_then(PlistValue::as_bool);
    frame.trimmed = first(value, TRIMMED_KEYS).and_then(PlistValue::as_bool);
    frame
}

fn read_metadata(meta: &PlistValue) -> RawMetadata {
    let text = |value: Option<&PlistValue>| {
        value
            .and_then(PlistValue::to_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut metadata = RawMetadata {
        size: text(meta.get("size")),
        version: text(meta.get("version")),
        scale: text(meta.get("scale")),
        ..Default::default()
    };

    let target = meta.get("target");
    match text(target.and_then(|t| t.get("textureFileName"))) {
        Some(name) => {
            metadata.texture_file_name = Some(name);
            metadata.texture_file_extension =
                text(target.and_then(|t| t.get("textureFileExtension")));
        }
        None => {
            metadata.texture_file_name =
                text(first(meta, &["textureFileName", "realTextureFileName"]));
        }
    }
    metadata
}

impl FrameExtractor for StrictExtractor {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn extract(&self, text: &str) -> Result<RawAtlas> {
        let root = parse_plist(text)?;
        if root.as_dict().is_none() {
            return Err(AtlasError::parse("plist root element is not a <dict>"));
        }

        let mut atlas = RawAtlas::default();
        if let Some(frames) = root.get("frames").and_then(PlistValue::as_dict) {
            for (name, value) in frames {
                atlas.insert_frame(read_frame(name, value));
            }
        }
        if let Some(meta) = root.get("metadata") {
            atlas.metadata = read_metadata(meta);
        }

        tracing::debug!("Strict decode found {} frames", atlas.frames.len());
        ensure_frames(atlas)
    }
}
