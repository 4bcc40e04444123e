use crate::core::geometry::{parse_point, parse_rect, parse_size};
use crate::domain::model::{
    Atlas, AtlasDefaults, AtlasMetadata, BuildOutcome, FrameIssue, FrameRecord, FrameWarning,
    RawAtlas, RawFrame, RawMetadata,
};
use crate::utils::error::{AtlasError, Result};

/// 把 [`RawAtlas`] 轉成標準的 [`Atlas`]
///
/// 幾何欄位缺少或格式錯誤的 frame 會逐一略過並記成 [`FrameWarning`]。
/// metadata 缺少或無法解析時改用 [`AtlasDefaults`]。
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    defaults: AtlasDefaults,
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> std::result::Result<&'a str, FrameIssue> {
    value.as_deref().ok_or(FrameIssue::Missing { field })
}

fn malformed(field: &'static str, value: &str) -> FrameIssue {
    FrameIssue::Malformed {
        field,
        value: value.to_string(),
    }
}

fn build_frame(raw: &RawFrame) -> std::result::Result<FrameRecord, FrameIssue> {
    let rect_text = required(&raw.texture_rect, "textureRect")?;
    let source_text = required(&raw.sprite_source_size, "spriteSourceSize")?;
    let offset_text = required(&raw.sprite_offset, "spriteOffset")?;

    let texture_rect = parse_rect(rect_text).ok_or_else(|| malformed("textureRect", rect_text))?;
    if texture_rect.w == 0 || texture_rect.h == 0 {
        return Err(FrameIssue::EmptyTextureRect {
            w: texture_rect.w,
            h: texture_rect.h,
        });
    }
    let source_size =
        parse_size(source_text).ok_or_else(|| malformed("spriteSourceSize", source_text))?;
    let sprite_offset =
        parse_point(offset_text).ok_or_else(|| malformed("spriteOffset", offset_text))?;

    // spriteSize 不是必要欄位，缺少或格式錯誤時用 textureRect 的尺寸
    let sprite_size = raw
        .sprite_size
        .as_deref()
        .and_then(parse_size)
        .unwrap_or_else(|| texture_rect.size());

    Ok(FrameRecord {
        name: raw.name.clone(),
        texture_rect,
        source_size,
        sprite_offset,
        sprite_size,
        rotated: raw.rotated.unwrap_or(false),
        trimmed: raw.trimmed.unwrap_or(sprite_size != source_size),
    })
}

impl ModelBuilder {
    pub fn new(defaults: AtlasDefaults) -> Self {
        Self { defaults }
    }

    pub fn build(&self, raw: RawAtlas) -> Result<BuildOutcome> {
        let RawAtlas {
            frames: raw_frames,
            metadata: raw_metadata,
        } = raw;

        if raw_frames.is_empty() {
            return Err(AtlasError::EmptyContent);
        }

        let total = raw_frames.len();
        let mut frames = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        for raw_frame in raw_frames {
            match build_frame(&raw_frame) {
                Ok(frame) => {
                    tracing::debug!(
                        "✅ Parsed frame {} ({}x{})",
                        frame.name,
                        frame.texture_rect.w,
                        frame.texture_rect.h
                    );
                    frames.push(frame);
                }
                Err(issue) => {
                    let warning = FrameWarning {
                        frame: raw_frame.name,
                        issue,
                    };
                    tracing::warn!("⚠️  {}", warning);
                    warnings.push(warning);
                }
            }
        }

        if frames.is_empty() {
            return Err(AtlasError::AllFramesInvalid { skipped: total });
        }

        let metadata = self.metadata(&raw_metadata);
        Ok(BuildOutcome {
            atlas: Atlas::new(metadata, frames),
            warnings,
        })
    }

    fn metadata(&self, raw: &RawMetadata) -> AtlasMetadata {
        let size = raw
            .size
            .as_deref()
            .and_then(|text| {
                let parsed = parse_size(text).filter(|s| s.w > 0 && s.h > 0);
                if parsed.is_none() {
                    tracing::debug!("Unusable atlas size '{}', using default", text);
                }
                parsed
            })
            .unwrap_or(self.defaults.size);

        let scale = raw
            .scale
            .as_deref()
            .and_then(|text| {
                let parsed = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite() && *s > 0.0);
                if parsed.is_none() {
                    tracing::debug!("Unusable atlas scale '{}', using default", text);
                }
                parsed
            })
            .unwrap_or(self.defaults.scale);

        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        AtlasMetadata {
            size,
            version: non_empty(&raw.version).unwrap_or_else(|| self.defaults.version.clone()),
            texture_file_name: non_empty(&raw.texture_file_name)
                .unwrap_or_else(|| self.defaults.texture_file_name.clone()),
            texture_file_extension: non_empty(&raw.texture_file_extension),
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Point, Rect, Size};

    fn frame(name: &str, rect: &str, source: &str, offset: Option<&str>) -> RawFrame {
        RawFrame {
            texture_rect: Some(rect.to_string()),
            sprite_source_size: Some(source.to_string()),
            sprite_offset: offset.map(str::to_string),
            ..RawFrame::new(name)
        }
    }

    #[test]
    fn test_build_numeric_frame() {
        let raw = RawAtlas {
            frames: vec![frame("a.png", "{{10,20},{30,40}}", "{50,60}", Some("{-5,-3}"))],
            ..Default::default()
        };

        let outcome = ModelBuilder::default().build(raw).unwrap();
        let a = outcome.atlas.frame("a.png").unwrap();

        assert_eq!(
            a.texture_rect,
            Rect {
                x: 10,
                y: 20,
                w: 30,
                h: 40
            }
        );
        assert_eq!(a.source_size, Size { w: 50, h: 60 });
        assert_eq!(a.sprite_offset, Point { x: -5, y: -3 });
        assert_eq!(a.sprite_size, Size { w: 30, h: 40 });
        assert!(!a.rotated);
        // 沒有 spriteTrimmed 時由尺寸推斷
        assert!(a.trimmed);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_invalid_frames_are_dropped_with_warning() {
        let raw = RawAtlas {
            frames: vec![
                frame("a.png", "{{0,0},{4,4}}", "{4,4}", Some("{0,0}")),
                frame("b.png", "{{4,0},{4,4}}", "{4,4}", None),
                frame("c.png", "{{8,0},{4,4}}", "{4,4}", Some("{0,0}")),
            ],
            ..Default::default()
        };

        let outcome = ModelBuilder::default().build(raw).unwrap();

        assert_eq!(outcome.atlas.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].frame, "b.png");
        assert_eq!(
            outcome.warnings[0].issue,
            FrameIssue::Missing {
                field: "spriteOffset"
            }
        );
        let names: Vec<&str> = outcome.atlas.frames().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_malformed_and_empty_rects() {
        let raw = RawAtlas {
            frames: vec![
                frame("bad.png", "{10,20,30,40}", "{4,4}", Some("{0,0}")),
                frame("zero.png", "{{0,0},{0,4}}", "{4,4}", Some("{0,0}")),
            ],
            ..Default::default()
        };

        match ModelBuilder::default().build(raw) {
            Err(AtlasError::AllFramesInvalid { skipped }) => assert_eq!(skipped, 2),
            other => panic!("expected AllFramesInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_no_frames_is_empty_content() {
        assert!(matches!(
            ModelBuilder::default().build(RawAtlas::default()),
            Err(AtlasError::EmptyContent)
        ));
    }

    #[test]
    fn test_metadata_defaults() {
        let raw = RawAtlas {
            frames: vec![frame("a.png", "{{0,0},{4,4}}", "{4,4}", Some("{0,0}"))],
            metadata: RawMetadata {
                size: Some("{0,512}".to_string()),
                scale: Some("abc".to_string()),
                ..Default::default()
            },
        };

        let atlas = ModelBuilder::default().build(raw).unwrap().atlas;
        let meta = atlas.metadata();

        assert_eq!(meta.size, Size { w: 2048, h: 2048 });
        assert_eq!(meta.version, "1.5.5");
        assert_eq!(meta.texture_file_name, "atlas");
        assert_eq!(meta.scale, 1.0);
        assert!(!atlas.frames()[0].trimmed);
    }

    #[test]
    fn test_custom_defaults_and_present_values() {
        let defaults = AtlasDefaults {
            size: Size { w: 1024, h: 1024 },
            version: "2.0".to_string(),
            texture_file_name: "sheet".to_string(),
            scale: 2.0,
        };
        let raw = RawAtlas {
            frames: vec![frame("a.png", "{{0,0},{4,4}}", "{4,4}", Some("{0,0}"))],
            metadata: RawMetadata {
                size: Some("{256,128}".to_string()),
                version: Some("1.6.0".to_string()),
                ..Default::default()
            },
        };

        let atlas = ModelBuilder::new(defaults).build(raw).unwrap().atlas;
        let meta = atlas.metadata();

        assert_eq!(meta.size, Size { w: 256, h: 128 });
        assert_eq!(meta.version, "1.6.0");
        assert_eq!(meta.texture_file_name, "sheet");
        assert_eq!(meta.scale, 2.0);
    }
}
