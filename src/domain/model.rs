use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }
}

/// 已驗證並轉成數值的單一 frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub name: String,
    /// 在貼圖上的打包矩形
    pub texture_rect: Rect,
    /// 裁切前的原始尺寸
    pub source_size: Size,
    /// 相對原圖的裁切位移，可以是負數
    pub sprite_offset: Point,
    /// 裁切後的尺寸
    pub sprite_size: Size,
    pub rotated: bool,
    pub trimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasMetadata {
    pub size: Size,
    pub version: String,
    pub texture_file_name: String,
    pub texture_file_extension: Option<String>,
    pub scale: f64,
}

impl AtlasMetadata {
    /// 圖集圖片檔名：有副檔名時直接接上，沒有就補 `.png`
    pub fn image_name(&self) -> String {
        match &self.texture_file_extension {
            Some(ext) if ext.starts_with('.') => format!("{}{}", self.texture_file_name, ext),
            Some(ext) => format!("{}.{}", self.texture_file_name, ext),
            None if has_image_extension(&self.texture_file_name) => {
                self.texture_file_name.clone()
            }
            None => format!("{}.png", self.texture_file_name),
        }
    }
}

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tga"];

pub fn has_image_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// 標準圖集模型，由 builder 建立後不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    metadata: AtlasMetadata,
    frames: Vec<FrameRecord>,
}

impl Atlas {
    pub fn new(metadata: AtlasMetadata, frames: Vec<FrameRecord>) -> Self {
        Self { metadata, frames }
    }

    pub fn metadata(&self) -> &AtlasMetadata {
        &self.metadata
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn frame(&self, name: &str) -> Option<&FrameRecord> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// plist 中原樣的 frame 欄位，仍是字串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrame {
    pub name: String,
    pub texture_rect: Option<String>,
    pub sprite_source_size: Option<String>,
    pub sprite_offset: Option<String>,
    pub sprite_size: Option<String>,
    pub rotated: Option<bool>,
    pub trimmed: Option<bool>,
}

impl RawFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub size: Option<String>,
    pub version: Option<String>,
    pub texture_file_name: Option<String>,
    pub texture_file_extension: Option<String>,
    pub scale: Option<String>,
}

/// 解析器輸出：依文件順序的 frame 與圖集 metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAtlas {
    pub frames: Vec<RawFrame>,
    pub metadata: RawMetadata,
}

impl RawAtlas {
    /// frame 名稱唯一，重複時保留第一次的位置並採用最後的值
    pub fn insert_frame(&mut self, frame: RawFrame) {
        match self.frames.iter_mut().find(|f| f.name == frame.name) {
            Some(existing) => {
                tracing::warn!("⚠️  Duplicate frame '{}', keeping the last entry", frame.name);
                *existing = frame;
            }
            None => self.frames.push(frame),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameIssue {
    #[error("missing {field}")]
    Missing { field: &'static str },

    #[error("malformed {field} '{value}'")]
    Malformed { field: &'static str, value: String },

    #[error("empty texture rect {w}x{h}")]
    EmptyTextureRect { w: u32, h: u32 },
}

/// 建模時被略過的 frame，不會中止轉換
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped frame '{frame}': {issue}")]
pub struct FrameWarning {
    pub frame: String,
    pub issue: FrameIssue,
}

/// 建模結果：圖集加上所有被略過的 frame
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub atlas: Atlas,
    pub warnings: Vec<FrameWarning>,
}

/// plist 缺少 metadata 時使用的預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasDefaults {
    pub size: Size,
    pub version: String,
    pub texture_file_name: String,
    pub scale: f64,
}

impl Default for AtlasDefaults {
    fn default() -> Self {
        Self {
            size: Size { w: 2048, h: 2048 },
            version: "1.5.5".to_string(),
            texture_file_name: "atlas".to_string(),
            scale: 1.0,
        }
    }
}

/// 輸出的引擎 JSON 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Pixi,
    Phaser,
    Pixijs,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Pixi, Dialect::Phaser, Dialect::Pixijs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Pixi => "pixi",
            Dialect::Phaser => "phaser",
            Dialect::Pixijs => "pixijs",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// plist 解析模式，auto 會在 strict 失敗時改用 tolerant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Auto,
    Strict,
    Tolerant,
}
