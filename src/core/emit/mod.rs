pub mod phaser;
pub mod pixi;
pub mod pixijs;

use crate::domain::model::{Atlas, Dialect, FrameRecord};
use crate::utils::error::Result;
use serde::ser::{Serialize, Serializer};
use std::path::{Path, PathBuf};

pub(crate) const TEXTURE_FORMAT: &str = "RGBA8888";

/// `spriteSourceSize`：原點為裁切位移，寬高為原始尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub(crate) struct SpriteSourceSize {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl SpriteSourceSize {
    pub fn trimmed(frame: &FrameRecord) -> Self {
        Self {
            x: frame.sprite_offset.x,
            y: frame.sprite_offset.y,
            w: frame.source_size.w,
            h: frame.source_size.h,
        }
    }

    pub fn untranslated(frame: &FrameRecord) -> Self {
        Self {
            x: 0,
            y: 0,
            w: frame.source_size.w,
            h: frame.source_size.h,
        }
    }
}

/// frame 名稱 → frame 內容，依加入順序輸出成 JSON 物件
pub(crate) struct FrameMap<'a, T>(pub Vec<(&'a str, T)>);

impl<'a, T> FrameMap<'a, T> {
    pub fn from_atlas(atlas: &'a Atlas, entry: impl Fn(&FrameRecord) -> T) -> Self {
        Self(
            atlas
                .frames()
                .iter()
                .map(|frame| (frame.name.as_str(), entry(frame)))
                .collect(),
        )
    }
}

impl<T: Serialize> Serialize for FrameMap<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, entry)| (name, entry)))
    }
}

/// 縮放比例輸出成 JSON 數字，整數時不帶小數
pub(crate) fn scale_number(scale: f64) -> serde_json::Value {
    if scale.fract() == 0.0 && scale.abs() < i64::MAX as f64 {
        serde_json::Value::from(scale as i64)
    } else {
        serde_json::Value::from(scale)
    }
}

fn to_pretty_json<T: Serialize>(document: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

impl Dialect {
    pub fn suffix(&self) -> &'static str {
        match self {
            Dialect::Pixi => "-pixi.json",
            Dialect::Phaser => "-phaser.json",
            Dialect::Pixijs => "-pixijs.json",
        }
    }

    /// 輸出兩格縮排的 JSON
    pub fn render(&self, atlas: &Atlas) -> Result<String> {
        match self {
            Dialect::Pixi => to_pretty_json(&pixi::document(atlas)),
            Dialect::Phaser => to_pretty_json(&phaser::document(atlas)),
            Dialect::Pixijs => to_pretty_json(&pixijs::document(atlas)),
        }
    }

    /// 輸出檔路徑：副檔名換成 dialect 後綴，有 `output_dir` 時寫到該目錄
    pub fn output_path(&self, input: &str, output_dir: Option<&str>) -> String {
        let path = Path::new(input);
        let stem = match path.extension() {
            Some(_) => path.file_stem(),
            None => path.file_name(),
        }
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "atlas".to_string());

        let dir = match output_dir {
            Some(dir) => PathBuf::from(dir),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        dir.join(format!("{}{}", stem, self.suffix()))
            .to_string_lossy()
            .into_owned()
    }
}
