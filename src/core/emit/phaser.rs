use super::{scale_number, FrameMap, SpriteSourceSize, TEXTURE_FORMAT};
use crate::domain::model::{Atlas, FrameRecord, Point, Rect, Size};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PhaserFrame {
    frame: Rect,
    source_size: Size,
    sprite_source_size: SpriteSourceSize,
    offset: Point,
    rotated: bool,
    trimmed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhaserMeta {
    image: String,
    format: &'static str,
    size: Size,
    scale: serde_json::Value,
}

#[derive(Serialize)]
pub(crate) struct PhaserDocument<'a> {
    frames: FrameMap<'a, PhaserFrame>,
    meta: PhaserMeta,
}

// 裁切位移另外放在 offset，spriteSourceSize 原點固定為 0
fn frame(record: &FrameRecord) -> PhaserFrame {
    PhaserFrame {
        frame: record.texture_rect,
        source_size: record.source_size,
        sprite_source_size: SpriteSourceSize::untranslated(record),
        offset: record.sprite_offset,
        rotated: record.rotated,
        trimmed: record.trimmed,
    }
}

pub(crate) fn document(atlas: &Atlas) -> PhaserDocument<'_> {
    let metadata = atlas.metadata();
    PhaserDocument {
        frames: FrameMap::from_atlas(atlas, frame),
        meta: PhaserMeta {
            image: metadata.image_name(),
            format: TEXTURE_FORMAT,
            size: metadata.size,
            scale: scale_number(metadata.scale),
        },
    }
}
