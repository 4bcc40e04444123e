use super::{FrameMap, SpriteSourceSize, TEXTURE_FORMAT};
use crate::domain::model::{Atlas, FrameRecord, Rect, Size};
use serde::Serialize;

const APP: &str = "PixiJS";
const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpritesheetFrame {
    frame: Rect,
    source_size: Size,
    sprite_source_size: SpriteSourceSize,
    rotated: bool,
    trimmed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpritesheetMeta {
    app: &'static str,
    version: &'static str,
    image: String,
    format: &'static str,
    size: Size,
    scale: String,
}

#[derive(Serialize)]
pub(crate) struct SpritesheetDocument<'a> {
    frames: FrameMap<'a, SpritesheetFrame>,
    meta: SpritesheetMeta,
}

fn frame(record: &FrameRecord) -> SpritesheetFrame {
    SpritesheetFrame {
        frame: record.texture_rect,
        source_size: record.source_size,
        sprite_source_size: SpriteSourceSize::trimmed(record),
        rotated: record.rotated,
        trimmed: record.trimmed,
    }
}

pub(crate) fn document(atlas: &Atlas) -> SpritesheetDocument<'_> {
    let metadata = atlas.metadata();
    SpritesheetDocument {
        frames: FrameMap::from_atlas(atlas, frame),
        meta: SpritesheetMeta {
            app: APP,
            version: SCHEMA_VERSION,
            image: metadata.image_name(),
            format: TEXTURE_FORMAT,
            size: metadata.size,
            scale: metadata.scale.to_string(),
        },
    }
}
