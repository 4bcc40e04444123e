use super::{FrameMap, SpriteSourceSize, TEXTURE_FORMAT};
use crate::domain::model::{Atlas, FrameRecord, Rect, Size};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PixiFrame {
    frame: Rect,
    source_size: Size,
    sprite_source_size: SpriteSourceSize,
    rotated: bool,
    trimmed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PixiMeta<'a> {
    image: String,
    format: &'static str,
    size: Size,
    scale: String,
    version: &'a str,
}

#[derive(Serialize)]
pub(crate) struct PixiDocument<'a> {
    frames: FrameMap<'a, PixiFrame>,
    meta: PixiMeta<'a>,
}

fn frame(record: &FrameRecord) -> PixiFrame {
    PixiFrame {
        frame: record.texture_rect,
        source_size: record.source_size,
        sprite_source_size: SpriteSourceSize::trimmed(record),
        rotated: record.rotated,
        trimmed: record.trimmed,
    }
}

pub(crate) fn document(atlas: &Atlas) -> PixiDocument<'_> {
    let metadata = atlas.metadata();
    PixiDocument {
        frames: FrameMap::from_atlas(atlas, frame),
        meta: PixiMeta {
            image: metadata.image_name(),
            format: TEXTURE_FORMAT,
            size: metadata.size,
            scale: metadata.scale.to_string(),
            version: &metadata.version,
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::core::emit::tests::sample_atlas;
    use crate::domain::model::Dialect;
    use serde_json::{json, Value};

    #[test]
    fn test_pixi_document() {
        let rendered = Dialect::Pixi.render(&sample_atlas()).unwrap();
        let json: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            json["frames"]["zeta.png"],
            json!({
                "frame": {"x": 10, "y": 20, "w": 30, "h": 40},
                "sourceSize": {"w": 50, "h": 60},
                "spriteSourceSize": {"x": 2, "y": 3, "w": 50, "h": 60},
                "rotated": true,
                "trimmed": true
            })
        );
        assert_eq!(
            json["frames"]["alpha.png"]["spriteSourceSize"],
            json!({"x": -5, "y": -3, "w": 8, "h": 8})
        );
        assert_eq!(
            json["meta"],
            json!({
                "image": "heroes.png",
                "format": "RGBA8888",
                "size": {"w": 512, "h": 256},
                "scale": "1",
                "version": "1.6.0"
            })
        );
    }
}
