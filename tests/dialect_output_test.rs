use plist_atlas::{build_atlas, AtlasDefaults, Dialect, ParseMode};
use serde_json::{json, Value};

fn plist(frames: &str, metadata: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>frames</key>
    <dict>
{}
    </dict>
    <key>metadata</key>
    <dict>
{}
    </dict>
</dict>
</plist>"#,
        frames, metadata
    )
}

fn frame(name: &str, rect: &str, source: &str, offset: &str) -> String {
    format!(
        r#"        <key>{}</key>
        <dict>
            <key>spriteOffset</key>
            <string>{}</string>
            <key>spriteSourceSize</key>
            <string>{}</string>
            <key>textureRect</key>
            <string>{}</string>
            <key>textureRotated</key>
            <false/>
        </dict>"#,
        name, offset, source, rect
    )
}

fn render(text: &str, mode: ParseMode, dialect: Dialect) -> Value {
    let outcome = build_atlas(text, mode, AtlasDefaults::default()).unwrap();
    serde_json::from_str(&dialect.render(&outcome.atlas).unwrap()).unwrap()
}

#[test]
fn test_texture_rect_is_copied_exactly_in_every_dialect() {
    let text = plist(
        &frame("a.png", "{{10,20},{30,40}}", "{30,40}", "{0,0}"),
        "<key>size</key><string>{64,64}</string>",
    );

    for mode in [ParseMode::Strict, ParseMode::Tolerant] {
        for dialect in Dialect::ALL {
            let json = render(&text, mode, dialect);
            assert_eq!(
                json["frames"]["a.png"]["frame"],
                json!({"x": 10, "y": 20, "w": 30, "h": 40}),
                "{:?} / {}",
                mode,
                dialect
            );
        }
    }
}

#[test]
fn test_sprite_source_size_asymmetry() {
    let text = plist(&frame("a.png", "{{0,0},{46,54}}", "{50,60}", "{2,3}"), "");

    for dialect in [Dialect::Pixi, Dialect::Pixijs] {
        let json = render(&text, ParseMode::Strict, dialect);
        let a = &json["frames"]["a.png"];
        assert_eq!(a["spriteSourceSize"], json!({"x": 2, "y": 3, "w": 50, "h": 60}));
        assert_eq!(a["sourceSize"], json!({"w": 50, "h": 60}));
        assert!(a.get("offset").is_none());
    }

    let json = render(&text, ParseMode::Strict, Dialect::Phaser);
    let a = &json["frames"]["a.png"];
    assert_eq!(a["spriteSourceSize"], json!({"x": 0, "y": 0, "w": 50, "h": 60}));
    assert_eq!(a["offset"], json!({"x": 2, "y": 3}));
}

#[test]
fn test_negative_offsets_keep_their_sign() {
    let text = plist(&frame("a.png", "{{0,0},{8,8}}", "{18,14}", "{-5,-3}"), "");

    let pixi = render(&text, ParseMode::Tolerant, Dialect::Pixi);
    assert_eq!(pixi["frames"]["a.png"]["spriteSourceSize"]["x"], -5);
    assert_eq!(pixi["frames"]["a.png"]["spriteSourceSize"]["y"], -3);

    let phaser = render(&text, ParseMode::Tolerant, Dialect::Phaser);
    assert_eq!(phaser["frames"]["a.png"]["offset"], json!({"x": -5, "y": -3}));
}

#[test]
fn test_missing_size_uses_default() {
    let text = plist(&frame("a.png", "{{0,0},{8,8}}", "{8,8}", "{0,0}"), "");

    for mode in [ParseMode::Strict, ParseMode::Tolerant] {
        for dialect in Dialect::ALL {
            let json = render(&text, mode, dialect);
            assert_eq!(json["meta"]["size"], json!({"w": 2048, "h": 2048}));
            assert_eq!(json["meta"]["image"], "atlas.png");
        }
    }
    assert_eq!(
        render(&text, ParseMode::Strict, Dialect::Pixi)["meta"]["version"],
        "1.5.5"
    );
}

#[test]
fn test_frame_count_matches_input() {
    let frames: Vec<String> = (0..5)
        .map(|i| {
            frame(
                &format!("sprite_{}.png", i),
                &format!("{{{{{},0}},{{8,8}}}}", i * 8),
                "{8,8}",
                "{0,0}",
            )
        })
        .collect();
    let text = plist(&frames.join("\n"), "");

    for dialect in Dialect::ALL {
        let json = render(&text, ParseMode::Auto, dialect);
        assert_eq!(json["frames"].as_object().unwrap().len(), 5);
        assert_eq!(json["frames"]["sprite_4.png"]["frame"]["x"], 32);
    }
}

#[test]
fn test_strict_and_tolerant_agree() {
    let text = include_str!("fixtures/Fishtales.plist");

    let strict = build_atlas(text, ParseMode::Strict, AtlasDefaults::default()).unwrap();
    let tolerant = build_atlas(text, ParseMode::Tolerant, AtlasDefaults::default()).unwrap();

    assert_eq!(strict.atlas, tolerant.atlas);
}
