use super::*;
use crate::foundation::core::{Canvas, Rgb8};
use crate::scene::extract::PngDirExtractor;

const MINIMAL: &str = r#"{ "steps": [ { "delay": 1 } ] }"#;

#[test]
fn minimal_storyboard_uses_defaults() {
    let sb = Storyboard::from_json_str(MINIMAL).unwrap();
    assert_eq!(sb.room, RoomConfig::default());
    assert_eq!(sb.frames_dir, PathBuf::from("frames"));
    assert_eq!(sb.frame_digits, 10);
    assert_eq!(sb.output, None);
    assert!(sb.cleanup);
    assert_eq!(sb.extractor, ExtractorConfig::default());
    assert_eq!(sb.encoder, FfmpegEncoder::default());
    assert_eq!(sb.steps, vec![Step::Delay(1.0)]);
    sb.validate().unwrap();
}

#[test]
fn full_storyboard_parses_every_field() {
    let json = r#"{
        "name": "Cat",
        "canvas": { "width": 320, "height": 180 },
        "background": { "r": 10, "g": 20, "b": 30 },
        "fps": { "num": 12, "den": 1 },
        "wiggle": false,
        "wiggle_rate": 1.5,
        "noise_seed": 3,
        "frames_dir": "out/frames",
        "frame_digits": 6,
        "output": "out/cat.m4v",
        "cleanup": false,
        "extractor": { "png_dir": { "root": "layers" } },
        "steps": [
            { "draw": { "scene": "cat", "layer": "Cat", "seconds": 2 } },
            { "delay": 0.8 },
            "clear",
            { "draw": { "scene": "plate", "layer": "Plate", "seconds": 0.5 } },
            { "draw": { "scene": "cat", "layer": "Eyes", "seconds": 1 } }
        ]
    }"#;
    let sb = Storyboard::from_json_str(json).unwrap();
    assert_eq!(sb.room.name, "Cat");
    assert_eq!(
        sb.room.canvas,
        Canvas {
            width: 320,
            height: 180
        }
    );
    assert_eq!(sb.room.background, Rgb8::new(10, 20, 30));
    assert_eq!(sb.room.fps.num, 12);
    assert!(!sb.room.wiggle);
    assert_eq!(sb.room.wiggle_rate, 1.5);
    assert_eq!(sb.room.noise_seed, 3);
    assert_eq!(sb.frames_dir, PathBuf::from("out/frames"));
    assert_eq!(sb.frame_digits, 6);
    assert_eq!(sb.output, Some(PathBuf::from("out/cat.m4v")));
    assert!(!sb.cleanup);
    assert_eq!(
        sb.extractor,
        ExtractorConfig::PngDir(PngDirExtractor::new("layers"))
    );
    assert_eq!(sb.steps.len(), 5);
    assert_eq!(sb.steps[2], Step::Clear);
    assert_eq!(sb.scene_names(), vec!["cat", "plate"]);
    sb.validate().unwrap();
}

#[test]
fn validation_rejects_bad_steps() {
    let mut sb = Storyboard::from_json_str(MINIMAL).unwrap();
    sb.steps.clear();
    assert!(sb.validate().is_err());

    sb.steps = vec![Step::Delay(-1.0)];
    assert!(sb.validate().is_err());

    sb.steps = vec![Step::Draw(DrawStep {
        scene: "cat".to_string(),
        layer: String::new(),
        seconds: 1.0,
    })];
    assert!(sb.validate().is_err());

    sb.steps = vec![Step::Draw(DrawStep {
        scene: "cat".to_string(),
        layer: "Cat".to_string(),
        seconds: f64::NAN,
    })];
    assert!(sb.validate().is_err());

    sb.steps = vec![Step::Delay(1e18)];
    assert!(matches!(sb.validate(), Err(BelleError::Validation(_))));
    sb.steps = vec![Step::Delay(MAX_STEP_SECS)];
    assert!(sb.validate().is_ok());

    sb.steps = vec![Step::Clear];
    sb.frame_digits = 0;
    assert!(sb.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Storyboard::from_json_str(r#"{ "steps": [ { "wobble": 1 } ] }"#).unwrap_err();
    assert!(matches!(err, BelleError::Serde(_)));
    assert!(matches!(
        Storyboard::from_json_str("{}"),
        Err(BelleError::Serde(_))
    ));
}

#[test]
fn bundled_storyboard_mirrors_the_cat_short() {
    let sb: Storyboard =
        serde_json::from_str(include_str!("../../../storyboards/cat.json")).unwrap();
    sb.validate().unwrap();
    assert_eq!(
        sb.scene_names(),
        vec!["cat", "cooking", "plate", "sick", "credits"]
    );
    assert_eq!(sb.output, Some(PathBuf::from("output.m4v")));
    assert_eq!(sb.room.canvas.width, 1600);
}
