use image::RgbImage;

use super::*;

fn scene() -> Scene {
    Scene::new(
        "cat",
        vec![
            Layer::new("Cat", RgbImage::new(2, 2)),
            Layer::new("Eyes", RgbImage::new(3, 3)),
        ],
    )
}

#[test]
fn lookup_is_by_name() {
    let s = scene();
    assert_eq!(s.get_layer("Eyes").unwrap().image().width(), 3);
    assert_eq!(s.get_layer("Cat").unwrap().name(), "Cat");
    assert!(s.get_layer("Beard").is_none());
}

#[test]
fn require_layer_reports_scene_and_layer() {
    let err = scene().require_layer("Beard").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Beard"));
    assert!(msg.contains("cat"));
    assert!(matches!(err, BelleError::Validation(_)));
}

#[test]
fn display_lists_layers_in_order() {
    assert_eq!(scene().to_string(), "Scene: \"cat\" - [\"Cat\", \"Eyes\"]");
    assert_eq!(Scene::new("empty", vec![]).to_string(), "Scene: \"empty\"");
}
