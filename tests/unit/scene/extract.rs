use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "belleroom_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(4, 3, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

#[test]
fn layer_names_skip_header_and_reverse() {
    let listing = "Version 0, 1600x900 RGB color, 3 layers, compressed by RLE\n\
                   + 1600x900+0+0 RGB-alpha Normal Beard\n\
                   + 1600x900+0+0 RGB-alpha Normal Big Eyes\n\
                   + 1600x900+0+0 RGB Normal Cat\n";
    assert_eq!(
        parse_layer_names(listing),
        vec!["Cat".to_string(), "Big Eyes".to_string(), "Beard".to_string()]
    );
    assert!(parse_layer_names("").is_empty());
    assert!(parse_layer_names("header only\n\n").is_empty());
}

#[test]
fn xcf_paths_follow_scene_layout() {
    let x = XcfLayerExtractor::default();
    assert_eq!(x.source_path("cat"), PathBuf::from("scenes/cat.xcf"));
    assert_eq!(
        x.layer_path("cat", "Eyes"),
        PathBuf::from("layers/cat/Eyes.png")
    );
    assert_eq!(
        x.layer_path("cat", "a/b"),
        PathBuf::from("layers/cat/a_b.png")
    );
}

#[test]
fn failing_layer_tools_are_extraction_errors() {
    let root = temp_dir("xcf_tool_fail");
    let x = XcfLayerExtractor {
        layers_dir: root.join("layers"),
        xcfinfo: PathBuf::from("false"),
        xcf2png: PathBuf::from("false"),
        ..XcfLayerExtractor::default()
    };
    let source = root.join("cat.xcf");

    let err = x.layer_names(&source).unwrap_err();
    assert!(matches!(err, BelleError::Extraction(_)));
    assert!(err.to_string().contains("false exited with status"));

    let err = x.extract_layer(&source, "cat", "Eyes").unwrap_err();
    assert!(matches!(err, BelleError::Extraction(_)));
    assert!(err.to_string().contains("layer \"Eyes\""));

    assert!(matches!(
        x.extract_scene("cat"),
        Err(BelleError::Extraction(_))
    ));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn layer_tool_stderr_is_reported() {
    // `ls` on a missing file exits non-zero and names the file on stderr.
    let root = temp_dir("xcf_tool_stderr");
    let x = XcfLayerExtractor {
        layers_dir: root.join("layers"),
        xcf2png: PathBuf::from("ls"),
        ..XcfLayerExtractor::default()
    };
    let source = root.join("missing_scene.xcf");
    let err = x.extract_layer(&source, "cat", "Eyes").unwrap_err();
    assert!(matches!(err, BelleError::Extraction(_)));
    assert!(err.to_string().contains("missing_scene.xcf"), "{err}");

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn missing_layer_tool_is_reported() {
    let x = XcfLayerExtractor {
        xcfinfo: PathBuf::from("belleroom-no-such-xcfinfo"),
        ..XcfLayerExtractor::default()
    };
    let err = x.layer_names(Path::new("scenes/cat.xcf")).unwrap_err();
    assert!(matches!(err, BelleError::Extraction(_)));
    assert!(err.to_string().contains("belleroom-no-such-xcfinfo"));
}

#[test]
fn png_dir_orders_by_file_name_and_loads() {
    let root = temp_dir("png_dir_extract");
    let scene_dir = root.join("plate");
    std::fs::create_dir_all(&scene_dir).unwrap();
    write_png(&scene_dir.join("2_Plate.png"), [1, 2, 3]);
    write_png(&scene_dir.join("1_Cat.png"), [4, 5, 6]);
    std::fs::write(scene_dir.join("notes.txt"), "ignored").unwrap();

    let extractor = PngDirExtractor::new(&root);
    let layers = extractor.extract_scene("plate").unwrap();
    let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["1_Cat", "2_Plate"]);

    let scene = load_scene(&extractor, "plate").unwrap();
    assert_eq!(scene.name(), "plate");
    assert_eq!(scene.layers().len(), 2);
    let cat = scene.get_layer("1_Cat").unwrap();
    assert_eq!(cat.image().dimensions(), (4, 3));
    assert_eq!(cat.image().get_pixel(0, 0).0, [4, 5, 6]);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn png_dir_missing_scene_is_an_error() {
    let extractor = PngDirExtractor::new(temp_dir("png_dir_missing"));
    assert!(extractor.extract_scene("nope").is_err());
}

#[test]
fn extractor_config_defaults_to_xcf() {
    assert_eq!(
        ExtractorConfig::default(),
        ExtractorConfig::Xcf(XcfLayerExtractor::default())
    );
    let cfg: ExtractorConfig =
        serde_json::from_str(r#"{ "png_dir": { "root": "layers" } }"#).unwrap();
    assert_eq!(cfg, ExtractorConfig::PngDir(PngDirExtractor::new("layers")));
    let cfg: ExtractorConfig = serde_json::from_str(r#"{ "xcf": {} }"#).unwrap();
    assert_eq!(cfg, ExtractorConfig::default());
    let cfg: ExtractorConfig =
        serde_json::from_str(r#"{ "xcf": { "xcf2png": "/opt/xcftools/xcf2png" } }"#).unwrap();
    match cfg {
        ExtractorConfig::Xcf(x) => {
            assert_eq!(x.xcf2png, PathBuf::from("/opt/xcftools/xcf2png"));
            assert_eq!(x.xcfinfo, PathBuf::from("xcfinfo"));
        }
        other => panic!("unexpected extractor {other:?}"),
    }
}
