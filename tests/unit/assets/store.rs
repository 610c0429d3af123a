use std::io::Cursor;

use super::*;

use crate::model::config::OverlayType;
use crate::model::document::Document;

fn image_config(source: &str) -> DesignConfig {
    let mut cfg = Document::default().config;
    cfg.bg_image = Some(source.to_string());
    cfg.overlay_type = OverlayType::Black;
    cfg.bg_type = BackgroundType::Image;
    cfg
}

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("socialflow-assets-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn rel_paths_are_normalized() {
    assert_eq!(normalize_rel_path("a/./b//c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("./.").is_err());
    assert!(normalize_rel_path("C:/x.png").is_err());
}

#[test]
fn color_backgrounds_prepare_nothing() {
    let cfg = Document::default().config;
    assert!(PreparedAssets::prepare(&cfg, "/nowhere").is_empty());
}

#[test]
fn missing_background_is_skipped_not_fatal() {
    let root = temp_root("missing");
    let assets = PreparedAssets::prepare(&image_config("bg.png"), &root);
    assert!(assets.image("bg.png").is_none());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn background_image_is_decoded_from_the_root() {
    let root = temp_root("present");
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::create_dir_all(root.join("photos")).unwrap();
    std::fs::write(root.join("photos/bg.png"), &buf).unwrap();

    let assets = PreparedAssets::prepare(&image_config("photos/bg.png"), &root);
    let decoded = assets.image("photos/bg.png").unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(&decoded.rgba8_premul[..4], &[255, 0, 0, 255]);
    let _ = std::fs::remove_dir_all(&root);
}
