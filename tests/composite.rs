//! End-to-end compositing tests over a synthetic input root.
//!
//! Sheets are built in memory with one marked sprite pixel per color block
//! so every assertion can name the exact output pixel it expects.
use std::fs;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use fesprite::{CompositeMode, CompositeParams, Error};

/// Head sheet: four 192-row color blocks; one large-head idle pixel at
/// (10, 0) per block, red channel encoding the block index, mask level 100.
fn head_sheet() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(256, 768, Rgba([0, 0, 0, 0xFF]));
    for block in 0..4u32 {
        let y = 192 * block;
        img.put_pixel(10, y, Rgba([40 + 10 * block as u8, 20, 30, 0xFF]));
        img.put_pixel(128 + 10, y, Rgba([100, 100, 100, 0xFF]));
    }
    img
}

/// Body sheet: four 96-row color blocks; one idle pixel at (5, 1) per
/// block, green channel encoding the block index, mask level 150.
fn body_sheet() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(256, 384, Rgba([0, 0, 0, 0xFF]));
    for block in 0..4u32 {
        let y = 96 * block;
        img.put_pixel(5, y + 1, Rgba([0, 40 + 10 * block as u8, 0, 0xFF]));
        img.put_pixel(128 + 5, y + 1, Rgba([150, 150, 150, 0xFF]));
    }
    img
}

/// Write sheets for one head ("hero") and one body class ("test-class"),
/// then register them in the path tables.
fn setup_root(dir: &TempDir) {
    let root = dir.path();
    fs::create_dir_all(root.join("head")).unwrap();
    fs::create_dir_all(root.join("body")).unwrap();
    head_sheet().save(root.join("head").join("hero.png")).unwrap();
    body_sheet().save(root.join("body").join("test-class.png")).unwrap();
    fesprite::scan_sheets(root).unwrap();
}

#[test]
fn idle_composite_to_path() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    let output = root.join("out").join("sheet.png");
    fesprite::composite_to_path(
        root,
        "hero",
        "test-class",
        &CompositeParams::default(),
        &output,
    )
    .unwrap();

    let out = image::open(&output).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (128, 160));

    // Blue region reads source block 3; purple region block 0.
    assert_eq!(*out.get_pixel(10, 0), Rgba([70, 20, 30, 0xFF]));
    assert_eq!(*out.get_pixel(5, 1), Rgba([0, 70, 0, 0xFF]));
    assert_eq!(*out.get_pixel(10, 32), Rgba([60, 20, 30, 0xFF])); // red: block 2
    assert_eq!(*out.get_pixel(10, 64), Rgba([50, 20, 30, 0xFF])); // green: block 1
    assert_eq!(*out.get_pixel(10, 96), Rgba([40, 20, 30, 0xFF])); // purple: block 0

    // Greyscale region derives from the purple variant.
    assert_eq!(*out.get_pixel(10, 128), Rgba([27, 27, 27, 0xFF]));

    // Transparent background everywhere else.
    assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*out.get_pixel(127, 159), Rgba([0, 0, 0, 0]));
}

#[test]
fn full_composite_has_three_state_rows() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    let params = CompositeParams {
        mode: CompositeMode::Full,
        ..Default::default()
    };
    let sheet = fesprite::composite_to_buffer(root, "hero", "test-class", &params).unwrap();
    assert_eq!(sheet.image.dimensions(), (128, 480));
    assert_eq!(sheet.metadata.width, 128);
    assert_eq!(sheet.metadata.height, 480);

    // Idle rows are unchanged from idle mode.
    assert_eq!(*sheet.image.get_pixel(10, 0), Rgba([70, 20, 30, 0xFF]));
    assert_eq!(*sheet.image.get_pixel(10, 288), Rgba([40, 20, 30, 0xFF]));
    assert_eq!(*sheet.image.get_pixel(10, 384), Rgba([27, 27, 27, 0xFF]));
}

#[test]
fn no_alpha_mode_keeps_black_fill() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    let params = CompositeParams {
        alpha: false,
        ..Default::default()
    };
    let sheet = fesprite::composite_to_buffer(root, "hero", "test-class", &params).unwrap();
    // Layer fill stays opaque black instead of transparency, so each layer
    // covers the ones below it; the body layer (level 150) pasted last wins.
    assert_eq!(*sheet.image.get_pixel(0, 0), Rgba([0, 0, 0, 0xFF]));
    assert_eq!(*sheet.image.get_pixel(5, 1), Rgba([0, 70, 0, 0xFF]));
    assert_eq!(*sheet.image.get_pixel(10, 0), Rgba([0, 0, 0, 0xFF]));
}

#[test]
fn head_offsets_json_shifts_frames() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    fs::write(
        root.join("head_offsets.json"),
        r#"{
            "test-class": {
                "size": "large",
                "offset": {
                    "idle": [[1, -2], [1, -2], [1, -2], [1, -2]]
                }
            }
        }"#,
    )
    .unwrap();

    let sheet =
        fesprite::composite_to_buffer(root, "hero", "test-class", &CompositeParams::default())
            .unwrap();
    // dx +1, dy -2 moves the head pixel right one and down two.
    assert_eq!(*sheet.image.get_pixel(11, 2), Rgba([70, 20, 30, 0xFF]));
    assert_eq!(*sheet.image.get_pixel(10, 0), Rgba([0, 0, 0, 0]));
    // The body pixel is unaffected.
    assert_eq!(*sheet.image.get_pixel(5, 1), Rgba([0, 70, 0, 0xFF]));
}

#[test]
fn sidecar_is_written_on_request() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    let params = CompositeParams {
        sidecar: true,
        ..Default::default()
    };
    let output = root.join("out").join("sheet.png");
    fesprite::composite_to_path(root, "hero", "test-class", &params, &output).unwrap();

    let raw = fs::read_to_string(root.join("out").join("sheet.json")).unwrap();
    let meta: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(meta["head"], "hero");
    assert_eq!(meta["body"], "test-class");
    assert_eq!(meta["mode"], "idle");
    assert_eq!(meta["head_size"], "large");
    assert_eq!(meta["conversion_tool"], "fesprite");
    assert_eq!(meta["height"], 160);
}

#[test]
fn unknown_names_fail_before_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    let output = root.join("out.png");
    let err = fesprite::composite_to_path(
        root,
        "nobody",
        "test-class",
        &CompositeParams::default(),
        &output,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownHead { name } if name == "nobody"));

    let err =
        fesprite::composite_to_buffer(root, "hero", "no-class", &CompositeParams::default())
            .unwrap_err();
    assert!(matches!(err, Error::UnknownBody { name } if name == "no-class"));

    assert!(!output.exists());
}

#[test]
fn batch_composites_every_registered_body() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    setup_root(&dir);

    // Second body class plus a registered entry whose sheet is missing.
    body_sheet().save(root.join("body").join("other-class.png")).unwrap();
    fesprite::scan_sheets(root).unwrap();

    let table_path = root.join("body.json");
    let mut table: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&table_path).unwrap()).unwrap();
    table["ghost-class"] = serde_json::json!({
        "path": ["body", "ghost-class.png"],
        "name": "Ghost Class"
    });
    fs::write(&table_path, serde_json::to_string_pretty(&table).unwrap()).unwrap();

    let out_dir = root.join("outputs");
    let report = fesprite::composite_directory_to_path(
        root,
        "hero",
        &out_dir,
        &CompositeParams::default(),
        true,
    )
    .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert!(out_dir.join("hero_test-class.png").is_file());
    assert!(out_dir.join("hero_other-class.png").is_file());
    assert!(!out_dir.join("hero_ghost-class.png").exists());
}

#[test]
fn scan_registers_display_names() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("head")).unwrap();
    fs::create_dir_all(root.join("body")).unwrap();
    head_sheet().save(root.join("head").join("adventurer-f.png")).unwrap();

    let (heads, bodies) = fesprite::scan_sheets(root).unwrap();
    assert_eq!(heads, 1);
    assert_eq!(bodies, 0);

    let table: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("head.json")).unwrap()).unwrap();
    assert_eq!(table["adventurer-f"]["name"], "Adventurer (F)");
    assert_eq!(table["adventurer-f"]["path"][0], "head");
    assert_eq!(table["adventurer-f"]["path"][1], "adventurer-f.png");
}

#[test]
fn prepare_stacks_raw_rips() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("raw_body")).unwrap();

    // Custom rect table small enough for a compact synthetic rip.
    fs::write(
        root.join(".raw_body.json"),
        r#"{
            "?::default": {
                "0": { "idle": [0, 0, 8, 2],  "left": [0, 2, 8, 2],  "right": [0, 4, 8, 2] },
                "1": { "idle": [0, 6, 8, 2],  "left": [0, 8, 8, 2],  "right": [0, 10, 8, 2] },
                "2": { "idle": [0, 12, 8, 2], "left": [0, 14, 8, 2], "right": [0, 16, 8, 2] },
                "3": { "idle": [0, 18, 8, 2], "left": [0, 20, 8, 2], "right": [0, 22, 8, 2] }
            }
        }"#,
    )
    .unwrap();

    let mut rip = RgbaImage::from_pixel(8, 24, Rgba([0, 0, 0, 0xFF]));
    for y in 0..24u32 {
        rip.put_pixel(0, y, Rgba([y as u8 + 1, 0, 0, 0xFF]));
    }
    rip.save(root.join("raw_body").join("some-class.png")).unwrap();

    let report = fesprite::prepare_directory(root).unwrap();
    assert_eq!(report.heads, 0);
    assert_eq!(report.bodies, 1);

    let prepared = image::open(root.join("body").join("some-class.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(prepared.dimensions(), (256, 384));
    // Slot k holds rip rows 2k: row 0 of slot 5 came from rip row 10.
    assert_eq!(prepared.get_pixel(0, 0).0[0], 1);
    assert_eq!(prepared.get_pixel(0, 5 * 32).0[0], 11);
    // Untouched canvas stays opaque black.
    assert_eq!(*prepared.get_pixel(200, 0), Rgba([0, 0, 0, 0xFF]));
}

#[test]
fn missing_table_suggests_scan() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let err = fesprite::composite_to_buffer(
        root,
        "hero",
        "test-class",
        &CompositeParams::default(),
    )
    .unwrap_err();
    match err {
        Error::Data(e) => assert!(e.to_string().contains("head.json")),
        other => panic!("expected a data table error, got {other}"),
    }

    // An empty root still scans cleanly to empty tables.
    let (heads, bodies) = fesprite::scan_sheets(root).unwrap();
    assert_eq!((heads, bodies), (0, 0));
    assert!(root.join("head.json").is_file());
}
