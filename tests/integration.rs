use image::Rgba;
use image_sketch::{
    EffectKind, Intensity, ProcessOptions, RasterImage, SketchEngine, MAX_DIMENSION,
};

fn solid(w: u32, h: u32, v: u8) -> RasterImage {
    RasterImage::from_pixel(w, h, Rgba([v, v, v, 255]))
}

fn photo(w: u32, h: u32) -> RasterImage {
    RasterImage::from_fn(w, h, |x, y| {
        let r = ((x * 7 + y * 3) % 256) as u8;
        let g = ((x * y) % 256) as u8;
        let b = ((x + 2 * y) % 256) as u8;
        Rgba([r, g, b, 255])
    })
}

#[test]
fn gray_effect_downscales_solid_gray_image() {
    let engine = SketchEngine::new();
    let img = solid(1000, 500, 128);
    let out = engine.render(&img, 0, Intensity::new(37)).unwrap();

    assert_eq!(out.dimensions(), (800, 400));
    for px in out.pixels() {
        assert_eq!(*px, Rgba([128, 128, 128, 255]));
    }
}

#[test]
fn sketch_of_white_image_stays_white() {
    let engine = SketchEngine::new();
    let img = solid(10, 10, 255);
    let out = engine.render(&img, 1, Intensity::new(10)).unwrap();

    assert_eq!(out.dimensions(), (10, 10));
    // gray 255, inverse 0, dodge 256 clamps to 255, averaged with white
    for px in out.pixels() {
        assert_eq!(*px, Rgba([255, 255, 255, 255]));
    }
}

#[test]
fn invalid_effect_returns_downscaled_input() {
    let engine = SketchEngine::new();

    let small = photo(64, 48);
    assert_eq!(engine.render(&small, 99, Intensity::new(5)).unwrap(), small);

    let large = photo(1200, 900);
    let expected = engine.downscale(&large, MAX_DIMENSION).unwrap();
    let out = engine.render(&large, 99, Intensity::new(5)).unwrap();
    assert_eq!(out.dimensions(), (800, 600));
    assert_eq!(out, expected);
}

#[test]
fn portrait_images_keep_aspect_ratio() {
    let engine = SketchEngine::new();
    let img = photo(333, 1001);
    let out = engine.downscale(&img, MAX_DIMENSION).unwrap();
    assert_eq!(out.dimensions(), (266, 800));
}

#[test]
fn every_effect_produces_opaque_output_of_source_size() {
    let engine = SketchEngine::new();
    let img = photo(40, 30);
    for effect in EffectKind::ALL {
        let out = engine.render_effect(&img, effect, Intensity::new(4)).unwrap();
        assert_eq!(out.dimensions(), (40, 30), "{effect}");
        assert!(out.pixels().all(|p| p[3] == 255), "{effect}");
    }
}

#[test]
fn gray_based_effects_are_colorless() {
    let engine = SketchEngine::new();
    let img = photo(32, 32);
    for id in [0, 5, 6, 7, 8] {
        let out = engine.render(&img, id, Intensity::new(3)).unwrap();
        for px in out.pixels() {
            assert_eq!(px[0], px[1], "effect {id}");
            assert_eq!(px[1], px[2], "effect {id}");
        }
    }
}

#[test]
fn rendering_is_deterministic_across_threads() {
    let engine = SketchEngine::new();
    let img = photo(48, 36);
    let expected = engine.render(&img, 4, Intensity::new(6)).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| engine.render(&img, 4, Intensity::new(6)).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn process_file_writes_rendering() {
    let dir = std::env::temp_dir().join(format!("image_sketch_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("photo.png");
    photo(900, 300).save(&input).unwrap();

    let engine = SketchEngine::new();
    let opts = ProcessOptions {
        effect: EffectKind::GrayToSoftSketch,
        intensity: Intensity::new(2),
        ..ProcessOptions::default()
    };
    let output = dir.join("out").join("photo_sketch.jpg");
    let result = engine.process_file(&input, &output, &opts);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.dimensions, Some((800, 267)));
    let saved = image::open(&output).unwrap();
    assert_eq!((saved.width(), saved.height()), (800, 267));

    let missing = engine.process_file(&dir.join("nope.png"), &output, &opts);
    assert!(!missing.success);

    std::fs::remove_dir_all(&dir).unwrap();
}
