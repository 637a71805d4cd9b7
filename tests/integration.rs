use std::path::Path;

use alpha_fill::{
    default_output_path, detect_transparent_pixels, fill_transparent_pixels, has_transparency,
    is_supported_image, parse_hex, preview_with_mask, process_file, save_image, transparency_mask,
    transparency_stats, visualize_transparency, DetectionMode, FillOptions, FillSession,
    PixelBuffer, Rgb,
};

fn buffer_from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> PixelBuffer {
    let data = pixels.iter().flatten().copied().collect();
    PixelBuffer::from_raw(width, height, data).unwrap()
}

#[test]
fn blue_fill_replaces_and_blends_as_expected() {
    // row-major: opaque red, transparent green, half-transparent blue, opaque yellow
    let buffer = buffer_from_pixels(
        2,
        2,
        &[
            [255, 0, 0, 255],
            [0, 255, 0, 0],
            [0, 0, 255, 128],
            [255, 255, 0, 255],
        ],
    );
    let blue = parse_hex("#0000ff").unwrap();

    let filled = fill_transparent_pixels(&buffer, blue, None).unwrap();

    // alpha 0: hard replace
    assert_eq!(filled.pixel(1, 0), [0, 0, 255, 255]);
    // alpha 128 over a blue original: both weights land on 255 blue
    assert_eq!(filled.pixel(0, 1), [0, 0, 255, 255]);
    // opaque pixels untouched
    assert_eq!(filled.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(filled.pixel(1, 1), [255, 255, 0, 255]);
}

#[test]
fn opaque_image_reports_no_transparency_and_fills_to_itself() {
    let buffer = buffer_from_pixels(1, 1, &[[10, 20, 30, 255]]);

    assert!(!has_transparency(&buffer, DetectionMode::All));
    assert!(!has_transparency(&buffer, DetectionMode::Contour));

    let filled = fill_transparent_pixels(&buffer, Rgb::WHITE, None).unwrap();
    assert_eq!(filled, buffer);
}

#[test]
fn all_transparent_image_yields_empty_contour_detection() {
    let buffer = PixelBuffer::new(20, 20).unwrap();

    assert!(detect_transparent_pixels(&buffer, DetectionMode::Contour).is_empty());
    assert!(!has_transparency(&buffer, DetectionMode::Contour));

    // while all-mode flags every pixel
    let all = detect_transparent_pixels(&buffer, DetectionMode::All);
    assert_eq!(all.len(), 400);
}

#[test]
fn contour_mode_spares_background_around_a_figure() {
    // opaque square with a transparent hole, on a transparent background
    let mut data = vec![0u8; 40 * 40 * 4];
    for y in 10..=25u32 {
        for x in 10..=25u32 {
            let i = ((y * 40 + x) * 4) as usize;
            data[i..i + 4].copy_from_slice(&[180, 40, 40, 255]);
        }
    }
    let hole = ((17u32 * 40 + 17) * 4) as usize;
    data[hole..hole + 4].copy_from_slice(&[0, 0, 0, 0]);
    let buffer = PixelBuffer::from_raw(40, 40, data).unwrap();

    let session = FillSession::new(buffer, DetectionMode::Contour);
    assert!(session.has_transparency());

    let filled = session.recolor(Rgb::WHITE).unwrap();
    // the hole gets the fill color
    assert_eq!(filled.pixel(17, 17), [255, 255, 255, 255]);
    // background far from the figure stays transparent
    assert_eq!(filled.pixel(39, 39), [0, 0, 0, 0]);
    assert_eq!(filled.pixel(0, 39), [0, 0, 0, 0]);
}

#[test]
fn session_recolor_never_compounds() {
    let buffer = buffer_from_pixels(1, 1, &[[0, 0, 0, 128]]);
    let session = FillSession::new(buffer, DetectionMode::All);

    let red = session.recolor(Rgb { r: 255, g: 0, b: 0 }).unwrap();
    assert_eq!(red.pixel(0, 0), [127, 0, 0, 255]);

    // a second recolor starts from the pristine original; compounding would
    // leave the previous red fill in place
    let blue = session.recolor(Rgb { r: 0, g: 0, b: 255 }).unwrap();
    assert_eq!(blue.pixel(0, 0), [0, 0, 127, 255]);
}

#[test]
fn whole_image_targeted_and_masked_fills_agree() {
    let buffer = buffer_from_pixels(
        3,
        1,
        &[[5, 5, 5, 0], [100, 150, 200, 64], [9, 9, 9, 255]],
    );
    let color = parse_hex("#336699").unwrap();

    let whole = fill_transparent_pixels(&buffer, color, None).unwrap();

    let detected = detect_transparent_pixels(&buffer, DetectionMode::All);
    let targeted = fill_transparent_pixels(&buffer, color, Some(&detected)).unwrap();

    let mask = transparency_mask(&buffer);
    let masked = preview_with_mask(&buffer, color, &mask).unwrap();

    assert_eq!(whole, targeted);
    assert_eq!(whole, masked);
}

#[test]
fn visualization_checkers_transparency_without_touching_content() {
    let mut data = vec![0u8; 16 * 16 * 4];
    let opaque = ((3u32 * 16 + 3) * 4) as usize;
    data[opaque..opaque + 4].copy_from_slice(&[77, 88, 99, 255]);
    let buffer = PixelBuffer::from_raw(16, 16, data).unwrap();

    let visual = visualize_transparency(&buffer);
    assert_eq!(visual.pixel(0, 0), [200, 200, 200, 255]);
    assert_eq!(visual.pixel(8, 0), [240, 240, 240, 255]);
    assert_eq!(visual.pixel(3, 3), [77, 88, 99, 255]);
}

#[test]
fn stats_count_transparency_classes() {
    let buffer = buffer_from_pixels(
        2,
        2,
        &[[0, 0, 0, 0], [0, 0, 0, 128], [0, 0, 0, 255], [0, 0, 0, 255]],
    );

    let stats = transparency_stats(&buffer);
    assert_eq!(stats.total_pixels, 4);
    assert_eq!(stats.transparent_pixels, 2);
    assert_eq!(stats.fully_transparent_pixels, 1);
    assert_eq!(stats.semi_transparent_pixels, 1);
    assert!((stats.transparent_percentage - 50.0).abs() < 1e-9);
    assert!(stats.has_transparency);
}

#[test]
fn engine_helpers_gate_formats_and_name_outputs() {
    assert!(is_supported_image(Path::new("in.png")));
    assert!(is_supported_image(Path::new("in.WEBP")));
    assert!(!is_supported_image(Path::new("in.jpg")));

    let out = default_output_path(Path::new("/data/photo.gif"));
    assert_eq!(out, Path::new("/data/photo_filled.png"));
}

#[test]
fn process_file_fills_then_skips_opaque_images() {
    let dir = std::env::temp_dir().join(format!("alpha-fill-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let input = dir.join("input.png");
    let buffer = buffer_from_pixels(2, 1, &[[0, 0, 0, 0], [10, 20, 30, 255]]);
    save_image(&buffer, &input).unwrap();

    // output under a directory that does not exist yet
    let output = dir.join("out").join("input_filled.png");
    let outcome = process_file(&input, &output, &FillOptions::default());
    assert!(outcome.success, "{}", outcome.message);
    assert!(!outcome.skipped);
    assert_eq!(outcome.transparent_pixels, 1);
    assert_eq!(outcome.stats.fully_transparent_pixels, 1);

    let reloaded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(reloaded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(reloaded.get_pixel(1, 0).0, [10, 20, 30, 255]);

    // a fully opaque image is skipped and nothing is written
    let opaque_input = dir.join("opaque.png");
    let opaque = buffer_from_pixels(1, 1, &[[9, 9, 9, 255]]);
    save_image(&opaque, &opaque_input).unwrap();

    let opaque_output = dir.join("opaque_filled.png");
    let outcome = process_file(&opaque_input, &opaque_output, &FillOptions::default());
    assert!(outcome.success);
    assert!(outcome.skipped);
    assert!(!opaque_output.exists());

    let _ = std::fs::remove_dir_all(&dir);
}
