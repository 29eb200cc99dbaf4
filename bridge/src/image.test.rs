use std::fs;
use std::path::PathBuf;

use image::DynamicImage;
use image::RgbImage;
use tempfile::TempDir;

use super::*;

fn fixture_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(8, 8, |x, _| {
        if x < 4 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    }))
}

fn write_fixture(dir: &TempDir, name: &str, format: ImageFormat) -> PathBuf {
    let path = dir.path().join(name);
    fixture_image().save_with_format(&path, format).unwrap();
    path
}

#[test]
fn test_unreadable_uri_is_image_resolution_error() {
    let err = resolve(&ImageReference::new("/nonexistent/img.png")).unwrap_err();

    assert!(matches!(err, GeminiXError::ImageResolution { .. }));
    assert!(err.to_string().contains("/nonexistent/img.png"));
}

#[test]
fn test_png_passes_through_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "img.png", ImageFormat::Png);
    let on_disk = fs::read(&path).unwrap();

    let resolved = resolve(&ImageReference::new(path.to_string_lossy())).unwrap();

    assert_eq!(resolved.mime_type, "image/png");
    assert_eq!(resolved.bytes, on_disk);
}

#[test]
fn test_jpeg_passes_through_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "img.jpg", ImageFormat::Jpeg);
    let on_disk = fs::read(&path).unwrap();

    let resolved = resolve(&ImageReference::new(path.to_string_lossy())).unwrap();

    assert_eq!(resolved.mime_type, "image/jpeg");
    assert_eq!(resolved.bytes, on_disk);
}

#[test]
fn test_file_scheme_is_stripped() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "img.png", ImageFormat::Png);

    let uri = format!("file://{}", path.to_string_lossy());
    let resolved = resolve(&ImageReference::new(uri)).unwrap();

    assert_eq!(resolved.mime_type, "image/png");
}

#[test]
fn test_explicit_mime_type_wins_over_sniffing() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "img.png", ImageFormat::Png);
    let on_disk = fs::read(&path).unwrap();

    let reference =
        ImageReference::new(path.to_string_lossy()).with_mime_type("image/jpeg");
    let resolved = resolve(&reference).unwrap();

    // Trusted verbatim: declared JPEG, bytes untouched.
    assert_eq!(resolved.mime_type, "image/jpeg");
    assert_eq!(resolved.bytes, on_disk);
}

#[test]
fn test_gif_reencodes_to_jpeg() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "img.gif", ImageFormat::Gif);
    let on_disk = fs::read(&path).unwrap();

    let resolved = resolve(&ImageReference::new(path.to_string_lossy())).unwrap();

    assert_eq!(resolved.mime_type, "image/jpeg");
    assert_ne!(resolved.bytes, on_disk);
    assert_eq!(
        image::guess_format(&resolved.bytes).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn test_undecodable_bytes_with_declared_mime() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF-1.4 not an image").unwrap();

    let reference =
        ImageReference::new(path.to_string_lossy()).with_mime_type("application/pdf");
    let err = resolve(&reference).unwrap_err();

    assert_eq!(err.to_string(), "unsupported MIME type: application/pdf");
}

#[test]
fn test_untypable_bytes_report_unknown() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blob");
    fs::write(&path, b"\x00\x01\x02\x03 opaque").unwrap();

    let err = resolve(&ImageReference::new(path.to_string_lossy())).unwrap_err();

    assert_eq!(err.to_string(), "unsupported MIME type: unknown");
}

#[test]
fn test_resolve_all_preserves_order_and_fails_fast() {
    let dir = TempDir::new().unwrap();
    let png = write_fixture(&dir, "a.png", ImageFormat::Png);
    let jpg = write_fixture(&dir, "b.jpg", ImageFormat::Jpeg);

    let resolved = resolve_all(&[
        ImageReference::new(png.to_string_lossy()),
        ImageReference::new(jpg.to_string_lossy()),
    ])
    .unwrap();
    assert_eq!(resolved[0].mime_type, "image/png");
    assert_eq!(resolved[1].mime_type, "image/jpeg");

    let err = resolve_all(&[
        ImageReference::new(png.to_string_lossy()),
        ImageReference::new("/missing.png"),
    ])
    .unwrap_err();
    assert!(matches!(err, GeminiXError::ImageResolution { .. }));
}
