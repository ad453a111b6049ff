use std::path::PathBuf;

use image::Rgba;

use super::*;
use crate::ErrorKind;

fn sample() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(6, 4, Rgba([20, 40, 60, 255]));
    img.put_pixel(2, 1, Rgba([250, 0, 0, 255]));
    img
}

#[test]
fn closures_act_as_removers() {
    let mut clear_all = |img: &RgbaImage| -> TextBehindResult<RgbaImage> {
        Ok(RgbaImage::from_pixel(img.width(), img.height(), Rgba([0, 0, 0, 0])))
    };
    let out = clear_all.remove(&sample()).unwrap();
    assert_eq!(out.dimensions(), (6, 4));
    assert!(out.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn cutout_file_loads_from_disk() {
    let dir = PathBuf::from("target").join("removal_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cutout.png");
    sample().save(&path).unwrap();

    let out = CutoutFile::new(&path)
        .remove(&RgbaImage::new(1, 1))
        .unwrap();
    assert_eq!(out, sample());
}

#[test]
fn missing_cutout_file_is_a_removal_error() {
    let err = CutoutFile::new("target/removal_unit/nope.png")
        .remove(&sample())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Removal);
}

#[test]
fn unknown_program_is_a_removal_error() {
    let mut remover = CommandRemover::new("textbehind-no-such-tool", vec![]);
    let err = remover.remove(&sample()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Removal);
    assert!(err.to_string().contains("textbehind-no-such-tool"));
}

#[test]
fn default_command_is_rembg_image_mode() {
    let cmd = CommandRemover::default();
    assert_eq!(cmd.program, "rembg");
    assert_eq!(cmd.args, vec!["i".to_string()]);
}

#[cfg(unix)]
#[test]
fn command_output_is_decoded() {
    // `cp <in> <out>` behaves like a remover that keeps every pixel.
    let mut remover = CommandRemover::new("cp", vec![]);
    assert_eq!(remover.remove(&sample()).unwrap(), sample());
}

#[cfg(unix)]
#[test]
fn failing_command_reports_exit_status() {
    let mut remover = CommandRemover::new("sh", vec!["-c".into(), "echo nope >&2; exit 3".into()]);
    let err = remover.remove(&sample()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Removal);
    assert!(err.to_string().contains("nope"));
}
