use std::fs;
use std::path::Path;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use yolo2coco::conversion::convert_partition;
use yolo2coco::ir::io_yolo::DimensionProbe;
use yolo2coco::ir::{BBoxCxCyWH, Normalized};
use yolo2coco::{ConvertConfig, Yolo2CocoError};

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config
}

/// Every image reports the same size; the files themselves are placeholders.
struct FixedProbe(u32, u32);

impl DimensionProbe for FixedProbe {
    fn dimensions(&self, _path: &Path) -> Result<(u32, u32), Yolo2CocoError> {
        Ok((self.0, self.1))
    }
}

fn arb_row() -> impl Strategy<Value = (u64, f64, f64, f64, f64)> {
    (0u64..3, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn transform_preserves_center_and_scales_size(
        (cx, cy, w, h) in (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64),
        width in 1u32..5000,
        height in 1u32..5000,
    ) {
        let bbox = BBoxCxCyWH::<Normalized>::new(cx, cy, w, h).to_pixel_xywh(width, height);
        let eps = f64::from(width.max(height)) * 1e-9;

        prop_assert!((bbox.w - w * f64::from(width)).abs() <= eps);
        prop_assert!((bbox.h - h * f64::from(height)).abs() <= eps);
        prop_assert!((bbox.x + bbox.w / 2.0 - cx * f64::from(width)).abs() <= eps);
        prop_assert!((bbox.y + bbox.h / 2.0 - cy * f64::from(height)).abs() <= eps);
        prop_assert_eq!(bbox.area(), bbox.w * bbox.h);
    }

    #[test]
    fn annotation_ids_follow_image_then_line_order(
        per_image in prop::collection::vec(prop::collection::vec(arb_row(), 0..5), 1..6),
        width in 1u32..2000,
        height in 1u32..2000,
    ) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images_dir = temp.path().join("images/train");
        let labels_dir = temp.path().join("labels/train");
        fs::create_dir_all(&images_dir).expect("create images dir");
        fs::create_dir_all(&labels_dir).expect("create labels dir");

        for (index, rows) in per_image.iter().enumerate() {
            fs::write(images_dir.join(format!("img_{index:02}.jpg")), b"").expect("write image");
            let contents: String = rows
                .iter()
                .map(|(c, x, y, w, h)| format!("{c} {x} {y} {w} {h}\n"))
                .collect();
            fs::write(labels_dir.join(format!("img_{index:02}.txt")), contents)
                .expect("write labels");
        }

        let config = ConvertConfig::new(temp.path(), ["body", "head", "leg"]);
        let out = convert_partition(
            "train",
            &images_dir,
            Some(&labels_dir),
            &config,
            &FixedProbe(width, height),
        )
        .expect("convert partition");

        let expected_image_ids: Vec<u64> = per_image
            .iter()
            .enumerate()
            .flat_map(|(index, rows)| std::iter::repeat(index as u64).take(rows.len()))
            .collect();
        let image_ids: Vec<u64> = out.dataset.annotations.iter().map(|a| a.image_id.as_u64()).collect();
        prop_assert_eq!(image_ids, expected_image_ids);

        for (expected_id, ann) in out.dataset.annotations.iter().enumerate() {
            prop_assert_eq!(ann.id.as_u64(), expected_id as u64);
            prop_assert_eq!(ann.area, ann.bbox.w * ann.bbox.h);
            prop_assert_eq!(ann.iscrowd, 0);
        }

        prop_assert_eq!(out.dataset.images.len(), per_image.len());
        prop_assert!(out.report.is_clean());
    }
}
