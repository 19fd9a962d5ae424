//! COCO JSON writer (and reader, for checking written output).
//!
//! COCO bounding boxes use `[x, y, width, height]` with `(x, y)` the
//! top-left corner in absolute pixels, which is exactly how
//! [`BBoxXYWH<Pixel>`](super::BBoxXYWH) serializes.
//!
//! Records are written in the order they sit in the [`Dataset`]. The
//! converter appends them in id order, so no re-sorting is done here.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::model::Dataset;
use crate::error::Yolo2CocoError;

/// Output formatting options.
#[derive(Clone, Copy, Debug, Default)]
pub struct CocoWriteOptions {
    /// Pretty-print with indentation instead of a single compact line.
    pub pretty: bool,
}

/// Writes a dataset to a COCO JSON file, replacing any existing file.
pub fn write_coco_json(
    path: &Path,
    dataset: &Dataset,
    options: CocoWriteOptions,
) -> Result<(), Yolo2CocoError> {
    let file = File::create(path).map_err(|source| Yolo2CocoError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let result = if options.pretty {
        serde_json::to_writer_pretty(&mut writer, dataset)
    } else {
        serde_json::to_writer(&mut writer, dataset)
    };
    result.map_err(|source| Yolo2CocoError::CocoJsonWrite {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(|source| Yolo2CocoError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a COCO JSON file written by [`write_coco_json`].
pub fn read_coco_json(path: &Path) -> Result<Dataset, Yolo2CocoError> {
    let file = File::open(path).map_err(Yolo2CocoError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| Yolo2CocoError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes a dataset to a compact COCO JSON string.
pub fn to_coco_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string(dataset)
}

/// Parses a COCO JSON string.
pub fn from_coco_str(json: &str) -> Result<Dataset, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Annotation, BBoxXYWH, Category, Image};

    fn sample_dataset() -> Dataset {
        let mut dataset = Dataset::with_description("test");
        dataset.categories = vec![
            Category::new(0i64, "body", "object"),
            Category::new(1i64, "head", "object"),
        ];
        dataset.images = vec![Image::new(0u64, "a.jpg", 100, 50)];
        dataset.annotations = vec![Annotation::new(
            0u64,
            0u64,
            1i64,
            BBoxXYWH::new(10.0, 5.0, 20.0, 10.0),
        )];
        dataset
    }

    #[test]
    fn to_coco_string_uses_coco_layout() {
        let json = to_coco_string(&sample_dataset()).expect("serialize failed");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["info"]["description"], "test");
        assert_eq!(parsed["licenses"], serde_json::json!([]));
        assert_eq!(parsed["categories"][1]["name"], "head");
        assert_eq!(parsed["categories"][1]["supercategory"], "object");
        assert_eq!(parsed["images"][0]["file_name"], "a.jpg");
        assert_eq!(parsed["images"][0]["width"], 100);
        assert_eq!(
            parsed["annotations"][0]["bbox"],
            serde_json::json!([10.0, 5.0, 20.0, 10.0])
        );
        assert_eq!(parsed["annotations"][0]["area"], 200.0);
        assert_eq!(parsed["annotations"][0]["iscrowd"], 0);
    }

    #[test]
    fn write_then_read_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("instances_train.json");

        write_coco_json(&path, &sample_dataset(), CocoWriteOptions::default())
            .expect("write coco");
        let restored = read_coco_json(&path).expect("read coco");

        assert_eq!(restored.categories.len(), 2);
        assert_eq!(restored.images, sample_dataset().images);
        assert_eq!(restored.annotations, sample_dataset().annotations);
    }

    #[test]
    fn write_overwrites_existing_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("instances_val.json");
        std::fs::write(&path, "stale contents that are not json").expect("seed file");

        write_coco_json(&path, &sample_dataset(), CocoWriteOptions { pretty: true })
            .expect("write coco");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.starts_with("{\n"));
        assert!(from_coco_str(&contents).is_ok());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("missing/instances_test.json");

        let err = write_coco_json(&path, &sample_dataset(), CocoWriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, Yolo2CocoError::OutputWrite { .. }));
    }
}
