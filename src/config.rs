//! Conversion configuration.
//!
//! A [`ConvertConfig`] is built once (from a YAML file, from CLI flags, or in
//! code) and passed by reference to the driver and converter. Nothing reads
//! configuration from process-wide state.
//!
//! ```yaml
//! root: /data/cattle
//! partitions: [train, val, test]
//! classes: [body, head, leg]
//! image_extensions: [jpg, jpeg, png, bmp, tif]
//! supercategory: cattle_parts
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Yolo2CocoError;
use crate::ir::io_yolo::DEFAULT_IMAGE_EXTENSIONS;
use crate::ir::DEFAULT_DESCRIPTION;

pub const DEFAULT_PARTITIONS: [&str; 3] = ["train", "val", "test"];
/// Supercategory written on every category unless `supercategory` is set in
/// the config file or with `--supercategory`.
pub const DEFAULT_SUPERCATEGORY: &str = "object";

/// Everything the driver needs to convert a dataset root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Dataset root containing `images/` and `labels/`.
    pub root: PathBuf,

    /// Partition names, processed in this order.
    #[serde(default = "default_partitions")]
    pub partitions: Vec<String>,

    /// Class names; a name's position is its category id.
    #[serde(default)]
    pub classes: Vec<String>,

    /// Accepted image extensions, lower-case without the leading dot.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Supercategory written on every category.
    #[serde(default = "default_supercategory")]
    pub supercategory: String,

    /// Written as `info.description`.
    #[serde(default = "default_description")]
    pub description: String,

    /// Pretty-print the output JSON.
    #[serde(default)]
    pub pretty: bool,
}

fn default_partitions() -> Vec<String> {
    DEFAULT_PARTITIONS.iter().map(|p| p.to_string()).collect()
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_supercategory() -> String {
    DEFAULT_SUPERCATEGORY.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl ConvertConfig {
    /// Creates a config with default partitions, extensions, and metadata.
    pub fn new<I, S>(root: impl Into<PathBuf>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            partitions: default_partitions(),
            classes: classes.into_iter().map(Into::into).collect(),
            image_extensions: default_image_extensions(),
            supercategory: default_supercategory(),
            description: default_description(),
            pretty: false,
        }
    }

    pub fn with_partitions<I, S>(mut self, partitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = partitions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_supercategory(mut self, supercategory: impl Into<String>) -> Self {
        self.supercategory = supercategory.into();
        self
    }

    /// Loads and validates a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, Yolo2CocoError> {
        Self::read_yaml_file(path)?.validated()
    }

    /// Loads a YAML config file without validating it, so callers can
    /// override fields before calling [`validated`](Self::validated).
    pub fn read_yaml_file(path: &Path) -> Result<Self, Yolo2CocoError> {
        let data = fs::read_to_string(path).map_err(|source| Yolo2CocoError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&data).map_err(|source| Yolo2CocoError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Normalizes extensions and rejects configs that cannot convert anything.
    pub fn validated(mut self) -> Result<Self, Yolo2CocoError> {
        if self.partitions.is_empty() {
            return Err(Yolo2CocoError::InvalidConfig(
                "at least one partition is required".to_string(),
            ));
        }
        for partition in &self.partitions {
            if !is_plain_dir_name(partition) {
                return Err(Yolo2CocoError::InvalidConfig(format!(
                    "partition name '{partition}' must be a single directory name"
                )));
            }
        }

        if self.classes.is_empty() {
            return Err(Yolo2CocoError::InvalidConfig(
                "at least one class name is required".to_string(),
            ));
        }
        if let Some(index) = self.classes.iter().position(|c| c.trim().is_empty()) {
            return Err(Yolo2CocoError::InvalidConfig(format!(
                "class name at index {index} is empty"
            )));
        }

        self.image_extensions = self
            .image_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self.image_extensions.sort();
        self.image_extensions.dedup();
        if self.image_extensions.is_empty() {
            return Err(Yolo2CocoError::InvalidConfig(
                "at least one image extension is required".to_string(),
            ));
        }

        Ok(self)
    }

    /// `<root>/images/<partition>`
    pub fn images_dir(&self, partition: &str) -> PathBuf {
        self.root.join("images").join(partition)
    }

    /// `<root>/labels/<partition>`
    pub fn labels_dir(&self, partition: &str) -> PathBuf {
        self.root.join("labels").join(partition)
    }

    /// `<root>/instances_<partition>.json`
    pub fn output_path(&self, partition: &str) -> PathBuf {
        self.root.join(format!("instances_{partition}.json"))
    }
}

fn is_plain_dir_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Loads class names from a YOLO `data.yaml` or a plain `classes.txt`.
///
/// Files ending in `.yaml`/`.yml` are read as `data.yaml` (`names:` as a list
/// or an index mapping); anything else is read one name per line.
pub fn read_class_names(path: &Path) -> Result<Vec<String>, Yolo2CocoError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        read_data_yaml_names(path)
    } else {
        read_classes_txt(path)
    }
}

fn read_data_yaml_names(path: &Path) -> Result<Vec<String>, Yolo2CocoError> {
    let data = fs::read_to_string(path).map_err(Yolo2CocoError::Io)?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| Yolo2CocoError::DataYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match parsed.names {
        DataYamlNames::Sequence(names) => names,
        DataYamlNames::Mapping(mapping) => {
            let Some(max_index) = mapping.keys().max().copied() else {
                return Ok(Vec::new());
            };
            let mut names: Vec<String> = (0..=max_index).map(|i| format!("class_{i}")).collect();
            for (index, name) in mapping {
                if !name.trim().is_empty() {
                    names[index] = name;
                }
            }
            names
        }
    };

    Ok(names)
}

fn read_classes_txt(path: &Path) -> Result<Vec<String>, Yolo2CocoError> {
    let data = fs::read_to_string(path).map_err(Yolo2CocoError::Io)?;
    let mut names = Vec::new();

    // Only interior blank lines are rejected.
    for (line_idx, line) in data.trim_end().lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(Yolo2CocoError::ClassesTxtInvalid {
                path: path.to_path_buf(),
                message: format!("line {} is empty", line_idx + 1),
            });
        }
        names.push(trimmed.to_string());
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_config_fills_defaults() {
        let config: ConvertConfig =
            serde_yaml::from_str("root: /data\nclasses: [body, head, leg]\n").expect("parse");
        let config = config.validated().expect("valid config");

        assert_eq!(config.partitions, vec!["train", "val", "test"]);
        assert_eq!(config.image_extensions, vec!["bmp", "jpeg", "jpg", "png", "tif"]);
        assert_eq!(config.supercategory, "object");
        assert_eq!(config.description, "Converted from YOLO format");
        assert!(!config.pretty);
    }

    #[test]
    fn yaml_config_rejects_unknown_fields() {
        let result: Result<ConvertConfig, _> =
            serde_yaml::from_str("root: /data\nclasses: [a]\nphases: [train]\n");
        assert!(result.is_err());
    }

    #[test]
    fn validated_normalizes_extensions() {
        let config = ConvertConfig::new("/data", ["a"])
            .with_image_extensions([".JPG", "png", "jpg", " .Tif "])
            .validated()
            .expect("valid config");
        assert_eq!(config.image_extensions, vec!["jpg", "png", "tif"]);
    }

    #[test]
    fn validated_rejects_bad_configs() {
        let no_classes = ConvertConfig::new("/data", Vec::<String>::new()).validated();
        assert!(matches!(no_classes, Err(Yolo2CocoError::InvalidConfig(_))));

        let blank_class = ConvertConfig::new("/data", ["a", " "]).validated();
        assert!(matches!(blank_class, Err(Yolo2CocoError::InvalidConfig(_))));

        let nested = ConvertConfig::new("/data", ["a"])
            .with_partitions(["train/extra"])
            .validated();
        assert!(matches!(nested, Err(Yolo2CocoError::InvalidConfig(_))));

        let no_exts = ConvertConfig::new("/data", ["a"])
            .with_image_extensions(["."])
            .validated();
        assert!(matches!(no_exts, Err(Yolo2CocoError::InvalidConfig(_))));
    }

    #[test]
    fn partition_paths() {
        let config = ConvertConfig::new("/data", ["a"]);
        assert_eq!(config.images_dir("val"), Path::new("/data/images/val"));
        assert_eq!(config.labels_dir("val"), Path::new("/data/labels/val"));
        assert_eq!(
            config.output_path("val"),
            Path::new("/data/instances_val.json")
        );
    }

    #[test]
    fn from_yaml_file_reports_parse_errors() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("convert.yaml");
        fs::write(&path, "root: [not, a, path\n").expect("write config");

        let err = ConvertConfig::from_yaml_file(&path).unwrap_err();
        assert!(matches!(err, Yolo2CocoError::ConfigParse { .. }));
    }

    #[test]
    fn class_names_from_data_yaml_mapping_fill_gaps() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("data.yaml");
        fs::write(&path, "names:\n  0: body\n  2: leg\n").expect("write data yaml");

        let names = read_class_names(&path).expect("read names");
        assert_eq!(names, vec!["body", "class_1", "leg"]);
    }

    #[test]
    fn class_names_from_data_yaml_sequence() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("data.yml");
        fs::write(&path, "path: ../cattle\nnames: [body, head, leg]\n").expect("write data yaml");

        let names = read_class_names(&path).expect("read names");
        assert_eq!(names, vec!["body", "head", "leg"]);
    }

    #[test]
    fn class_names_from_classes_txt() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("classes.txt");
        fs::write(&path, "body\nhead\nleg\n").expect("write classes");
        assert_eq!(
            read_class_names(&path).expect("read names"),
            vec!["body", "head", "leg"]
        );

        fs::write(&path, "body\n\nleg\n").expect("write classes");
        let err = read_class_names(&path).unwrap_err();
        assert!(matches!(err, Yolo2CocoError::ClassesTxtInvalid { .. }));
    }

    #[test]
    fn classes_txt_ignores_trailing_blank_lines() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("classes.txt");
        fs::write(&path, "a\nb\n\n  \n").expect("write classes");

        assert_eq!(read_class_names(&path).expect("read names"), vec!["a", "b"]);
    }

    #[test]
    fn default_supercategory_is_overridable() {
        let config = ConvertConfig::new("/data", ["body"]);
        assert_eq!(config.supercategory, DEFAULT_SUPERCATEGORY);
        let config = config.with_supercategory("cattle_parts");
        assert_eq!(config.supercategory, "cattle_parts");
    }
}
