#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Minimal 24-bit BMP: 54-byte header plus a zeroed pixel array.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Writes `images/<partition>/<name>` as a BMP regardless of the extension;
/// the header probe sniffs content, not file names.
pub fn add_image(root: &Path, partition: &str, name: &str, width: u32, height: u32) {
    write_bmp(&root.join("images").join(partition).join(name), width, height);
}

/// Writes `labels/<partition>/<stem>.txt`.
pub fn add_labels(root: &Path, partition: &str, stem: &str, contents: &str) {
    let dir = root.join("labels").join(partition);
    fs::create_dir_all(&dir).expect("create labels dir");
    fs::write(dir.join(format!("{stem}.txt")), contents).expect("write label file");
}

/// Writes a file with an image extension that no probe can read.
pub fn add_corrupt_image(root: &Path, partition: &str, name: &str) {
    let dir = root.join("images").join(partition);
    fs::create_dir_all(&dir).expect("create images dir");
    fs::write(dir.join(name), b"not an image at all").expect("write corrupt image");
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(path).expect("read output json");
    serde_json::from_str(&contents).expect("parse output json")
}
