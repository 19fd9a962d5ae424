//! Fuzz target for YOLO label line parsing.
//!
//! Feeds arbitrary UTF-8 lines to the parser and, for lines that parse,
//! runs the pixel transform too, checking for panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yolo2coco::ir::io_yolo::{fuzz_parse_label_line, parse_label_line};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_label_line(line);
    if let Ok(Some(row)) = parse_label_line(line) {
        let _ = row.bbox.to_pixel_xywh(640, 480);
    }
});
