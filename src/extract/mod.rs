//! Menu extraction from photos: image preparation, extractor backends
//! and OCR text cleanup.

pub mod chain;
pub mod image_prep;
pub mod ocr;

pub use chain::{
    CommandExtractor, DEFAULT_OCR_COMMAND, ExtractError, ExtractorChain, MenuExtractor, ModelCommandExtractor,
    split_command,
};
pub use image_prep::{ImagePayload, prepare_image, prepare_image_file};
pub use ocr::{clean_ocr_lines, parse_label_array, parse_model_reply};
