//! Reading delimited text: line tokenization, typed field conversion,
//! header handling and label-aligned extraction.

pub mod field;
pub mod label_index;
pub mod reader;
pub mod tokenizer;
