//! SpikeGLX `.meta` 伴随文件：解析与重写

pub mod parser;
pub mod rewriter;

pub use parser::{MetaValue, MetadataRecord, parse_meta};
pub use rewriter::{DerivedFields, render_extract_meta, rewrite_meta_text, write_extract_meta};
