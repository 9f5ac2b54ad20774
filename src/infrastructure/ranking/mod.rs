//! Relevance model implementations

mod http_cross_encoder;
mod lexical;

pub use http_cross_encoder::HttpCrossEncoder;
pub use lexical::LexicalOverlapModel;
