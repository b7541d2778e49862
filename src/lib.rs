pub mod api;
pub mod ast;
pub mod config;
pub mod document;
pub mod error;
pub mod lexer;
pub mod lsp;
pub mod parser;
pub mod utils;
pub mod validator;

pub use api::{analyze, analyze_with_settings, AnalysisResult};
pub use document::Document;
