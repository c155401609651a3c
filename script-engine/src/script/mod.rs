//! # Script 模块
//!
//! 剧本结构定义和解析器实现。
//!
//! ## 模块结构
//!
//! - [`ast`]：幕 / 场 / 行 的文档结构
//! - [`parser`]：两阶段解析器实现

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::Parser;
