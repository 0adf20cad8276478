//! # 统一错误处理模块
//!
//! 定义 Structgen 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Structgen 统一错误类型
#[derive(Error, Debug)]
pub enum StructgenError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Missing lattice constants: no Lattice=\"...\" annotation in the first two lines of {path}")]
    MissingLatticeConstants { path: String },

    // ─────────────────────────────────────────────────────────────
    // 结构操作错误
    // ─────────────────────────────────────────────────────────────
    #[error("Site index {index} is out of range for a structure with {site_count} sites")]
    SiteIndexOutOfRange { index: usize, site_count: usize },

    #[error("Cannot build structure: {0}")]
    IncompleteStructure(String),

    #[error("{what} has not been built yet")]
    NotYetBuilt { what: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, StructgenError>;
