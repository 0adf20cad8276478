//! # 解析器模块
//!
//! 提供结构文件格式的解析器和序列化器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, xyz

pub mod poscar;
pub mod xyz;
