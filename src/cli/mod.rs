//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `vacancy`: 单空位缺陷生成
//! - `supercell`: 六方超胞构建
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: vacancy, supercell

pub mod supercell;
pub mod vacancy;

use clap::{Parser, Subcommand};

/// Structgen - POSCAR 结构准备工具箱
#[derive(Parser)]
#[command(name = "structgen")]
#[command(version)]
#[command(about = "POSCAR structure preparation toolkit: vacancy defects and supercells", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Create a single vacancy defect in a POSCAR structure
    Vacancy(vacancy::VacancyArgs),

    /// Build a hexagonal supercell POSCAR from an annotated .xyz file
    Supercell(supercell::SupercellArgs),
}
