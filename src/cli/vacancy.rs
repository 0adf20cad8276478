//! # vacancy 子命令 CLI 定义
//!
//! 在 POSCAR 结构中移除一个原子位点，生成空位缺陷结构。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/vacancy.rs`

use clap::Args;
use std::path::PathBuf;

/// vacancy 子命令参数
#[derive(Args, Debug)]
pub struct VacancyArgs {
    /// Directory containing the input structure files
    #[arg(short, long, default_value = "structures")]
    pub dir: PathBuf,

    /// Input POSCAR file name (relative to --dir)
    #[arg(short, long)]
    pub input: String,

    /// Zero-based index of the site to remove
    #[arg(short, long)]
    pub site: usize,

    /// Output POSCAR path for the defect structure
    #[arg(short, long)]
    pub output: PathBuf,
}
