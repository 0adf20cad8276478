//! # supercell 子命令 CLI 定义
//!
//! 从带 Lattice 标注的 .xyz 文件构建六方晶格超胞。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/supercell.rs`

use clap::Args;
use std::path::PathBuf;

/// supercell 子命令参数
#[derive(Args, Debug)]
pub struct SupercellArgs {
    /// Input .xyz file with a Lattice="..." annotation in its header
    #[arg(short, long)]
    pub input: PathBuf,

    /// Replication factors along the three lattice directions
    #[arg(
        short,
        long,
        num_args = 3,
        value_names = ["NX", "NY", "NZ"],
        default_values_t = [1u32, 1, 1],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub dims: Vec<u32>,
}

impl SupercellArgs {
    /// 复制因子三元组 (nx, ny, nz)
    pub fn factors(&self) -> (u32, u32, u32) {
        (self.dims[0], self.dims[1], self.dims[2])
    }
}
