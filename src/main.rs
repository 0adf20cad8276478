//! # Structgen - POSCAR 结构准备工具箱
//!
//! 将分散的结构预处理脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `vacancy`   - 在 POSCAR 结构中生成单空位缺陷
//! - `supercell` - 从带晶格标注的 .xyz 文件构建六方超胞 POSCAR
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (格式解析器)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
