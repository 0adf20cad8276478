//! # 扩展 XYZ 格式解析器
//!
//! 解析带 `Lattice="..."` 标注的分子坐标文件。
//!
//! ## 格式说明
//! ```text
//! 3                                        # atom count (ignored)
//! Lattice="a1 a2 a3 b1 b2 b3 c1 c2 c3"    # annotation, line 1 or 2
//! Mo  0.000  1.842  3.075                  # element + Cartesian coords
//! S   0.000  0.000  1.595
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/supercell.rs` 使用
//! - 使用 `regex` crate 提取晶格标注

use crate::error::{Result, StructgenError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// 解析后的 XYZ 帧：物种、笛卡尔坐标、可选的晶格标注
#[derive(Debug, Clone)]
pub struct XyzFrame {
    /// 物种标签，按文件顺序
    pub species: Vec<String>,

    /// 笛卡尔坐标，与 species 一一对应
    pub cart_coords: Vec<[f64; 3]>,

    /// 晶格标注的 9 个分量 (行主序: 向量 A, B, C)，标注缺失时为 None
    pub lattice_values: Option<[f64; 9]>,
}

/// 解析 .xyz 文件
pub fn parse_xyz_file(path: &Path) -> Result<XyzFrame> {
    let content = fs::read_to_string(path).map_err(|e| StructgenError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 .xyz 格式
///
/// 前两行是头部；第三行起每行为一个位点（首列物种，随后三列坐标）。
pub fn parse_xyz_content(content: &str, default_name: &str) -> Result<XyzFrame> {
    let parse_err = |reason: String| StructgenError::ParseError {
        format: "xyz".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 2 {
        return Err(parse_err("File too short: expected two header lines".to_string()));
    }

    // 晶格标注在第一行或第二行
    let lattice_values = extract_lattice_values(&lines[..2], default_name)?;

    // 第三行起：物种 + 笛卡尔坐标
    let mut species = Vec::new();
    let mut cart_coords = Vec::new();

    for (i, line) in lines[2..].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(parse_err(format!("Malformed coordinate line {}", i + 3)));
        }

        let mut coord = [0.0; 3];
        for (j, token) in tokens[1..4].iter().enumerate() {
            coord[j] = token
                .parse()
                .map_err(|_| parse_err(format!("Invalid coordinate '{}' at line {}", token, i + 3)))?;
        }

        species.push(tokens[0].to_string());
        cart_coords.push(coord);
    }

    Ok(XyzFrame {
        species,
        cart_coords,
        lattice_values,
    })
}

/// 在头部两行中查找 Lattice="..." 标注并解析 9 个分量
fn extract_lattice_values(header: &[&str], default_name: &str) -> Result<Option<[f64; 9]>> {
    let marker = Regex::new(r#"Lattice="([^"]*)""#).unwrap();

    let captured = header.iter().find_map(|line| marker.captures(line));
    let Some(caps) = captured else {
        return Ok(None);
    };

    let mut values = Vec::with_capacity(9);
    for token in caps[1].split_whitespace() {
        let v: f64 = token.parse().map_err(|_| StructgenError::ParseError {
            format: "xyz".to_string(),
            path: default_name.to_string(),
            reason: format!("Invalid lattice value '{}'", token),
        })?;
        values.push(v);
    }

    let values: [f64; 9] = values.try_into().map_err(|v: Vec<f64>| {
        StructgenError::ParseError {
            format: "xyz".to_string(),
            path: default_name.to_string(),
            reason: format!("Lattice annotation has {} values, expected 9", v.len()),
        }
    })?;

    Ok(Some(values))
}

/// 从 9 分量晶格标注计算六方晶格常数 (a, c)
///
/// a 取向量 A (分量 0-2) 的模，c 取向量 C (分量 6-8) 的模。
/// 向量 B (分量 3-5) 不参与：目标晶格约束为六方，由 a、c 完全确定。
pub fn lattice_constants(values: &[f64; 9]) -> (f64, f64) {
    let norm = |x: f64, y: f64, z: f64| (x * x + y * y + z * z).sqrt();
    let a = norm(values[0], values[1], values[2]);
    let c = norm(values[6], values[7], values[8]);
    (a, c)
}
