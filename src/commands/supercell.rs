//! # supercell 命令实现
//!
//! 从带晶格标注的 .xyz 文件构建六方周期结构并平铺为超胞。
//!
//! ## 管线
//! 1. 解析 .xyz 帧（物种、笛卡尔坐标、晶格标注）
//! 2. 从标注计算晶格常数 (a, c)
//! 3. 校验并构建六方基础结构
//! 4. 按 --dims 平铺
//! 5. 写出 `<stem>_<nx>x<ny>x<nz>.vasp`
//!
//! ## 依赖关系
//! - 使用 `cli/supercell.rs` 定义的参数
//! - 使用 `parsers/xyz.rs`, `parsers/poscar.rs`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::supercell::SupercellArgs;
use crate::error::{Result, StructgenError};
use crate::models::{Atom, Crystal, Lattice};
use crate::parsers::poscar;
use crate::parsers::xyz::{self, XyzFrame};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 构建阶段的标记状态
///
/// 序列化时优先取平铺后的结构，其次取基础结构；两者皆无时
/// 报状态错误，替代原先未初始化字段的隐式状态。
pub enum BuildStage {
    NotBuilt,
    Built(Crystal),
    Replicated(Crystal),
}

impl BuildStage {
    /// 可序列化的结构
    pub fn structure(&self) -> Result<&Crystal> {
        match self {
            BuildStage::NotBuilt => Err(StructgenError::NotYetBuilt {
                what: "Structure".to_string(),
            }),
            BuildStage::Built(c) | BuildStage::Replicated(c) => Ok(c),
        }
    }
}

/// 从解析后的帧构建六方基础结构
///
/// 物种或坐标列表为空、或 a/c 为零时，报校验错误。
pub fn build_structure(frame: &XyzFrame, a: f64, c: f64, name: &str) -> Result<Crystal> {
    if frame.species.is_empty() || frame.cart_coords.is_empty() {
        return Err(StructgenError::IncompleteStructure(
            "species or coordinate list is empty".to_string(),
        ));
    }
    if a == 0.0 || c == 0.0 {
        return Err(StructgenError::IncompleteStructure(format!(
            "lattice parameter is zero (a = {}, c = {})",
            a, c
        )));
    }

    let lattice = Lattice::hexagonal(a, c);
    let atoms = frame
        .species
        .iter()
        .zip(frame.cart_coords.iter())
        .map(|(el, &cart)| Atom::new(el.clone(), lattice.cart_to_frac(cart)))
        .collect();

    Ok(Crystal::new(name, lattice, atoms))
}

/// 派生输出路径：输入文件去扩展名，追加复制因子和 .vasp
///
/// `foo.xyz` 配 (2, 2, 1) 得到 `foo_2x2x1.vasp`。
pub fn output_path(input: &Path, (nx, ny, nz): (u32, u32, u32)) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");
    input.with_file_name(format!("{}_{}x{}x{}.vasp", stem, nx, ny, nz))
}

/// 执行 supercell 命令
pub fn execute(args: SupercellArgs) -> Result<()> {
    output::print_header("Building Hexagonal Supercell");

    let frame = xyz::parse_xyz_file(&args.input)?;

    let values = frame
        .lattice_values
        .ok_or_else(|| StructgenError::MissingLatticeConstants {
            path: args.input.display().to_string(),
        })?;
    let (a, c) = xyz::lattice_constants(&values);

    output::print_info(&format!(
        "Read {} sites, hexagonal lattice a = {:.4} Å, c = {:.4} Å",
        frame.species.len(),
        a,
        c
    ));

    let name = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");
    let base = build_structure(&frame, a, c, name)?;

    let factors = args.factors();
    let (nx, ny, nz) = factors;
    let stage = BuildStage::Replicated(base.make_supercell(nx, ny, nz));

    let crystal = stage.structure()?;
    output::print_info(&format!(
        "Supercell {}x{}x{}: {} ({} sites, {:.2} Å³)",
        nx,
        ny,
        nz,
        crystal.formula(),
        crystal.atoms.len(),
        crystal.lattice.volume().abs()
    ));

    let out = output_path(&args.input, factors);
    if out.exists() {
        output::print_warning(&format!("Overwriting existing file: {}", out.display()));
    }

    fs::write(&out, poscar::to_poscar_string(crystal)).map_err(|e| {
        StructgenError::FileWriteError {
            path: out.display().to_string(),
            source: e,
        }
    })?;

    output::print_done(&format!("Wrote supercell to {}", out.display()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::xyz::parse_xyz_content;

    const MOS2_XYZ: &str = r#"3
Lattice="3.19 0.0 0.0 -1.595 2.7626 0.0 0.0 0.0 12.3"
Mo 0.0000 1.8417 3.0750
S  0.0000 0.0000 1.5100
S  0.0000 0.0000 4.6400
"#;

    #[test]
    fn test_build_structure_empty_frame() {
        let frame = XyzFrame {
            species: Vec::new(),
            cart_coords: Vec::new(),
            lattice_values: None,
        };

        let err = build_structure(&frame, 3.19, 12.3, "empty").unwrap_err();
        assert!(matches!(err, StructgenError::IncompleteStructure(_)));
    }

    #[test]
    fn test_build_structure_zero_lattice_parameter() {
        let frame = parse_xyz_content(MOS2_XYZ, "mos2").unwrap();

        assert!(matches!(
            build_structure(&frame, 0.0, 12.3, "mos2").unwrap_err(),
            StructgenError::IncompleteStructure(_)
        ));
        assert!(matches!(
            build_structure(&frame, 3.19, 0.0, "mos2").unwrap_err(),
            StructgenError::IncompleteStructure(_)
        ));
    }

    #[test]
    fn test_build_structure_converts_to_fractional() {
        let content = "1\nLattice=\"4.0 0.0 0.0 0.0 4.0 0.0 0.0 0.0 6.0\"\nSi 2.0 0.0 3.0\n";
        let frame = parse_xyz_content(content, "si").unwrap();
        let values = frame.lattice_values.unwrap();
        let (a, c) = xyz::lattice_constants(&values);

        let crystal = build_structure(&frame, a, c, "si").unwrap();

        // Hexagonal cell: a = [4, 0, 0], b = [-2, 2sqrt(3), 0], c = [0, 0, 6]
        // Cartesian (2, 0, 3) -> fractional (0.5, 0, 0.5)
        let frac = crystal.atoms[0].position;
        assert!((frac[0] - 0.5).abs() < 1e-9);
        assert!(frac[1].abs() < 1e-9);
        assert!((frac[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_pipeline_site_count() {
        let frame = parse_xyz_content(MOS2_XYZ, "mos2").unwrap();
        let values = frame.lattice_values.unwrap();
        let (a, c) = xyz::lattice_constants(&values);

        let base = build_structure(&frame, a, c, "mos2").unwrap();
        let supercell = base.make_supercell(2, 2, 1);

        assert_eq!(supercell.atoms.len(), 3 * 2 * 2 * 1);
    }

    #[test]
    fn test_output_path_format() {
        let out = output_path(Path::new("foo.xyz"), (2, 2, 1));
        assert_eq!(out, PathBuf::from("foo_2x2x1.vasp"));

        let out = output_path(Path::new("data/mos2.xyz"), (3, 3, 2));
        assert_eq!(out, PathBuf::from("data/mos2_3x3x2.vasp"));
    }

    #[test]
    fn test_not_built_stage_is_state_error() {
        let err = BuildStage::NotBuilt.structure().unwrap_err();
        assert!(matches!(err, StructgenError::NotYetBuilt { .. }));
    }

    #[test]
    fn test_replicated_preferred_for_serialization() {
        let frame = parse_xyz_content(MOS2_XYZ, "mos2").unwrap();
        let (a, c) = xyz::lattice_constants(&frame.lattice_values.unwrap());
        let base = build_structure(&frame, a, c, "mos2").unwrap();

        let stage = BuildStage::Replicated(base.make_supercell(2, 1, 1));
        assert_eq!(stage.structure().unwrap().atoms.len(), 6);

        let stage = BuildStage::Built(base);
        assert_eq!(stage.structure().unwrap().atoms.len(), 3);
    }
}
