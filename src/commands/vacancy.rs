//! # vacancy 命令实现
//!
//! 从 POSCAR 结构中移除一个原子位点，生成并写出空位缺陷结构。
//!
//! ## 功能
//! - 从结构目录读取 POSCAR 文件
//! - 按位点索引移除原子
//! - 将缺陷结构写为新的 POSCAR
//!
//! ## 依赖关系
//! - 使用 `cli/vacancy.rs` 定义的参数
//! - 使用 `parsers/poscar.rs`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::vacancy::VacancyArgs;
use crate::error::{Result, StructgenError};
use crate::models::Crystal;
use crate::parsers::poscar;
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 空位缺陷生成管线
///
/// 持有基础结构和缺陷结构槽位；在 `create_vacancy` 之前调用
/// `write_poscar` 会得到状态错误，且不触碰输出文件。
pub struct VacancyFormation {
    structure: Crystal,
    defect: Option<Crystal>,
}

impl VacancyFormation {
    pub fn new(structure: Crystal) -> Self {
        VacancyFormation {
            structure,
            defect: None,
        }
    }

    /// 从结构目录中的 POSCAR 文件加载
    pub fn from_file(dir: &Path, filename: &str) -> Result<Self> {
        if !dir.exists() {
            return Err(StructgenError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let structure = poscar::parse_poscar_file(&dir.join(filename))?;
        Ok(VacancyFormation::new(structure))
    }

    /// 基础结构
    pub fn structure(&self) -> &Crystal {
        &self.structure
    }

    /// 移除指定位点，生成缺陷结构
    pub fn create_vacancy(&mut self, site_index: usize) -> Result<&Crystal> {
        let defect = self.structure.remove_site(site_index)?;
        Ok(self.defect.insert(defect))
    }

    /// 将缺陷结构序列化为 POSCAR 文件
    pub fn write_poscar(&self, path: &Path) -> Result<()> {
        let defect = self.defect.as_ref().ok_or_else(|| StructgenError::NotYetBuilt {
            what: "Defect structure".to_string(),
        })?;

        fs::write(path, poscar::to_poscar_string(defect)).map_err(|e| {
            StructgenError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            }
        })
    }
}

/// 执行 vacancy 命令
pub fn execute(args: VacancyArgs) -> Result<()> {
    output::print_header("Creating Vacancy Defect");

    let mut formation = VacancyFormation::from_file(&args.dir, &args.input)?;

    let base = formation.structure();
    output::print_info(&format!(
        "Loaded {} ({} sites) from {}",
        base.formula(),
        base.atoms.len(),
        args.dir.join(&args.input).display()
    ));

    // 在移除之前记下该位点的元素和笛卡尔位置，用于汇报
    let removed = base.atoms.get(args.site).cloned();
    let removed_cart = removed
        .as_ref()
        .map(|a| base.lattice.frac_to_cart(a.position));

    let defect = formation.create_vacancy(args.site)?;
    output::print_info(&format!(
        "Defect structure: {} ({} sites)",
        defect.formula(),
        defect.atoms.len()
    ));

    if let (Some(atom), Some(cart)) = (removed, removed_cart) {
        output::print_info(&format!(
            "Removed site {}: {} at ({:.4}, {:.4}, {:.4}) Å",
            args.site, atom.element, cart[0], cart[1], cart[2]
        ));
    }

    formation.write_poscar(&args.output)?;
    output::print_done(&format!(
        "Wrote defect structure to {}",
        args.output.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn mos2() -> Crystal {
        let lattice = Lattice::hexagonal(3.19, 12.3);
        let atoms = vec![
            Atom::new("Mo", [0.0, 0.0, 0.25]),
            Atom::new("S", [0.3333, 0.6667, 0.3772]),
            Atom::new("S", [0.3333, 0.6667, 0.1228]),
        ];
        Crystal::new("MoS2", lattice, atoms)
    }

    #[test]
    fn test_create_vacancy_removes_one_site() {
        let mut formation = VacancyFormation::new(mos2());
        let defect = formation.create_vacancy(0).unwrap();

        assert_eq!(defect.atoms.len(), 2);
        assert!(defect.atoms.iter().all(|a| a.element == "S"));
    }

    #[test]
    fn test_create_vacancy_out_of_range() {
        let mut formation = VacancyFormation::new(mos2());
        let err = formation.create_vacancy(3).unwrap_err();

        assert!(matches!(
            err,
            StructgenError::SiteIndexOutOfRange { index: 3, site_count: 3 }
        ));
    }

    #[test]
    fn test_write_before_create_is_state_error() {
        let formation = VacancyFormation::new(mos2());
        let path = std::env::temp_dir().join("structgen_never_written_POSCAR.vasp");

        let err = formation.write_poscar(&path).unwrap_err();

        assert!(matches!(err, StructgenError::NotYetBuilt { .. }));
        assert!(!path.exists(), "state error must not create the output file");
    }

    #[test]
    fn test_write_after_create() {
        let mut formation = VacancyFormation::new(mos2());
        formation.create_vacancy(1).unwrap();

        let path = std::env::temp_dir().join("structgen_test_defect_POSCAR.vasp");
        formation.write_poscar(&path).unwrap();

        let written = poscar::parse_poscar_file(&path).unwrap();
        assert_eq!(written.atoms.len(), 2);

        std::fs::remove_file(&path).ok();
    }
}
