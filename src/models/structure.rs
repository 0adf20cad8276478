//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示，以及空位/超胞两个结构变换操作。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 无外部模块依赖

use crate::error::{Result, StructgenError};
use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        // 计算晶格向量
        let cos_alpha = alpha_rad.cos();
        let cos_beta = beta_rad.cos();
        let cos_gamma = gamma_rad.cos();
        let sin_gamma = gamma_rad.sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 六方晶格，由 a 和 c 完全确定 (gamma = 120°)
    pub fn hexagonal(a: f64, c: f64) -> Self {
        Lattice::from_parameters(a, a, c, 90.0, 90.0, 120.0)
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.matrix[0];
        let b_vec = self.matrix[1];
        let c_vec = self.matrix[2];

        let a = (a_vec[0].powi(2) + a_vec[1].powi(2) + a_vec[2].powi(2)).sqrt();
        let b = (b_vec[0].powi(2) + b_vec[1].powi(2) + b_vec[2].powi(2)).sqrt();
        let c = (c_vec[0].powi(2) + c_vec[1].powi(2) + c_vec[2].powi(2)).sqrt();

        let dot_bc: f64 = b_vec.iter().zip(c_vec.iter()).map(|(x, y)| x * y).sum();
        let dot_ac: f64 = a_vec.iter().zip(c_vec.iter()).map(|(x, y)| x * y).sum();
        let dot_ab: f64 = a_vec.iter().zip(b_vec.iter()).map(|(x, y)| x * y).sum();

        let alpha = (dot_bc / (b * c)).acos().to_degrees();
        let beta = (dot_ac / (a * c)).acos().to_degrees();
        let gamma = (dot_ab / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 笛卡尔坐标转分数坐标
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // 行向量约定: frac = cart · M⁻¹
        [
            inv[0][0] * cart[0] + inv[1][0] * cart[1] + inv[2][0] * cart[2],
            inv[0][1] * cart[0] + inv[1][1] * cart[1] + inv[2][1] * cart[2],
            inv[0][2] * cart[0] + inv[1][2] * cart[1] + inv[2][2] * cart[2],
        ]
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 移除指定位点，生成空位缺陷结构
    ///
    /// 返回新的 Crystal，原结构保持不变。
    pub fn remove_site(&self, index: usize) -> Result<Crystal> {
        if index >= self.atoms.len() {
            return Err(StructgenError::SiteIndexOutOfRange {
                index,
                site_count: self.atoms.len(),
            });
        }

        let removed = &self.atoms[index];
        let atoms: Vec<Atom> = self
            .atoms
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, a)| a.clone())
            .collect();

        Ok(Crystal::new(
            format!("{} ({} vacancy)", self.name, removed.element),
            self.lattice.clone(),
            atoms,
        ))
    }

    /// 沿三个晶格方向平铺 nx x ny x nz 次，生成对角超胞
    ///
    /// 结果位点数恰为 nx*ny*nz 倍；外层按原子、内层按胞偏移排列，
    /// 保持同种元素连续。
    pub fn make_supercell(&self, nx: u32, ny: u32, nz: u32) -> Crystal {
        let n = [nx as f64, ny as f64, nz as f64];

        let mut matrix = self.lattice.matrix;
        for (row, factor) in matrix.iter_mut().zip(n.iter()) {
            for x in row.iter_mut() {
                *x *= factor;
            }
        }

        let num_cells = (nx * ny * nz) as usize;
        let mut atoms = Vec::with_capacity(self.atoms.len() * num_cells);
        for atom in &self.atoms {
            for i in 0..nx {
                for j in 0..ny {
                    for k in 0..nz {
                        let shift = [i as f64, j as f64, k as f64];
                        let position = [
                            (atom.position[0] + shift[0]) / n[0],
                            (atom.position[1] + shift[1]) / n[1],
                            (atom.position[2] + shift[2]) / n[2],
                        ];
                        atoms.push(Atom::new(atom.element.clone(), position));
                    }
                }
            }
        }

        Crystal::new(
            format!("{} {}x{}x{}", self.name, nx, ny, nz),
            Lattice::from_vectors(matrix),
            atoms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nacl() -> Crystal {
        let lattice = Lattice::from_parameters(5.64, 5.64, 5.64, 90.0, 90.0, 90.0);
        let atoms = vec![
            Atom::new("Na", [0.0, 0.0, 0.0]),
            Atom::new("Na", [0.5, 0.5, 0.0]),
            Atom::new("Cl", [0.5, 0.0, 0.0]),
            Atom::new("Cl", [0.0, 0.5, 0.0]),
        ];
        Crystal::new("NaCl", lattice, atoms)
    }

    #[test]
    fn test_lattice_hexagonal() {
        let lattice = Lattice::hexagonal(3.0, 5.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 3.0).abs() < 0.01);
        assert!((b - 3.0).abs() < 0.01);
        assert!((c - 5.0).abs() < 0.01);
        assert!((alpha - 90.0).abs() < 0.01);
        assert!((beta - 90.0).abs() < 0.01);
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let vol = lattice.volume().abs();

        // 5^3 = 125
        assert!((vol - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_cart_frac_round_trip() {
        let lattice = Lattice::hexagonal(3.19, 12.3);
        let cart = [1.595, 0.921, 3.075];

        let frac = lattice.cart_to_frac(cart);
        let back = lattice.frac_to_cart(frac);

        for i in 0..3 {
            assert!((back[i] - cart[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_remove_site_count_and_content() {
        let crystal = nacl();
        let removed = crystal.atoms[2].clone();

        let defect = crystal.remove_site(2).unwrap();

        assert_eq!(defect.atoms.len(), crystal.atoms.len() - 1);
        assert!(!defect.atoms.contains(&removed));
        // Base structure untouched
        assert_eq!(crystal.atoms.len(), 4);
    }

    #[test]
    fn test_remove_site_out_of_range() {
        let crystal = nacl();
        let err = crystal.remove_site(4).unwrap_err();

        match err {
            crate::error::StructgenError::SiteIndexOutOfRange { index, site_count } => {
                assert_eq!(index, 4);
                assert_eq!(site_count, 4);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_make_supercell_site_count() {
        let crystal = nacl();
        let supercell = crystal.make_supercell(2, 2, 1);

        assert_eq!(supercell.atoms.len(), 4 * 2 * 2 * 1);
    }

    #[test]
    fn test_make_supercell_lattice_scaled() {
        let crystal = Crystal::new(
            "Mo",
            Lattice::hexagonal(3.19, 12.3),
            vec![Atom::new("Mo", [0.0, 0.0, 0.25])],
        );
        let supercell = crystal.make_supercell(2, 3, 1);
        let (a, b, c, _, _, gamma) = supercell.lattice.parameters();

        assert!((a - 2.0 * 3.19).abs() < 1e-6);
        assert!((b - 3.0 * 3.19).abs() < 1e-6);
        assert!((c - 12.3).abs() < 1e-6);
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_make_supercell_positions_in_cell() {
        let crystal = nacl();
        let supercell = crystal.make_supercell(3, 2, 2);

        for atom in &supercell.atoms {
            for x in atom.position {
                assert!((0.0..1.0).contains(&x), "fractional coord out of cell: {}", x);
            }
        }
    }

    #[test]
    fn test_crystal_formula() {
        let crystal = nacl();
        assert_eq!(crystal.formula(), "Cl2Na2");
    }
}
