//! 全局类型转换
//!
//! 文件中的行优先嵌套数组与 [Matrix4] 之间的转换，以及刚体变换检查。

use nalgebra::*;

use crate::config::RIGID_TOLERANCE;
use crate::error::{CalibError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4d(pub Matrix4<f64>);

/// 行优先 `[[f64; 4]; 4]` 转换为 [Matrix4]
impl From<[[f64; 4]; 4]> for Matrix4d {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Matrix4d(Matrix4::from_fn(|i, j| rows[i][j]))
    }
}

/// [Matrix4] 转换为行优先 `[[f64; 4]; 4]`
impl From<Matrix4d> for [[f64; 4]; 4] {
    fn from(m: Matrix4d) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = m.0[(i, j)];
            }
        }
        rows
    }
}

impl Matrix4d {
    /// 16 个行优先的数值
    pub fn from_row_slice(values: &[f64]) -> Option<Self> {
        if values.len() != 16 {
            return None;
        }
        Some(Matrix4d(Matrix4::from_row_slice(values)))
    }

    /// 由旋转与平移组合
    pub fn from_parts(rot: &Matrix3<f64>, trans: &Vector3<f64>) -> Self {
        let mut m = Matrix4::<f64>::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(trans);
        Matrix4d(m)
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.0.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// 刚体变换的复合 `self * other`，最后一行固定为 `[0, 0, 0, 1]`
    pub fn compose(&self, other: &Matrix4d) -> Matrix4d {
        let rot = self.rotation() * other.rotation();
        let trans = self.rotation() * other.translation() + self.translation();
        Matrix4d::from_parts(&rot, &trans)
    }

    /// 检查是否为刚体变换：旋转块正交且行列式为 +1，最后一行为 `[0, 0, 0, 1]`
    pub fn check_rigid(&self, what: &str) -> Result<()> {
        self.check_rigid_within(what, RIGID_TOLERANCE)
    }

    pub fn check_rigid_within(&self, what: &str, tolerance: f64) -> Result<()> {
        let malformed = |reason: String| CalibError::MalformedTransform {
            what: what.to_string(),
            reason,
        };
        if self.0.iter().any(|v| !v.is_finite()) {
            return Err(malformed("non-finite entry".to_string()));
        }
        let bottom = self.0.fixed_view::<1, 4>(3, 0);
        let expected = RowVector4::new(0.0, 0.0, 0.0, 1.0);
        if (bottom - expected).amax() > tolerance {
            return Err(malformed(format!("bottom row is {}", bottom)));
        }
        let rot = self.rotation();
        let orth_err = (rot.transpose() * rot - Matrix3::identity()).amax();
        if orth_err > tolerance {
            return Err(malformed(format!(
                "rotation block is not orthonormal (error {:e})",
                orth_err
            )));
        }
        let det = rot.determinant();
        if (det - 1.0).abs() > tolerance {
            return Err(malformed(format!("rotation determinant is {}", det)));
        }
        Ok(())
    }
}
