//! 坐标系转换
//!
//! 将仿真器（Unreal，左手系）下的 camera-to-world 矩阵转换为 OpenCV 相机约定（右手系，
//! x 向右，y 向下，z 向前）。分两步：
//! 1. 世界系换基：旋转向量和平移分别按 [AxisRule] 重排并翻转符号；
//! 2. 相机局部坐标轴翻转：右乘 `diag(local_flip)`。

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::config::COMPOSED_RIGID_TOLERANCE;
use crate::error::{CalibError, Result};
use crate::global_cast::Matrix4d;
use crate::utility::Utility;

/// 三维向量的坐标轴重排与符号翻转：`out[i] = signs[i] * v[axes[i]]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRule {
    pub axes: [usize; 3],
    pub signs: [f64; 3],
}

impl AxisRule {
    pub fn apply(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::from_fn(|i, _| self.signs[i] * v[self.axes[i]])
    }

    pub fn inverse(&self) -> Self {
        let mut axes = [0; 3];
        let mut signs = [1.0; 3];
        for i in 0..3 {
            axes[self.axes[i]] = i;
            signs[self.axes[i]] = 1.0 / self.signs[i];
        }
        Self { axes, signs }
    }

    fn is_valid(&self) -> bool {
        let mut seen = [false; 3];
        for &a in &self.axes {
            if a > 2 || seen[a] {
                return false;
            }
            seen[a] = true;
        }
        self.signs.iter().all(|s| s.abs() == 1.0)
    }
}

/// 完整的坐标约定转换规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRule {
    /// 旋转向量的换基规则
    pub rot_vec: AxisRule,
    /// 平移的换基规则
    pub translation: AxisRule,
    /// 右乘的对角矩阵，翻转相机自身的坐标轴
    pub local_flip: [f64; 4],
}

impl ConversionRule {
    /// Unreal -> OpenCV：
    /// `v' = (-vy, vz, -vx)`，`t' = (ty, -tz, tx)`，右乘 `diag(1, -1, -1, 1)`
    pub const UNREAL_TO_OPENCV: ConversionRule = ConversionRule {
        rot_vec: AxisRule {
            axes: [1, 2, 0],
            signs: [-1.0, 1.0, -1.0],
        },
        translation: AxisRule {
            axes: [1, 2, 0],
            signs: [1.0, -1.0, 1.0],
        },
        local_flip: [1.0, -1.0, -1.0, 1.0],
    };

    /// 由同一组重排与符号规则推导的逆规则
    pub fn inverse(&self) -> Self {
        Self {
            rot_vec: self.rot_vec.inverse(),
            translation: self.translation.inverse(),
            local_flip: self.local_flip.map(|d| 1.0 / d),
        }
    }

    pub fn local_flip_matrix(&self) -> Matrix4<f64> {
        Matrix4::from_diagonal(&Vector4::from(self.local_flip))
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateConverter {
    rule: ConversionRule,
    inverse: ConversionRule,
}

impl CoordinateConverter {
    pub fn new(rule: ConversionRule) -> Result<Self> {
        let flip = rule.local_flip;
        // 局部翻转必须保持刚体性：±1 对角，旋转部分行列式为 +1
        let flip_is_rigid = flip.iter().all(|d| d.abs() == 1.0)
            && flip[3] == 1.0
            && flip[0] * flip[1] * flip[2] == 1.0;
        if !rule.rot_vec.is_valid() || !rule.translation.is_valid() || !flip_is_rigid {
            return Err(CalibError::MalformedTransform {
                what: "conversion rule".to_string(),
                reason: format!("{:?} is not a signed axis permutation", rule),
            });
        }
        Ok(Self {
            inverse: rule.inverse(),
            rule,
        })
    }

    /// 源约定 camera-to-world -> 目标约定 camera-to-world
    ///
    /// 输入是 ego 与外参的复合，按 [COMPOSED_RIGID_TOLERANCE] 检查；
    /// 不是刚体变换时返回 [CalibError::MalformedTransform]，不做正交化修正。
    pub fn convert(&self, cam_to_world: &Matrix4d) -> Result<Matrix4d> {
        cam_to_world.check_rigid_within("source camera-to-world", COMPOSED_RIGID_TOLERANCE)?;

        let rot_vec = Utility::rot_vec_from_matrix(&cam_to_world.rotation());
        let rot_vec_new = self.rule.rot_vec.apply(&rot_vec);
        let rot_new = Utility::matrix_from_rot_vec(&rot_vec_new);

        let trans_new = self.rule.translation.apply(&cam_to_world.translation());

        let c2w = Matrix4d::from_parts(&rot_new, &trans_new);
        Ok(Matrix4d(c2w.0 * self.rule.local_flip_matrix()))
    }

    /// [CoordinateConverter::convert] 的逆：目标约定 -> 源约定
    #[allow(dead_code)]
    pub fn revert(&self, cam_to_world: &Matrix4d) -> Result<Matrix4d> {
        cam_to_world.check_rigid_within("target camera-to-world", COMPOSED_RIGID_TOLERANCE)?;

        let unflipped = Matrix4d(cam_to_world.0 * self.inverse.local_flip_matrix());
        let rot_vec = Utility::rot_vec_from_matrix(&unflipped.rotation());
        let rot_old = Utility::matrix_from_rot_vec(&self.inverse.rot_vec.apply(&rot_vec));
        let trans_old = self.inverse.translation.apply(&unflipped.translation());

        Ok(Matrix4d::from_parts(&rot_old, &trans_old))
    }
}

impl Default for CoordinateConverter {
    fn default() -> Self {
        Self {
            rule: ConversionRule::UNREAL_TO_OPENCV,
            inverse: ConversionRule::UNREAL_TO_OPENCV.inverse(),
        }
    }
}
