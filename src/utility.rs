pub struct Utility {}

impl Utility {
    /// 旋转矩阵转换为旋转向量（轴角），角度范围 [0, π]
    ///
    /// 经由单位四元数计算，在单位阵和 180° 附近都数值稳定。
    #[inline]
    pub fn rot_vec_from_matrix(rot: &nalgebra::Matrix3<f64>) -> nalgebra::Vector3<f64> {
        let rot = nalgebra::Rotation3::from_matrix_unchecked(*rot);
        let q = nalgebra::UnitQuaternion::from_rotation_matrix(&rot);
        // 取标量部分非负的四元数，使角度落在 [0, π]
        let (w, imag) = if q.scalar() >= 0.0 {
            (q.scalar(), q.imag())
        } else {
            (-q.scalar(), -q.imag())
        };
        let s = imag.norm();
        if s < 1e-12 {
            // 小角度一阶近似
            return imag * 2.0;
        }
        imag * (2.0 * s.atan2(w) / s)
    }

    /// 旋转向量转换为旋转矩阵
    #[inline]
    pub fn matrix_from_rot_vec(rot_vec: &nalgebra::Vector3<f64>) -> nalgebra::Matrix3<f64> {
        nalgebra::Rotation3::from_scaled_axis(*rot_vec).into_inner()
    }
}
