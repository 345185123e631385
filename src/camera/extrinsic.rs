use super::CalibrationFileTrait;
use crate::error::Result;
use crate::global_cast::Matrix4d;

/// 相机到车体（ego）的刚体变换
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraExtrinsic {
    pub cam_to_ego: Matrix4d,
}

impl CalibrationFileTrait for CameraExtrinsic {
    const KIND: &'static str = "extrinsics";
    const DIR: &'static str = "extrinsics";

    /// 16 个行优先数值
    fn from_values(values: &[f64]) -> std::result::Result<Self, String> {
        let cam_to_ego = Matrix4d::from_row_slice(values)
            .ok_or_else(|| format!("expected 16 values (4x4 matrix), got {}", values.len()))?;
        Ok(Self { cam_to_ego })
    }

    fn validate(&self) -> Result<()> {
        self.cam_to_ego.check_rigid("camera-to-ego")
    }

    fn to_text(&self) -> String {
        let rows: [[f64; 4]; 4] = self.cam_to_ego.into();
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"
    }
}
