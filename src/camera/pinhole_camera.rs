use super::CalibrationFileTrait;

/// 针孔相机内参，单位为像素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }
}

impl CalibrationFileTrait for CameraIntrinsics {
    const KIND: &'static str = "intrinsics";
    const DIR: &'static str = "intrinsics";

    /// 前四个数为 `fx fy cx cy`，其余忽略
    fn from_values(values: &[f64]) -> Result<Self, String> {
        match values {
            [fx, fy, cx, cy, ..] => Ok(Self::new(*fx, *fy, *cx, *cy)),
            _ => Err(format!(
                "expected at least 4 values (fx fy cx cy), got {}",
                values.len()
            )),
        }
    }

    fn to_text(&self) -> String {
        format!("{} {} {} {}\n", self.fx, self.fy, self.cx, self.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalibError;

    #[test]
    fn test_from_values() {
        let k = CameraIntrinsics::from_values(&[960.0, 960.0, 960.0, 640.0]).unwrap();
        assert_eq!(k, CameraIntrinsics::new(960.0, 960.0, 960.0, 640.0));
        // 多余的数值被忽略
        let k = CameraIntrinsics::from_values(&[1.0, 2.0, 3.0, 4.0, 0.1, 0.2]).unwrap();
        assert_eq!(k.cy, 4.0);
        assert!(CameraIntrinsics::from_values(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_read_write_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.txt");
        let k = CameraIntrinsics::new(1109.5, 1109.5, 960.0, 640.25);
        k.write_to_txt(&path).unwrap();
        assert_eq!(CameraIntrinsics::read_from_txt(&path, 0).unwrap(), k);

        let missing = dir.path().join("7.txt");
        assert!(matches!(
            CameraIntrinsics::read_from_txt(&missing, 7),
            Err(CalibError::MissingCalibration { camera: 7, .. })
        ));

        std::fs::write(&path, "1109.5 nan? 960").unwrap();
        assert!(matches!(
            CameraIntrinsics::read_from_txt(&path, 0),
            Err(CalibError::Parse { .. })
        ));
    }
}
