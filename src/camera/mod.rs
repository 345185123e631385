//! 相机标定
//!
//! 每个相机一份内参 `intrinsics/{i}.txt` 和一份外参 `extrinsics/{i}.txt`，
//! 均为空白分隔的纯文本数值。

mod extrinsic;
mod pinhole_camera;
pub use extrinsic::CameraExtrinsic;
pub use pinhole_camera::CameraIntrinsics;

use std::path::Path;

use crate::error::{CalibError, Result};
use crate::global_types::CameraId;

/// 标定文件的 trait
pub trait CalibrationFileTrait: Sized {
    /// 标定类型，用于日志和错误信息
    const KIND: &'static str;
    /// 场景根目录下的子目录
    const DIR: &'static str;

    fn from_values(values: &[f64]) -> std::result::Result<Self, String>;
    fn to_text(&self) -> String;

    /// 数值解析之后的额外检查
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn read_from_txt(path: &Path, camera: CameraId) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CalibError::MissingCalibration {
                    kind: Self::KIND,
                    camera,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(CalibError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let values = parse_numbers(&text).map_err(|reason| CalibError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;
        let calib = Self::from_values(&values).map_err(|reason| CalibError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;
        calib.validate()?;
        Ok(calib)
    }

    #[allow(dead_code)]
    fn write_to_txt(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text()).map_err(|source| CalibError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `{scene}/{DIR}/{camera}.txt`
    fn load(scene: &Path, camera: CameraId) -> Result<Self> {
        let path = scene.join(Self::DIR).join(format!("{}.txt", camera));
        let calib = Self::read_from_txt(&path, camera)?;
        log::debug!("loaded {} for camera {} from {:?}", Self::KIND, camera, path);
        Ok(calib)
    }
}

/// 解析空白分隔的数值
fn parse_numbers(text: &str) -> std::result::Result<Vec<f64>, String> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("`{}` is not a number", token))
        })
        .collect()
}

#[test]
fn test_parse_numbers() {
    assert_eq!(
        parse_numbers("1 2.5\n-3e2\t4\n").unwrap(),
        vec![1.0, 2.5, -300.0, 4.0]
    );
    assert!(parse_numbers("1 two 3").is_err());
    assert!(parse_numbers("").unwrap().is_empty());
}
