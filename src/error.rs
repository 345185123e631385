//! 错误类型
//!
//! 所有错误都是致命的：输入是本地静态文件，不做重试。

use std::path::PathBuf;

use thiserror::Error;

use crate::global_types::{CameraId, Split};

#[derive(Debug, Error)]
pub enum CalibError {
    /// 相机内参或外参缺失
    #[error("missing {kind} for camera {camera}: {}", path.display())]
    MissingCalibration {
        kind: &'static str,
        camera: CameraId,
        path: PathBuf,
    },
    /// 某个时间步的车体位姿缺失
    #[error("missing ego pose for split `{split}` at timestep {timestep}: {}", path.display())]
    MissingPose {
        split: Split,
        timestep: u32,
        path: PathBuf,
    },
    #[error("malformed transform ({what}): {reason}")]
    MalformedTransform { what: String, reason: String },
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("invalid camera list {0:?}: {1}")]
    InvalidCameraList(Vec<CameraId>, &'static str),
    #[error("no image size configured for camera {0}")]
    MissingImageSize(CameraId),
    #[error("failed to write manifest {}: {source}", path.display())]
    SerializationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CalibError>;
