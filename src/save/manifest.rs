use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CalibError, Result};
use crate::global_cast::Matrix4d;

/// transforms.json 中的一帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub file_path: String,
    /// 行优先 4x4
    pub transform_matrix: [[f64; 4]; 4],
    pub fl_x: f64,
    pub fl_y: f64,
    pub cx: f64,
    pub cy: f64,
    pub h: u32,
    pub w: u32,
}

impl FrameEntry {
    #[allow(dead_code)]
    pub fn camera_to_world(&self) -> Matrix4d {
        Matrix4d::from(self.transform_matrix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub camera_model: String,
    pub frames: Vec<FrameEntry>,
}

impl Manifest {
    pub fn new(camera_model: &str) -> Self {
        Self {
            camera_model: camera_model.to_string(),
            frames: vec![],
        }
    }

    /// 4 空格缩进的 json，字段顺序固定
    pub fn to_json_bytes(&self) -> std::result::Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// 先写同目录下的临时文件再重命名，不会留下写了一半的文件
    pub fn write_to_json(&self, path: &Path) -> Result<()> {
        let failure = |source: std::io::Error| CalibError::SerializationFailure {
            path: path.to_path_buf(),
            source,
        };
        let bytes = self.to_json_bytes().map_err(|err| failure(err.into()))?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(failure)?;
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(failure)?;
        file.write_all(&bytes).map_err(failure)?;
        file.persist(path).map_err(|err| failure(err.error))?;
        log::info!("wrote {} frames to {:?}", self.frames.len(), path);
        Ok(())
    }

    #[allow(dead_code)]
    pub fn read_from_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CalibError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|err| CalibError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}
