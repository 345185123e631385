//! 数据集处理
//!
//! CARLA 仿真器采集的场景目录：
//! - `intrinsics/{i}.txt`、`extrinsics/{i}.txt` 每个相机一份
//! - `train_pic/train_camera_extrinsics_{t:06}.json` 训练集每个时间步的车体位姿
//! - `test_pic/offset_left_{m}m/eval_camera_extrinsics_{t:06}.json` 测试集
mod carla;
#[cfg(test)]
pub(crate) mod fixture;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraExtrinsic, CameraIntrinsics};
use crate::error::Result;
use crate::global_cast::Matrix4d;
use crate::global_types::{CameraId, Split};

pub use carla::CarlaDataset;
pub type DefaultDataset = CarlaDataset;

/// 某个时间步车体到世界的刚体变换
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EgoPose {
    pub ego_to_world: Matrix4d,
}

/// 位姿 json 文件，只关心 `transform_matrix` 字段
#[derive(Debug, Serialize, Deserialize)]
pub struct EgoPoseFile {
    pub transform_matrix: [[f64; 4]; 4],
}

impl From<EgoPose> for EgoPoseFile {
    fn from(pose: EgoPose) -> Self {
        Self {
            transform_matrix: pose.ego_to_world.into(),
        }
    }
}

pub trait DatasetTrait {
    /// 读取相机内参
    fn read_intrinsics(&self, camera: CameraId) -> Result<CameraIntrinsics>;
    /// 读取相机外参
    fn read_extrinsic(&self, camera: CameraId) -> Result<CameraExtrinsic>;
    /// 读取某个划分、某个时间步的车体位姿
    fn read_ego_pose(&self, split: Split, timestep: u32) -> Result<EgoPose>;
}
