//! 测试用的场景目录

use std::ops::Range;
use std::path::Path;

use nalgebra::{Rotation3, Vector3};
use tempfile::TempDir;

use super::{CarlaDataset, EgoPose, EgoPoseFile};
use crate::camera::{CalibrationFileTrait, CameraExtrinsic, CameraIntrinsics};
use crate::global_cast::Matrix4d;
use crate::global_types::{CameraId, Split};

pub struct SceneFixture {
    dir: TempDir,
}

impl SceneFixture {
    /// 写入相机 0..num_cams 的内外参
    pub fn new(num_cams: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self { dir };
        std::fs::create_dir_all(fixture.path().join("intrinsics")).unwrap();
        std::fs::create_dir_all(fixture.path().join("extrinsics")).unwrap();
        for camera in 0..num_cams {
            fixture
                .intrinsics(camera)
                .write_to_txt(&fixture.path().join(format!("intrinsics/{}.txt", camera)))
                .unwrap();
            fixture
                .extrinsic(camera)
                .write_to_txt(&fixture.path().join(format!("extrinsics/{}.txt", camera)))
                .unwrap();
        }
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn intrinsics(&self, camera: CameraId) -> CameraIntrinsics {
        let f = 1000.0 + camera as f64;
        CameraIntrinsics::new(f, f, 960.0, 640.0)
    }

    /// 左、前、右排布的相机
    pub fn extrinsic(&self, camera: CameraId) -> CameraExtrinsic {
        let yaw = (camera as f64 - 1.0) * 0.9;
        let rot = Rotation3::from_euler_angles(0.0, 0.05, yaw);
        CameraExtrinsic {
            cam_to_ego: Matrix4d::from_parts(
                rot.matrix(),
                &Vector3::new(1.5, 0.3 * camera as f64, 1.6),
            ),
        }
    }

    pub fn ego_pose(&self, timestep: u32) -> EgoPose {
        let t = timestep as f64;
        let rot = Rotation3::from_euler_angles(0.0, 0.0, 0.01 * t);
        EgoPose {
            ego_to_world: Matrix4d::from_parts(
                rot.matrix(),
                &Vector3::new(120.0 + t, -35.0 + 0.5 * t, 0.2),
            ),
        }
    }

    pub fn write_poses(&self, split: Split, timesteps: Range<u32>) {
        let dataset = CarlaDataset::new(self.path());
        std::fs::create_dir_all(self.path().join(split.dir_name())).unwrap();
        for t in timesteps {
            let file = EgoPoseFile::from(self.ego_pose(t));
            let text = serde_json::to_string_pretty(&file).unwrap();
            std::fs::write(dataset.ego_pose_path(split, t), text).unwrap();
        }
    }

    pub fn remove_pose(&self, split: Split, timestep: u32) {
        let dataset = CarlaDataset::new(self.path());
        std::fs::remove_file(dataset.ego_pose_path(split, timestep)).unwrap();
    }
}
