use std::path::{Path, PathBuf};

use super::{DatasetTrait, EgoPose, EgoPoseFile};
use crate::camera::{CalibrationFileTrait, CameraExtrinsic, CameraIntrinsics};
use crate::error::{CalibError, Result};
use crate::global_cast::Matrix4d;
use crate::global_types::{CameraId, Split};

#[derive(Debug, Clone)]
pub struct CarlaDataset {
    path: PathBuf,
}

impl CarlaDataset {
    const EGO_POSE_SUFFIX: &'static str = "camera_extrinsics";

    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `{scene}/{split_dir}/{keyword}_camera_extrinsics_{t:06}.json`
    pub fn ego_pose_path(&self, split: Split, timestep: u32) -> PathBuf {
        self.path.join(split.dir_name()).join(format!(
            "{}_{}_{:06}.json",
            split.keyword(),
            Self::EGO_POSE_SUFFIX,
            timestep
        ))
    }

    pub fn read_ego_pose_file(path: &Path) -> Result<Matrix4d> {
        let text = std::fs::read_to_string(path).map_err(|source| CalibError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: EgoPoseFile = serde_json::from_str(&text).map_err(|err| CalibError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Matrix4d::from(file.transform_matrix))
    }
}

impl DatasetTrait for CarlaDataset {
    fn read_intrinsics(&self, camera: CameraId) -> Result<CameraIntrinsics> {
        CameraIntrinsics::load(&self.path, camera)
    }

    fn read_extrinsic(&self, camera: CameraId) -> Result<CameraExtrinsic> {
        CameraExtrinsic::load(&self.path, camera)
    }

    fn read_ego_pose(&self, split: Split, timestep: u32) -> Result<EgoPose> {
        let path = self.ego_pose_path(split, timestep);
        if !path.is_file() {
            return Err(CalibError::MissingPose {
                split,
                timestep,
                path,
            });
        }
        let ego_to_world = Self::read_ego_pose_file(&path)?;
        ego_to_world.check_rigid(&format!("ego-to-world {}", path.display()))?;
        Ok(EgoPose { ego_to_world })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixture::SceneFixture;

    #[test]
    fn test_ego_pose_path() {
        let dataset = CarlaDataset::new("data/carla_pic_0603_Town01");
        assert_eq!(
            dataset.ego_pose_path(Split::Train, 5),
            Path::new("data/carla_pic_0603_Town01/train_pic/train_camera_extrinsics_000005.json")
        );
        assert_eq!(
            dataset.ego_pose_path(Split::OffsetTest { offset_meters: 1 }, 29),
            Path::new(
                "data/carla_pic_0603_Town01/test_pic/offset_left_1m/eval_camera_extrinsics_000029.json"
            )
        );
    }

    #[test]
    fn test_read_scene() {
        let fixture = SceneFixture::new(3);
        fixture.write_poses(Split::Train, 0..4);
        let dataset = CarlaDataset::new(fixture.path());

        assert_eq!(dataset.read_intrinsics(2).unwrap(), fixture.intrinsics(2));
        assert_eq!(dataset.read_extrinsic(1).unwrap(), fixture.extrinsic(1));
        assert_eq!(
            dataset.read_ego_pose(Split::Train, 3).unwrap(),
            fixture.ego_pose(3)
        );
    }

    #[test]
    fn test_missing_files() {
        let fixture = SceneFixture::new(1);
        fixture.write_poses(Split::Train, 0..2);
        let dataset = CarlaDataset::new(fixture.path());

        assert!(matches!(
            dataset.read_intrinsics(4),
            Err(CalibError::MissingCalibration { camera: 4, .. })
        ));
        assert!(matches!(
            dataset.read_extrinsic(4),
            Err(CalibError::MissingCalibration { camera: 4, .. })
        ));
        assert!(matches!(
            dataset.read_ego_pose(Split::Train, 2),
            Err(CalibError::MissingPose { timestep: 2, .. })
        ));
        // 训练集的位姿不能当作测试集使用
        assert!(matches!(
            dataset.read_ego_pose(Split::OffsetTest { offset_meters: 0 }, 0),
            Err(CalibError::MissingPose { .. })
        ));
    }

    #[test]
    fn test_bad_ego_pose_file() {
        let fixture = SceneFixture::new(1);
        fixture.write_poses(Split::Train, 0..1);
        let dataset = CarlaDataset::new(fixture.path());
        let path = dataset.ego_pose_path(Split::Train, 0);

        std::fs::write(&path, r#"{"matrix": []}"#).unwrap();
        assert!(matches!(
            dataset.read_ego_pose(Split::Train, 0),
            Err(CalibError::Parse { .. })
        ));

        std::fs::write(
            &path,
            r#"{"transform_matrix": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 2]]}"#,
        )
        .unwrap();
        assert!(matches!(
            dataset.read_ego_pose(Split::Train, 0),
            Err(CalibError::MalformedTransform { .. })
        ));

        // 其余字段忽略
        std::fs::write(
            &path,
            r#"{"timestamp": 12.5, "transform_matrix": [[1, 0, 0, 4], [0, 1, 0, 5], [0, 0, 1, 6], [0, 0, 0, 1]]}"#,
        )
        .unwrap();
        let pose = dataset.read_ego_pose(Split::Train, 0).unwrap();
        assert_eq!(pose.ego_to_world.translation(), nalgebra::Vector3::new(4.0, 5.0, 6.0));
    }
}
