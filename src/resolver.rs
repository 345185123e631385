//! 位姿解算
//!
//! 对时间步区间 `[start, end)` 和相机列表，计算
//! `convert(ego_to_world(t) * cam_to_ego(cam))`，按时间步优先、相机次之的顺序输出。

use std::collections::HashSet;
use std::ops::Range;

use indicatif::{ProgressBar, ProgressStyle};

use crate::camera::{CameraExtrinsic, CameraIntrinsics};
use crate::converter::CoordinateConverter;
use crate::dataset::{DatasetTrait, EgoPose};
use crate::error::{CalibError, Result};
use crate::global_cast::Matrix4d;
use crate::global_types::{CameraId, Split};

/// 一个 (时间步, 相机) 的解算结果
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    pub camera_id: CameraId,
    /// 相对于区间起点，从 0 开始
    pub timestep: u32,
    /// 目标约定下的 camera-to-world
    pub camera_to_world: Matrix4d,
    pub intrinsics: CameraIntrinsics,
}

impl PoseRecord {
    /// 图像文件名中的帧号，即绝对时间步
    pub fn frame_index(&self, range_start: u32) -> u32 {
        range_start + self.timestep
    }
}

/// 一个相机的内外参
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCalibration {
    pub camera_id: CameraId,
    pub intrinsics: CameraIntrinsics,
    pub extrinsic: CameraExtrinsic,
}

#[derive(Debug, Clone, Default)]
pub struct CalibrationResolver {
    converter: CoordinateConverter,
    show_progress: bool,
}

impl CalibrationResolver {
    pub fn new(converter: CoordinateConverter) -> Self {
        Self {
            converter,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 检查相机列表并读取每个相机的内外参，任何一个缺失都直接返回错误
    pub fn load_calibrations<D: DatasetTrait>(
        &self,
        dataset: &D,
        cameras: &[CameraId],
    ) -> Result<Vec<CameraCalibration>> {
        check_camera_list(cameras)?;
        cameras
            .iter()
            .map(|&camera_id| -> Result<CameraCalibration> {
                Ok(CameraCalibration {
                    camera_id,
                    intrinsics: dataset.read_intrinsics(camera_id)?,
                    extrinsic: dataset.read_extrinsic(camera_id)?,
                })
            })
            .collect()
    }

    /// 任何相机缺少标定、任何时间步缺少位姿，都直接返回错误，不产生部分结果
    #[allow(dead_code)]
    pub fn resolve<D: DatasetTrait>(
        &self,
        dataset: &D,
        split: Split,
        timesteps: Range<u32>,
        cameras: &[CameraId],
    ) -> Result<Vec<PoseRecord>> {
        let calibrations = self.load_calibrations(dataset, cameras)?;
        self.resolve_with(dataset, split, timesteps, &calibrations)
    }

    /// 用已读取的标定解算，相机顺序即 `calibrations` 的顺序
    pub fn resolve_with<D: DatasetTrait>(
        &self,
        dataset: &D,
        split: Split,
        timesteps: Range<u32>,
        calibrations: &[CameraCalibration],
    ) -> Result<Vec<PoseRecord>> {
        let bar = if self.show_progress {
            ProgressBar::new(timesteps.len() as u64).with_style(
                ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            )
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(format!("loading {} ego poses", split));
        let ego_poses = timesteps
            .clone()
            .map(|t| {
                let pose = dataset.read_ego_pose(split, t);
                bar.inc(1);
                pose.map(|pose| (t, pose))
            })
            .collect::<Result<Vec<(u32, EgoPose)>>>();
        bar.finish_and_clear();
        let ego_poses = ego_poses?;

        let mut records = Vec::with_capacity(ego_poses.len() * calibrations.len());
        for (t, ego_pose) in &ego_poses {
            for calib in calibrations {
                let cam_to_world = ego_pose.ego_to_world.compose(&calib.extrinsic.cam_to_ego);
                let camera_to_world = self.converter.convert(&cam_to_world).map_err(|err| {
                    log::error!(
                        "camera {} at timestep {} ({}): {}",
                        calib.camera_id,
                        t,
                        split,
                        err
                    );
                    err
                })?;
                records.push(PoseRecord {
                    camera_id: calib.camera_id,
                    timestep: t - timesteps.start,
                    camera_to_world,
                    intrinsics: calib.intrinsics,
                });
            }
        }
        log::info!(
            "resolved {} poses for split `{}`, timesteps {:?}, cameras {:?}",
            records.len(),
            split,
            timesteps,
            calibrations.iter().map(|c| c.camera_id).collect::<Vec<_>>()
        );
        Ok(records)
    }
}

/// 相机列表非空且不重复
fn check_camera_list(cameras: &[CameraId]) -> Result<()> {
    if cameras.is_empty() {
        return Err(CalibError::InvalidCameraList(cameras.to_vec(), "empty"));
    }
    let mut seen = HashSet::new();
    if !cameras.iter().all(|c| seen.insert(*c)) {
        return Err(CalibError::InvalidCameraList(
            cameras.to_vec(),
            "duplicated camera",
        ));
    }
    Ok(())
}
