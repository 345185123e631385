//! 生成 transforms.json
//!
//! 训练集在前，测试集在后；每个划分内按时间步、再按相机列表顺序排列。

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::converter::CoordinateConverter;
use crate::dataset::{DatasetTrait, DefaultDataset};
use crate::error::{CalibError, Result};
use crate::global_types::{CameraId, Split};
use crate::job::ManifestJob;
use crate::resolver::{CalibrationResolver, PoseRecord};
use crate::save::{FrameEntry, Manifest};

#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    config: BuildConfig,
    resolver: CalibrationResolver,
}

impl ManifestBuilder {
    pub fn new(config: BuildConfig) -> Result<Self> {
        let converter = CoordinateConverter::new(config.rig.conversion)?;
        let resolver = CalibrationResolver::new(converter).with_progress(config.show_progress);
        Ok(Self { config, resolver })
    }

    /// `{prefix}/{scene}/{split_dir}/{keyword}_camera{cam}_{frame:05}.png`
    pub fn frame_file_path(
        &self,
        scene_path: &str,
        split: Split,
        camera: CameraId,
        frame_index: u32,
    ) -> String {
        format!(
            "{}/{}/{}/{}_camera{}_{:05}.png",
            self.config.path_prefix,
            scene_path,
            split.dir_name(),
            split.keyword(),
            camera,
            frame_index
        )
    }

    /// `{output_dir}/{scene_name}_cam{n}/transforms.json`
    pub fn manifest_path(&self, output_dir: &Path, job: &ManifestJob) -> PathBuf {
        output_dir.join(job.output_name()).join("transforms.json")
    }

    pub fn build<D: DatasetTrait>(&self, dataset: &D, job: &ManifestJob) -> Result<Manifest> {
        // 图像尺寸是静态配置，缺失时在解算之前报错
        for &camera in job.train_cameras.iter().chain(&job.eval_cameras) {
            self.config
                .rig
                .image_size(camera)
                .ok_or(CalibError::MissingImageSize(camera))?;
        }

        // 两个划分的标定都读完之后才开始读取位姿
        let train_calibrations = self.resolver.load_calibrations(dataset, &job.train_cameras)?;
        let eval_calibrations = self.resolver.load_calibrations(dataset, &job.eval_cameras)?;

        let train_split = Split::Train;
        let train_timesteps = self.config.train_timesteps.clone();
        let train_records = self.resolver.resolve_with(
            dataset,
            train_split,
            train_timesteps.clone(),
            &train_calibrations,
        )?;

        let eval_split = Split::OffsetTest {
            offset_meters: job.offset_meters,
        };
        let eval_timesteps = self.config.eval_timesteps.clone();
        let mut eval_records = self.resolver.resolve_with(
            dataset,
            eval_split,
            eval_timesteps.clone(),
            &eval_calibrations,
        )?;
        if let Some(max_frames) = self.config.max_eval_frames {
            let before = eval_records.len();
            eval_records.retain(|record| (record.timestep as usize) < max_frames);
            if eval_records.len() < before {
                log::warn!(
                    "{}: dropped {} eval records beyond {} frames",
                    job.scene_path,
                    before - eval_records.len(),
                    max_frames
                );
            }
        }

        let mut manifest = Manifest::new(&self.config.camera_model);
        manifest.frames.reserve(train_records.len() + eval_records.len());
        for (split, timesteps, records) in [
            (train_split, &train_timesteps, &train_records),
            (eval_split, &eval_timesteps, &eval_records),
        ] {
            for record in records {
                manifest
                    .frames
                    .push(self.frame_entry(&job.scene_path, split, timesteps, record)?);
            }
        }
        log::info!(
            "{}: {} train frames, {} eval frames",
            job.output_name(),
            train_records.len(),
            eval_records.len()
        );
        Ok(manifest)
    }

    fn frame_entry(
        &self,
        scene_path: &str,
        split: Split,
        timesteps: &Range<u32>,
        record: &PoseRecord,
    ) -> Result<FrameEntry> {
        let (h, w) = self
            .config
            .rig
            .image_size(record.camera_id)
            .ok_or(CalibError::MissingImageSize(record.camera_id))?;
        Ok(FrameEntry {
            file_path: self.frame_file_path(
                scene_path,
                split,
                record.camera_id,
                record.frame_index(timesteps.start),
            ),
            transform_matrix: record.camera_to_world.into(),
            fl_x: record.intrinsics.fx,
            fl_y: record.intrinsics.fy,
            cx: record.intrinsics.cx,
            cy: record.intrinsics.cy,
            h,
            w,
        })
    }

    /// 读取场景、生成并写出一个任务的 transforms.json
    pub fn run(&self, job: &ManifestJob, output_dir: &Path) -> Result<PathBuf> {
        let dataset = DefaultDataset::new(&job.scene_path);
        let manifest = self.build(&dataset, job)?;
        let path = self.manifest_path(output_dir, job);
        manifest.write_to_json(&path)?;
        Ok(path)
    }
}
