//! 任务列表
//!
//! 每一行生成一个 transforms.json：
//! `scene_path,train_cameras,eval_cameras,offset_meters`，相机列表以空格分隔。

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::global_types::CameraId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestJob {
    pub scene_path: String,
    /// 顺序有意义，决定输出中同一时间步内的相机顺序
    pub train_cameras: Vec<CameraId>,
    pub eval_cameras: Vec<CameraId>,
    pub offset_meters: u32,
}

#[derive(Debug, Deserialize)]
struct JobRecord {
    scene_path: String,
    train_cameras: String,
    #[serde(default)]
    eval_cameras: String,
    offset_meters: u32,
}

impl ManifestJob {
    /// 场景目录名，如 `carla_pic_0603_Town01`
    pub fn scene_name(&self) -> &str {
        self.scene_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.scene_path)
    }

    /// 输出目录名，如 `carla_pic_0603_Town01_cam3`
    pub fn output_name(&self) -> String {
        format!("{}_cam{}", self.scene_name(), self.train_cameras.len())
    }

    pub fn read_from_csv(path: &Path) -> Result<Vec<Self>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)
            .with_context(|| format!("failed to open job list {:?}", path))?;
        reader
            .deserialize::<JobRecord>()
            .enumerate()
            .map(|(i, record)| {
                let record = record.with_context(|| format!("bad job record #{}", i + 1))?;
                Self::try_from(record).with_context(|| format!("bad job record #{}", i + 1))
            })
            .collect()
    }
}

impl TryFrom<JobRecord> for ManifestJob {
    type Error = anyhow::Error;

    fn try_from(record: JobRecord) -> Result<Self> {
        if record.scene_path.is_empty() {
            bail!("empty scene path");
        }
        let train_cameras = parse_camera_list(&record.train_cameras)?;
        if train_cameras.is_empty() {
            bail!("empty train camera list");
        }
        let mut eval_cameras = parse_camera_list(&record.eval_cameras)?;
        if eval_cameras.is_empty() {
            eval_cameras = vec![0];
        }
        Ok(Self {
            scene_path: record.scene_path.trim_end_matches('/').to_string(),
            train_cameras,
            eval_cameras,
            offset_meters: record.offset_meters,
        })
    }
}

fn parse_camera_list(text: &str) -> Result<Vec<CameraId>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<CameraId>()
                .with_context(|| format!("`{}` is not a camera index", token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(
            &path,
            "scene_path,train_cameras,eval_cameras,offset_meters\n\
             # 单相机\n\
             data/carla_pic_0603_Town01,0,0,1\n\
             data/carla_pic_0603_Town01/, 1 0 2 ,,1\n",
        )
        .unwrap();

        let jobs = ManifestJob::read_from_csv(&path).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].train_cameras, vec![0]);
        assert_eq!(jobs[1].train_cameras, vec![1, 0, 2]);
        assert_eq!(jobs[1].eval_cameras, vec![0]);
        assert_eq!(jobs[1].scene_path, "data/carla_pic_0603_Town01");
        assert_eq!(jobs[1].scene_name(), "carla_pic_0603_Town01");
        assert_eq!(jobs[1].output_name(), "carla_pic_0603_Town01_cam3");
    }

    #[test]
    fn test_bad_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(
            &path,
            "scene_path,train_cameras,eval_cameras,offset_meters\nscene,0 x,0,1\n",
        )
        .unwrap();
        assert!(ManifestJob::read_from_csv(&path).is_err());

        std::fs::write(
            &path,
            "scene_path,train_cameras,eval_cameras,offset_meters\nscene,,0,1\n",
        )
        .unwrap();
        assert!(ManifestJob::read_from_csv(&path).is_err());

        assert!(ManifestJob::read_from_csv(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_shipped_job_list() {
        let jobs = ManifestJob::read_from_csv(Path::new(crate::config::JOBS_FILE)).unwrap();
        assert_eq!(jobs.len(), 12);
        assert!(jobs.iter().all(|job| job.offset_meters == 1));
        assert!(jobs.iter().all(|job| job.eval_cameras == vec![0]));
    }
}
