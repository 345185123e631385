/// nalgebra
/// https://docs.rs/nalgebra/latest/nalgebra/
///
/// 将 CARLA 采集的相机标定和车体位姿转换为新视角合成训练用的 transforms.json
///
// scene path data/carla_pic_0603_Town01/ **
mod builder;
mod camera;
mod config;
mod converter;
mod dataset;
mod error;
mod global_cast;
mod global_types;
mod job;
mod resolver;
mod save;
mod utility;

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::builder::ManifestBuilder;
use crate::config::BuildConfig;
use crate::job::ManifestJob;

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .init();

    let jobs_file = Path::new(config::JOBS_FILE);
    log::info!("jobs: {:?}", jobs_file);
    let jobs = ManifestJob::read_from_csv(jobs_file)?;

    let builder = ManifestBuilder::new(BuildConfig::default())?;
    let failed = run_jobs(&builder, &jobs, Path::new(config::OUTPUT_DIR));
    if failed > 0 {
        bail!("{} of {} jobs failed", failed, jobs.len());
    }
    Ok(())
}

/// 逐个执行任务，一个任务失败不影响其他任务，返回失败个数
fn run_jobs(builder: &ManifestBuilder, jobs: &[ManifestJob], output_dir: &Path) -> usize {
    let mut failed = 0;
    for job in jobs {
        log::info!(
            "scene {} train cameras {:?} eval cameras {:?} offset {}m",
            job.scene_path,
            job.train_cameras,
            job.eval_cameras,
            job.offset_meters
        );
        match builder
            .run(job, output_dir)
            .with_context(|| format!("job {} failed", job.output_name()))
        {
            Ok(path) => log::info!("done: {:?}", path),
            Err(err) => {
                log::error!("{:#}", err);
                failed += 1;
            }
        }
    }
    failed
}
