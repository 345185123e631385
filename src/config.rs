use std::ops::Range;

use crate::converter::ConversionRule;
use crate::global_types::CameraId;

/// 任务列表路径
pub const JOBS_FILE: &str = "configs/jobs.csv";
/// 输出目录
pub const OUTPUT_DIR: &str = ".";

/// 刚体变换检查的容差
pub const RIGID_TOLERANCE: f64 = 1e-5;
/// 两个各自满足 [RIGID_TOLERANCE] 的变换复合后的容差
pub const COMPOSED_RIGID_TOLERANCE: f64 = 2.0 * RIGID_TOLERANCE;

pub const CAMERA_MODEL: &str = "OPENCV";
/// 图像路径前缀，相对于输出的 transforms.json
pub const PATH_PREFIX: &str = "..";

/// 训练集时间步 [5, 155)
pub const TRAIN_TIMESTEPS: Range<u32> = 5..155;
/// 测试集时间步 [2, 30)
pub const EVAL_TIMESTEPS: Range<u32> = 2..30;
/// 测试集最多保留的帧数（按时间步计）
pub const MAX_EVAL_FRAMES: Option<usize> = Some(30);

/// 每个相机的原始图像尺寸 (h, w)
pub const ORIGINAL_SIZE: [(u32, u32); 5] = [
    (1280, 1920),
    (1280, 1920),
    (1280, 1920),
    (884, 1920),
    (884, 1920),
];

/// 传感器装配相关的静态配置
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// 按相机编号索引的 (h, w)
    pub image_sizes: Vec<(u32, u32)>,
    pub conversion: ConversionRule,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            image_sizes: ORIGINAL_SIZE.to_vec(),
            conversion: ConversionRule::UNREAL_TO_OPENCV,
        }
    }
}

impl RigConfig {
    pub fn image_size(&self, camera: CameraId) -> Option<(u32, u32)> {
        self.image_sizes.get(camera).copied()
    }
}

/// 生成 transforms.json 的配置
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub rig: RigConfig,
    pub camera_model: String,
    pub path_prefix: String,
    pub train_timesteps: Range<u32>,
    pub eval_timesteps: Range<u32>,
    /// `None` 时不截断
    pub max_eval_frames: Option<usize>,
    /// 是否显示进度条
    pub show_progress: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            rig: RigConfig::default(),
            camera_model: CAMERA_MODEL.to_string(),
            path_prefix: PATH_PREFIX.to_string(),
            train_timesteps: TRAIN_TIMESTEPS,
            eval_timesteps: EVAL_TIMESTEPS,
            max_eval_frames: MAX_EVAL_FRAMES,
            show_progress: true,
        }
    }
}
