use std::fmt::Display;

/// 相机编号，从 0 开始
pub type CameraId = usize;

/// 数据集划分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// 训练集 `train_pic`
    Train,
    /// 测试集 `test_pic/offset_left_{m}m`，offset 为 0 时即为零偏移测试集
    OffsetTest { offset_meters: u32 },
}

impl Split {
    /// 文件名前缀
    pub fn keyword(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::OffsetTest { .. } => "eval",
        }
    }

    /// 相对于场景根目录的子目录
    pub fn dir_name(&self) -> String {
        match self {
            Split::Train => "train_pic".to_string(),
            Split::OffsetTest { offset_meters } => {
                format!("test_pic/offset_left_{}m", offset_meters)
            }
        }
    }
}

impl Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[test]
fn test_split_names() {
    assert_eq!(Split::Train.keyword(), "train");
    assert_eq!(Split::Train.dir_name(), "train_pic");
    let test = Split::OffsetTest { offset_meters: 1 };
    assert_eq!(test.keyword(), "eval");
    assert_eq!(test.dir_name(), "test_pic/offset_left_1m");
    assert_eq!(test.to_string(), "test_pic/offset_left_1m");
}
