//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 二进制样本格式常量
pub mod sample_format {
    /// 单个样本宽度（字节）：小端 int16
    pub const SAMPLE_WIDTH_BYTES: usize = 2;
}

/// 元数据字段名
pub mod meta_keys {
    /// NI-DAQ 采样率（优先）
    pub const NI_SAMPLE_RATE: &str = "niSampRate";
    /// IMEC 探针采样率
    pub const IM_SAMPLE_RATE: &str = "imSampRate";
    /// 保存的通道数
    pub const SAVED_CHANNELS: &str = "nSavedChans";

    pub const FILE_CREATE_TIME: &str = "fileCreateTime";
    pub const FILE_NAME: &str = "fileName";
    pub const FILE_SHA1: &str = "fileSHA1";
    pub const FILE_SIZE_BYTES: &str = "fileSizeBytes";
    pub const FILE_TIME_SECS: &str = "fileTimeSecs";
    pub const FIRST_SAMPLE: &str = "firstSample";

    /// 提取文件末尾追加的标记行（不含换行）
    pub const EXTRACTED_MARKER: &str = "~extracted=1";

    /// 元数据文件扩展名
    pub const META_EXTENSION: &str = "meta";
}

/// 默认配置值
pub mod defaults {
    /// 摘要计算的默认读块大小（64 KiB）
    pub const DIGEST_CHUNK_SIZE: usize = 64 * 1024;

    /// 默认起始事件索引
    pub const START_EVENT: usize = 0;

    /// 默认结束事件索引（包含）
    pub const END_EVENT: usize = 3;

    /// 默认前后填充时长（秒）
    pub const PADDING_SECONDS: f64 = 1.5;

    /// 输出目录下的子目录
    pub const BEHAVIOR_SUBDIR: &str = "behavior";
    pub const ECEPHYS_SUBDIR: &str = "ecephys";
}

/// 路径定位的默认glob模式
pub mod patterns {
    pub const BEHAVIOR_TXT: &str = "*.txt";
    pub const SPIKEGLX_NIDQ: &str = "*.nidq.bin";
    pub const SPIKEGLX_AP: &str = "**/*.ap.bin";
}
