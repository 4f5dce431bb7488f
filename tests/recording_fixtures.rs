//! 录制文件测试固件
//!
//! 在临时目录中生成 SpikeGLX 风格的 `.bin` + `.meta`、事件时间文件和行为日志。
//! 样本值由 (行, 通道) 确定，便于逐样本核对提取结果。

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// 标准场景的采样率
pub const SAMPLE_RATE: u32 = 1000;

/// 标准场景的通道数
pub const CHANNELS: usize = 4;

/// 标准场景的事件时间
pub const EVENT_TIMES: [f64; 4] = [2.0, 5.0, 9.0, 20.0];

/// 行为日志样例（表头 + 5 个试次 + 表尾）
pub const BEHAVIOR_LOG: &str = "\
Mouse AS20 trainingSingle6Tone2024
trial time tone resp
0001 2.0 3 1
0002 5.0 5 0
0003 9.0 2 1
0004 20.0 6 1
0005 31.5 1 0
0000 summary 5 trials
";

/// 确定性样本值
pub fn sample_value(row: usize, channel: usize) -> i16 {
    ((row * 7 + channel * 1000) % 30_000) as i16
}

/// 生成 `rows × channels` 的小端 int16 交错数据
pub fn recording_bytes(rows: usize, channels: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(rows * channels * 2);
    for row in 0..rows {
        for channel in 0..channels {
            bytes.extend_from_slice(&sample_value(row, channel).to_le_bytes());
        }
    }
    bytes
}

/// NIDQ 风格的 `.meta` 文本（含一个自定义字段）
pub fn nidq_meta_text(rate: u32, channels: usize) -> String {
    format!(
        "acqMnMaXaDw=0,0,1,1\n\
         fileCreateTime=2024-03-01T09:15:00\n\
         fileName=D:/AS20/AS20_g0/AS20_g0_t0.nidq.bin\n\
         fileSHA1=0123456789ABCDEF0123456789ABCDEF01234567\n\
         fileSizeBytes=123456789\n\
         fileTimeSecs=1543.2\n\
         firstSample=42\n\
         customField=keepme\n\
         nSavedChans={channels}\n\
         niSampRate={rate}\n\
         typeThis=nidq\n"
    )
}

/// IMEC AP 风格的 `.meta` 文本
pub fn ap_meta_text(rate: u32, channels: usize) -> String {
    format!(
        "fileSizeBytes=999\n\
         imSampRate={rate}\n\
         nSavedChans={channels}\n\
         firstSample=7\n\
         typeThis=imec\n"
    )
}

/// 临时录制目录
pub struct RecordingFixtures {
    dir: TempDir,
}

impl RecordingFixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("创建临时目录失败"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// 写入任意文件（自动创建父目录）
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("创建目录失败");
        }
        std::fs::write(&path, contents).expect("写入固件失败");
        path
    }

    /// 写入 `.bin` 与配套 `.meta`，返回 `.bin` 路径
    pub fn write_recording(&self, relative_bin: &str, rows: usize, meta_text: &str) -> PathBuf {
        let bin = self.write(relative_bin, recording_bytes(rows, CHANNELS));
        let meta = bin.with_extension("meta");
        std::fs::write(&meta, meta_text).expect("写入 .meta 失败");
        bin
    }

    /// 标准 NIDQ 录制：1000Hz、4通道、12秒
    pub fn standard_nidq(&self, relative_bin: &str) -> PathBuf {
        self.write_recording(
            relative_bin,
            12_000,
            &nidq_meta_text(SAMPLE_RATE, CHANNELS),
        )
    }

    /// 标准事件文件（每行一个秒数）
    pub fn standard_events(&self, relative: &str) -> PathBuf {
        let text: String = EVENT_TIMES.iter().map(|t| format!("{t:?}\n")).collect();
        self.write(relative, text)
    }

    /// 目录树下是否残留暂存文件
    pub fn partial_leftovers(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
            let Ok(entries) = std::fs::read_dir(dir) else {
                return;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, found);
                } else if path.to_string_lossy().ends_with(".partial") {
                    found.push(path);
                }
            }
        }

        let mut found = Vec::new();
        walk(self.root(), &mut found);
        found
    }
}

/// 从提取结果中读回某一样本
pub fn read_sample(bytes: &[u8], row: usize, channel: usize, channels: usize) -> i16 {
    let offset = (row * channels + channel) * 2;
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 验证固件数据布局
    #[test]
    fn test_fixture_layout() {
        let fixtures = RecordingFixtures::new();
        let bin = fixtures.standard_nidq("AS20_g0_t0.nidq.bin");

        let bytes = std::fs::read(&bin).unwrap();
        assert_eq!(bytes.len(), 12_000 * CHANNELS * 2);
        assert_eq!(read_sample(&bytes, 500, 2, CHANNELS), sample_value(500, 2));
        assert!(bin.with_extension("meta").exists());

        println!("✓ 固件布局正确");
    }
}
