//! 输入路径定位
//!
//! 在行为、SpikeGLX 和 TPrime/CatGT 输出目录下按 glob 模式查找输入文件。
//! 每个类别必须恰好匹配一个文件；零个或多个都直接报错，不做"取第一个"的猜测。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::constants::patterns;
use crate::error::{ExtractError, ExtractResult, io_error};

/// 定位配置（可来自 JSON 任务文件）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocateConfig {
    pub behavior_root: PathBuf,
    pub spikeglx_root: PathBuf,
    pub tprime_root: PathBuf,
    pub trial_events_pattern: String,
    #[serde(default = "default_behavior_txt")]
    pub behavior_txt_pattern: String,
    #[serde(default = "default_nidq")]
    pub spikeglx_nidq_pattern: String,
    #[serde(default = "default_ap")]
    pub spikeglx_ap_pattern: String,
}

fn default_behavior_txt() -> String {
    patterns::BEHAVIOR_TXT.to_string()
}

fn default_nidq() -> String {
    patterns::SPIKEGLX_NIDQ.to_string()
}

fn default_ap() -> String {
    patterns::SPIKEGLX_AP.to_string()
}

/// 定位到的输入文件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputPaths {
    pub behavior_events: PathBuf,
    pub nidq_bin_file: PathBuf,
    pub ap_bin_file: PathBuf,
    pub trial_events: PathBuf,
}

/// 在 `root` 下查找唯一匹配 `pattern` 的文件
pub fn locate_unique(root: &Path, pattern: &str) -> ExtractResult<PathBuf> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!("{escaped_root}/{pattern}");

    let entries = glob::glob(&full_pattern).map_err(|e| {
        ExtractError::InvalidInput(format!("glob模式无效 / invalid glob pattern `{pattern}`: {e}"))
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            io_error("遍历目录 / glob", &path, e.into())
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() != 1 {
        tracing::warn!(root = %root.display(), pattern, candidates = ?matches, "pattern did not match exactly one file");
        return Err(ExtractError::Locate {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
            matches: matches.len(),
        });
    }

    Ok(matches.remove(0))
}

/// 按配置定位全部输入文件
pub fn locate_input_paths(config: &LocateConfig) -> ExtractResult<InputPaths> {
    let paths = InputPaths {
        behavior_events: locate_unique(&config.behavior_root, &config.behavior_txt_pattern)?,
        nidq_bin_file: locate_unique(&config.spikeglx_root, &config.spikeglx_nidq_pattern)?,
        ap_bin_file: locate_unique(&config.spikeglx_root, &config.spikeglx_ap_pattern)?,
        trial_events: locate_unique(&config.tprime_root, &config.trial_events_pattern)?,
    };

    tracing::info!(?paths, "located input paths");
    Ok(paths)
}
