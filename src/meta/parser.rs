//! 元数据（.meta）解析器
//!
//! SpikeGLX 的 `.meta` 伴随文件由 `key=value` 行组成。每行只按第一个 `=`
//! 切分，键值两侧去空白；值依次尝试整数、浮点数，最后保留原始字符串。
//! 没有 `=` 的行以整行文本为键，值为空标记。

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, ExtractResult, io_error, parse_error};
use crate::tools::constants::meta_keys;

/// 元数据值（类型推断结果）
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// 行中没有 `=`
    Null,
}

impl MetaValue {
    /// 按 整数 → 浮点 → 字符串 的顺序推断值类型
    pub fn infer(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            MetaValue::Int(value)
        } else if let Ok(value) = raw.parse::<f64>() {
            MetaValue::Float(value)
        } else {
            MetaValue::Text(raw.to_string())
        }
    }

    /// 数值视图（整数和浮点均可）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Int(v) => Some(*v as f64),
            MetaValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{v:?}"),
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Null => Ok(()),
        }
    }
}

/// 有序的元数据记录
///
/// 键唯一，保持首次出现的顺序；重复键以后出现的值为准（位置不变）。
/// 记录在解析后不再修改，派生值只在重写输出时合并。
#[derive(Debug, Clone, Default)]
pub struct MetadataRecord {
    source: PathBuf,
    entries: Vec<(String, MetaValue)>,
    index: HashMap<String, usize>,
}

impl MetadataRecord {
    /// 从文本内容构建记录（`source` 仅用于错误上下文）
    pub fn from_text(source: impl Into<PathBuf>, text: &str) -> Self {
        let mut record = Self {
            source: source.into(),
            ..Self::default()
        };

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, raw)) => (key.trim(), MetaValue::infer(raw.trim())),
                None => (line.trim(), MetaValue::Null),
            };
            record.insert(key.to_string(), value);
        }

        record
    }

    fn insert(&mut self, key: String, value: MetaValue) {
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// 来源文件路径
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按原始顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 采样率（Hz）：优先 `niSampRate`，否则 `imSampRate`
    pub fn sample_rate(&self) -> ExtractResult<f64> {
        let key = if self.contains_key(meta_keys::NI_SAMPLE_RATE) {
            meta_keys::NI_SAMPLE_RATE
        } else if self.contains_key(meta_keys::IM_SAMPLE_RATE) {
            meta_keys::IM_SAMPLE_RATE
        } else {
            return Err(ExtractError::MissingField {
                path: self.source.clone(),
                field: format!("{} | {}", meta_keys::NI_SAMPLE_RATE, meta_keys::IM_SAMPLE_RATE),
            });
        };

        let rate = self.get(key).and_then(MetaValue::as_f64).ok_or_else(|| {
            parse_error(&self.source, format!("{key} 不是数值 / is not numeric"))
        })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(parse_error(
                &self.source,
                format!("{key}={rate} 不是正采样率 / is not a positive sample rate"),
            ));
        }

        Ok(rate)
    }

    /// 保存的通道数（`nSavedChans`）
    pub fn channel_count(&self) -> ExtractResult<usize> {
        let missing = || ExtractError::MissingField {
            path: self.source.clone(),
            field: meta_keys::SAVED_CHANNELS.to_string(),
        };

        let value = self.get(meta_keys::SAVED_CHANNELS).ok_or_else(missing)?;
        match value {
            MetaValue::Int(n) if *n > 0 => Ok(*n as usize),
            MetaValue::Int(_) => Err(missing()),
            other => Err(parse_error(
                &self.source,
                format!(
                    "{}={other} 不是整数 / is not an integer",
                    meta_keys::SAVED_CHANNELS
                ),
            )),
        }
    }
}

/// 解析 `.meta` 文件
///
/// # 错误
///
/// * `ExtractError::Parse` - 文件无法打开或读取（包括非UTF-8内容）
pub fn parse_meta(path: &Path) -> ExtractResult<MetadataRecord> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => parse_error(path, "不是UTF-8文本 / not UTF-8 text"),
        _ => parse_error(path, format!("无法读取 / cannot read: {e}")),
    })?;

    let record = MetadataRecord::from_text(path, &text);
    tracing::debug!(path = %path.display(), keys = record.len(), "parsed sidecar metadata");
    Ok(record)
}

/// 读取 `.meta` 原始文本（重写时逐行透传需要）
pub(crate) fn read_meta_text(path: &Path) -> ExtractResult<String> {
    std::fs::read_to_string(path).map_err(|e| io_error("读取元数据 / read metadata", path, e))
}
