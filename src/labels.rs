// 该文件是 Kanjian （看见） 项目的一部分。
// src/labels.rs - 分类标签表
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::{
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LabelError {
  #[error("无法读取标签文件 {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("标签文件为空: {0}")]
  Empty(String),
}

/// 分类标签表，第 `i` 行对应置信度向量的第 `i` 项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCatalog {
  labels: Box<[String]>,
}

impl LabelCatalog {
  /// 从文本文件加载标签，每行一个；行序即类别序号，空行同样占一个序号
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LabelError> {
    let path = path.as_ref();
    let io_error = |source| LabelError::Io {
      path: path.display().to_string(),
      source,
    };

    let file = File::open(path).map_err(io_error)?;
    let catalog = Self::from_reader(BufReader::new(file)).map_err(io_error)?;
    if catalog.is_empty() {
      return Err(LabelError::Empty(path.display().to_string()));
    }

    info!("从 {} 加载 {} 个标签", path.display(), catalog.len());
    Ok(catalog)
  }

  pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
    let labels = reader
      .lines()
      .map(|line| line.map(|l| l.trim_end_matches('\r').to_string()))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self::from(labels))
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(String::as_str)
  }
}

impl From<Vec<String>> for LabelCatalog {
  fn from(labels: Vec<String>) -> Self {
    Self {
      labels: labels.into_boxed_slice(),
    }
  }
}

impl<S: Into<String>> FromIterator<S> for LabelCatalog {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
  }
}
