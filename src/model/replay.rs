// 该文件是 Kanjian （看见） 项目的一部分。
// src/model/replay.rs - 回放已记录置信度的推理引擎
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

use std::cell::Cell;

use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{ConfidenceVector, Model},
};

#[derive(Error, Debug)]
pub enum ReplayModelError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(#[from] std::io::Error),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
}

/// 按顺序循环返回文件中记录的置信度向量
///
/// 文件内容为连续的原始字节，每 `num_classes` 个字节为一次推理的输出。
/// 内部游标不是线程安全的，只能在单个工作线程中使用。
pub struct ReplayModel<Frame> {
  records: Box<[u8]>,
  num_classes: usize,
  cursor: Cell<usize>,
  _phantom: std::marker::PhantomData<Frame>,
}

pub struct ReplayModelBuilder {
  model_path: String,
  num_classes: Option<usize>,
}

impl FromUrlWithScheme for ReplayModelBuilder {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayModelBuilder {
  type Error = ReplayModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayModelError::ModelPathError(format!(
        "模型路径必须使用 {} 方案",
        Self::SCHEME
      )));
    }

    Ok(ReplayModelBuilder {
      model_path: url.path().to_string(),
      num_classes: None,
    })
  }
}

impl ReplayModelBuilder {
  pub fn num_classes(mut self, num_classes: usize) -> Self {
    self.num_classes = Some(num_classes);
    self
  }

  pub fn build<Frame>(self) -> Result<ReplayModel<Frame>, ReplayModelError> {
    info!("加载回放文件: {}", self.model_path);
    let records = std::fs::read(&self.model_path)?;
    debug!("回放文件大小: {} 字节", records.len());

    let num_classes = self
      .num_classes
      .ok_or_else(|| ReplayModelError::ModelInvalid("未指定类别数量".to_string()))?;
    ReplayModel::from_records(records, num_classes)
  }
}

impl<Frame> ReplayModel<Frame> {
  pub fn from_records(records: Vec<u8>, num_classes: usize) -> Result<Self, ReplayModelError> {
    if num_classes == 0 {
      return Err(ReplayModelError::ModelInvalid("类别数量不能为零".to_string()));
    }
    if records.is_empty() || records.len() % num_classes != 0 {
      error!(
        "回放记录长度 {} 不是类别数量 {} 的正整数倍",
        records.len(),
        num_classes
      );
      return Err(ReplayModelError::ModelInvalid(format!(
        "回放记录长度 {} 不是类别数量 {} 的正整数倍",
        records.len(),
        num_classes
      )));
    }

    debug!(
      "回放记录数量: {}, 类别数量: {}",
      records.len() / num_classes,
      num_classes
    );

    Ok(ReplayModel {
      records: records.into_boxed_slice(),
      num_classes,
      cursor: Cell::new(0),
      _phantom: std::marker::PhantomData,
    })
  }

  pub fn num_classes(&self) -> usize {
    self.num_classes
  }

  pub fn num_records(&self) -> usize {
    self.records.len() / self.num_classes
  }
}

impl<Frame> Model for ReplayModel<Frame> {
  type Input = Frame;
  type Output = ConfidenceVector;
  type Error = ReplayModelError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let index = self.cursor.get();
    self.cursor.set((index + 1) % self.num_records());
    debug!("回放第 {} 条记录", index);

    let start = index * self.num_classes;
    Ok(ConfidenceVector::from(
      &self.records[start..start + self.num_classes],
    ))
  }
}
