// 该文件是 Kanjian （看见） 项目的一部分。
// src/model.rs - 模型
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

use std::fmt;

use serde::{Deserialize, Serialize};

/// 推理引擎：输入张量，输出每个类别的置信度
pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 推理引擎输出的原始置信度字节，按类别序号排列
///
/// 每个字节都按无符号数 0-255 解释。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceVector {
  data: Box<[u8]>,
}

impl ConfidenceVector {
  /// 从有符号字节构造，只重新解释位模式，-1 对应 255
  pub fn from_signed(data: &[i8]) -> Self {
    Self {
      data: data.iter().map(|b| *b as u8).collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.data
  }

  /// 第 `index` 类归一化到 [0, 1] 的置信度
  pub fn normalized(&self, index: usize) -> Option<f32> {
    self.data.get(index).map(|b| normalize(*b))
  }
}

impl From<Vec<u8>> for ConfidenceVector {
  fn from(data: Vec<u8>) -> Self {
    Self {
      data: data.into_boxed_slice(),
    }
  }
}

impl From<&[u8]> for ConfidenceVector {
  fn from(data: &[u8]) -> Self {
    Self { data: data.into() }
  }
}

impl AsRef<[u8]> for ConfidenceVector {
  fn as_ref(&self) -> &[u8] {
    &self.data
  }
}

pub(crate) fn normalize(byte: u8) -> f32 {
  byte as f32 / 255.0
}

/// 一条识别结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
  /// 类别序号的字符串形式
  pub id: String,
  pub title: String,
  /// 0 到 1 之间，越高越好
  pub confidence: f32,
}

impl fmt::Display for Recognition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[{}] {} ({:.1}%)",
      self.id,
      self.title,
      self.confidence * 100.0
    )
  }
}

mod replay;
pub use self::replay::{ReplayModel, ReplayModelBuilder, ReplayModelError};
