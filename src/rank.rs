// 该文件是 Kanjian （看见） 项目的一部分。
// src/rank.rs - 置信度排序，选出前 K 个标签
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
  cmp::{Ordering, Reverse},
  collections::BinaryHeap,
};

use thiserror::Error;
use tracing::debug;

use crate::{
  labels::LabelCatalog,
  model::{Recognition, normalize},
};

/// 默认展示的结果数量
pub const RESULTS_TO_SHOW: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RankError {
  #[error("置信度数量 {confidences} 与标签数量 {labels} 不一致")]
  LengthMismatch { confidences: usize, labels: usize },
}

// 置信度高者优先，置信度相同时序号小者优先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
  confidence: u8,
  index: usize,
}

impl Ord for Candidate {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .confidence
      .cmp(&other.confidence)
      .then_with(|| other.index.cmp(&self.index))
  }
}

impl PartialOrd for Candidate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// 选出置信度最高的 `k` 个类别，按置信度从高到低排列
///
/// 使用容量为 `k` 的小顶堆，复杂度 O(n log k)。置信度相同的类别按标签序号
/// 排列，结果数量为 `min(k, labels.len())`。
pub fn top_k(
  confidences: &[u8],
  labels: &LabelCatalog,
  k: usize,
) -> Result<Vec<Recognition>, RankError> {
  if confidences.len() != labels.len() {
    return Err(RankError::LengthMismatch {
      confidences: confidences.len(),
      labels: labels.len(),
    });
  }
  // 堆容量不超过标签数量
  let k = k.min(labels.len());
  if k == 0 {
    return Ok(Vec::new());
  }

  let mut heap = BinaryHeap::with_capacity(k.saturating_add(1));
  for (index, (&confidence, title)) in confidences.iter().zip(labels.iter()).enumerate() {
    if confidence > 0 {
      debug!(
        "[{}] {} ({:.1}%)",
        index,
        title,
        normalize(confidence) * 100.0
      );
    }

    heap.push(Reverse(Candidate { confidence, index }));
    if heap.len() > k {
      heap.pop();
    }
  }

  // Reverse 的升序即候选的降序
  let results = heap
    .into_sorted_vec()
    .into_iter()
    .map(|Reverse(candidate)| Recognition {
      id: candidate.index.to_string(),
      title: labels.get(candidate.index).unwrap_or_default().to_string(),
      confidence: normalize(candidate.confidence),
    })
    .collect();

  Ok(results)
}
