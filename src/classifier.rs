// 该文件是 Kanjian （看见） 项目的一部分。
// src/classifier.rs - 图像分类器：张量转换、推理与排序
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

use thiserror::Error;
use tracing::{debug, info};

use crate::{
  frame::SquareImage,
  labels::LabelCatalog,
  model::{ConfidenceVector, Model, Recognition},
  rank::{RESULTS_TO_SHOW, RankError, top_k},
};

#[derive(Error, Debug)]
pub enum ClassifierError {
  #[error("推理错误: {0}")]
  Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
  #[error("排序错误: {0}")]
  Rank(#[from] RankError),
}

/// 把方形图像交给推理引擎，并将输出映射为排好序的标签
pub struct ImageClassifier<M> {
  model: M,
  labels: LabelCatalog,
  results_to_show: usize,
}

impl<M> ImageClassifier<M> {
  pub fn new(model: M, labels: LabelCatalog) -> Self {
    info!("创建分类器: {} 个类别", labels.len());
    Self {
      model,
      labels,
      results_to_show: RESULTS_TO_SHOW,
    }
  }

  pub fn with_results_to_show(mut self, results_to_show: usize) -> Self {
    self.results_to_show = results_to_show;
    self
  }

  pub fn labels(&self) -> &LabelCatalog {
    &self.labels
  }
}

impl<M> ImageClassifier<M>
where
  M: Model<Output = ConfidenceVector>,
  M::Input: for<'a> From<&'a SquareImage>,
  M::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn recognize(&self, image: &SquareImage) -> Result<Vec<Recognition>, ClassifierError> {
    let input: M::Input = image.into();

    let now = std::time::Instant::now();
    let confidences = self
      .model
      .infer(&input)
      .map_err(|e| ClassifierError::Inference(Box::new(e)))?;
    debug!("推理耗时: {:.2?}", now.elapsed());

    let results = top_k(confidences.as_slice(), &self.labels, self.results_to_show)?;
    debug!("识别结果: {:?}", results);
    Ok(results)
  }
}
