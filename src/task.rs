// 该文件是 Kanjian （看见） 项目的一部分。
// src/task.rs - 任务：输入、预处理、分类与输出的编排
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

use std::{thread, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
  classifier::{ClassifierError, ImageClassifier},
  frame::{CapturedFrame, SquareImage},
  model::{ConfidenceVector, Model, Recognition},
  output::Render,
  preprocess::{ImagePreprocessor, PreprocessError},
};

#[derive(Error, Debug)]
pub enum PipelineError {
  #[error("预处理错误: {0}")]
  Preprocess(#[from] PreprocessError),
  #[error("分类错误: {0}")]
  Classifier(#[from] ClassifierError),
}

/// 预处理器与分类器的组合，单线程使用
pub struct Pipeline<M> {
  preprocessor: ImagePreprocessor,
  classifier: ImageClassifier<M>,
}

impl<M> Pipeline<M>
where
  M: Model<Output = ConfidenceVector>,
  M::Input: for<'a> From<&'a SquareImage>,
  M::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(preprocessor: ImagePreprocessor, classifier: ImageClassifier<M>) -> Self {
    Self {
      preprocessor,
      classifier,
    }
  }

  /// 处理一帧；帧无法解码时返回 `Ok(None)`
  pub fn process_frame(
    &mut self,
    frame: &CapturedFrame,
  ) -> Result<Option<(&SquareImage, Vec<Recognition>)>, PipelineError> {
    let Some(image) = self.preprocessor.preprocess(&frame.as_raw())? else {
      return Ok(None);
    };
    let results = self.classifier.recognize(image)?;
    Ok(Some((image, results)))
  }
}

/// 任务结束时的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
  pub processed: usize,
  pub skipped: usize,
}

pub trait Task<I, P, O>: Sized {
  type Error;
  fn run_task(self, input: I, pipeline: P, output: O) -> Result<TaskSummary, Self::Error>;
}

pub struct OneShotTask;

impl<
  M: Model<Output = ConfidenceVector>,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = CapturedFrame>,
  O: Render<SquareImage, Vec<Recognition>, Error = RE>,
> Task<I, Pipeline<M>, O> for OneShotTask
where
  M::Input: for<'a> From<&'a SquareImage>,
  M::Error: std::error::Error + Send + Sync + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut pipeline: Pipeline<M>, output: O) -> Result<TaskSummary, Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))?;
    info!("输入帧获取成功，开始推理...");
    let now = std::time::Instant::now();
    let (image, results) = pipeline
      .process_frame(&frame)?
      .ok_or_else(|| anyhow::anyhow!("输入帧无法解码"))?;
    let elapsed = now.elapsed();
    info!("推理完成，耗时: {:.2?}", elapsed);
    output.render_result(image, &results)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(TaskSummary {
      processed: 1,
      skipped: 0,
    })
  }
}

#[derive(Default, Debug)]
pub struct ContinuousTask {
  frame_number: Option<usize>,
  ignore_interrupt: bool,
}

impl ContinuousTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }

  /// 不安装 Ctrl-C 处理器，处理器在一个进程中只能安装一次
  pub fn ignore_interrupt(mut self) -> Self {
    self.ignore_interrupt = true;
    self
  }
}

impl<
  M: Model<Output = ConfidenceVector>,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = CapturedFrame>,
  O: Render<SquareImage, Vec<Recognition>, Error = RE>,
> Task<I, Pipeline<M>, O> for ContinuousTask
where
  M::Input: for<'a> From<&'a SquareImage>,
  M::Error: std::error::Error + Send + Sync + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut pipeline: Pipeline<M>, output: O) -> Result<TaskSummary, Self::Error> {
    info!("开始任务...");
    let (tx, rx) = std::sync::mpsc::channel();

    if !self.ignore_interrupt {
      ctrlc::set_handler(move || {
        info!("收到中断信号，准备退出...");
        let _ = tx.send(());
        thread::spawn(|| {
          thread::sleep(Duration::from_secs(30));
          warn!("强制退出程序");
          std::process::exit(1);
        });
      })?;
    }

    let mut summary = TaskSummary::default();
    let mut frame_index = 0;
    let mut now = std::time::Instant::now();
    for frame in input {
      frame_index += 1;
      info!("处理第 {} 帧图像", frame_index);

      match pipeline.process_frame(&frame) {
        Ok(Some((image, results))) => {
          let elapsed_a = now.elapsed();
          output.render_result(image, &results)?;
          let elapsed_b = now.elapsed();
          info!("推理完成，耗时: {:.2?} / {:.2?}", elapsed_a, elapsed_b);
          summary.processed += 1;
        }
        Ok(None) => {
          warn!("第 {} 帧无法解码，跳过", frame_index);
          summary.skipped += 1;
        }
        Err(PipelineError::Preprocess(e)) => {
          warn!("第 {} 帧被跳过: {}", frame_index, e);
          summary.skipped += 1;
        }
        Err(e) => return Err(e.into()),
      }
      now = std::time::Instant::now();

      if self.frame_number.map(|n| frame_index >= n).unwrap_or(false) {
        info!("达到指定帧数 {}, 退出任务循环", frame_index);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    info!(
      "任务完成，退出: 处理 {} 帧, 跳过 {} 帧",
      summary.processed, summary.skipped
    );
    Ok(summary)
  }
}
