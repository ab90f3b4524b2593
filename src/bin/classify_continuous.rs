// 该文件是 Kanjian （看见） 项目的一部分。
// src/bin/classify_continuous.rs - 连续分类
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

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use url::Url;

use kanjian::{
  FromUrl,
  classifier::ImageClassifier,
  frame::RgbNhwcFrame,
  input::InputWrapper,
  labels::LabelCatalog,
  model::{ReplayModel, ReplayModelBuilder},
  output::OutputWrapper,
  preprocess::ImagePreprocessor,
  task::{ContinuousTask, Pipeline, Task},
};
use tracing::info;

/// Kanjian 连续分类参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 推理引擎（replay:///path/to/scores.bin）
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 标签文件，每行一个标签
  #[arg(long, value_name = "LABELS")]
  pub labels: PathBuf,
  /// 输入来源（image:///path/to/frame.jpg 或 folder:///path/to/frames）
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出（log:// 或 folder:///path/to/dir）
  #[arg(long, value_name = "OUTPUT", default_value = "log://")]
  pub output: Url,
  /// 预览帧宽度
  #[arg(long, default_value_t = 640)]
  pub preview_width: u32,
  /// 预览帧高度
  #[arg(long, default_value_t = 480)]
  pub preview_height: u32,
  /// 模型输入边长
  #[arg(long, default_value_t = 224)]
  pub input_size: u32,
  /// 传感器方向（角度，顺时针）
  #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
  pub sensor_orientation: i32,
  /// 展示的结果数量
  #[arg(long, default_value_t = kanjian::rank::RESULTS_TO_SHOW)]
  pub top_k: usize,
  /// 处理的最大帧数，缺省时处理到输入结束或收到中断
  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,
  /// 保存预处理后的图像，仅用于调试
  #[cfg(feature = "save_preview")]
  #[arg(long, value_name = "FILE")]
  pub save_preview: Option<PathBuf>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型: {}", args.model);
  info!("标签文件: {}", args.labels.display());
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let labels = LabelCatalog::load(&args.labels)?;
  let model: ReplayModel<RgbNhwcFrame> = ReplayModelBuilder::from_url(&args.model)?
    .num_classes(labels.len())
    .build()?;
  let classifier = ImageClassifier::new(model, labels).with_results_to_show(args.top_k);

  let preprocessor = ImagePreprocessor::new(args.preview_width, args.preview_height, args.input_size)?
    .with_sensor_orientation(args.sensor_orientation);
  #[cfg(feature = "save_preview")]
  let preprocessor = match &args.save_preview {
    Some(path) => preprocessor.with_preview_path(path),
    None => preprocessor,
  };

  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  let summary = ContinuousTask::default()
    .with_frame_number(args.frame_number)
    .run_task(input, Pipeline::new(preprocessor, classifier), output)?;
  info!("处理 {} 帧, 跳过 {} 帧", summary.processed, summary.skipped);

  Ok(())
}
