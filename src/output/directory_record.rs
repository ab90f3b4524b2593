// 该文件是 Kanjian （看见） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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
  io::{BufWriter, Write},
  path::PathBuf,
  sync::atomic::{AtomicU16, Ordering},
};

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::SquareImage,
  model::Recognition,
  output::{Render, describe},
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Record<'a> {
  description: String,
  recognitions: &'a [Recognition],
}

/// 按日期分目录保存输入图像及其识别结果
///
/// `folder:///path/to/dir` 只保存有结果的帧，加上 `?always` 则保存所有帧。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: AtomicU16,
  always: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(uri.path()),
      frame_counter: AtomicU16::new(0),
      always,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }

  fn frame_path(&self) -> Result<PathBuf, DirectoryRecordOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:04X}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }
}

impl Render<SquareImage, Vec<Recognition>> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(
    &self,
    frame: &SquareImage,
    result: &Vec<Recognition>,
  ) -> Result<(), Self::Error> {
    if !self.always && result.is_empty() {
      return Ok(());
    }

    let path = self.frame_path()?;
    frame.save(&path)?;

    let record = Record {
      description: describe(result),
      recognitions: result,
    };
    let mut writer = BufWriter::new(File::create(path.with_extension("json"))?);
    serde_json::to_writer_pretty(&mut writer, &record)?;
    writer.flush()?;
    debug!("记录已保存: {}", path.display());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        collect_files(&path, files);
      } else {
        files.push(path);
      }
    }
  }

  fn output_for(dir: &Path, query: &str) -> DirectoryRecordOutput {
    let url = url::Url::parse(&format!("folder://{}{}", dir.display(), query)).unwrap();
    DirectoryRecordOutput::from_url(&url).unwrap()
  }

  #[test]
  fn saves_image_and_json_record() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_for(dir.path(), "");
    let result = vec![Recognition {
      id: "3".to_string(),
      title: "fox".to_string(),
      confidence: 0.75,
    }];

    output.render_result(&SquareImage::new(4), &result).unwrap();

    let mut files = Vec::new();
    collect_files(dir.path(), &mut files);
    files.sort();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].extension().unwrap(), "json");
    assert_eq!(files[1].extension().unwrap(), "png");
    assert_eq!(image::open(&files[1]).unwrap().width(), 4);

    let json: serde_json::Value =
      serde_json::from_reader(File::open(&files[0]).unwrap()).unwrap();
    assert_eq!(json["description"], "fox");
    assert_eq!(json["recognitions"][0]["title"], "fox");
  }

  #[test]
  fn empty_results_are_skipped_unless_always() {
    let dir = tempfile::tempdir().unwrap();
    let skipping = output_for(&dir.path().join("skip"), "");
    skipping.render_result(&SquareImage::new(2), &Vec::new()).unwrap();
    assert!(!dir.path().join("skip").exists());

    let always = output_for(&dir.path().join("all"), "?always");
    always.render_result(&SquareImage::new(2), &Vec::new()).unwrap();
    let mut files = Vec::new();
    collect_files(&dir.path().join("all"), &mut files);
    assert_eq!(files.len(), 2);
  }

  #[test]
  fn frame_ids_increase() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_for(dir.path(), "");

    assert_eq!(output.frame_id(), 1);
    assert_eq!(output.frame_id(), 2);
  }
}
