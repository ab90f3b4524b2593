// 该文件是 Kanjian （看见） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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
  io::Cursor,
  path::{Path, PathBuf},
};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{CapturedFrame, PixelFormat},
};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// 读取编码图像的头部得到尺寸，像素数据保持编码状态，由预处理器解码
pub fn probe_encoded_frame(data: Vec<u8>, index: u64) -> Result<CapturedFrame, ImageFileInputError> {
  let (width, height) = ImageReader::new(Cursor::new(&data))
    .with_guessed_format()?
    .into_dimensions()?;

  Ok(CapturedFrame {
    width,
    height,
    format: PixelFormat::Encoded,
    data,
    index,
  })
}

fn check_scheme(url: &Url, expected: &str) -> Result<(), ImageFileInputError> {
  if url.scheme() != expected {
    error!(
      "URI scheme mismatch: expected '{}', found '{}'",
      expected,
      url.scheme()
    );
    return Err(ImageFileInputError::SchemaMismatch);
  }
  Ok(())
}

/// 单张图像文件，只产生一帧
pub struct ImageFileInput {
  frame: Option<CapturedFrame>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    check_scheme(url, Self::SCHEME)?;

    let data = std::fs::read(url.path())?;
    let frame = probe_encoded_frame(data, 0)?;
    debug!("读取图像 {}: {}x{}", url.path(), frame.width, frame.height);

    Ok(ImageFileInput { frame: Some(frame) })
  }
}

impl Iterator for ImageFileInput {
  type Item = CapturedFrame;

  fn next(&mut self) -> Option<Self::Item> {
    self.frame.take()
  }
}

/// 目录中的图像文件，按文件名顺序逐帧产生
///
/// 无法读取的文件会被记录并跳过。
pub struct ImageDirectoryInput {
  files: std::vec::IntoIter<PathBuf>,
  index: u64,
}

impl FromUrlWithScheme for ImageDirectoryInput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for ImageDirectoryInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    check_scheme(url, Self::SCHEME)?;

    let mut files = std::fs::read_dir(url.path())?
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| is_image_file(path))
      .collect::<Vec<_>>();
    files.sort();
    debug!("目录 {} 中有 {} 张图像", url.path(), files.len());

    Ok(ImageDirectoryInput {
      files: files.into_iter(),
      index: 0,
    })
  }
}

fn is_image_file(path: &Path) -> bool {
  path.is_file()
    && path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
      .unwrap_or(false)
}

impl Iterator for ImageDirectoryInput {
  type Item = CapturedFrame;

  fn next(&mut self) -> Option<Self::Item> {
    for path in self.files.by_ref() {
      let frame = std::fs::read(&path)
        .map_err(ImageFileInputError::from)
        .and_then(|data| probe_encoded_frame(data, self.index));

      match frame {
        Ok(frame) => {
          debug!("读取第 {} 帧: {}", self.index, path.display());
          self.index += 1;
          return Some(frame);
        }
        Err(e) => warn!("跳过无法读取的图像 {}: {}", path.display(), e),
      }
    }
    None
  }
}
