// 该文件是 Kanjian （看见） 项目的一部分。
// src/frame.rs - 原始帧、方形图像与张量帧定义
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

use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};

const RGB_CHANNELS: usize = 3;

/// 原始帧的像素格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
  /// 行优先、逐像素交织的 R,G,B
  Rgb8,
  /// 行优先、逐像素交织的 R,G,B,A
  Rgba8,
  /// 行优先、逐像素交织的 B,G,R,A
  Bgra8,
  /// 单平面编码字节流（JPEG / PNG 等）
  Encoded,
}

impl PixelFormat {
  /// 每像素字节数，编码流返回 `None`
  pub fn bytes_per_pixel(&self) -> Option<usize> {
    match self {
      PixelFormat::Rgb8 => Some(3),
      PixelFormat::Rgba8 | PixelFormat::Bgra8 => Some(4),
      PixelFormat::Encoded => None,
    }
  }
}

/// 摄像头原始帧的只读视图，只在一次预处理调用期间有效
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
  pub width: u32,
  pub height: u32,
  pub format: PixelFormat,
  pub data: &'a [u8],
}

impl<'a> RawFrame<'a> {
  pub fn new(width: u32, height: u32, format: PixelFormat, data: &'a [u8]) -> Self {
    Self {
      width,
      height,
      format,
      data,
    }
  }

  pub fn rgb(image: &'a RgbImage) -> Self {
    let (width, height) = image.dimensions();
    Self::new(width, height, PixelFormat::Rgb8, image.as_raw())
  }
}

/// 输入源产生的帧，持有自己的像素数据
#[derive(Debug, Clone)]
pub struct CapturedFrame {
  pub width: u32,
  pub height: u32,
  pub format: PixelFormat,
  pub data: Vec<u8>,
  /// 帧序号
  pub index: u64,
}

impl CapturedFrame {
  pub fn as_raw(&self) -> RawFrame<'_> {
    RawFrame::new(self.width, self.height, self.format, &self.data)
  }
}

/// 固定边长的方形 RGB 图像，由预处理器持有并在调用之间复用
#[derive(Debug, Clone)]
pub struct SquareImage {
  image: RgbImage,
}

impl SquareImage {
  pub fn new(size: u32) -> Self {
    Self {
      image: RgbImage::new(size, size),
    }
  }

  pub fn size(&self) -> u32 {
    self.image.width()
  }

  pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
    self.image.get_pixel(x, y).0
  }

  pub fn as_image(&self) -> &RgbImage {
    &self.image
  }

  pub(crate) fn as_image_mut(&mut self) -> &mut RgbImage {
    &mut self.image
  }

  pub fn as_raw(&self) -> &[u8] {
    self.image.as_raw()
  }

  pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
    self.image.save(path)
  }
}

impl From<RgbImage> for SquareImage {
  fn from(image: RgbImage) -> Self {
    debug_assert_eq!(image.width(), image.height());
    Self { image }
  }
}

pub trait AsNchwFrame {
  fn as_nchw(&self) -> &[u8];
}

pub trait AsNhwcFrame {
  fn as_nhwc(&self) -> &[u8];
}

/// 推理引擎的 NHWC 输入张量（批大小为 1）
#[derive(Debug, Clone)]
pub struct RgbNhwcFrame {
  height: usize,
  width: usize,
  data: Box<[u8]>,
}

impl RgbNhwcFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    let data = vec![0u8; RGB_CHANNELS * width * height].into_boxed_slice();
    Self {
      height,
      width,
      data,
    }
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }
}

impl AsMut<[u8]> for RgbNhwcFrame {
  fn as_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }
}

impl AsNhwcFrame for RgbNhwcFrame {
  fn as_nhwc(&self) -> &[u8] {
    &self.data
  }
}

// 逐像素写入 R,G,B，与 RgbImage 的内存布局一致
impl From<&SquareImage> for RgbNhwcFrame {
  fn from(image: &SquareImage) -> Self {
    let size = image.size() as usize;
    let mut frame = RgbNhwcFrame::with_shape(size, size);
    frame.as_mut().copy_from_slice(image.as_raw());
    frame
  }
}

/// 推理引擎的 NCHW 输入张量（批大小为 1）
#[derive(Debug, Clone)]
pub struct RgbNchwFrame {
  height: usize,
  width: usize,
  data: Box<[u8]>,
}

impl RgbNchwFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    let data = vec![0u8; RGB_CHANNELS * width * height].into_boxed_slice();
    Self {
      height,
      width,
      data,
    }
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }
}

impl AsMut<[u8]> for RgbNchwFrame {
  fn as_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }
}

impl AsNchwFrame for RgbNchwFrame {
  fn as_nchw(&self) -> &[u8] {
    &self.data
  }
}

impl From<&SquareImage> for RgbNchwFrame {
  fn from(image: &SquareImage) -> Self {
    let size = image.size() as usize;
    let mut frame = RgbNchwFrame::with_shape(size, size);
    let plane = size * size;
    let slice = frame.as_mut();

    for (i, Rgb(pixel)) in image.as_image().pixels().enumerate() {
      for (c, value) in pixel.iter().enumerate() {
        slice[c * plane + i] = *value;
      }
    }
    frame
  }
}
