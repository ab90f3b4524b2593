// 该文件是 Kanjian （看见） 项目的一部分。
// src/preprocess.rs - 图像预处理：中心裁剪、缩放与旋转
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

//! # 图像预处理模块
//!
//! 将任意尺寸的摄像头帧转换为推理引擎需要的固定边长方形图像：
//!
//! 1. 取帧中心的 `min(w, h) × min(w, h)` 正方形区域；
//! 2. 缩放到 `target_size × target_size`；
//! 3. 若传感器方向非零，则绕输出图像中心顺时针旋转。
//!
//! 输出缓冲区在调用之间复用，同一个实例不能被并发调用。

use std::io::Cursor;
#[cfg(feature = "save_preview")]
use std::path::{Path, PathBuf};

use image::{
  ColorType, DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage,
  imageops::{self, FilterType},
};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::frame::{PixelFormat, RawFrame, SquareImage};

#[derive(Error, Debug)]
pub enum PreprocessError {
  #[error("帧尺寸不匹配: 期望 {expected_width}x{expected_height}, 实际 {width}x{height}")]
  DimensionMismatch {
    expected_width: u32,
    expected_height: u32,
    width: u32,
    height: u32,
  },
  #[error("预处理配置无效: {0}")]
  InvalidConfig(String),
}

#[derive(Error, Debug)]
enum DecodeError {
  #[error("原始缓冲区长度不匹配: 期望 {expected}, 实际 {actual}")]
  BufferLength { expected: usize, actual: usize },
  #[error("图像解码错误: {0}")]
  Image(#[from] image::ImageError),
  #[error("读取编码流失败: {0}")]
  Io(#[from] std::io::Error),
  #[error("解码后尺寸 {width}x{height} 与声明尺寸不符")]
  DecodedSize { width: u32, height: u32 },
}

/// 中心裁剪窗口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
  pub offset_x: u32,
  pub offset_y: u32,
  pub min_dim: u32,
  /// `target_size / min_dim`
  pub scale: f32,
}

impl CropWindow {
  /// 计算 `width × height` 帧缩放到 `target_size` 时使用的中心正方形
  pub fn centered(width: u32, height: u32, target_size: u32) -> Self {
    let min_dim = width.min(height);
    Self {
      offset_x: width.saturating_sub(min_dim) / 2,
      offset_y: height.saturating_sub(min_dim) / 2,
      min_dim,
      scale: target_size as f32 / min_dim as f32,
    }
  }
}

/// 将 `src` 的中心正方形缩放写入 `dst`，并按 `sensor_orientation`（角度）旋转
///
/// 先裁剪再滤波，正方形以外的像素不会参与插值。
pub fn crop_and_rescale(src: &RgbImage, dst: &mut SquareImage, sensor_orientation: i32) {
  let mut window = RgbImage::new(0, 0);
  rescale_into(src, &mut window, dst, sensor_orientation);
}

// `window` 为裁剪缓冲，尺寸不符时才重新分配
fn rescale_into(
  src: &RgbImage,
  window: &mut RgbImage,
  dst: &mut SquareImage,
  sensor_orientation: i32,
) {
  let size = dst.size();
  let crop = CropWindow::centered(src.width(), src.height(), size);
  debug!(
    "中心裁剪: 偏移 ({}, {}), 边长 {}, 缩放 {:.4}",
    crop.offset_x, crop.offset_y, crop.min_dim, crop.scale
  );
  if crop.min_dim == 0 {
    return;
  }

  if window.dimensions() != (crop.min_dim, crop.min_dim) {
    *window = RgbImage::new(crop.min_dim, crop.min_dim);
  }
  copy_window(src, &crop, window);

  if crop.min_dim == size {
    rotate_into(window, dst.as_image_mut(), sensor_orientation);
  } else {
    // image 没有写入已有缓冲区的缩放接口
    let scaled = imageops::resize(&*window, size, size, FilterType::Triangle);
    rotate_into(&scaled, dst.as_image_mut(), sensor_orientation);
  }
}

fn copy_window(src: &RgbImage, crop: &CropWindow, window: &mut RgbImage) {
  let row_bytes = crop.min_dim as usize * 3;
  let stride = src.width() as usize * 3;
  let skip = crop.offset_x as usize * 3;

  for (y, row) in window.chunks_exact_mut(row_bytes).enumerate() {
    let begin = (crop.offset_y as usize + y) * stride + skip;
    row.copy_from_slice(&src.as_raw()[begin..begin + row_bytes]);
  }
}

fn rotate_into(src: &RgbImage, dst: &mut RgbImage, degrees: i32) {
  let rotated = match degrees.rem_euclid(360) {
    0 => {
      dst.copy_from_slice(src.as_raw());
      Ok(())
    }
    90 => imageops::rotate90_in(src, dst),
    180 => imageops::rotate180_in(src, dst),
    270 => imageops::rotate270_in(src, dst),
    other => {
      let (cx, cy) = (src.width() as f32 / 2.0, src.height() as f32 / 2.0);
      let projection = Projection::translate(cx, cy)
        * Projection::rotate((other as f32).to_radians())
        * Projection::translate(-cx, -cy);
      warp_into(src, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), dst);
      Ok(())
    }
  };

  if let Err(e) = rotated {
    warn!("旋转 {} 度失败: {}", degrees, e);
  }
}

// 三通道缓冲区的字节数，超出可寻址范围时返回 `None`
fn rgb_buffer_len(width: u32, height: u32) -> Option<usize> {
  (width as usize)
    .checked_mul(height as usize)?
    .checked_mul(3)
    .filter(|len| *len <= isize::MAX as usize)
}

/// 图像预处理器
pub struct ImagePreprocessor {
  preview_width: u32,
  preview_height: u32,
  sensor_orientation: i32,
  rgb_frame: RgbImage,
  window: RgbImage,
  cropped: SquareImage,
  #[cfg(feature = "save_preview")]
  preview_path: Option<PathBuf>,
}

impl ImagePreprocessor {
  pub fn new(
    preview_width: u32,
    preview_height: u32,
    target_size: u32,
  ) -> Result<Self, PreprocessError> {
    if preview_width == 0 || preview_height == 0 {
      return Err(PreprocessError::InvalidConfig(format!(
        "预览尺寸不能为零: {}x{}",
        preview_width, preview_height
      )));
    }
    if target_size == 0 {
      return Err(PreprocessError::InvalidConfig(
        "输出边长不能为零".to_string(),
      ));
    }
    if rgb_buffer_len(preview_width, preview_height).is_none() {
      return Err(PreprocessError::InvalidConfig(format!(
        "预览尺寸过大: {}x{}",
        preview_width, preview_height
      )));
    }
    if rgb_buffer_len(target_size, target_size).is_none() {
      return Err(PreprocessError::InvalidConfig(format!(
        "输出边长过大: {}",
        target_size
      )));
    }

    info!(
      "创建预处理器: 预览 {}x{}, 输出 {}x{}",
      preview_width, preview_height, target_size, target_size
    );

    Ok(Self {
      preview_width,
      preview_height,
      sensor_orientation: 0,
      rgb_frame: RgbImage::new(preview_width, preview_height),
      window: RgbImage::new(
        preview_width.min(preview_height),
        preview_width.min(preview_height),
      ),
      cropped: SquareImage::new(target_size),
      #[cfg(feature = "save_preview")]
      preview_path: None,
    })
  }

  pub fn with_sensor_orientation(mut self, degrees: i32) -> Self {
    self.sensor_orientation = degrees;
    self
  }

  /// 每次预处理后将输出图像保存到 `path`，仅用于调试
  #[cfg(feature = "save_preview")]
  pub fn with_preview_path<P: AsRef<Path>>(mut self, path: P) -> Self {
    self.preview_path = Some(path.as_ref().to_path_buf());
    self
  }

  pub fn target_size(&self) -> u32 {
    self.cropped.size()
  }

  pub fn sensor_orientation(&self) -> i32 {
    self.sensor_orientation
  }

  /// 预处理一帧
  ///
  /// 帧尺寸与预览尺寸不一致时返回 `DimensionMismatch`；帧无法解码时返回
  /// `Ok(None)`，调用方应跳过该帧。返回的图像在下一次调用前有效。
  pub fn preprocess(&mut self, frame: &RawFrame) -> Result<Option<&SquareImage>, PreprocessError> {
    if frame.width != self.preview_width || frame.height != self.preview_height {
      return Err(PreprocessError::DimensionMismatch {
        expected_width: self.preview_width,
        expected_height: self.preview_height,
        width: frame.width,
        height: frame.height,
      });
    }

    if let Err(e) = self.decode_into(frame) {
      warn!("无法解码帧，跳过: {}", e);
      return Ok(None);
    }

    rescale_into(
      &self.rgb_frame,
      &mut self.window,
      &mut self.cropped,
      self.sensor_orientation,
    );

    #[cfg(feature = "save_preview")]
    if let Some(path) = &self.preview_path {
      save_preview(&self.cropped, path);
    }

    Ok(Some(&self.cropped))
  }

  fn decode_into(&mut self, frame: &RawFrame) -> Result<(), DecodeError> {
    let Some(channels) = frame.format.bytes_per_pixel() else {
      return self.decode_stream(frame);
    };
    let pixels = (frame.width as usize) * (frame.height as usize);
    check_length(frame.data, pixels * channels)?;

    if frame.format == PixelFormat::Rgb8 {
      self.rgb_frame.copy_from_slice(frame.data);
      return Ok(());
    }

    let bgr = frame.format == PixelFormat::Bgra8;
    for (dst, src) in self
      .rgb_frame
      .chunks_exact_mut(3)
      .zip(frame.data.chunks_exact(channels))
    {
      if bgr {
        dst.copy_from_slice(&[src[2], src[1], src[0]]);
      } else {
        dst.copy_from_slice(&src[..3]);
      }
    }
    Ok(())
  }

  // 先读取头部尺寸，尺寸相符才解码；RGB8 流直接解码进帧缓冲
  fn decode_stream(&mut self, frame: &RawFrame) -> Result<(), DecodeError> {
    let decoder = ImageReader::new(Cursor::new(frame.data))
      .with_guessed_format()?
      .into_decoder()?;
    let (width, height) = decoder.dimensions();
    if width != frame.width || height != frame.height {
      return Err(DecodeError::DecodedSize { width, height });
    }

    if decoder.color_type() == ColorType::Rgb8 {
      decoder.read_image(&mut self.rgb_frame)?;
    } else {
      let decoded = DynamicImage::from_decoder(decoder)?.into_rgb8();
      self.rgb_frame.copy_from_slice(decoded.as_raw());
    }
    Ok(())
  }
}

fn check_length(data: &[u8], expected: usize) -> Result<(), DecodeError> {
  if data.len() != expected {
    return Err(DecodeError::BufferLength {
      expected,
      actual: data.len(),
    });
  }
  Ok(())
}

#[cfg(feature = "save_preview")]
fn save_preview(image: &SquareImage, path: &Path) {
  debug!(
    "保存 {}x{} 预览图像到 {}",
    image.size(),
    image.size(),
    path.display()
  );

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
    && let Err(e) = std::fs::create_dir_all(parent)
  {
    warn!("无法创建预览目录 {}: {}", parent.display(), e);
    return;
  }

  if let Err(e) = image.save(path) {
    warn!("无法保存预览图像 {}: {}", path.display(), e);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{GrayImage, ImageFormat, Luma};

  const GRAY: [u8; 3] = [100, 150, 200];

  fn close(a: [u8; 3], b: [u8; 3], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
  }

  // 中心正方形为灰色，左右边缘分别为红色和蓝色
  fn letterboxed(width: u32, height: u32) -> RgbImage {
    let window = CropWindow::centered(width, height, 1);
    RgbImage::from_fn(width, height, |x, y| {
      if x < window.offset_x || y < window.offset_y {
        Rgb([255, 0, 0])
      } else if x >= window.offset_x + window.min_dim || y >= window.offset_y + window.min_dim {
        Rgb([0, 0, 255])
      } else {
        Rgb(GRAY)
      }
    })
  }

  fn encode_png(image: &RgbImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(image.clone()))
  }

  fn encode(image: DynamicImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
      .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
      .expect("PNG 编码失败");
    buffer
  }

  #[test]
  fn landscape_window_is_centered() {
    let window = CropWindow::centered(640, 480, 224);

    assert_eq!(window.min_dim, 480);
    assert_eq!(window.offset_x, 80);
    assert_eq!(window.offset_y, 0);
    assert_eq!(640 - window.offset_x - window.min_dim, 80);
    assert!((window.scale - 224.0 / 480.0).abs() < 1e-6);
  }

  #[test]
  fn square_frame_is_not_cropped() {
    let window = CropWindow::centered(300, 300, 100);

    assert_eq!(window.offset_x, 0);
    assert_eq!(window.offset_y, 0);
    assert_eq!(window.min_dim, 300);
  }

  #[test]
  fn square_frame_is_pure_rescale() {
    let src = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 7]));
    let mut dst = SquareImage::new(32);
    crop_and_rescale(&src, &mut dst, 0);

    let expected = imageops::resize(&src, 32, 32, FilterType::Triangle);
    assert_eq!(dst.as_raw(), expected.as_raw());
  }

  #[test]
  fn output_is_always_target_size() {
    for (width, height) in [(640, 480), (480, 640), (224, 224), (50, 30), (1, 1)] {
      let mut preprocessor = ImagePreprocessor::new(width, height, 24).unwrap();
      let src = RgbImage::from_pixel(width, height, Rgb(GRAY));
      let frame = RawFrame::rgb(&src);
      let output = preprocessor.preprocess(&frame).unwrap().unwrap();

      assert_eq!(output.as_image().dimensions(), (24, 24));
    }
  }

  #[test]
  fn margins_never_reach_the_output() {
    for (width, height) in [(640, 480), (480, 640), (101, 37)] {
      let src = letterboxed(width, height);
      let mut preprocessor = ImagePreprocessor::new(width, height, 56).unwrap();
      let output = preprocessor
        .preprocess(&RawFrame::rgb(&src))
        .unwrap()
        .unwrap();

      for pixel in output.as_image().pixels() {
        assert!(close(pixel.0, GRAY, 1), "{}x{}: {:?}", width, height, pixel);
      }
    }
  }

  #[test]
  fn zero_rotation_is_identity() {
    let src = letterboxed(640, 480);
    let mut plain = SquareImage::new(32);
    let mut turned = SquareImage::new(32);
    crop_and_rescale(&src, &mut plain, 0);
    crop_and_rescale(&src, &mut turned, 360);

    assert_eq!(plain.as_raw(), turned.as_raw());
  }

  #[test]
  fn quarter_turn_is_clockwise() {
    let mut src = RgbImage::new(4, 4);
    src.put_pixel(0, 0, Rgb([255, 255, 255]));
    let mut dst = SquareImage::new(4);
    crop_and_rescale(&src, &mut dst, 90);

    assert_eq!(dst.pixel(3, 0), [255, 255, 255]);
    assert_eq!(dst.pixel(0, 0), [0, 0, 0]);
  }

  #[test]
  fn rotation_keeps_center_color() {
    // 中心 160x160 为绿色，其余为黑色
    let src = RgbImage::from_fn(640, 480, |x, y| {
      if (240..400).contains(&x) && (160..320).contains(&y) {
        Rgb([0, 255, 0])
      } else {
        Rgb([0, 0, 0])
      }
    });

    for degrees in [90, 180, 270, -90, 45] {
      let mut dst = SquareImage::new(224);
      crop_and_rescale(&src, &mut dst, degrees);
      assert!(
        close(dst.pixel(112, 112), [0, 255, 0], 2),
        "{} 度: {:?}",
        degrees,
        dst.pixel(112, 112)
      );
    }
  }

  #[test]
  fn preprocessor_applies_sensor_orientation() {
    let mut src = RgbImage::new(4, 4);
    src.put_pixel(0, 0, Rgb([9, 9, 9]));
    let mut preprocessor = ImagePreprocessor::new(4, 4, 4)
      .unwrap()
      .with_sensor_orientation(180);
    let output = preprocessor
      .preprocess(&RawFrame::rgb(&src))
      .unwrap()
      .unwrap();

    assert_eq!(output.pixel(3, 3), [9, 9, 9]);
  }

  #[test]
  fn mismatched_frame_is_rejected() {
    let mut preprocessor = ImagePreprocessor::new(640, 480, 224).unwrap();
    let src = RgbImage::new(320, 240);

    match preprocessor.preprocess(&RawFrame::rgb(&src)) {
      Err(PreprocessError::DimensionMismatch {
        expected_width,
        expected_height,
        width,
        height,
      }) => {
        assert_eq!((expected_width, expected_height), (640, 480));
        assert_eq!((width, height), (320, 240));
      }
      other => panic!("期望 DimensionMismatch, 实际 {:?}", other.map(|o| o.is_some())),
    }
  }

  #[test]
  fn short_raw_buffer_yields_no_result() {
    let mut preprocessor = ImagePreprocessor::new(4, 4, 2).unwrap();
    let data = vec![0u8; 10];
    let frame = RawFrame::new(4, 4, PixelFormat::Rgb8, &data);

    assert!(preprocessor.preprocess(&frame).unwrap().is_none());
  }

  #[test]
  fn garbage_stream_yields_no_result() {
    let mut preprocessor = ImagePreprocessor::new(4, 4, 2).unwrap();
    let data = b"definitely not a jpeg".to_vec();
    let frame = RawFrame::new(4, 4, PixelFormat::Encoded, &data);

    assert!(preprocessor.preprocess(&frame).unwrap().is_none());
  }

  #[test]
  fn encoded_stream_is_decoded() {
    let src = letterboxed(40, 30);
    let data = encode_png(&src);
    let mut preprocessor = ImagePreprocessor::new(40, 30, 10).unwrap();
    let frame = RawFrame::new(40, 30, PixelFormat::Encoded, &data);
    let output = preprocessor.preprocess(&frame).unwrap().unwrap();

    assert!(close(output.pixel(5, 5), GRAY, 1));
  }

  #[test]
  fn encoded_stream_with_wrong_size_yields_no_result() {
    let data = encode_png(&RgbImage::new(20, 20));
    let mut preprocessor = ImagePreprocessor::new(40, 30, 10).unwrap();
    let frame = RawFrame::new(40, 30, PixelFormat::Encoded, &data);

    assert!(preprocessor.preprocess(&frame).unwrap().is_none());
  }

  #[test]
  fn gray_stream_is_expanded_to_rgb() {
    let data = encode(DynamicImage::ImageLuma8(GrayImage::from_pixel(6, 6, Luma([77]))));
    let mut preprocessor = ImagePreprocessor::new(6, 6, 3).unwrap();
    let frame = RawFrame::new(6, 6, PixelFormat::Encoded, &data);
    let output = preprocessor.preprocess(&frame).unwrap().unwrap();

    assert_eq!(output.pixel(1, 1), [77, 77, 77]);
  }

  #[test]
  fn buffers_are_reused_between_frames() {
    let mut preprocessor = ImagePreprocessor::new(40, 30, 10)
      .unwrap()
      .with_sensor_orientation(90);
    let frame_ptr = preprocessor.rgb_frame.as_ptr();
    let window_ptr = preprocessor.window.as_ptr();
    let output_ptr = preprocessor.cropped.as_raw().as_ptr();

    let src = letterboxed(40, 30);
    let data = encode_png(&src);
    for _ in 0..2 {
      let encoded = RawFrame::new(40, 30, PixelFormat::Encoded, &data);
      assert!(preprocessor.preprocess(&encoded).unwrap().is_some());
      assert!(preprocessor.preprocess(&RawFrame::rgb(&src)).unwrap().is_some());
    }

    assert_eq!(preprocessor.rgb_frame.as_ptr(), frame_ptr);
    assert_eq!(preprocessor.window.as_ptr(), window_ptr);
    assert_eq!(preprocessor.cropped.as_raw().as_ptr(), output_ptr);
  }

  #[test]
  fn raw_length_follows_pixel_format() {
    let mut preprocessor = ImagePreprocessor::new(2, 2, 2).unwrap();
    let rgb_sized = [1u8, 2, 3].repeat(4);
    let frame = RawFrame::new(2, 2, PixelFormat::Rgba8, &rgb_sized);

    assert!(preprocessor.preprocess(&frame).unwrap().is_none());
    let frame = RawFrame::new(2, 2, PixelFormat::Rgb8, &rgb_sized);
    assert_eq!(
      preprocessor.preprocess(&frame).unwrap().unwrap().pixel(0, 0),
      [1, 2, 3]
    );
  }

  #[test]
  fn bgra_is_swizzled() {
    let data = [10u8, 20, 30, 255].repeat(4);
    let mut preprocessor = ImagePreprocessor::new(2, 2, 2).unwrap();
    let frame = RawFrame::new(2, 2, PixelFormat::Bgra8, &data);
    let output = preprocessor.preprocess(&frame).unwrap().unwrap();

    assert_eq!(output.pixel(1, 1), [30, 20, 10]);
  }

  #[test]
  fn rgba_drops_alpha() {
    let data = [10u8, 20, 30, 0].repeat(4);
    let mut preprocessor = ImagePreprocessor::new(2, 2, 2).unwrap();
    let frame = RawFrame::new(2, 2, PixelFormat::Rgba8, &data);
    let output = preprocessor.preprocess(&frame).unwrap().unwrap();

    assert_eq!(output.pixel(0, 0), [10, 20, 30]);
  }

  #[test]
  fn output_buffer_is_overwritten() {
    let mut preprocessor = ImagePreprocessor::new(8, 8, 4).unwrap();
    let red = RgbImage::from_pixel(8, 8, Rgb([255, 0, 0]));
    let blue = RgbImage::from_pixel(8, 8, Rgb([0, 0, 255]));

    let first = preprocessor.preprocess(&RawFrame::rgb(&red)).unwrap().unwrap();
    assert_eq!(first.pixel(0, 0), [255, 0, 0]);
    let second = preprocessor.preprocess(&RawFrame::rgb(&blue)).unwrap().unwrap();
    assert_eq!(second.pixel(0, 0), [0, 0, 255]);
  }

  #[test]
  fn zero_sizes_are_rejected() {
    assert!(matches!(
      ImagePreprocessor::new(0, 480, 224),
      Err(PreprocessError::InvalidConfig(_))
    ));
    assert!(matches!(
      ImagePreprocessor::new(640, 480, 0),
      Err(PreprocessError::InvalidConfig(_))
    ));
  }

  #[test]
  fn oversized_buffers_are_rejected() {
    assert!(matches!(
      ImagePreprocessor::new(u32::MAX, u32::MAX, 224),
      Err(PreprocessError::InvalidConfig(_))
    ));
    assert!(matches!(
      ImagePreprocessor::new(640, 480, u32::MAX),
      Err(PreprocessError::InvalidConfig(_))
    ));
  }

  #[cfg(feature = "save_preview")]
  #[test]
  fn preview_is_saved_and_failures_are_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview").join("tensorflow_preview.png");
    let src = RgbImage::from_pixel(8, 8, Rgb(GRAY));

    let mut preprocessor = ImagePreprocessor::new(8, 8, 4)
      .unwrap()
      .with_preview_path(&path);
    assert!(preprocessor.preprocess(&RawFrame::rgb(&src)).unwrap().is_some());
    assert!(path.exists());

    // 目标路径是目录，保存失败但不影响结果
    let mut preprocessor = ImagePreprocessor::new(8, 8, 4)
      .unwrap()
      .with_preview_path(dir.path());
    assert!(preprocessor.preprocess(&RawFrame::rgb(&src)).unwrap().is_some());
  }
}
