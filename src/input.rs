// 该文件是 Luodi （落地生根） 项目的一部分。
// src/input.rs - 图像输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use image::{ImageReader, Rgb, RgbImage};
use thiserror::Error;
use tracing::error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

/// CLIP 预处理的逐通道均值
pub const CLIP_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];
/// CLIP 预处理的逐通道标准差
pub const CLIP_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

#[derive(Error, Debug)]
pub enum InvalidImage {
  #[error("无效的图像路径: {0}")]
  PathNotFound(PathBuf),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像解码错误: {0}")]
  DecodeError(#[from] image::ImageError),
  #[error("张量长度不匹配: 期望 {expected}, 实际 {actual}")]
  TensorShapeMismatch { expected: usize, actual: usize },
}

/// 经 CLIP 归一化的 CHW 浮点张量
#[derive(Debug, Clone)]
pub struct NormalizedTensor {
  data: Vec<f32>,
  width: u32,
  height: u32,
}

impl NormalizedTensor {
  pub fn new(data: Vec<f32>, width: u32, height: u32) -> Result<Self, InvalidImage> {
    let expected = 3 * width as usize * height as usize;
    if data.len() != expected {
      return Err(InvalidImage::TensorShapeMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      data,
      width,
      height,
    })
  }

  /// 逐通道反归一化，得到标准 0-255 RGB 图像
  pub fn denormalize(&self) -> RgbImage {
    let plane = self.width as usize * self.height as usize;

    RgbImage::from_fn(self.width, self.height, |x, y| {
      let idx = (y * self.width + x) as usize;
      let mut pixel = [0u8; 3];
      for (c, value) in pixel.iter_mut().enumerate() {
        let v = self.data[c * plane + idx] * CLIP_STD[c] + CLIP_MEAN[c];
        *value = (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
      }
      Rgb(pixel)
    })
  }
}

/// 图像输入的三种形式，统一规范化为 RGB 位图
pub enum ImageSource {
  /// 已解码的位图
  Bitmap(RgbImage),
  /// 图像文件路径
  Path(PathBuf),
  /// 归一化张量，需先反归一化
  Tensor(NormalizedTensor),
}

impl ImageSource {
  pub fn into_rgb(self) -> Result<RgbImage, InvalidImage> {
    match self {
      ImageSource::Bitmap(image) => Ok(image),
      ImageSource::Path(path) => {
        if !path.exists() {
          error!("无效的图像路径: {}", path.display());
          return Err(InvalidImage::PathNotFound(path));
        }
        let image = ImageReader::open(&path)?.decode()?;
        Ok(image.into())
      }
      ImageSource::Tensor(tensor) => Ok(tensor.denormalize()),
    }
  }
}

impl From<RgbImage> for ImageSource {
  fn from(image: RgbImage) -> Self {
    ImageSource::Bitmap(image)
  }
}

impl From<PathBuf> for ImageSource {
  fn from(path: PathBuf) -> Self {
    ImageSource::Path(path)
  }
}

impl From<NormalizedTensor> for ImageSource {
  fn from(tensor: NormalizedTensor) -> Self {
    ImageSource::Tensor(tensor)
  }
}

#[derive(Error, Debug)]
pub enum InputError {
  #[error("图像输入错误: {0}")]
  InvalidImage(#[from] InvalidImage),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

impl FromUrlWithScheme for ImageSource {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageSource {
  type Error = InputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(InputError::SchemeMismatch);
    }

    Ok(ImageSource::Path(PathBuf::from(url.path())))
  }
}
