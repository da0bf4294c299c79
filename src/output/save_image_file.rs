// 该文件是 Luodi （落地生根） 项目的一部分。
// src/output/save_image_file.rs - 保存标注图像文件
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

use image::RgbImage;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::{ImageSource, InvalidImage},
  model::GroundingResult,
  output::{Render, draw::Draw},
};

/// 把标注后的图像编码保存到文件路径的输出
pub struct SaveImageFileOutput<'a> {
  path: String,
  selected: Option<usize>,
  draw: Draw<'a>,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("图像输入错误: {0}")]
  InvalidImage(#[from] InvalidImage),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for SaveImageFileOutput<'_> {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput<'_> {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(SaveImageFileOutput {
      path: uri.path().to_string(),
      selected: None,
      draw: Draw::default(),
    })
  }
}

impl SaveImageFileOutput<'_> {
  /// 只渲染指定序号的实体；颜色分配仍按完整列表推进
  pub fn with_selected(mut self, selected: Option<usize>) -> Self {
    self.selected = selected;
    self
  }

  fn save_image(&self, image: RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = Path::new(&self.path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    image.save(&self.path)?;

    warn!("保存标注图像到文件: {}", self.path);

    Ok(())
  }
}

impl Render<RgbImage, GroundingResult> for SaveImageFileOutput<'_> {
  type Error = SaveImageFileError;

  fn render_result(
    &self,
    frame: &RgbImage,
    result: &GroundingResult,
  ) -> Result<(), Self::Error> {
    let annotated = self.draw.render(
      ImageSource::Bitmap(frame.clone()),
      &result.entities,
      self.selected,
    )?;
    self.save_image(annotated)
  }
}
