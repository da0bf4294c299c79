// 该文件是 Luodi （落地生根） 项目的一部分。
// src/model/replay.rs - 回放模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DescriptionKind, GroundingResult, Model},
};

/// 从 JSON 文件回放一次接地推理结果。
/// 真实的视觉语言模型是外部协作方，演示管线用该模型代替它。
pub struct ReplayModel {
  result: GroundingResult,
  prompt: String,
}

#[derive(Error, Debug)]
pub enum ReplayError {
  #[error("回放文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("回放文件解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub struct ReplayModelBuilder {
  result_path: String,
  kind: DescriptionKind,
}

impl FromUrlWithScheme for ReplayModelBuilder {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayModelBuilder {
  type Error = ReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayError::SchemeMismatch(format!(
        "期望模型方案 '{}', 实际方案 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(ReplayModelBuilder {
      result_path: url.path().to_string(),
      kind: DescriptionKind::Brief,
    })
  }
}

impl ReplayModelBuilder {
  pub fn kind(mut self, kind: DescriptionKind) -> Self {
    self.kind = kind;
    self
  }

  pub fn build(self) -> Result<ReplayModel, ReplayError> {
    info!("加载回放结果文件: {}", self.result_path);
    let data = std::fs::read_to_string(&self.result_path)?;
    let result: GroundingResult = serde_json::from_str(&data)?;
    info!("回放结果包含 {} 个实体", result.entities.len());

    Ok(ReplayModel {
      result,
      prompt: self.kind.to_prompt(),
    })
  }
}

impl Model for ReplayModel {
  type Input = RgbImage;
  type Output = GroundingResult;
  type Error = ReplayError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!(
      "回放推理: 输入 {}x{}, 提示词: {}",
      input.width(),
      input.height(),
      self.prompt
    );
    Ok(self.result.clone())
  }
}
