// 该文件是 Luodi （落地生根） 项目的一部分。
// src/bin/demo_oneshot.rs - 单次描述演示
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use url::Url;

use luodi::{
  FromUrl,
  input::ImageSource,
  model::{DescriptionKind, ReplayModelBuilder},
  output::SaveImageFileOutput,
  palette,
  task::{OneShotTask, Task},
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
  /// 简短描述
  Brief,
  /// 详细描述
  Detailed,
}

/// Luodi 演示程序参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像（image:///path/to/image.png）
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 回放模型结果（replay:///path/to/result.json）
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 输出路径（image:///path/to/annotated.png）
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
  /// 描述类型
  #[arg(long, value_enum, default_value = "brief")]
  pub kind: KindArg,
  /// 自定义提示词，给出时优先于 --kind
  #[arg(long, value_name = "PROMPT")]
  pub prompt: Option<String>,
  /// 实体列表的保存路径，供重选渲染使用
  #[arg(long, value_name = "FILE")]
  pub entities: Option<PathBuf>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("模型: {}", args.model);
  info!("输出路径: {}", args.output);

  for (color_id, hex) in palette::color_legend() {
    debug!("颜色图例 {} -> {}", color_id, hex);
  }

  let kind = match (&args.prompt, args.kind) {
    (Some(text), _) => DescriptionKind::Custom(text.clone()),
    (None, KindArg::Brief) => DescriptionKind::Brief,
    (None, KindArg::Detailed) => DescriptionKind::Detailed,
  };

  let image = ImageSource::from_url(&args.input)?.into_rgb()?;
  let model = ReplayModelBuilder::from_url(&args.model)?.kind(kind).build()?;
  let output = SaveImageFileOutput::from_url(&args.output)?;

  let task = OneShotTask::default().with_entities_path(args.entities.clone());
  task.run_task(std::iter::once(image), model, output)?;

  Ok(())
}
