// 该文件是 Luodi （落地生根） 项目的一部分。
// src/bin/demo_reselect.rs - 重选实体渲染演示
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use url::Url;

use luodi::{
  FromUrl,
  entity::decode_entities,
  input::ImageSource,
  model::GroundingResult,
  output::{Render, SaveImageFileOutput},
};
use tracing::info;

/// 重新渲染选中实体：与全量渲染保持相同的颜色分配
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像（image:///path/to/image.png）
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 单次描述演示保存的实体列表文件
  #[arg(long, value_name = "FILE")]
  pub entities: PathBuf,
  /// 要渲染的实体序号
  #[arg(long, value_name = "INDEX")]
  pub select: usize,
  /// 输出路径（image:///path/to/annotated.png）
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("实体列表: {}", args.entities.display());
  info!("选中实体序号: {}", args.select);

  let entities = decode_entities(&std::fs::read_to_string(&args.entities)?)?;
  info!("实体列表包含 {} 个实体", entities.len());

  let image = ImageSource::from_url(&args.input)?.into_rgb()?;
  let output = SaveImageFileOutput::from_url(&args.output)?.with_selected(Some(args.select));

  let result = GroundingResult {
    text: String::new(),
    entities,
  };
  output.render_result(&image, &result)?;

  info!("渲染完成");

  Ok(())
}
