// 该文件是 Luodi （落地生根） 项目的一部分。
// src/task.rs - 任务编排
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

use tracing::{debug, info};

use crate::{
  entity::encode_entities,
  model::{GroundingResult, Model},
  output::Render,
  presentation::colored_spans,
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 单次描述任务：取一帧，推理，渲染并输出
#[derive(Default, Debug)]
pub struct OneShotTask {
  entities_path: Option<PathBuf>,
}

impl OneShotTask {
  /// 推理后把实体列表的文本字面量写到该路径，供重选渲染使用
  pub fn with_entities_path(mut self, entities_path: Option<PathBuf>) -> Self {
    self.entities_path = entities_path;
    self
  }
}

impl<
  F,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: Model<Input = F, Output = GroundingResult, Error = ME>,
  O: Render<F, GroundingResult, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))?;
    info!("输入帧获取成功，开始推理...");
    let now = std::time::Instant::now();
    let result = model.infer(&frame)?;
    info!("推理完成，耗时: {:.2?}", now.elapsed());
    info!("描述文本: {}", result.text);

    for (segment, color_id) in colored_spans(&result.text, &result.entities) {
      match color_id {
        Some(id) => info!("文本片段 [颜色 {}]: {:?}", id, segment),
        None => debug!("文本片段: {:?}", segment),
      }
    }

    if let Some(path) = &self.entities_path {
      std::fs::write(path, encode_entities(&result.entities)?)?;
      info!("实体列表已保存: {}", path.display());
    }

    let now = std::time::Instant::now();
    output.render_result(&frame, &result)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}
