// 该文件是 Luodi （落地生根） 项目的一部分。
// src/entity.rs - 接地实体定义
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

use serde::{Deserialize, Serialize};

/// 归一化包围框，坐标均为图像宽/高的比例值，范围 [0,1]。
/// 范围校验由调用方负责，越界值会落到画布之外。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
  pub x1: f32,
  pub y1: f32,
  pub x2: f32,
  pub y2: f32,
}

impl NormalizedBox {
  /// 换算为像素坐标：按宽/高缩放后向零截断
  pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
    (
      (self.x1 * width as f32) as i32,
      (self.y1 * height as f32) as i32,
      (self.x2 * width as f32) as i32,
      (self.y2 * height as f32) as i32,
    )
  }
}

/// 生成文本中被接地的实体：短语、字节跨度与一组归一化包围框。
/// `span.0 == span.1` 表示没有关联短语的实体，
/// 不参与文本图例但仍会被绘制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
  pub name: String,
  pub span: (usize, usize),
  pub boxes: Vec<NormalizedBox>,
}

impl Entity {
  pub fn has_phrase(&self) -> bool {
    self.span.0 != self.span.1
  }
}

/// 实体列表的文本字面量编码，供 UI 边界往返传递。
/// 往返后结构与浮点精度完全一致。
pub fn encode_entities(entities: &[Entity]) -> serde_json::Result<String> {
  serde_json::to_string(entities)
}

pub fn decode_entities(literal: &str) -> serde_json::Result<Vec<Entity>> {
  serde_json::from_str(literal)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pixel_conversion_truncates_toward_zero() {
    let bbox = NormalizedBox {
      x1: 0.1,
      y1: 0.1,
      x2: 0.5,
      y2: 0.5,
    };
    assert_eq!(bbox.to_pixel(400, 300), (40, 30, 200, 150));
  }

  #[test]
  fn entity_literal_round_trip_is_lossless() {
    let entities = vec![
      Entity {
        name: "a dog".to_string(),
        span: (0, 5),
        boxes: vec![NormalizedBox {
          x1: 0.1,
          y1: 0.234375,
          x2: 0.515625,
          y2: 0.996094,
        }],
      },
      Entity {
        name: "anchor".to_string(),
        span: (7, 7),
        boxes: vec![
          NormalizedBox {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
          },
          NormalizedBox {
            x1: 0.015625,
            y1: 0.33,
            x2: 0.67,
            y2: 0.9,
          },
        ],
      },
    ];

    let literal = encode_entities(&entities).unwrap();
    let decoded = decode_entities(&literal).unwrap();
    assert_eq!(decoded, entities);
  }

  #[test]
  fn phrase_detection_uses_span() {
    let named = Entity {
      name: "dog".to_string(),
      span: (3, 6),
      boxes: vec![],
    };
    let unnamed = Entity {
      name: String::new(),
      span: (4, 4),
      boxes: vec![],
    };
    assert!(named.has_phrase());
    assert!(!unnamed.has_phrase());
  }
}
