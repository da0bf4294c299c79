// 该文件是 Luodi （落地生根） 项目的一部分。
// src/presentation.rs - 展示层胶水
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::entity::Entity;

/// 高亮文本片段：文本内容与可选的颜色序号。
/// 颜色序号经 `palette::color_legend` 映射为十六进制颜色。
pub type ColoredSpan = (String, Option<usize>);

/// 按实体跨度把描述文本切分为着色片段。
/// 没有短语的实体（`span.0 == span.1`）被跳过，也不占用颜色序号。
pub fn colored_spans(text: &str, entities: &[Entity]) -> Vec<ColoredSpan> {
  let mut entity_info = Vec::new();
  let mut color_id = 0usize;
  for entity in entities {
    if !entity.has_phrase() {
      continue;
    }
    entity_info.push((entity.span, color_id));
    color_id += 1;
  }

  let mut spans = Vec::new();
  let mut prev_end = 0usize;
  let mut end = 0usize;
  for ((start, span_end), color_id) in entity_info {
    if start > prev_end {
      spans.push((text.get(prev_end..start).unwrap_or_default().to_string(), None));
    }
    spans.push((
      text.get(start..span_end).unwrap_or_default().to_string(),
      Some(color_id),
    ));
    prev_end = span_end;
    end = span_end;
  }

  if end < text.len() {
    spans.push((text.get(end..).unwrap_or_default().to_string(), None));
  }

  spans
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::NormalizedBox;

  fn phrase(name: &str, span: (usize, usize)) -> Entity {
    Entity {
      name: name.to_string(),
      span,
      boxes: vec![NormalizedBox {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
      }],
    }
  }

  #[test]
  fn spans_cover_text_in_order() {
    let text = "a dog and a cat";
    let entities = vec![phrase("dog", (2, 5)), phrase("cat", (12, 15))];
    let spans = colored_spans(text, &entities);
    assert_eq!(
      spans,
      vec![
        ("a ".to_string(), None),
        ("dog".to_string(), Some(0)),
        (" and a ".to_string(), None),
        ("cat".to_string(), Some(1)),
      ]
    );
  }

  #[test]
  fn box_only_entities_do_not_take_a_color() {
    let text = "a dog and a cat";
    let entities = vec![phrase("", (4, 4)), phrase("dog", (2, 5)), phrase("cat", (12, 15))];
    let spans = colored_spans(text, &entities);
    let colored: Vec<_> = spans.iter().filter_map(|(_, c)| *c).collect();
    assert_eq!(colored, vec![0, 1]);
  }

  #[test]
  fn no_phrases_yields_single_uncolored_span() {
    let text = "nothing grounded here";
    let spans = colored_spans(text, &[]);
    assert_eq!(spans, vec![(text.to_string(), None)]);
  }

  #[test]
  fn trailing_text_is_kept() {
    let text = "the dog runs";
    let spans = colored_spans(text, &[phrase("dog", (4, 7))]);
    assert_eq!(
      spans,
      vec![
        ("the ".to_string(), None),
        ("dog".to_string(), Some(0)),
        (" runs".to_string(), None),
      ]
    );
  }
}
