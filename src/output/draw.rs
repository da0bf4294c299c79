// 该文件是 Luodi （落地生根） 项目的一部分。
// src/output/draw.rs - 实体接地框渲染
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{
  entity::Entity,
  input::{ImageSource, InvalidImage},
  palette,
};

// 标注渲染常量
const LABEL_FONT_SIZE: f32 = 20.0;
const BOX_LINE: i32 = 3; // 边框线宽
const TEXT_SPACES: i32 = 3; // 标签上下内边距
const LABEL_ALPHA: f32 = 0.5; // 标签背景与底图的混合系数
const SWATCH_WIDTH_FACTOR: f32 = 1.35; // 色块区域宽度相对参考字符宽度的倍数

/// 标签背景矩形，仅用于同一次渲染内的重叠检测
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRect {
  pub x1: i32,
  pub y1: i32,
  pub x2: i32,
  pub y2: i32,
}

impl LabelRect {
  /// 闭区间的轴对齐相交测试
  pub fn overlaps(&self, other: &LabelRect) -> bool {
    !(self.x2 < other.x1 || self.x1 > other.x2 || self.y2 < other.y1 || self.y1 > other.y2)
  }
}

/// 贪心下移候选标签，直到与所有已放置标签不再重叠。
/// 越过底边时钳制到最后一行并接受残余重叠。
fn resolve_label_overlap(
  mut rect: LabelRect,
  previous: &[LabelRect],
  bg_height: i32,
  image_h: i32,
) -> LabelRect {
  while previous.iter().any(|prev| rect.overlaps(prev)) {
    rect.y1 += bg_height;
    rect.y2 += bg_height;

    if rect.y2 >= image_h {
      rect.y1 = (image_h - bg_height).max(0);
      rect.y2 = image_h;
      break;
    }
  }
  rect
}

fn set_pixel(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
  if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
    image.put_pixel(x as u32, y as u32, color);
  }
}

pub struct Draw<'a> {
  font_size: f32,
  text_spaces: i32,
  box_line: i32,
  font: FontRef<'a>,
}

impl Default for Draw<'_> {
  fn default() -> Self {
    let font_data = include_bytes!("../../assets/font.ttf"); // default font
    let font = FontRef::try_from_slice(font_data).expect("无法加载嵌入的字体文件");

    Self {
      font_size: LABEL_FONT_SIZE,
      text_spaces: TEXT_SPACES,
      box_line: BOX_LINE,
      font,
    }
  }
}

impl Draw<'_> {
  /// 在图像上渲染接地实体的包围框与标签。
  ///
  /// `selected` 给出时只绘制该序号的实体，但颜色分配仍按
  /// 完整列表的序号推进，因而与全量渲染时的颜色一致。
  /// 返回与输入尺寸相同的新位图，不改动调用方的图像。
  pub fn render(
    &self,
    image: ImageSource,
    entities: &[Entity],
    selected: Option<usize>,
  ) -> Result<RgbImage, InvalidImage> {
    let image = image.into_rgb()?;

    if entities.is_empty() {
      return Ok(image);
    }

    Ok(self.draw_entities(image, entities, selected))
  }

  fn draw_entities(
    &self,
    mut image: RgbImage,
    entities: &[Entity],
    selected: Option<usize>,
  ) -> RgbImage {
    let image_h = image.height() as i32;
    let scale = PxScale::from(self.font_size);

    // 参考字形度量（大写 F）
    let (ref_width, ref_height) = text_size(scale, &self.font, "F");
    let base_height = (ref_height as f32 * 0.675) as i32;
    let text_offset = ref_height as i32 - base_height;
    let swatch_width = (SWATCH_WIDTH_FACTOR * ref_width as f32) as i32;

    // 锚点外扩偏移：半线宽向上取整，与其外一像素
    let l_o = self.box_line / 2 + self.box_line % 2;
    let r_o = l_o + 1;

    let mut previous: Vec<LabelRect> = Vec::new();

    // 最多渲染调色板长度个实体；颜色序号与实体序号一一对应，
    // 且无论是否被 selected 过滤都按序推进
    for (entity_idx, entity) in entities.iter().take(palette::PALETTE.len()).enumerate() {
      if selected.is_some_and(|sel| sel != entity_idx) {
        continue;
      }

      let color = palette::PALETTE[entity_idx];
      let label = format!("  {}", entity.name);
      let (label_w, label_h) = text_size(scale, &self.font, &label);
      let bg_height = label_h as i32 + text_offset + 2 * self.text_spaces;

      for bbox in entity.boxes.iter() {
        let (orig_x1, orig_y1, orig_x2, orig_y2) =
          bbox.to_pixel(image.width(), image.height());

        self.draw_box_outline(&mut image, orig_x1, orig_y1, orig_x2, orig_y2, Rgb(color));

        // 标签锚点在框左上角外侧；顶边放不下时翻转到框顶边内下方
        let mut x1 = orig_x1 - l_o;
        let mut y1 = orig_y1 - l_o;
        if y1 < bg_height {
          x1 = orig_x1 + r_o;
          y1 = orig_y1 + r_o + bg_height;
        }

        let candidate = LabelRect {
          x1,
          y1: y1 - bg_height,
          x2: x1 + label_w as i32,
          y2: y1,
        };
        let rect = resolve_label_overlap(candidate, &previous, bg_height, image_h);

        blend_label_background(&mut image, &rect, swatch_width, color);

        // 黑色标签文字，左对齐于锚点
        draw_text_mut(
          &mut image,
          Rgb([0u8, 0u8, 0u8]),
          rect.x1,
          rect.y1 + self.text_spaces,
          scale,
          &self.font,
          &label,
        );

        previous.push(rect);
      }
    }

    image
  }

  // 沿名义边居中绘制线宽为 box_line 的矩形边框
  fn draw_box_outline(
    &self,
    image: &mut RgbImage,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Rgb<u8>,
  ) {
    let half = self.box_line / 2;

    for t in -half..=half {
      let (bx1, by1) = (x1 + t, y1 + t);
      let (bx2, by2) = (x2 - t, y2 - t);

      if bx1 > bx2 || by1 > by2 {
        continue;
      }

      // 上下边
      for x in bx1..=bx2 {
        set_pixel(image, x, by1, color);
        set_pixel(image, x, by2, color);
      }
      // 左右边
      for y in by1..=by2 {
        set_pixel(image, bx1, y, color);
        set_pixel(image, bx2, y, color);
      }
    }
  }
}

// 以 50% 透明度混合标签背景：左侧色块区域取实体颜色，其余为白色；
// 画布之外的像素直接跳过
fn blend_label_background(
  image: &mut RgbImage,
  rect: &LabelRect,
  swatch_width: i32,
  color: [u8; 3],
) {
  let (image_w, image_h) = (image.width() as i32, image.height() as i32);

  for i in rect.y1..rect.y2 {
    for j in rect.x1..rect.x2 {
      if i < 0 || i >= image_h || j < 0 || j >= image_w {
        continue;
      }

      let bg = if j < rect.x1 + swatch_width {
        color
      } else {
        [255u8, 255, 255]
      };

      let Rgb(old) = *image.get_pixel(j as u32, i as u32);
      let mut blended = [0u8; 3];
      for c in 0..3 {
        blended[c] = (LABEL_ALPHA * old[c] as f32 + (1.0 - LABEL_ALPHA) * bg[c] as f32) as u8;
      }
      image.put_pixel(j as u32, i as u32, Rgb(blended));
    }
  }
}
