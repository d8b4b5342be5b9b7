//! Form snapshot rendering
//!
//! Rasterizes the converter form with tiny-skia. Layout calculation is kept
//! separate from drawing so the geometry can be tested without pixels.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use log::{debug, info};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};

use crate::app::state::FormState;
use crate::config::ConverterSettings;
use crate::domain::core::{Axis, Dimension, Direction};
use crate::domain::validation::FieldId;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to read font {path}: {source}")]
    FontUnreadable { path: PathBuf, source: std::io::Error },

    #[error("File {path} is not a usable font")]
    InvalidFont { path: PathBuf },

    #[error("Failed to write snapshot {path}: {reason}")]
    EncodingFailed { path: PathBuf, reason: String },
}

/// What a layout box represents on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRole {
    Background,
    Header,
    ToggleTrack,
    ToggleKnob,
    Panel(Dimension),
    Field(FieldId),
    Button,
    ResultPanel,
    LoadingBlock,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Color,
    pub width: f32,
}

/// A filled, optionally outlined rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub role: BoxRole,
    pub rect: SkiaRect,
    pub fill: Color,
    pub outline: Option<Outline>,
}

/// A line of text anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: Color,
}

/// Pre-calculated layout for one form snapshot
#[derive(Debug, Clone)]
pub struct FormLayout {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Boxes in paint order
    pub boxes: Vec<LayoutBox>,
    pub labels: Vec<TextLabel>,
}

const WHITE: Color = Color::WHITE;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

fn dimmed(mut color: Color, alpha: f32) -> Color {
    color.set_alpha(alpha);
    color
}

/// Rough advance width used for centering before a font is involved
fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.55
}

impl FormLayout {
    /// Base canvas the proportions below were designed for
    pub const BASE_WIDTH: f32 = 640.0;
    pub const BASE_HEIGHT: f32 = 420.0;

    /// Lays out the form for the given state and canvas size
    pub fn from_state(state: &FormState, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let s = (w / Self::BASE_WIDTH).min(h / Self::BASE_HEIGHT);
        let margin = 16.0 * s;

        let mut layout = Self {
            canvas_width: w,
            canvas_height: h,
            boxes: Vec::new(),
            labels: Vec::new(),
        };

        layout.push_box(BoxRole::Background, 0.0, 0.0, w, h, rgb(14, 165, 233), None);

        let header_top = margin * 0.75;
        let header_h = 44.0 * s;
        layout.push_box(
            BoxRole::Header,
            margin,
            header_top,
            w - 2.0 * margin,
            header_h,
            rgb(139, 69, 19),
            Some(Outline {
                color: rgb(101, 67, 33),
                width: 3.0 * s,
            }),
        );
        layout.push_label("AXIS GATE", margin + 12.0 * s, header_top + 10.0 * s, 22.0 * s, WHITE);

        let toggle_bottom = layout.calculate_toggle(state.direction(), header_top + header_h + 12.0 * s, s);

        let panels_top = toggle_bottom + 14.0 * s;
        let panels_bottom = h - 150.0 * s;
        for dimension in [Dimension::Nether, Dimension::Overworld] {
            layout.calculate_panel(state, dimension, panels_top, panels_bottom, s);
        }

        let button_bottom = layout.calculate_button(state.is_loading(), panels_bottom + 12.0 * s, s);
        layout.calculate_result(state, button_bottom + 12.0 * s, s);

        layout
    }

    fn push_box(
        &mut self,
        role: BoxRole,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Color,
        outline: Option<Outline>,
    ) {
        // degenerate boxes only occur on absurd canvas sizes; skip them
        if let Some(rect) = SkiaRect::from_xywh(x, y, w, h) {
            self.boxes.push(LayoutBox {
                role,
                rect,
                fill,
                outline,
            });
        }
    }

    fn push_label(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }

    /// Toggle track with the two dimension labels; returns the row bottom
    fn calculate_toggle(&mut self, direction: Direction, top: f32, s: f32) -> f32 {
        let track_w = 64.0 * s;
        let track_h = 28.0 * s;
        let track_x = (self.canvas_width - track_w) / 2.0;
        let knob = 22.0 * s;
        let knob_x = match direction {
            Direction::NetherToOverworld => track_x + 3.0 * s,
            Direction::OverworldToNether => track_x + track_w - knob - 3.0 * s,
        };

        self.push_box(
            BoxRole::ToggleTrack,
            track_x,
            top,
            track_w,
            track_h,
            rgb(107, 107, 107),
            Some(Outline {
                color: rgb(74, 74, 74),
                width: 2.0 * s,
            }),
        );
        self.push_box(BoxRole::ToggleKnob, knob_x, top + 3.0 * s, knob, knob, rgb(136, 136, 136), None);

        let size = 16.0 * s;
        let pole_color = |dimension: Dimension| {
            if direction.source() == dimension {
                WHITE
            } else {
                rgb(156, 163, 175)
            }
        };
        let nether = Dimension::Nether.label();
        let label_y = top + (track_h - size) / 2.0;
        self.push_label(
            nether,
            track_x - 12.0 * s - estimate_text_width(nether, size),
            label_y,
            size,
            pole_color(Dimension::Nether),
        );
        self.push_label(
            Dimension::Overworld.label(),
            track_x + track_w + 12.0 * s,
            label_y,
            size,
            pole_color(Dimension::Overworld),
        );

        top + track_h
    }

    fn calculate_panel(&mut self, state: &FormState, dimension: Dimension, top: f32, bottom: f32, s: f32) {
        let margin = 16.0 * s;
        let panel_w = (self.canvas_width - 3.0 * margin) / 2.0;
        let panel_h = bottom - top;
        let x = match dimension {
            Dimension::Nether => margin,
            Dimension::Overworld => 2.0 * margin + panel_w,
        };
        let active = state.is_editable(dimension);

        let (panel_fill, field_fill) = match dimension {
            Dimension::Nether => (rgb(107, 66, 38), rgb(139, 90, 58)),
            Dimension::Overworld => (rgb(124, 179, 66), rgb(143, 196, 79)),
        };
        let panel_outline = active.then(|| Outline {
            color: rgb(250, 204, 21),
            width: 4.0 * s,
        });
        self.push_box(
            BoxRole::Panel(dimension),
            x,
            top,
            panel_w,
            panel_h,
            if active { panel_fill } else { dimmed(panel_fill, 0.6) },
            panel_outline,
        );

        let title = format!("{} Coordinates", dimension.label());
        self.push_label(&title, x + 10.0 * s, top + 8.0 * s, 14.0 * s, WHITE);

        let rows_top = top + 30.0 * s;
        let row_h = (panel_h - 38.0 * s) / 3.0;
        let coords = state.coordinates(dimension);
        for (i, axis) in Axis::ALL.iter().enumerate() {
            let field = FieldId::new(dimension, *axis);
            let row_y = rows_top + i as f32 * row_h;
            let box_x = x + 34.0 * s;
            let outline = state.errors().is_flagged(field).then(|| Outline {
                color: rgb(239, 68, 68),
                width: 3.0 * s,
            });

            self.push_label(&axis.name().to_ascii_uppercase(), x + 12.0 * s, row_y + 4.0 * s, 14.0 * s, WHITE);
            self.push_box(
                BoxRole::Field(field),
                box_x,
                row_y,
                panel_w - 44.0 * s,
                row_h - 6.0 * s,
                if active { field_fill } else { dimmed(field_fill, 0.5) },
                outline,
            );

            let value = coords.get(*axis);
            let (text, color) = if value.is_empty() {
                ("0", dimmed(WHITE, 0.4))
            } else {
                (value, WHITE)
            };
            self.push_label(text, box_x + 8.0 * s, row_y + 4.0 * s, 14.0 * s, color);
        }
    }

    /// Convert button; returns its bottom edge
    fn calculate_button(&mut self, loading: bool, top: f32, s: f32) -> f32 {
        let button_w = 180.0 * s;
        let button_h = 36.0 * s;
        let x = (self.canvas_width - button_w) / 2.0;
        let fill = rgb(85, 170, 85);

        self.push_box(
            BoxRole::Button,
            x,
            top,
            button_w,
            button_h,
            if loading { dimmed(fill, 0.7) } else { fill },
            Some(Outline {
                color: rgb(58, 122, 58),
                width: 3.0 * s,
            }),
        );

        let text = if loading { "Processing..." } else { "Convert" };
        let size = 16.0 * s;
        let text_x = x + (button_w - estimate_text_width(text, size)) / 2.0;
        self.push_label(text, text_x, top + (button_h - size) / 2.0, size, WHITE);

        top + button_h
    }

    fn calculate_result(&mut self, state: &FormState, top: f32, s: f32) {
        let loading = state.is_loading();
        let result = state.result();
        if !loading && result.is_none() {
            return;
        }

        let margin = 16.0 * s;
        let ink = rgb(74, 47, 26);
        self.push_box(
            BoxRole::ResultPanel,
            margin,
            top,
            self.canvas_width - 2.0 * margin,
            self.canvas_height - top - margin,
            rgb(196, 164, 132),
            Some(Outline {
                color: rgb(139, 107, 74),
                width: 3.0 * s,
            }),
        );
        self.push_label("Conversion Result", margin + 10.0 * s, top + 8.0 * s, 13.0 * s, ink);

        if loading {
            let block = 14.0 * s;
            for i in 0..8 {
                let bx = margin + 12.0 * s + i as f32 * (block + 6.0 * s);
                self.push_box(BoxRole::LoadingBlock, bx, top + 30.0 * s, block, block, rgb(139, 107, 74), None);
            }
        } else if let Some(result) = result {
            self.push_label(result, margin + 10.0 * s, top + 32.0 * s, 14.0 * s, ink);
        }
    }

    /// Boxes with a given role
    pub fn boxes_with_role(&self, role: BoxRole) -> impl Iterator<Item = &LayoutBox> {
        self.boxes.iter().filter(move |b| b.role == role)
    }
}

/// Snapshot renderer using tiny-skia, with optional ab_glyph text
#[derive(Default)]
pub struct FormRenderer {
    font: Option<FontVec>,
}

impl std::fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRenderer").field("has_font", &self.has_font()).finish()
    }
}

impl FormRenderer {
    /// Create a renderer that draws text as placeholder bars
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Create a renderer that draws text with the font at `path`
    pub fn with_font_file(path: &Path) -> Result<Self, RendererError> {
        let data = std::fs::read(path).map_err(|source| RendererError::FontUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| RendererError::InvalidFont {
            path: path.to_path_buf(),
        })?;
        info!("Loaded snapshot font {}", path.display());
        Ok(Self { font: Some(font) })
    }

    /// Create a renderer from the configured font, if one is set
    pub fn from_settings(settings: &ConverterSettings) -> Result<Self, RendererError> {
        match &settings.font_path {
            Some(path) => Self::with_font_file(path),
            None => Ok(Self::new()),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render a form layout to a pixmap
    pub fn render_layout(&self, layout: &FormLayout) -> Result<Pixmap, RendererError> {
        let width = layout.canvas_width as u32;
        let height = layout.canvas_height as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RendererError::PixmapCreationFailed { width, height })?;
        pixmap.fill(Color::TRANSPARENT);

        for layout_box in &layout.boxes {
            self.render_box(&mut pixmap, layout_box);
        }
        for label in &layout.labels {
            match &self.font {
                Some(font) => draw_text(&mut pixmap, font, label),
                None => draw_placeholder(&mut pixmap, label),
            }
        }

        Ok(pixmap)
    }

    /// Render the layout and write it as a PNG file
    pub fn save_snapshot(&self, layout: &FormLayout, path: &Path) -> Result<(), RendererError> {
        let pixmap = self.render_layout(layout)?;
        pixmap.save_png(path).map_err(|err| RendererError::EncodingFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!("Snapshot written to {}", path.display());
        Ok(())
    }

    fn render_box(&self, pixmap: &mut Pixmap, layout_box: &LayoutBox) {
        let mut paint = Paint::default();
        paint.set_color(layout_box.fill);
        pixmap.fill_rect(layout_box.rect, &paint, Transform::identity(), None);

        if let Some(outline) = layout_box.outline {
            let path = PathBuilder::from_rect(layout_box.rect);
            let mut paint = Paint::default();
            paint.set_color(outline.color);
            let stroke = Stroke {
                width: outline.width,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

fn draw_text(pixmap: &mut Pixmap, font: &FontVec, label: &TextLabel) {
    let scale = PxScale::from(label.font_size);
    let scaled = font.as_scaled(scale);
    let baseline = label.y + scaled.ascent();
    let mut caret = label.x;

    for ch in label.text.chars() {
        let id = font.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                fill_pixel(
                    pixmap,
                    bounds.min.x + gx as f32,
                    bounds.min.y + gy as f32,
                    label.color,
                    coverage,
                );
            });
        }
    }
}

fn fill_pixel(pixmap: &mut Pixmap, x: f32, y: f32, color: Color, coverage: f32) {
    if coverage <= 0.0 {
        return;
    }
    if let Some(rect) = SkiaRect::from_xywh(x, y, 1.0, 1.0) {
        let mut paint = Paint::default();
        paint.set_color(dimmed(color, color.alpha() * coverage));
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Stands in for text when no font is configured
fn draw_placeholder(pixmap: &mut Pixmap, label: &TextLabel) {
    let width = estimate_text_width(&label.text, label.font_size);
    let height = label.font_size * 0.6;
    if let Some(rect) = SkiaRect::from_xywh(label.x, label.y + label.font_size * 0.2, width, height) {
        let mut paint = Paint::default();
        paint.set_color(dimmed(label.color, label.color.alpha() * 0.6));
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}
