//! Document canvas: layout caching, drawing and pointer input.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotation::{Document, Span};
use crate::config::AppConfig;
use crate::constants::{PAGE_SCROLL_STEP, SCROLL_STEP};
use crate::interaction::{Gesture, InteractionState};
use crate::layout::{
    drag_curve, layout, FontMetrics, HitTestIndex, LayoutResult, RelationGeometry, Viewport,
};
use crate::navigator::{DocumentNavigator, DocumentSwitched};
use crate::theme::{self, canvas};

use super::DialogState;

const TOKEN_FONT_SIZE: f32 = 16.0;
const TAG_FONT_SIZE: f32 = 12.0;

/// Inputs the cached layout was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    revision: u64,
    width: f32,
    height: f32,
    scroll_y: f32,
}

/// Canvas-side state: scroll position and the layout of the active document
#[derive(Resource, Default)]
pub struct CanvasState {
    pub scroll_y: f32,
    /// Draw every relation instead of only those touching the hovered or
    /// selected entity
    pub show_all_relations: bool,
    /// Screen position of the canvas's top-left corner last frame
    origin: egui::Pos2,
    layout: Option<LayoutResult>,
    hit_index: HitTestIndex,
    layout_key: Option<LayoutKey>,
}

impl CanvasState {
    pub fn origin(&self) -> egui::Pos2 {
        self.origin
    }

    /// Recompute the layout when anything it depends on changed
    fn refresh(
        &mut self,
        document: &Document,
        viewport: Viewport,
        revision: u64,
        metrics: &impl FontMetrics,
    ) {
        let key = LayoutKey {
            revision,
            width: viewport.width,
            height: viewport.height,
            scroll_y: self.scroll_y,
        };
        if self.layout_key == Some(key) {
            return;
        }

        let result = layout(document, viewport, self.scroll_y, metrics);
        self.hit_index = HitTestIndex::build(&result);
        self.layout = Some(result);
        self.layout_key = Some(key);
    }

    fn invalidate(&mut self) {
        self.layout = None;
        self.hit_index = HitTestIndex::default();
        self.layout_key = None;
    }
}

/// Text measurement through egui's font system
struct EguiFontMetrics<'a> {
    painter: &'a egui::Painter,
    font: egui::FontId,
}

impl FontMetrics for EguiFontMetrics<'_> {
    fn text_width(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(text.to_string(), self.font.clone(), egui::Color32::BLACK)
            .size()
            .x
    }

    fn line_height(&self) -> f32 {
        self.painter
            .layout_no_wrap("Ag".to_string(), self.font.clone(), egui::Color32::BLACK)
            .size()
            .y
    }
}

fn to_pos(origin: egui::Pos2, point: Vec2) -> egui::Pos2 {
    egui::pos2(origin.x + point.x, origin.y + point.y)
}

fn to_rect(origin: egui::Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos(origin, rect.min), to_pos(origin, rect.max))
}

/// Scroll back to the top of a newly shown document
pub fn reset_canvas_on_switch(
    mut events: MessageReader<DocumentSwitched>,
    mut canvas: ResMut<CanvasState>,
) {
    if events.read().count() > 0 {
        canvas.scroll_y = 0.0;
        canvas.invalidate();
    }
}

/// Central panel showing the active document
#[allow(clippy::too_many_arguments)]
pub fn document_view_ui(
    mut contexts: EguiContexts,
    mut canvas: ResMut<CanvasState>,
    mut interaction: ResMut<InteractionState>,
    navigator: Res<DocumentNavigator>,
    config: Res<AppConfig>,
    dialog_state: Res<DialogState>,
    keyboard: Res<ButtonInput<KeyCode>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let canvas = &mut *canvas;

    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(canvas::BACKGROUND))
        .show(ctx, |ui| {
            let Some(document) = navigator.document() else {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Press Ctrl+O to open a JSONL collection")
                            .color(theme::ui::HINT_TEXT)
                            .size(18.0),
                    );
                });
                return;
            };

            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let origin = response.rect.min;
            canvas.origin = origin;
            let viewport = Viewport::new(response.rect.width(), response.rect.height());
            let font = egui::FontId::proportional(TOKEN_FONT_SIZE);

            // Scrolling
            let mut scroll_y = canvas.scroll_y;
            if response.hovered() {
                let notch = ui.input(|i| i.raw_scroll_delta.y);
                if notch != 0.0 {
                    scroll_y -= notch.signum() * SCROLL_STEP;
                }
            }
            if !dialog_state.any_modal_open && !ui.ctx().wants_keyboard_input() {
                if keyboard.just_pressed(KeyCode::PageUp) {
                    scroll_y -= PAGE_SCROLL_STEP;
                }
                if keyboard.just_pressed(KeyCode::PageDown) {
                    scroll_y += PAGE_SCROLL_STEP;
                }
            }
            let max_scroll = canvas.layout.as_ref().map_or(0.0, LayoutResult::max_scroll);
            canvas.scroll_y = scroll_y.clamp(0.0, max_scroll);

            let metrics = EguiFontMetrics {
                painter: &painter,
                font: font.clone(),
            };
            canvas.refresh(document, viewport, navigator.revision(), &metrics);

            let Some(layout) = canvas.layout.as_ref() else {
                return;
            };

            // Pointer input, in canvas coordinates
            let (primary_pressed, secondary_pressed, released, pointer) = ui.input(|i| {
                (
                    i.pointer.button_pressed(egui::PointerButton::Primary),
                    i.pointer.button_pressed(egui::PointerButton::Secondary),
                    i.pointer.any_released(),
                    i.pointer.latest_pos(),
                )
            });
            let mut hovered_entity = None;
            if let Some(pointer) = pointer {
                let local = Vec2::new(pointer.x - origin.x, pointer.y - origin.y);
                let token = canvas.hit_index.token_at(local);
                let entity = canvas.hit_index.entity_at(local);

                if response.hovered() {
                    hovered_entity = entity.map(|e| e.span);
                    if !dialog_state.any_modal_open {
                        if primary_pressed {
                            interaction.primary_down(token, entity);
                        }
                        if secondary_pressed {
                            interaction.secondary_down(entity, local);
                        }
                    }
                }
                interaction.pointer_moved(token, local);
                if released {
                    interaction.pointer_up(entity, local, |global| {
                        layout.token_box(global).map(|b| b.rect)
                    });
                }
            }

            draw_document(
                &painter,
                origin,
                layout,
                document,
                &interaction,
                &config,
                hovered_entity,
                canvas.show_all_relations,
                &font,
            );
        });

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_document(
    painter: &egui::Painter,
    origin: egui::Pos2,
    layout: &LayoutResult,
    document: &Document,
    interaction: &InteractionState,
    config: &AppConfig,
    hovered_entity: Option<Span>,
    show_all_relations: bool,
    font: &egui::FontId,
) {
    let colors = &config.data.label_colors;

    // Token selection sits under everything else
    if let Some(selection) = interaction.selected_tokens {
        for token in layout
            .visible_tokens()
            .filter(|t| selection.contains(t.global))
        {
            painter.rect_filled(to_rect(origin, token.rect), 3.0, canvas::TOKEN_SELECTION);
        }
    }

    for entity in layout.visible_entities() {
        let color = theme::label_color(colors, &entity.label);
        let selected = interaction.selected_entity == Some(entity.span);
        let emphasized = selected || hovered_entity == Some(entity.span);
        let stroke = if selected {
            egui::Stroke::new(2.0, canvas::ENTITY_SELECTED)
        } else {
            egui::Stroke::new(if emphasized { 2.0 } else { 1.0 }, color)
        };

        for rect in entity.geometry.rects() {
            let rect = to_rect(origin, *rect);
            painter.rect_filled(rect, 3.0, theme::lighten(color, 0.6));
            painter.rect_stroke(rect, 3.0, stroke, egui::StrokeKind::Inside);
        }
    }

    for token in layout.visible_tokens() {
        if let Some(text) = document.token_text(token.global) {
            painter.text(
                to_rect(origin, token.rect).center(),
                egui::Align2::CENTER_CENTER,
                text,
                font.clone(),
                canvas::TOKEN_TEXT,
            );
        }
    }

    let focus = [hovered_entity, interaction.selected_entity];
    for relation in layout.visible_relations().filter(|r| {
        show_all_relations || focus.iter().flatten().any(|span| r.involves(*span))
    }) {
        draw_relation(painter, origin, relation, theme::label_color(colors, &relation.label));
    }

    if let Gesture::DraggingRelation {
        origin: start,
        pointer,
        ..
    } = interaction.gesture
    {
        let points: Vec<egui::Pos2> = drag_curve(start, pointer)
            .into_iter()
            .map(|p| to_pos(origin, p))
            .collect();
        painter.extend(egui::Shape::dashed_line(
            &points,
            egui::Stroke::new(2.0, canvas::RELATION_DRAG),
            6.0,
            4.0,
        ));
    }

    // Type tag above the selected entity
    if let Some(span) = interaction.selected_entity
        && let Some(entity) = layout.entity_box(span)
        && let Some(first) = entity.geometry.rects().first()
    {
        let color = theme::label_color(colors, &entity.label);
        let anchor = to_pos(origin, Vec2::new(first.center().x, first.min.y - 12.0));
        let galley = painter.layout_no_wrap(
            entity.label.clone(),
            egui::FontId::proportional(TAG_FONT_SIZE),
            color,
        );
        let tag = egui::Rect::from_center_size(anchor, galley.size() + egui::vec2(10.0, 6.0));
        painter.rect_filled(tag, 3.0, canvas::RELATION_LABEL_FILL);
        painter.rect_stroke(tag, 3.0, egui::Stroke::new(1.0, color), egui::StrokeKind::Inside);
        painter.galley(tag.center() - galley.size() / 2.0, galley, color);
    }
}

fn draw_relation(
    painter: &egui::Painter,
    origin: egui::Pos2,
    relation: &RelationGeometry,
    color: egui::Color32,
) {
    let points: Vec<egui::Pos2> = relation
        .curve()
        .into_iter()
        .map(|p| to_pos(origin, p))
        .collect();
    painter.add(egui::Shape::line(points, egui::Stroke::new(2.0, color)));

    let head = relation
        .arrow_head()
        .iter()
        .map(|p| to_pos(origin, *p))
        .collect();
    painter.add(egui::Shape::convex_polygon(head, color, egui::Stroke::NONE));

    let label_rect = to_rect(origin, relation.label_rect);
    painter.rect_filled(label_rect, 3.0, canvas::RELATION_LABEL_FILL);
    painter.rect_stroke(
        label_rect,
        3.0,
        egui::Stroke::new(1.0, color),
        egui::StrokeKind::Inside,
    );
    painter.text(
        label_rect.center(),
        egui::Align2::CENTER_CENTER,
        &relation.label,
        egui::FontId::proportional(TAG_FONT_SIZE),
        color,
    );
}
