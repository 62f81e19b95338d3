//! Editor state and pointer-event dispatch, independent of any rendering
//! surface.

use egui::{Pos2, Vec2};

use crate::model::{Area, CornerRole, Rgb};

/// Maximum delay between two pointer-downs on a corner for them to count as
/// a double-click / double-tap.
pub const DOUBLE_TAP_WINDOW: f64 = 0.5;

/// Result of hit-testing the active area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Nearest corner was closer than the centroid: start a corner drag.
    Corner(CornerRole),
    /// Centroid was closer: start a whole-area drag.
    Body,
}

/// Normalized pointer input. Mouse and touch both map onto these; the down
/// event carries a timestamp so the editor itself can detect double-taps.
#[derive(Clone, Copy, Debug)]
pub enum PointerEvent {
    Down { pos: Pos2, time: f64 },
    Moved { pos: Pos2 },
    Up,
}

#[derive(Clone, Copy, Debug)]
enum Drag {
    Idle,
    Corner(CornerRole),
    Area { last: Pos2 },
}

/// The full editing state: area list, active index, canvas geometry and the
/// transient drag state machine.
pub struct Editor {
    areas: Vec<Area>,
    active: usize,
    canvas: Vec2,
    image_size: Option<Vec2>,
    scale: f32,
    drag: Drag,
    last_down: Option<f64>,
}

impl Editor {
    pub fn new() -> Self {
        let canvas = Vec2::new(800.0, 600.0);
        Self {
            areas: vec![Area::spanning(canvas, Rgb::BLUE, 1)],
            active: 0,
            canvas,
            image_size: None,
            scale: 1.0,
            drag: Drag::Idle,
            last_down: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_area(&self) -> &Area {
        &self.areas[self.active]
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    /// Canvas-to-original-image scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, Drag::Idle)
    }

    // ── Image / canvas geometry ─────────────────────────────────────────────

    /// Record the natural size of a newly loaded image. The caller follows up
    /// with [`Editor::fit_to`] and [`Editor::reset`].
    pub fn set_image(&mut self, natural: Vec2) {
        self.image_size = Some(natural);
    }

    /// Fit the canvas into `container`, preserving the image aspect ratio,
    /// and recompute `scale`. When the canvas dimensions actually change
    /// (by more than a pixel), every corner of every area is rescaled by the
    /// width/height ratios so geometry relative to the image is preserved.
    pub fn fit_to(&mut self, container: Vec2) -> bool {
        if container.x <= 0.0 || container.y <= 0.0 {
            return false;
        }

        let (new_w, new_h) = match self.image_size {
            Some(img) => {
                let img_aspect = img.x / img.y;
                let container_aspect = container.x / container.y;
                if container_aspect > img_aspect {
                    (container.y * img_aspect, container.y)
                } else {
                    (container.x, container.x / img_aspect)
                }
            }
            None => (container.x, container.y),
        };

        self.scale = match self.image_size {
            Some(img) => new_w / img.x,
            None => 1.0,
        };

        if (self.canvas.x - new_w).abs() <= 1.0 && (self.canvas.y - new_h).abs() <= 1.0 {
            return false;
        }

        let width_ratio = new_w / self.canvas.x;
        let height_ratio = new_h / self.canvas.y;
        self.canvas = Vec2::new(new_w, new_h);
        for area in &mut self.areas {
            for corner in &mut area.corners {
                corner.pos.x *= width_ratio;
                corner.pos.y *= height_ratio;
            }
        }
        true
    }

    /// Drop all areas and start over with a single full-canvas area.
    pub fn reset(&mut self) {
        self.areas = vec![Area::spanning(self.canvas, Rgb::BLUE, 1)];
        self.active = 0;
        self.drag = Drag::Idle;
    }

    // ── Structural operations ───────────────────────────────────────────────

    /// Smallest source id ≥ 1 not used by any area.
    fn next_source_id(&self) -> u32 {
        (1..)
            .find(|id| self.areas.iter().all(|a| a.source_id != *id))
            .unwrap_or(1)
    }

    /// Append a clone of the active area (same corners and background flag)
    /// with the given color and the lowest unused source id. The clone
    /// becomes active.
    pub fn add_area(&mut self, color: Rgb) {
        let source_id = self.next_source_id();
        let clone = self.active_area().clone_as(color, source_id);
        self.areas.push(clone);
        self.active = self.areas.len() - 1;
    }

    /// Remove the active area. The last remaining area is never removed.
    pub fn remove_active(&mut self) -> bool {
        if self.areas.len() <= 1 {
            return false;
        }
        self.areas.remove(self.active);
        self.active = self.active.min(self.areas.len() - 1);
        self.drag = Drag::Idle;
        true
    }

    /// Switch the active area. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) {
        if index < self.areas.len() {
            self.active = index;
        }
    }

    /// Flip the active area's background flag, returning the new value.
    pub fn toggle_background(&mut self) -> bool {
        let area = &mut self.areas[self.active];
        area.background = !area.background;
        area.background
    }

    /// Assign the active area's source group, clamped to ≥ 1.
    pub fn set_source_id(&mut self, id: u32) {
        self.areas[self.active].source_id = id.max(1);
    }

    // ── Pointer state machine ───────────────────────────────────────────────

    /// Hit-test against the active area only.
    pub fn hit_test(&self, pos: Pos2) -> Hit {
        let area = self.active_area();
        if area.closer_to_center(pos) {
            Hit::Body
        } else {
            Hit::Corner(area.nearest_corner(pos).0)
        }
    }

    /// Feed one pointer event through the drag state machine. Returns whether
    /// any geometry changed (callers refresh the exported text on `true`; an
    /// `Up` also reports `true` when it finalizes a drag).
    pub fn dispatch(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { pos, time } => {
                let double = matches!(
                    self.last_down,
                    Some(prev) if time - prev < DOUBLE_TAP_WINDOW
                );
                self.last_down = Some(time);
                match self.hit_test(pos) {
                    Hit::Corner(role) => {
                        let mut changed = false;
                        if double {
                            self.areas[self.active].straighten_from(role);
                            changed = true;
                        }
                        self.drag = Drag::Corner(role);
                        changed
                    }
                    Hit::Body => {
                        self.drag = Drag::Area { last: pos };
                        false
                    }
                }
            }
            PointerEvent::Moved { pos } => match self.drag {
                Drag::Corner(role) => {
                    let clamped = Pos2::new(
                        pos.x.clamp(0.0, self.canvas.x),
                        pos.y.clamp(0.0, self.canvas.y),
                    );
                    self.areas[self.active].corner_mut(role).pos = clamped;
                    true
                }
                Drag::Area { last } => {
                    let delta = pos - last;
                    if self.areas[self.active].translate(delta, self.canvas) {
                        self.drag = Drag::Area { last: pos };
                        true
                    } else {
                        false
                    }
                }
                Drag::Idle => false,
            },
            PointerEvent::Up => {
                let was_dragging = self.is_dragging();
                self.drag = Drag::Idle;
                was_dragging
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
