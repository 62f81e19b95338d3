use egui::{Pos2, Vec2};

// ── Corners ─────────────────────────────────────────────────────────────────

/// Fixed positional role of a corner within an area.
///
/// The cyclic order TL→TR→BR→BL is an invariant: corners are only ever
/// moved, never reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerRole {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CornerRole {
    /// All roles in drawing/export order.
    pub const ALL: [CornerRole; 4] = [
        CornerRole::TopLeft,
        CornerRole::TopRight,
        CornerRole::BottomRight,
        CornerRole::BottomLeft,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CornerRole::TopLeft => "TL",
            CornerRole::TopRight => "TR",
            CornerRole::BottomRight => "BR",
            CornerRole::BottomLeft => "BL",
        }
    }

    fn index(self) -> usize {
        match self {
            CornerRole::TopLeft => 0,
            CornerRole::TopRight => 1,
            CornerRole::BottomRight => 2,
            CornerRole::BottomLeft => 3,
        }
    }

    /// The corner sharing a horizontal edge (top or bottom) with this one.
    pub fn horizontal_neighbor(self) -> CornerRole {
        match self {
            CornerRole::TopLeft => CornerRole::TopRight,
            CornerRole::TopRight => CornerRole::TopLeft,
            CornerRole::BottomRight => CornerRole::BottomLeft,
            CornerRole::BottomLeft => CornerRole::BottomRight,
        }
    }

    /// The corner sharing a vertical edge (left or right) with this one.
    pub fn vertical_neighbor(self) -> CornerRole {
        match self {
            CornerRole::TopLeft => CornerRole::BottomLeft,
            CornerRole::TopRight => CornerRole::BottomRight,
            CornerRole::BottomRight => CornerRole::TopRight,
            CornerRole::BottomLeft => CornerRole::TopLeft,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> CornerRole {
        match self {
            CornerRole::TopLeft => CornerRole::BottomRight,
            CornerRole::TopRight => CornerRole::BottomLeft,
            CornerRole::BottomRight => CornerRole::TopLeft,
            CornerRole::BottomLeft => CornerRole::TopRight,
        }
    }
}

/// A single corner of an area, in canvas pixel space.
#[derive(Clone, Copy, Debug)]
pub struct Corner {
    pub role: CornerRole,
    pub pos: Pos2,
}

// ── Color ───────────────────────────────────────────────────────────────────

/// Area outline/fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fill alpha for area interiors; low enough to keep the image readable.
const FILL_ALPHA: u8 = 0x73;

impl Rgb {
    /// Default color of the first area.
    pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    /// Color assigned to the n-th created area. Steps the hue by the golden
    /// angle so consecutive areas stay visually distinct.
    pub fn for_area(n: usize) -> Rgb {
        let hue = (n as f32 * 137.508) % 360.0;
        let (r, g, b) = hsv_to_rgb(hue, 0.85, 0.95);
        Rgb {
            r: (r * 255.0) as u8,
            g: (g * 255.0) as u8,
            b: (b * 255.0) as u8,
        }
    }

    pub fn outline(self) -> egui::Color32 {
        egui::Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn fill(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, FILL_ALPHA)
    }
}

/// Convert HSV to RGB.
///
/// Hue in degrees (0-360), saturation and value in 0.0-1.0. Returns RGB in
/// 0.0-1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

// ── Area ────────────────────────────────────────────────────────────────────

/// A quadrilateral area overlaid on the image.
#[derive(Clone, Debug)]
pub struct Area {
    /// Always in TL, TR, BR, BL order.
    pub corners: [Corner; 4],
    pub color: Rgb,
    /// When set, the area composites behind the image (the image is drawn
    /// clipped to the quad); otherwise fill and outline draw on top.
    pub background: bool,
    /// Numeric source group, ≥ 1.
    pub source_id: u32,
}

impl Area {
    /// An area spanning the whole canvas.
    pub fn spanning(canvas: Vec2, color: Rgb, source_id: u32) -> Self {
        Self {
            corners: [
                Corner {
                    role: CornerRole::TopLeft,
                    pos: Pos2::ZERO,
                },
                Corner {
                    role: CornerRole::TopRight,
                    pos: Pos2::new(canvas.x, 0.0),
                },
                Corner {
                    role: CornerRole::BottomRight,
                    pos: Pos2::new(canvas.x, canvas.y),
                },
                Corner {
                    role: CornerRole::BottomLeft,
                    pos: Pos2::new(0.0, canvas.y),
                },
            ],
            color,
            background: false,
            source_id,
        }
    }

    /// Clone this area's geometry and background flag under a new color and
    /// source id.
    pub fn clone_as(&self, color: Rgb, source_id: u32) -> Self {
        Self {
            corners: self.corners,
            color,
            background: self.background,
            source_id,
        }
    }

    pub fn corner(&self, role: CornerRole) -> &Corner {
        &self.corners[role.index()]
    }

    pub fn corner_mut(&mut self, role: CornerRole) -> &mut Corner {
        &mut self.corners[role.index()]
    }

    /// Mean of the four corners.
    pub fn centroid(&self) -> Pos2 {
        let sum = self
            .corners
            .iter()
            .fold(Vec2::ZERO, |acc, c| acc + c.pos.to_vec2());
        (sum / 4.0).to_pos2()
    }

    /// The corner nearest to `p` and its distance.
    pub fn nearest_corner(&self, p: Pos2) -> (CornerRole, f32) {
        let mut best = (self.corners[0].role, f32::INFINITY);
        for c in &self.corners {
            let d = c.pos.distance(p);
            if d < best.1 {
                best = (c.role, d);
            }
        }
        best
    }

    /// Whether `p` is closer to the centroid than to any corner. Decides
    /// between a whole-area drag and a corner drag.
    pub fn closer_to_center(&self, p: Pos2) -> bool {
        let center_dist = self.centroid().distance(p);
        let (_, corner_dist) = self.nearest_corner(p);
        center_dist < corner_dist
    }

    /// Shift all corners by `delta`, but only if every shifted corner stays
    /// within `[0, canvas]`. Returns whether the move was applied.
    pub fn translate(&mut self, delta: Vec2, canvas: Vec2) -> bool {
        let moved = self.corners.map(|c| Corner {
            role: c.role,
            pos: c.pos + delta,
        });
        let in_bounds = moved
            .iter()
            .all(|c| c.pos.x >= 0.0 && c.pos.x <= canvas.x && c.pos.y >= 0.0 && c.pos.y <= canvas.y);
        if in_bounds {
            self.corners = moved;
        }
        in_bounds
    }

    /// Snap the quad to an axis-aligned rectangle anchored at `role`: the
    /// horizontal neighbor takes the anchor's y, the vertical neighbor the
    /// anchor's x, and the opposite corner becomes their intersection.
    pub fn straighten_from(&mut self, role: CornerRole) {
        let anchor = self.corner(role).pos;
        let h = role.horizontal_neighbor();
        let v = role.vertical_neighbor();
        self.corner_mut(h).pos.y = anchor.y;
        self.corner_mut(v).pos.x = anchor.x;
        let hx = self.corner(h).pos.x;
        let vy = self.corner(v).pos.y;
        let opp = self.corner_mut(role.opposite());
        opp.pos = Pos2::new(hx, vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn skewed_area() -> Area {
        let mut area = Area::spanning(Vec2::new(100.0, 100.0), Rgb::BLUE, 1);
        area.corner_mut(CornerRole::TopLeft).pos = pos2(10.0, 5.0);
        area.corner_mut(CornerRole::TopRight).pos = pos2(90.0, 12.0);
        area.corner_mut(CornerRole::BottomRight).pos = pos2(85.0, 95.0);
        area.corner_mut(CornerRole::BottomLeft).pos = pos2(3.0, 80.0);
        area
    }

    #[test]
    fn centroid_is_corner_mean() {
        let area = Area::spanning(Vec2::new(100.0, 60.0), Rgb::BLUE, 1);
        assert_eq!(area.centroid(), pos2(50.0, 30.0));
    }

    #[test]
    fn nearest_corner_picks_closest() {
        let area = Area::spanning(Vec2::new(100.0, 100.0), Rgb::BLUE, 1);
        let (role, dist) = area.nearest_corner(pos2(95.0, 8.0));
        assert_eq!(role, CornerRole::TopRight);
        assert!((dist - (25.0f32 + 64.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn center_beats_corners_in_the_middle() {
        let area = Area::spanning(Vec2::new(100.0, 100.0), Rgb::BLUE, 1);
        assert!(area.closer_to_center(pos2(55.0, 48.0)));
        assert!(!area.closer_to_center(pos2(5.0, 5.0)));
    }

    #[test]
    fn translate_rejects_out_of_bounds() {
        let canvas = Vec2::new(100.0, 100.0);
        let mut area = Area::spanning(canvas, Rgb::BLUE, 1);
        let before = area.corners;
        assert!(!area.translate(Vec2::new(1.0, 0.0), canvas));
        for (a, b) in area.corners.iter().zip(before.iter()) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn translate_moves_all_corners() {
        let canvas = Vec2::new(100.0, 100.0);
        let mut area = Area::spanning(canvas, Rgb::BLUE, 1);
        // Shrink so there is room to move.
        for c in &mut area.corners {
            c.pos = pos2(c.pos.x * 0.5 + 10.0, c.pos.y * 0.5 + 10.0);
        }
        assert!(area.translate(Vec2::new(5.0, -3.0), canvas));
        assert_eq!(area.corner(CornerRole::TopLeft).pos, pos2(15.0, 7.0));
        assert_eq!(area.corner(CornerRole::BottomRight).pos, pos2(65.0, 57.0));
    }

    #[test]
    fn straighten_anchors_each_corner() {
        for role in CornerRole::ALL {
            let mut area = skewed_area();
            let anchor = area.corner(role).pos;
            area.straighten_from(role);

            // Anchor untouched.
            assert_eq!(area.corner(role).pos, anchor);
            // Edges adjacent to the anchor are axis-aligned.
            let h = area.corner(role.horizontal_neighbor()).pos;
            let v = area.corner(role.vertical_neighbor()).pos;
            assert_eq!(h.y, anchor.y);
            assert_eq!(v.x, anchor.x);
            // Opposite corner sits at the intersection.
            assert_eq!(area.corner(role.opposite()).pos, Pos2::new(h.x, v.y));
        }
    }

    #[test]
    fn corner_roles_survive_straighten() {
        let mut area = skewed_area();
        area.straighten_from(CornerRole::BottomLeft);
        for (c, role) in area.corners.iter().zip(CornerRole::ALL) {
            assert_eq!(c.role, role);
        }
    }

    #[test]
    fn hsv_primaries() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01 && g < 0.01 && b < 0.01);
        let (r, g, b) = hsv_to_rgb(120.0, 1.0, 1.0);
        assert!(r < 0.01 && (g - 1.0).abs() < 0.01 && b < 0.01);
        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert!(r < 0.01 && g < 0.01 && (b - 1.0).abs() < 0.01);
    }

    #[test]
    fn generated_colors_differ() {
        assert_ne!(Rgb::for_area(1), Rgb::for_area(2));
        assert_ne!(Rgb::for_area(2), Rgb::for_area(3));
    }
}
