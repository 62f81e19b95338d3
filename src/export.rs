//! Serialization of the current geometry into the coordinate table handed
//! off to the template submission flow.

use std::fmt::Write;

use crate::editor::Editor;

/// Column header of the exported table.
pub const HEADER: &str = "Area,Source,TLx,TLy,TRx,TRy,BRx,BRy,BLx,BLy,Background";

/// Render the coordinate table: the header plus one row per area. Every
/// coordinate is divided by the canvas scale and rounded, so rows are always
/// in the original image's pixel space regardless of the on-screen size.
pub fn coordinates_text(editor: &Editor) -> String {
    let scale = editor.scale();
    let mut out = String::from(HEADER);
    for (index, area) in editor.areas().iter().enumerate() {
        let _ = write!(out, "\n{},{}", index + 1, area.source_id);
        for corner in &area.corners {
            let x = (corner.pos.x / scale).round() as i64;
            let y = (corner.pos.y / scale).round() as i64;
            let _ = write!(out, ",{x},{y}");
        }
        let _ = write!(out, ",{}", if area.background { 1 } else { 0 });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, PointerEvent};
    use crate::model::Rgb;
    use egui::{pos2, Vec2};

    /// Simulate loading a 400x300 image into the given container, the way
    /// the app shell does it.
    fn editor_with_image(container: Vec2) -> Editor {
        let mut editor = Editor::new();
        editor.set_image(Vec2::new(400.0, 300.0));
        editor.fit_to(container);
        editor.reset();
        editor
    }

    #[test]
    fn one_header_plus_one_row_per_area() {
        let mut editor = editor_with_image(Vec2::new(400.0, 300.0));
        editor.add_area(Rgb::for_area(1));
        editor.add_area(Rgb::for_area(2));
        let text = coordinates_text(&editor);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        for row in &lines[1..] {
            assert_eq!(row.split(',').count(), 11);
        }
    }

    #[test]
    fn default_area_exports_image_corners() {
        let editor = editor_with_image(Vec2::new(400.0, 300.0));
        let text = coordinates_text(&editor);
        assert_eq!(
            text.lines().nth(1),
            Some("1,1,0,0,400,0,400,300,0,300,0")
        );
    }

    #[test]
    fn export_is_invariant_under_canvas_resize() {
        // Fit into a container twice the image size: scale 2, same export.
        let editor = editor_with_image(Vec2::new(800.0, 600.0));
        assert_eq!(editor.scale(), 2.0);
        let text = coordinates_text(&editor);
        assert_eq!(
            text.lines().nth(1),
            Some("1,1,0,0,400,0,400,300,0,300,0")
        );
    }

    #[test]
    fn resize_after_edits_keeps_rows_stable() {
        let mut editor = editor_with_image(Vec2::new(400.0, 300.0));
        editor.dispatch(PointerEvent::Down {
            pos: pos2(1.0, 1.0),
            time: 0.0,
        });
        editor.dispatch(PointerEvent::Moved {
            pos: pos2(100.0, 60.0),
        });
        editor.dispatch(PointerEvent::Up);
        let before = coordinates_text(&editor);

        editor.fit_to(Vec2::new(1200.0, 900.0));
        let after = coordinates_text(&editor);
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_background_flips_only_the_flag_field() {
        let mut editor = editor_with_image(Vec2::new(400.0, 300.0));
        let before = coordinates_text(&editor);
        editor.toggle_background();
        let after = coordinates_text(&editor);

        let row_before: Vec<&str> = before.lines().nth(1).unwrap().split(',').collect();
        let row_after: Vec<&str> = after.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row_before[10], "0");
        assert_eq!(row_after[10], "1");
        assert_eq!(row_before[..10], row_after[..10]);
    }

    #[test]
    fn source_column_tracks_assignment() {
        let mut editor = editor_with_image(Vec2::new(400.0, 300.0));
        editor.set_source_id(4);
        let text = coordinates_text(&editor);
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[1], "4");
    }
}
