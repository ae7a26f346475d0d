use super::state::{IoResult, UiMessage};
use super::*;
use crate::catalog::CatalogRecord;
use crate::controller::{DragState, NoteSaveOutcome, NoteSaveStatus};
use crate::geometry::Point;
use crate::types::{CircleKind, Pattern};
use eframe::egui;
use std::path::PathBuf;

fn raw_input(events: Vec<egui::Event>) -> egui::RawInput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;
    raw
}

/// Runs one headless frame that draws only the canvas.
fn run_canvas_frame(ctx: &egui::Context, app: &mut CircleFitApp, events: Vec<egui::Event>) {
    let _ = ctx.run(raw_input(events), |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
}

fn press(pos: egui::Pos2) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed: true,
        modifiers: egui::Modifiers::NONE,
    }
}

fn release(pos: egui::Pos2) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed: false,
        modifiers: egui::Modifiers::NONE,
    }
}

fn parent_record(diameter: f32) -> CatalogRecord {
    CatalogRecord {
        kind: CircleKind::Parent,
        type_label: "Housing".into(),
        name: "H1".into(),
        max_outer_diameter: diameter,
        shaft_diameter: None,
        note: None,
    }
}

fn child_record(name: &str, max_outer: f32, shaft: f32) -> CatalogRecord {
    CatalogRecord {
        kind: CircleKind::Child,
        type_label: "Pin".into(),
        name: name.into(),
        max_outer_diameter: max_outer,
        shaft_diameter: Some(shaft),
        note: Some(format!("{name} note")),
    }
}

/// App with a laid-out canvas, a 2.5 mm parent and two overlapping 1 mm children
/// at the canvas center.
fn app_with_two_children(ctx: &egui::Context) -> CircleFitApp {
    let mut app = CircleFitApp::default();
    run_canvas_frame(ctx, &mut app, vec![]);
    app.session.set_parent(Some(&parent_record(2.5)));
    app.session
        .add_circle(Some(&child_record("A", 1.0, 0.5)), Some(Pattern::MaxOuter))
        .expect("parent is set");
    app.session
        .add_circle(Some(&child_record("B", 1.0, 0.5)), Some(Pattern::MaxOuter))
        .expect("parent is set");
    app
}

#[test]
fn canvas_reports_its_size_to_the_session() {
    let ctx = egui::Context::default();
    let mut app = CircleFitApp::default();
    run_canvas_frame(&ctx, &mut app, vec![]);

    let (w, h) = app.session.layout().canvas_size();
    assert!((w - app.canvas_rect.width()).abs() < 0.01);
    assert!((h - app.canvas_rect.height()).abs() < 0.01);
}

#[test]
fn screen_and_canvas_coordinates_round_trip_through_the_canvas_origin() {
    let ctx = egui::Context::default();
    let mut app = CircleFitApp::default();
    run_canvas_frame(&ctx, &mut app, vec![]);

    let screen = egui::pos2(300.0, 200.0);
    let local = app.screen_to_canvas(screen);
    assert_eq!(
        local,
        Point::new(300.0 - app.canvas_rect.min.x, 200.0 - app.canvas_rect.min.y)
    );
    assert_eq!(app.canvas_to_screen(local), screen);
}

#[test]
fn dragging_a_child_moves_it_and_clears_overlap() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    assert!(app.session.layout().children()[1].flags().has_circle_overlap);

    let start = app.canvas_to_screen(app.session.layout().children()[1].position);
    // 1 mm children need 200 px between centers to stop overlapping
    let end = start + egui::vec2(0.0, 230.0);

    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    run_canvas_frame(&ctx, &mut app, vec![press(start)]);
    assert_eq!(app.session.drag_state(), DragState::Dragging(1));

    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(end)]);
    let moved = &app.session.layout().children()[1];
    assert_eq!(moved.position, app.screen_to_canvas(end));
    assert!(!moved.flags().has_circle_overlap);
    assert!(!app.session.layout().children()[0].flags().has_circle_overlap);

    run_canvas_frame(&ctx, &mut app, vec![release(end)]);
    assert_eq!(app.session.drag_state(), DragState::Idle);
}

#[test]
fn pressing_empty_canvas_changes_nothing() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    let before: Vec<Point> = app
        .session
        .layout()
        .children()
        .iter()
        .map(|c| c.position)
        .collect();

    let empty = app.canvas_rect.min + egui::vec2(20.0, 20.0);
    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(empty)]);
    run_canvas_frame(&ctx, &mut app, vec![press(empty)]);
    assert_eq!(app.session.drag_state(), DragState::Idle);

    run_canvas_frame(
        &ctx,
        &mut app,
        vec![egui::Event::PointerMoved(empty + egui::vec2(50.0, 50.0))],
    );
    run_canvas_frame(&ctx, &mut app, vec![release(empty + egui::vec2(50.0, 50.0))]);

    let after: Vec<Point> = app
        .session
        .layout()
        .children()
        .iter()
        .map(|c| c.position)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn pointer_leaving_ends_the_drag() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    let start = app.canvas_to_screen(app.session.layout().children()[0].position);

    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    run_canvas_frame(&ctx, &mut app, vec![press(start)]);
    assert_eq!(app.session.drag_state(), DragState::Dragging(1));

    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerGone]);
    assert_eq!(app.session.drag_state(), DragState::Idle);

    // Moving again without a new press must not drag anything
    let elsewhere = start + egui::vec2(40.0, 0.0);
    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(elsewhere)]);
    assert_eq!(
        app.session.layout().children()[1].position,
        app.screen_to_canvas(start)
    );
}

#[test]
fn failed_catalog_load_keeps_the_layout() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    app.catalog.loading = true;
    let layout_before = app.session.layout().clone();

    app.apply_io_result(IoResult::CatalogLoaded {
        path: PathBuf::from("missing.json"),
        result: Err("file not found".into()),
    });

    assert!(!app.catalog.loading);
    assert!(app.catalog.catalog.is_empty());
    assert_eq!(app.session.layout(), &layout_before);
    assert!(app.message.as_ref().is_some_and(|m| m.is_error));
}

#[test]
fn successful_catalog_load_resets_selection_and_remembers_path() {
    let mut app = CircleFitApp::default();
    app.selection.parent = Some(3);
    app.selection.child_type = Some("Pin".into());
    app.selection.pattern = Pattern::Shaft;

    app.apply_io_result(IoResult::CatalogLoaded {
        path: PathBuf::from("parts.json"),
        result: Ok(vec![parent_record(2.5), child_record("A", 1.0, 0.5)]),
    });

    assert_eq!(app.catalog.path, Some(PathBuf::from("parts.json")));
    assert_eq!(app.catalog.catalog.parents().count(), 1);
    assert_eq!(app.selection.parent, None);
    assert_eq!(app.selection.child_type, None);
    assert_eq!(app.selection.pattern, Pattern::Shaft);
    assert_eq!(
        app.message,
        Some(UiMessage::info("Loaded 2 rows from parts.json"))
    );
}

#[test]
fn catalog_reload_reselects_the_parent_on_the_canvas() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    app.selection.parent = None;

    app.apply_io_result(IoResult::CatalogLoaded {
        path: PathBuf::from("parts.json"),
        result: Ok(vec![
            child_record("A", 1.0, 0.5),
            parent_record(3.0),
            parent_record(2.5),
        ]),
    });
    // Rows 1 and 2 share type and name; the first match in catalog order wins
    assert_eq!(app.selection.parent, Some(1));
    assert!(app.session.layout().parent().is_some());
}

#[test]
fn catalog_without_the_current_parent_leaves_the_menu_unselected() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);

    let mut other = parent_record(4.0);
    other.name = "H2".into();
    app.apply_io_result(IoResult::CatalogLoaded {
        path: PathBuf::from("parts.json"),
        result: Ok(vec![other]),
    });
    assert_eq!(app.selection.parent, None);
}

#[test]
fn note_outcome_from_channel_updates_the_indicator() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    let request = app
        .session
        .save_note(0, "checked")
        .expect("child 0 exists");

    app.io
        .sender
        .send(IoResult::NoteSaved(NoteSaveOutcome {
            ticket: request.ticket,
            result: Ok(()),
        }))
        .expect("receiver is alive");
    app.handle_pending_io();

    let notice = app.session.note_notice().expect("a notice is shown");
    assert_eq!(notice.status, NoteSaveStatus::Saved);
    assert_eq!(app.session.layout().children()[0].note, "checked");
}

#[test]
fn saving_without_a_catalog_file_fails_immediately() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    app.sync_note_drafts();
    app.note_drafts[1] = "draft".into();

    app.save_note(1, &ctx);

    let notice = app.session.note_notice().expect("a notice is shown");
    assert!(matches!(notice.status, NoteSaveStatus::Failed(_)));
    // The note still lands on the child even if the file write cannot happen
    assert_eq!(app.session.layout().children()[1].note, "draft");
}

#[test]
fn note_drafts_follow_the_child_list() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    app.sync_note_drafts();
    assert_eq!(app.note_drafts, vec!["A note".to_string(), "B note".to_string()]);

    app.note_drafts[0] = "edited".into();
    app.session
        .add_circle(Some(&child_record("C", 0.8, 0.4)), Some(Pattern::MaxOuter))
        .expect("parent is set");
    app.sync_note_drafts();
    assert_eq!(app.note_drafts.len(), 3);
    assert_eq!(app.note_drafts[0], "edited");
    assert_eq!(app.note_drafts[2], "C note");

    app.session.remove(2);
    app.sync_note_drafts();
    assert_eq!(app.note_drafts.len(), 2);
}

#[test]
fn persisted_state_round_trip_rederives_flags() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    app.dark_mode = false;
    app.catalog.path = Some(PathBuf::from("parts.json"));

    let json = app.to_json().expect("state serializes");
    let restored = CircleFitApp::from_json(&json).expect("state deserializes");

    assert!(!restored.dark_mode);
    assert_eq!(restored.catalog.path, Some(PathBuf::from("parts.json")));
    assert_eq!(restored.session.layout().children().len(), 2);
    assert!(restored
        .session
        .layout()
        .children()
        .iter()
        .all(|c| c.flags().has_circle_overlap));
    assert_eq!(restored.note_drafts.len(), 2);
    assert_eq!(restored.session.drag_state(), DragState::Idle);
}

#[test]
fn side_panel_renders_without_catalog() {
    let ctx = egui::Context::default();
    let mut app = app_with_two_children(&ctx);
    let _ = ctx.run(raw_input(vec![]), |ctx| {
        egui::SidePanel::right("side_panel").show(ctx, |ui| {
            app.draw_side_panel(ui);
        });
    });
    assert_eq!(app.note_drafts.len(), 2);
}
