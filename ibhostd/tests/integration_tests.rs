//! Integration tests for the ibhostd host runtime

use hal::Framebuffer;
use ibhostd::{
    DemoEngine, EngineHost, HostMode, HostRuntime, HostRuntimeConfig, PresentationEngine,
};
use input_types::{button_for, ActionCode, InputRegister};
use services_input::Admission;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn carousel(title: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("title.txt"), title).unwrap();
    dir
}

fn runtime_at(root: &Path, script: Option<&str>) -> HostRuntime<DemoEngine> {
    let mut config = HostRuntimeConfig {
        mode: HostMode::Sim,
        script: script.map(str::to_string),
        ..Default::default()
    };
    config.host.content_root = root.to_path_buf();
    HostRuntime::new(config, DemoEngine::new()).unwrap()
}

fn press(runtime: &mut HostRuntime<DemoEngine>, action: ActionCode) -> Admission {
    let admission = runtime.submit(button_for(action).unwrap());
    runtime.advance(5);
    admission
}

#[test]
fn test_demo_engine_loads_startup_content() {
    let dir = carousel("Ocean Channel\nNews\nWeather\nSport\n");
    let mut runtime = runtime_at(dir.path(), Some("wait 20ms"));

    runtime.run().unwrap();

    assert!(runtime.engine().is_running());
    assert_eq!(runtime.engine().title(), "Ocean Channel");
    assert_eq!(runtime.context().input_register(), InputRegister::ALL);
    assert!(runtime.pump().state().is_stopped());
    assert_eq!(runtime.frames_presented(), 1);
}

#[test]
fn test_startup_retries_until_content_arrives() {
    let dir = tempdir().unwrap();
    let mut runtime = runtime_at(dir.path(), None);

    runtime.boot();
    runtime.advance(600);
    assert!(!runtime.engine().is_running());
    assert!(!runtime.pump().state().is_stopped());

    fs::write(dir.path().join("title.txt"), "Late Arrival\n").unwrap();
    runtime.advance(300);

    assert!(runtime.engine().is_running());
    assert_eq!(runtime.engine().title(), "Late Arrival");
}

#[test]
fn test_missing_root_reports_failure_and_stops() {
    let dir = tempdir().unwrap();
    let mut runtime = runtime_at(&dir.path().join("absent"), Some("wait 20ms"));

    runtime.run().unwrap();

    assert!(!runtime.engine().is_running());
    assert!(runtime.engine().print_state().contains("Failed"));
    assert!(runtime.pump().state().is_stopped());
    assert_eq!(runtime.frames_presented(), 1);
}

#[test]
fn test_scripted_navigation_and_digits() {
    let dir = carousel("Menu\nOne\nTwo\nThree\n");
    let script = "wait 20ms\npress down\nwait 5ms\npress 4\nwait 5ms\npress 2\nwait 5ms";
    let mut runtime = runtime_at(dir.path(), Some(script));

    runtime.run().unwrap();

    assert_eq!(runtime.engine().cursor(), 1);
    assert_eq!(runtime.engine().entry(), "42");
}

#[test]
fn test_numeric_register_admits_digits_and_navigation() {
    let dir = carousel("Menu\nOne\nTwo\n");
    let mut runtime = runtime_at(dir.path(), None);
    runtime.boot();
    runtime.advance(20);

    press(&mut runtime, ActionCode::Green);
    assert_eq!(runtime.context().input_register(), InputRegister::NUMERIC);

    assert!(press(&mut runtime, ActionCode::Digit1).is_queued());
    assert!(press(&mut runtime, ActionCode::Down).is_queued());
    assert_eq!(
        press(&mut runtime, ActionCode::Text),
        Admission::Rejected(ActionCode::Text)
    );

    assert_eq!(runtime.engine().entry(), "1");
    assert_eq!(runtime.engine().cursor(), 1);
    assert_eq!(runtime.pump().state().input().rejected_count(), 1);
}

#[test]
fn test_legacy_gate_blocks_numeric_register() {
    let dir = carousel("Menu\nOne\nTwo\n");
    let mut config = HostRuntimeConfig::default();
    config.host.content_root = dir.path().to_path_buf();
    config.host.input.legacy_register5_gate = true;
    let mut runtime = HostRuntime::new(config, DemoEngine::new()).unwrap();
    runtime.boot();
    runtime.advance(20);

    press(&mut runtime, ActionCode::Green);
    assert_eq!(runtime.context().input_register(), InputRegister::NUMERIC);

    assert!(!press(&mut runtime, ActionCode::Digit1).is_queued());
    assert!(!press(&mut runtime, ActionCode::Down).is_queued());
    assert_eq!(runtime.engine().entry(), "");
    assert_eq!(runtime.engine().cursor(), 0);
}

#[test]
fn test_redraw_is_deterministic() {
    let dir = carousel("Same\nA\nB\n");
    let script = "wait 20ms\npress down\nwait 5ms\npress select\nwait 5ms";

    let mut first = runtime_at(dir.path(), Some(script));
    first.run().unwrap();
    let mut second = runtime_at(dir.path(), Some(script));
    second.run().unwrap();

    assert!(first.last_checksum().is_some());
    assert_eq!(first.last_checksum(), second.last_checksum());
}

#[test]
fn test_moving_panel_back_restores_frame() {
    let dir = carousel("Panel\nA\nB\n");
    let mut runtime = runtime_at(dir.path(), None);
    runtime.boot();
    runtime.advance(20);
    let loaded = runtime.last_checksum();

    press(&mut runtime, ActionCode::Left);
    assert_ne!(runtime.last_checksum(), loaded);
    press(&mut runtime, ActionCode::Right);

    assert_eq!(runtime.last_checksum(), loaded);
}

#[test]
fn test_root_command_reboots_into_new_content() {
    let first = carousel("First\n");
    let second = carousel("Second\n");
    let script = format!(
        "wait 20ms\npress 9\nwait 5ms\nroot {}\nwait 20ms",
        second.path().display()
    );
    let mut runtime = runtime_at(first.path(), Some(&script));

    runtime.run().unwrap();

    assert_eq!(runtime.engine().title(), "Second");
    assert_eq!(runtime.engine().entry(), "");
    assert_eq!(runtime.context().carousel().root(), second.path());
}

#[test]
fn test_reload_button_reboots_engine() {
    let dir = carousel("Reloadable\nA\n");
    let script = "wait 20ms\npress 5\nwait 5ms\nclick 120 310\nwait 20ms";
    let mut runtime = runtime_at(dir.path(), Some(script));

    runtime.run().unwrap();

    assert!(runtime.engine().is_running());
    assert_eq!(runtime.engine().entry(), "");
    assert_eq!(runtime.context().input_register(), InputRegister::ALL);
}

#[test]
fn test_unsupported_tune_is_reported_to_engine() {
    let dir = carousel("Tuner\n");
    let script = "wait 20ms\npress text\nwait 5ms";
    let mut runtime = runtime_at(dir.path(), Some(script));

    runtime.run().unwrap();

    assert!(runtime.engine().print_state().contains("Unsupported operation: tune"));
}

#[test]
fn test_video_request_recorded_not_rendered() {
    let dir = carousel("Video\n");
    let mut runtime = runtime_at(dir.path(), None);
    runtime.boot();
    runtime.advance(20);
    let before = runtime.context().compositor().framebuffer().buffer()[0..4].to_vec();

    press(&mut runtime, ActionCode::Blue);

    let video = runtime.context().video().unwrap();
    assert_eq!(video.component, "/video");
    assert_eq!(
        &runtime.context().compositor().framebuffer().buffer()[0..4],
        before.as_slice()
    );
}

#[test]
fn test_backdrop_is_tiled_behind_scene() {
    let dir = carousel("Backdrop\n");
    let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    fs::write(dir.path().join("backdrop.png"), png).unwrap();

    let mut runtime = runtime_at(dir.path(), Some("wait 20ms"));
    runtime.run().unwrap();

    let buffer = runtime.context().compositor().framebuffer().buffer();
    // Rgb32 stores blue, green, red, pad
    assert_eq!(&buffer[0..4], &[0, 0, 255, 0]);
}

#[test]
fn test_engine_reads_receiver_identity() {
    let dir = carousel("Ident\n");
    let runtime = runtime_at(dir.path(), None);

    assert_eq!(runtime.context().receiver_id(), "IBH");
    assert!(!runtime.context().engine_version().is_empty());
}
