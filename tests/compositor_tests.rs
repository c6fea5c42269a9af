// Compositor integration tests
// Drive a display context end to end through the headless window system

mod common;

use common::*;
use hypseus_video::display::{DisplayOptions, HeadlessWindowSystem};
use hypseus_video::render::Color;
use hypseus_video::video::{DisplayContext, LineOutcome, PresentPhase, YuvError};
use hypseus_video::VideoError;
use std::fs;
use std::thread;

#[test]
fn test_yuv_uploaded_once_per_decoded_frame() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.setup_yuv(VIDEO_WIDTH, VIDEO_HEIGHT).unwrap();
    feed_color_bars(&context, 0);

    let report = context.present_frame().unwrap();
    assert!(report.yuv_uploaded);
    assert!(context.yuv_ready());
    assert_eq!(context.renderer().unwrap().stats().yuv_uploads, 1);

    // Nothing new from the decoder: no second upload
    let report = context.present_frame().unwrap();
    assert!(!report.yuv_uploaded);
    assert_eq!(context.renderer().unwrap().stats().yuv_uploads, 1);
    assert_eq!(context.renderer().unwrap().stats().presents, 3);

    // The white bar covers the left edge of the 640x480 output
    let frame = capture(&context);
    assert_eq!((frame.width, frame.height), (640, 480));
    assert_ne!(frame.pixels[0], Color::BLACK.to_rgba8888());
}

#[test]
fn test_blank_request_produces_black_frame() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.setup_yuv(VIDEO_WIDTH, VIDEO_HEIGHT).unwrap();

    context.request_blank();
    feed_color_bars(&context, 0);

    let buffer = context.yuv_buffer();
    let blank = buffer
        .with_frame(|f| {
            f.y_plane().iter().all(|&y| y == 0x10)
                && f.u_plane().iter().all(|&u| u == 0x80)
                && f.v_plane().iter().all(|&v| v == 0x80)
        })
        .unwrap();
    assert!(blank);
    assert!(!buffer.blank_requested());

    context.present_frame().unwrap();
    let frame = capture(&context);
    assert!(frame.pixels.iter().all(|&p| p == Color::BLACK.to_rgba8888()));

    // The request is consumed: the next frame is copied again
    feed_color_bars(&context, 0);
    context.present_frame().unwrap();
    assert_ne!(capture(&context).pixels[0], Color::BLACK.to_rgba8888());
}

#[test]
fn test_resolution_change_replaces_texture() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.setup_yuv(VIDEO_WIDTH, VIDEO_HEIGHT).unwrap();
    feed_color_bars(&context, 0);
    context.present_frame().unwrap();

    context.setup_yuv(352, 240).unwrap();
    assert_eq!((context.yuv_width(), context.yuv_height()), (352, 240));

    // Old texture is dropped even before new data arrives
    context.present_frame().unwrap();
    assert!(!context.yuv_ready());
    let stats = context.renderer().unwrap().stats();
    assert_eq!(stats.textures_destroyed, 1);

    let y = vec![0xEB; 352 * 240];
    let c = vec![0x80; 352 * 240 / 4];
    context.update_yuv(&y, &c, &c, 352, 176, 176).unwrap();
    context.present_frame().unwrap();
    assert!(context.yuv_ready());
    assert_eq!(context.renderer().unwrap().stats().textures_created, 2);
}

#[test]
fn test_short_plane_rejected() {
    let context = open_context(DisplayOptions::new(), (0, 0));
    context.setup_yuv(16, 16).unwrap();

    let y = vec![0; 16 * 16];
    let short = vec![0; 10];
    let err = context.update_yuv(&y, &short, &short, 16, 8, 8).unwrap_err();
    assert_eq!(
        err,
        YuvError::PlaneTooSmall {
            plane: 'U',
            needed: 64,
            actual: 10
        }
    );
}

#[test]
fn test_decoder_thread_feeds_presenter() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.setup_yuv(VIDEO_WIDTH, VIDEO_HEIGHT).unwrap();

    let buffer = context.yuv_buffer();
    let decoder = thread::spawn(move || {
        for offset in 0..5 {
            let frame =
                hypseus_video::video::TestFrame::color_bars(VIDEO_WIDTH, VIDEO_HEIGHT, offset);
            let (yp, up, vp) = frame.pitches();
            buffer.update(&frame.y, &frame.u, &frame.v, yp, up, vp).unwrap();
        }
    });
    decoder.join().unwrap();

    // Five decoded frames collapse into one upload
    let report = context.present_frame().unwrap();
    assert!(report.yuv_uploaded);
    assert_eq!(context.renderer().unwrap().stats().yuv_uploads, 1);
}

#[test]
fn test_screenshot_numbering_fills_next_slot() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=3 {
        fs::write(dir.path().join(format!("hypseus-{}.png", n)), b"").unwrap();
    }

    let mut context = open_context(options_with_screenshots(dir.path()), (0, 0));
    context.queue_screenshot();
    let report = context.present_frame().unwrap();

    let expected = dir.path().join("hypseus-4.png");
    assert_eq!(report.screenshot, Some(expected.clone()));
    assert!(expected.exists());
    assert!(!context.screenshot_queued());
}

#[test]
fn test_screenshot_refused_in_fullscreen() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_with_screenshots(dir.path());
    options.fullscreen = true;

    let mut context = open_context(options, (0, 0));
    context.queue_screenshot();
    let report = context.present_frame().unwrap();

    assert_eq!(report.screenshot, None);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_screenshot_refused_when_maximised() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_with_screenshots(dir.path());
    options.fake_fullscreen = true;

    let mut context = open_context(options, (0, 0));
    assert_eq!(context.take_screenshot().unwrap(), None);
}

#[test]
fn test_led_digits_idempotent() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.set_assets(led_assets());

    context.draw_led_digits(&[1, 8, 3], 16, 16);
    let once = context.leds().surface().clone();
    context.draw_led_digits(&[1, 8, 3], 16, 16);
    assert_eq!(context.leds().surface(), &once);

    // Redrawing a different digit leaves nothing of the old one
    context.draw_led_digits(&[0, 8, 3], 16, 16);
    let expected = Color::grey(15).to_rgba8888();
    assert_eq!(context.leds().surface().pixel(16, 20), Some(expected));
    // Color-keyed top row stays transparent
    assert_eq!(context.leds().surface().pixel(16, 16), Some(0));
}

#[test]
fn test_led_digits_reach_the_screen() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));
    context.set_assets(led_assets());
    context.draw_led_digits(&[15], 0, 0);

    let report = context.present_frame().unwrap();
    assert!(report.led_uploaded);

    // 320x240 LED region scaled 2x onto 640x480
    let frame = capture(&context);
    assert_eq!(frame.pixels[(4 * 640 + 4) as usize], Color::grey(255).to_rgba8888());
    assert_eq!(frame.pixels[(100 * 640 + 100) as usize], Color::BLACK.to_rgba8888());
}

#[test]
fn test_open_failure_is_fatal() {
    let mut system = HeadlessWindowSystem::new().without_windows();
    let mut context = DisplayContext::new(DisplayOptions::new(), 320, 240);

    let err = context.open(&mut system).unwrap_err();
    assert!(matches!(err, VideoError::Display(_)));
    assert!(!context.is_open());
    assert!(matches!(context.present_frame(), Err(VideoError::NotOpen)));
}

#[test]
fn test_overlay_texture_failure_is_fatal() {
    let mut system = HeadlessWindowSystem::new();
    // Wider than any texture the renderer can create
    let mut context = DisplayContext::new(DisplayOptions::new(), 9000, 1);

    assert!(matches!(
        context.open(&mut system),
        Err(VideoError::Texture { what: "overlay", .. })
    ));
    assert!(!context.is_open());
}

#[test]
fn test_scoreboard_window_opens_beside_primary() {
    let mut system = HeadlessWindowSystem::new();
    let mut options = DisplayOptions::new();
    options.software_scoreboard = true;

    let mut context = DisplayContext::new(options, 0, 0);
    context.open(&mut system).unwrap();
    assert!(context.scoreboard().is_some());
    assert_eq!(system.requests()[1].position, Some((4, 28)));

    context.present_frame().unwrap();
    assert_eq!(context.scoreboard().unwrap().renderer().stats().presents, 1);
}

#[test]
fn test_fullscreen_toggle_failure_keeps_window() {
    let mut system = HeadlessWindowSystem::new().without_fullscreen();
    let mut context = DisplayContext::new(DisplayOptions::new(), 0, 0);
    context.open(&mut system).unwrap();

    context.toggle_fullscreen();
    assert!(!context.options().fullscreen);
    assert!(context.is_open());
    assert!(context.present_frame().is_ok());
}

#[test]
fn test_reopen_reuploads_current_frame() {
    let mut system = HeadlessWindowSystem::new();
    let mut context = DisplayContext::new(DisplayOptions::new(), 0, 0);
    context.open(&mut system).unwrap();
    context.setup_yuv(VIDEO_WIDTH, VIDEO_HEIGHT).unwrap();
    feed_color_bars(&context, 0);
    context.present_frame().unwrap();

    context.options_mut().set_scale_factor(50);
    context.reconfigure(&mut system).unwrap();
    assert_eq!((context.draw_width(), context.draw_height()), (320, 240));

    let report = context.present_frame().unwrap();
    assert!(report.yuv_uploaded);
    assert_ne!(capture(&context).pixels[0], Color::BLACK.to_rgba8888());
}

#[test]
fn test_vendor_text_reset_needs_two_blank_lines() {
    let mut context = open_context(DisplayOptions::new(), (0, 0));

    assert_eq!(
        context.draw_vendor_text_line(b"1UP", 32, 69),
        Some(LineOutcome::Stored(0))
    );
    assert_eq!(
        context.draw_vendor_text_line(b"", 0, 69),
        Some(LineOutcome::ResetPending)
    );
    assert!(context.vendor_text().enabled());
    assert_eq!(
        context.draw_vendor_text_line(b"           ", 0, 69),
        Some(LineOutcome::Reset)
    );
    assert!(!context.vendor_text().enabled());
    assert_eq!(context.vendor_text().visible_rows().count(), 0);

    context.present_frame().unwrap();
    assert!(capture(&context)
        .pixels
        .iter()
        .all(|&p| p == Color::BLACK.to_rgba8888()));
}

#[test]
fn test_shutdown_is_terminal() {
    let mut context = open_context(DisplayOptions::new(), (320, 240));
    context.present_frame().unwrap();
    context.shutdown();
    assert_eq!(context.phase(), PresentPhase::Shutdown);
    assert!(matches!(context.present_frame(), Err(VideoError::NotOpen)));
}
