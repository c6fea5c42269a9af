// Hypseus Video - Main Entry Point
//
// Runs the compositor with a synthetic decoder thread feeding colour bars
// and a small scoreboard animation on top.
//
// Hotkeys: F11 fullscreen, F10 scanlines, F12 screenshot, Escape quits.

use hypseus_video::display::{run_display, DisplayOptions, WindowConfig};
use hypseus_video::video::{Assets, DisplayContext, PngBitmapLoader, TestFrame};
use hypseus_video::VideoConfig;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Resolution of the synthetic video stream
const VIDEO_SIZE: (u32, u32) = (720, 480);

/// Decoder frame interval (about 30 fps)
const DECODE_INTERVAL: Duration = Duration::from_millis(33);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hypseus video compositor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = VideoConfig::load_or_default();
    let mut options = DisplayOptions::from(&config);
    options.set_detected_width(VIDEO_SIZE.0);
    options.set_detected_height(VIDEO_SIZE.1);

    let loader = PngBitmapLoader::new(&config.asset_directory);
    let assets = Assets::load(&loader, config.scoreboard_charset);

    let mut context = DisplayContext::new(options, 0, 0);
    context.set_assets(assets);
    context.setup_yuv(VIDEO_SIZE.0, VIDEO_SIZE.1)?;
    context.request_blank();

    let running = Arc::new(AtomicBool::new(true));
    let decoder = {
        let buffer = context.yuv_buffer();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut offset = 0;
            while running.load(Ordering::Relaxed) {
                let frame = TestFrame::color_bars(VIDEO_SIZE.0, VIDEO_SIZE.1, offset);
                let (yp, up, vp) = frame.pitches();
                if let Err(e) = buffer.update(&frame.y, &frame.u, &frame.v, yp, up, vp) {
                    log::warn!("Decoder: {}", e);
                }
                offset = (offset + 4) % VIDEO_SIZE.0;
                thread::sleep(DECODE_INTERVAL);
            }
        })
    };

    let mut frame: u32 = 0;
    let hook = move |context: &mut DisplayContext| {
        if frame == 0 {
            context.draw_subtitle("HYPSEUS VIDEO TEST");
            context.draw_vendor_text_line(b"PLAYER 1", 32, 69);
        }
        if frame % 30 == 0 {
            let score = frame / 30;
            let digits: Vec<u32> = format!("{:06}", score)
                .bytes()
                .map(|b| (b - b'0') as u32)
                .collect();
            context.draw_led_digits(&digits, 8, 8);
        }
        frame = frame.wrapping_add(1);
    };

    let window_config = WindowConfig::new().with_fps(config.target_fps);
    let result = run_display(context, window_config, hook);

    running.store(false, Ordering::Relaxed);
    if decoder.join().is_err() {
        log::warn!("Decoder thread panicked");
    }

    result
}
