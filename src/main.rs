#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Whiteboard"),
        ..Default::default()
    };
    eframe::run_native(
        "whiteboard",
        native_options,
        Box::new(|cc| Ok(Box::new(whiteboard::WhiteboardApp::new(cc)))),
    )
}

// The web build is bootstrapped by its own loader; nothing to do here.
#[cfg(target_arch = "wasm32")]
fn main() {}
