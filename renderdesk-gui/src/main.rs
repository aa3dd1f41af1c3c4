//! Renderdesk GUI Application
//!
//! Draws an artboard and exports it through the preference-backed export
//! dialogs from `renderdesk-core`.

mod app;
mod renderer;
mod strings;
mod ui;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("renderdesk=debug".parse().expect("valid directive"))
                .add_directive("renderdesk_core=debug".parse().expect("valid directive"))
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Renderdesk v{}", renderdesk_core::VERSION);

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let _guard = runtime.enter();

    // Window configuration
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Renderdesk"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Renderdesk",
        options,
        Box::new(|cc| Ok(Box::new(app::RenderdeskApp::new(cc, runtime)?))),
    )
}
