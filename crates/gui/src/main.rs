//! Monthcard GUI — egui drawing canvas with per-month templates and audio.

mod app;

use monthcard_core::month::Resources;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // Fail fast: every month's template image and audio clip must be
    // present before the window opens.
    let resources = match Resources::discover("assets") {
        Ok(resources) => resources,
        Err(e) => {
            log::error!("{e}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Monthcard")
                .set_description(e.to_string())
                .show();
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([540.0, 700.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Monthcard",
        options,
        Box::new(move |_cc| Ok(Box::new(app::CardApp::new(resources)))),
    )
}
