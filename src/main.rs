mod app;
mod config;
mod error;
mod level;
mod logger;
mod plotter;
mod sensor;
mod types;
mod utils;

use crossbeam_channel::bounded;
use eframe::egui;
use log::{error, info};

use app::BubbleLevelApp;
use config::ConfigManager;
use error::AppError;

fn main() {
    logger::init_logger();
    info!("Application starting");

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = ConfigManager::load_or_default()?;
    let app_config = config.get_config().clone();

    let (sample_sender, sample_receiver) = bounded(app_config.channels.sample_channel_capacity);

    // 传感器不可用时启动失败
    let mut sensor = sensor::start(&app_config.sensor, sample_sender)?;
    sensor.register()?;

    let options = eframe::NativeOptions {
        vsync: app_config.window.vsync,
        viewport: egui::ViewportBuilder::default()
            .with_title(app_config.window.title.clone())
            .with_inner_size([app_config.window.width, app_config.window.height])
            .with_resizable(app_config.window.resizable),
        ..Default::default()
    };

    eframe::run_native(
        &app_config.window.title,
        options,
        Box::new(move |_cc| Ok(Box::new(BubbleLevelApp::new(sample_receiver, sensor, config)))),
    )?;

    // 传感器线程在 SensorHandle 析构时退出
    info!("GUI closed");
    Ok(())
}
