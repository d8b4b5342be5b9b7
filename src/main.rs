use std::io::BufReader;
use std::sync::mpsc;

use color_eyre::eyre::{Result, WrapErr};
use log::info;

use axis_gate::app::{FormController, FormRunner, LoopEvent};
use axis_gate::config::{ConverterSettings, SettingsOverrides};
use axis_gate::input::console;
use axis_gate::input::Command;
use axis_gate::logging;
use axis_gate::ui::FormRenderer;

fn main() -> Result<()> {
    color_eyre::install()?;

    let overrides = SettingsOverrides::parse(std::env::args().skip(1)).wrap_err("Invalid command line")?;
    if overrides.show_help {
        println!("{}", SettingsOverrides::USAGE);
        println!();
        println!("{}", Command::HELP);
        return Ok(());
    }

    let settings = ConverterSettings::resolve(&overrides).wrap_err("Failed to load settings")?;
    logging::init(settings.log_level).wrap_err("Failed to install logger")?;
    info!(
        "Starting with delay {} ms, {:?} rounding",
        settings.delay_ms, settings.rounding
    );

    let renderer = FormRenderer::from_settings(&settings).wrap_err("Failed to prepare snapshot renderer")?;

    let (sender, events) = mpsc::channel();
    let mut controller = FormController::new(settings);
    let timer_sender = sender.clone();
    controller.on_conversion_finished(move |ticket| {
        let _ = timer_sender.send(LoopEvent::ConversionFinished { ticket });
    });

    console::spawn_reader(BufReader::new(std::io::stdin()), sender).wrap_err("Failed to start console reader")?;

    let mut runner = FormRunner::new(controller, renderer, events, std::io::stdout());
    runner.run()?;

    info!("Exiting");
    Ok(())
}
