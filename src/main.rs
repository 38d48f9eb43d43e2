use anyhow::Context;
use jetplot::{
    demo_source, draw_demo_scene, init_logging, options_from_config, surface_from_config,
    CommandRunner, Config, LoggingListener, Plotter, Step, BUILD_DATE, VERSION,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => jetplot_settings::default_config_path()?,
    };
    let output = args.next().map(PathBuf::from);

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    init_logging(&config.logging)?;
    tracing::info!("JetPlot {} (built {})", VERSION, BUILD_DATE);

    let surface = surface_from_config(&config)?;
    let mut plotter = Plotter::new(surface, demo_source(), options_from_config(&config));
    draw_demo_scene(&mut plotter).await?;

    let stream = plotter.commands();
    tracing::info!(
        "Compiled {} command(s) in {} layer(s)",
        stream.len(),
        stream.layers().len()
    );

    if let Some(output) = output {
        plotter.draw();
        plotter
            .surface()
            .save_png(&output)
            .with_context(|| format!("writing {}", output.display()))?;
        tracing::info!("Saved preview to {}", output.display());
    }

    let mut runner = CommandRunner::new(stream).with_listener(LoggingListener::new());
    runner.start();
    let mut ticker = tokio::time::interval(config.runner.step_interval());
    loop {
        ticker.tick().await;
        match runner.next() {
            Step::Executed(_) => {}
            Step::Complete | Step::Idle => break,
        }
    }

    Ok(())
}
