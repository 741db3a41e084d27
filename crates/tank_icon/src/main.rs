//! tank-icon - render a player's tank icon to a PNG file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use common::RenderSize;
use media::{encode_png, Canvas};
use tank_icon::{RenderRequest, RendererConfig, TankRenderer};

/// Render a player's tank icon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player identifier
    player_id: String,

    /// Icon size (small, medium, large)
    #[arg(long, default_value = "medium")]
    size: RenderSize,

    /// Draw an outline around the tank
    #[arg(long)]
    outline: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "tank.png")]
    output: PathBuf,

    /// Device pixel ratio
    #[arg(long, default_value = "1.0", value_parser = parse_pixel_ratio)]
    device_pixel_ratio: f64,

    /// Read assets from a local mirror instead of the CDN
    #[arg(long)]
    asset_dir: Option<PathBuf>,

    /// Player service proxy URL
    #[arg(long)]
    proxy_url: Option<String>,

    /// CDN base URL
    #[arg(long)]
    cdn_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_pixel_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("expected a finite ratio above zero, got {value}"))
    }
}

impl Args {
    fn config(&self) -> RendererConfig {
        let mut config = match &self.asset_dir {
            Some(dir) => RendererConfig::offline(dir),
            None => RendererConfig::new(),
        }
        .with_device_pixel_ratio(self.device_pixel_ratio);

        if let Some(url) = &self.proxy_url {
            config = config.with_proxy_url(url);
        }
        if let Some(url) = &self.cdn_url {
            config = config.with_cdn_url(url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("tank-icon v{}", tank_icon::VERSION);

    let renderer = TankRenderer::from_config(&args.config())?;
    let request = RenderRequest::new(&args.player_id, args.size).with_outline(args.outline);

    let mut surface = Canvas::new(0, 0);
    let outcome = renderer.render(&request, &mut surface).await?;

    std::fs::write(&args.output, encode_png(&surface)?)?;
    info!(
        "Rendered {} ({}x{}, {} layers) to {}",
        outcome.display_name,
        surface.width(),
        surface.height(),
        outcome.layers_drawn,
        args.output.display()
    );

    Ok(())
}
