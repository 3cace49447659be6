use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::animator::{FrameOutcome, ScrollAnimator};
use crate::config::TimelineConfig;
use crate::host::{ScrollHost, SimulatedHost};
use crate::progress::scroll_progress;
use crate::scene::SceneFrame;
use crate::speed::ScrollSpeed;
use crate::theme::{load_theme, save_theme, FileThemeStore, Theme};
use crate::timeline::{CardSide, MarkerPlacement, TimelineDocument};

/// Upper bound on simulated frames, in case a page never reaches its end.
const MAX_SIMULATED_FRAMES: usize = 1_000_000;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file overriding scroll and curve tuning values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decorative scene for a progress value
    Progress {
        /// Normalized progress through the timeline (0..1)
        progress: f64,

        /// Print the full frame as JSON
        #[arg(long)]
        json: bool,
    },

    /// Auto-scroll a simulated page until it reaches the bottom
    Simulate {
        /// Scroll speed in pixels per second
        #[arg(long)]
        speed: Option<f64>,

        /// Total page height in pixels
        #[arg(long, default_value_t = 40_000.0)]
        content_height: f64,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 900.0)]
        viewport_height: f64,

        /// Frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Offset to start scrolling from
        #[arg(long, default_value_t = 0.0)]
        start_offset: f64,
    },

    /// Show how a speed would be clamped and labelled
    Speed {
        /// Requested speed in pixels per second
        value: f64,
    },

    /// Print a timeline document grouped by era
    Timeline {
        /// Timeline JSON file
        #[arg(long)]
        input: PathBuf,
    },

    /// Read or change the stored theme preference
    Theme {
        /// Preferences file
        #[arg(long, default_value = "preferences.json")]
        store: PathBuf,

        #[arg(value_enum, default_value_t = ThemeAction::Get)]
        action: ThemeAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Get,
    Dark,
    Light,
    Toggle,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TimelineConfig::load(path)?,
        None => TimelineConfig::default(),
    };

    match cli.command {
        Commands::Progress { progress, json } => print_progress(progress, json, &config),
        Commands::Simulate { speed, content_height, viewport_height, fps, start_offset } => {
            simulate(speed, content_height, viewport_height, fps, start_offset, &config)
        }
        Commands::Speed { value } => {
            let speed = ScrollSpeed::new(value, &config.auto_scroll);
            println!("{} px/s ({})", speed.get(), speed.label());
            Ok(())
        }
        Commands::Timeline { input } => print_timeline(&TimelineDocument::load(&input)?),
        Commands::Theme { store, action } => theme(store, action),
    }
}

fn print_progress(progress: f64, json: bool, config: &TimelineConfig) -> Result<()> {
    let frame = SceneFrame::compose(progress, &config.curve);
    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
        return Ok(());
    }

    println!("Progress {:.3}", frame.progress);
    for line in &frame.branches {
        println!(
            "  {:<18} opacity {:.3}  x {:>5.1}%  width {}px  ({})",
            line.name, line.state.opacity, line.x_percent, line.width_px, line.milestone
        );
    }
    if let Some(beacon) = &frame.beacon {
        println!(
            "  {:<18} opacity {:.3}  extent {:.3}{}",
            beacon.name,
            beacon.state.opacity,
            beacon.state.extent,
            if beacon.state.has_merged { "  (merged)" } else { "" }
        );
    }
    for fork in &frame.ghost_forks {
        println!("  fork {:<13} opacity {:.3}", fork.name, fork.opacity);
    }
    if frame.live_section {
        println!("  live section shimmering");
    }
    Ok(())
}

fn simulate(
    speed: Option<f64>,
    content_height: f64,
    viewport_height: f64,
    fps: f64,
    start_offset: f64,
    config: &TimelineConfig,
) -> Result<()> {
    if fps <= 0.0 || !fps.is_finite() {
        anyhow::bail!("fps must be positive, got {}", fps);
    }

    let mut host = SimulatedHost::new(content_height, viewport_height);
    host.set_offset(start_offset);
    let mut animator = ScrollAnimator::new(config.auto_scroll.clone());
    if let Some(speed) = speed {
        animator.set_speed(speed);
    }

    let frame_ms = 1000.0 / fps;
    let mut timestamp = 0.0;
    let mut frames = 0;

    animator.start(&mut host);
    println!(
        "Scrolling {:.0}px page at {} px/s ({})...",
        host.max_scroll_offset(),
        animator.speed().get(),
        animator.speed_label()
    );

    while let Some(&handle) = host.pending_frames().first() {
        if frames >= MAX_SIMULATED_FRAMES {
            log::warn!("Giving up after {} frames", frames);
            animator.stop(&mut host);
            break;
        }
        host.fire(handle);
        let outcome = animator.on_frame(&mut host, timestamp);
        frames += 1;

        if frames % (fps.round().max(1.0) as usize) == 0 {
            log::info!(
                "t={:.1}s offset={:.0} progress={:.3}",
                timestamp / 1000.0,
                host.scroll_offset(),
                scroll_progress(host.scroll_offset(), host.max_scroll_offset())
            );
        }

        match outcome {
            FrameOutcome::ReachedEnd | FrameOutcome::Stalled | FrameOutcome::Idle => break,
            FrameOutcome::Primed | FrameOutcome::Advanced(_) => {}
        }
        timestamp += frame_ms;
    }

    println!(
        "Stopped after {} frames ({:.2}s) at offset {:.0}",
        frames,
        timestamp / 1000.0,
        host.scroll_offset()
    );
    Ok(())
}

fn print_timeline(doc: &TimelineDocument) -> Result<()> {
    for section in doc.sections() {
        println!("== {} ({})", section.era.name, section.era.years);
        for entry in &section.entries {
            let node = entry.node;
            let side = match entry.card_side {
                CardSide::Left => "<",
                CardSide::Right => ">",
            };
            let marker = match entry.marker {
                MarkerPlacement::Top => "^",
                MarkerPlacement::Bottom => "v",
            };
            println!(
                "  {}{} [{}] {} - {}{}",
                side,
                marker,
                node.node_type.label(),
                node.title,
                node.formatted_date(),
                node.block_label().map(|b| format!(" {}", b)).unwrap_or_default()
            );
        }
    }

    if !doc.upcoming.is_empty() {
        println!("== Future History");
        for upgrade in &doc.upcoming {
            println!(
                "  [{}] {} - {}",
                upgrade.status.label(),
                upgrade.name,
                upgrade.expected_date
            );
        }
    }
    Ok(())
}

fn theme(path: PathBuf, action: ThemeAction) -> Result<()> {
    let mut store = FileThemeStore::new(path);
    let current = load_theme(&store);
    let next = match action {
        ThemeAction::Get => {
            println!("{}", current);
            return Ok(());
        }
        ThemeAction::Dark => Theme::Dark,
        ThemeAction::Light => Theme::Light,
        ThemeAction::Toggle => current.toggled(),
    };
    save_theme(&mut store, next)?;
    println!("{}", next);
    Ok(())
}
