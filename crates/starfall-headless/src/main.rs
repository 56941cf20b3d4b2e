//! Headless driver for the Starfall core.
//!
//! Runs a session without a window, optionally steering the hero with a
//! simple autopilot, and prints the final HUD as JSON.
//!
//! Usage:
//!   starfall-headless --seed 7 --ticks 1200 --autopilot
//!   starfall-headless --config game.json --frame-every 50
//!   RUST_LOG=starfall_core=debug starfall-headless --autopilot

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use starfall_core::present::{AssetCatalog, Hud, Renderer, Sprite};
use starfall_core::{Direction, Entity, EntityTag, GameConfig, Outcome, Session, Signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starfall-headless")]
#[command(about = "Run a Starfall session without a window")]
struct Cli {
    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Number of driver ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that must contain every sprite image
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Track the nearest enemy and fire whenever possible
    #[arg(long)]
    autopilot: bool,

    /// Print a text frame every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    frame_every: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut session = match &cli.assets {
        Some(root) => Session::new(config, &AssetDir { root: root.clone() }),
        None => Session::new(config, &Headless),
    }
    .context("Failed to start session")?;

    for tick in 1..=cli.ticks {
        if cli.autopilot {
            steer(&mut session);
        }
        session.tick_once();

        if cli.frame_every > 0 && tick % cli.frame_every == 0 {
            let mut frame = TextFrame::default();
            session.render(&mut frame);
            println!("--- tick {tick} ---\n{}", frame.text);
        }
        if !session.is_running() {
            info!(tick, "session ended");
            break;
        }
    }

    let hud = session.hud();
    println!(
        "{}",
        serde_json::to_string_pretty(&hud).context("Failed to encode HUD")?
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    GameConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Moves the hero under the nearest live hostile and keeps firing.
fn steer(session: &mut Session) {
    let state = session.state();
    let Some(hero) = state.arena().get(state.hero_id()) else {
        return;
    };
    let hero_rect = hero.rect();
    let hero_x = (hero_rect.left + hero_rect.right) / 2.0;

    let target = state
        .arena()
        .entities_sorted()
        .filter(|e| e.is_hostile() && !e.is_dead())
        .map(|e| {
            let rect = e.rect();
            (rect.left + rect.right) / 2.0
        })
        .min_by(|a, b| (a - hero_x).abs().total_cmp(&(b - hero_x).abs()));

    let direction = match target {
        Some(x) if x < hero_x - 4.0 => Direction::LEFT,
        Some(x) if x > hero_x + 4.0 => Direction::RIGHT,
        _ => Direction::empty(),
    };
    let meteor_ready = state.charge() >= state.config().charge_max;

    session.set_directions(direction);
    session.signal(Signal::Fire);
    if meteor_ready {
        session.signal(Signal::Meteor);
    }
}

/// Catalog for runs without any images.
struct Headless;

impl AssetCatalog for Headless {
    fn has_sprite(&self, _: Sprite) -> bool {
        true
    }
}

/// Catalog backed by image files on disk.
struct AssetDir {
    root: PathBuf,
}

impl AssetCatalog for AssetDir {
    fn has_sprite(&self, sprite: Sprite) -> bool {
        self.root.join(sprite.file_name()).is_file()
    }
}

/// Renders a frame as plain text, one line per entity.
#[derive(Default)]
struct TextFrame {
    text: String,
}

impl Renderer for TextFrame {
    fn draw_entity(&mut self, entity: &Entity, sprite: Sprite) {
        let pos = entity.position();
        let mut line = format!(
            "{:>6} {:<10} ({:>7.1}, {:>7.1})",
            entity.id().as_u64(),
            entity.tag().to_string(),
            pos.x,
            pos.y
        );
        if entity.tag() == EntityTag::Hero && entity.as_hero().is_some_and(|h| h.shielded) {
            line.push_str(" [shield]");
        }
        let _ = writeln!(self.text, "{line} {}", sprite.file_name());
    }

    fn draw_hud(&mut self, hud: &Hud) {
        let _ = writeln!(
            self.text,
            "points {} | life {} | stage {}/{} | charge {:.0}%",
            hud.points,
            hud.life,
            hud.stage,
            hud.total_stages,
            hud.charge * 100.0
        );
    }

    fn draw_end_screen(&mut self, outcome: Outcome) {
        let banner = match outcome {
            Outcome::Win => "Victory! Press Enter to play again",
            Outcome::Loss => "You died! Press Enter to restart",
        };
        let _ = writeln!(self.text, "{banner}");
    }
}
