#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod host;
mod speed;
mod surface;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use model::{PlaybackConfig, Session, TransportState};
use route::{Duration, LatLon, Route, Timestamp};

pub use self::host::VirtualDisplay;
pub use self::speed::SpeedSetting;
pub use self::surface::LogSurface;

#[derive(StructOpt)]
#[structopt(name = "vehicle_replay", about = "Replays a vehicle along timestamped waypoints")]
struct Args {
    /// The path to a JSON or CSV file of timestamped waypoints
    #[structopt(long)]
    route: Option<String>,
    /// The path to a saved directions response with GeoJSON geometry
    #[structopt(long)]
    directions: Option<String>,
    /// When the directions route starts. Defaults to now.
    #[structopt(long)]
    start: Option<String>,
    /// How long the directions route takes, in minutes. Defaults to the service's estimate.
    #[structopt(long)]
    duration_minutes: Option<f64>,
    /// The path to a JSON config file
    #[structopt(long)]
    config: Option<String>,
    /// realtime, fast, faster, or fastest
    #[structopt(long)]
    speed: Option<SpeedSetting>,
    /// Minimum distance between recorded trace points, in kilometers
    #[structopt(long)]
    trace_threshold_km: Option<f64>,
    /// Pause after this many frames, then resume
    #[structopt(long)]
    pause_after: Option<usize>,
    /// After reaching the end, restart this many more times
    #[structopt(long, default_value = "0")]
    replays: usize,
    /// Write the traveled trace as GeoJSON here
    #[structopt(long)]
    export_trace: Option<String>,
    /// If the route can't be loaded, replay a short straight line instead
    #[structopt(long)]
    fallback: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub playback: PlaybackConfig,
    /// How often the virtual display refreshes
    pub frame_interval_ms: f64,
    pub speed: SpeedSetting,
    /// Log the control panel every this many frames
    pub report_every: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            frame_interval_ms: 1000.0 / 60.0,
            speed: SpeedSetting::Realtime,
            report_every: 600,
        }
    }
}

impl HostConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs_err::read_to_string(path)?;
        let config = serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
        Ok(config)
    }
}

impl Args {
    fn config(&self) -> Result<HostConfig> {
        let mut config = match self.config {
            Some(ref path) => HostConfig::load(path)?,
            None => HostConfig::default(),
        };
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(threshold) = self.trace_threshold_km {
            config.playback.trace_threshold_km = threshold;
        }
        if config.frame_interval_ms <= 0.0 {
            bail!(
                "frame_interval_ms must be positive, not {}",
                config.frame_interval_ms
            );
        }
        Ok(config)
    }

    fn load_route(&self) -> Result<Route> {
        match (&self.route, &self.directions) {
            (Some(_), Some(_)) => bail!("You can't specify both --route and --directions"),
            (Some(path), None) => load_route_file(path),
            (None, Some(path)) => {
                let start = match self.start {
                    Some(ref raw) => Timestamp::parse(raw)?,
                    None => Timestamp::from_datetime(Utc::now()),
                };
                let total = self.duration_minutes.map(Duration::minutes);
                route::load_directions(fs_err::File::open(path)?, start, total)
            }
            (None, None) => bail!("No input specified; pass --route or --directions"),
        }
    }
}

/// Picks the format from the file extension
pub fn load_route_file(path: &str) -> Result<Route> {
    let file = fs_err::File::open(path)?;
    if path.ends_with(".csv") {
        route::load_csv(file)
    } else {
        route::load_json(file)
    }
}

/// A straight five-minute trip, used when the real route can't be loaded
pub fn fallback_route() -> Route {
    Route::synthetic(
        LatLon::new(-23.5505, -46.6333),
        LatLon::new(-23.5614, -46.6559),
        Timestamp::from_datetime(Utc::now()),
        Duration::minutes(5.0),
    )
}

/// Plays the whole route, optionally pausing once partway and restarting at the end.
pub fn replay(
    route: Route,
    config: &HostConfig,
    pause_after: Option<usize>,
    replays: usize,
) -> LogSurface {
    let mut surface = LogSurface::new(config.report_every);
    let mut display = VirtualDisplay::new(config.frame_interval_ms, config.speed);
    let mut session = Session::new(route, &config.playback, &mut surface);
    info!("Playing at {}", config.speed);

    for run in 0..=replays {
        if run > 0 {
            info!("Replay {run} of {replays}");
        }
        session.toggle(&mut surface, &mut display);

        if let Some(frames) = pause_after {
            display.run(&mut session, &mut surface, Some(frames));
            if session.state() == TransportState::Running {
                session.toggle(&mut surface, &mut display);
                session.toggle(&mut surface, &mut display);
            }
        }
        display.run(&mut session, &mut surface, None);
    }
    info!(
        "Rendered {} frames; trace has {} points",
        session.frames(),
        session.trace().len()
    );
    surface
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::from_args();
    let config = args.config()?;
    let route = match args.load_route() {
        Ok(route) => route,
        Err(err) if args.fallback => {
            warn!("Couldn't load the route ({err:#}), using a synthetic one instead");
            fallback_route()
        }
        Err(err) => return Err(err),
    };

    let surface = replay(route, &config, args.pause_after, args.replays);
    if let Some(ref path) = args.export_trace {
        surface.export_trace(path)?;
    }
    Ok(())
}
