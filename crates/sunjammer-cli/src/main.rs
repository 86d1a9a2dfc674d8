use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::{DQuat, DVec3};
use std::path::{Path, PathBuf};
use sunjammer_render::encoder::save_png;
use sunjammer_render::{EntityId, LightFlag, LightFlags, Scene, SoftwareRenderer};
use sunjammer_sim::{
    gravity_force, CraftState, MissionStatus, Steering, SunjammerConfig, Telemetry, TiltController, Vehicle,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "sunjammer")]
#[command(about = "Solar sail radiation force estimator")]
struct Cli {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate force and torque on the sail for one light pass
    Estimate {
        /// Light position as "x,y,z"
        #[arg(long, default_value = "0,0,0")]
        light: String,
        /// Craft position as "x,y,z"
        #[arg(long, default_value = "20,0,0")]
        craft: String,
        /// Sail tilt in radians
        #[arg(long, default_value = "0")]
        tilt: f64,
        /// Override the capture resolution
        #[arg(long)]
        resolution: Option<u32>,
        /// Write the captured normal buffer as PNG
        #[arg(long)]
        png: Option<PathBuf>,
        /// Print the sample as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Sweep sail tilt at a fixed distance
    Sweep {
        #[arg(short, long, default_value = "40")]
        distance: f64,
        #[arg(long, default_value = "-1.0", allow_hyphen_values = true)]
        from: f64,
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        to: f64,
        #[arg(long, default_value = "9")]
        steps: usize,
    },

    /// Show light camera framing for a range of distances
    Camera {
        #[arg(long, default_value = "1")]
        from: f64,
        #[arg(long, default_value = "240")]
        to: f64,
        #[arg(long, default_value = "8")]
        steps: usize,
    },

    /// Fly the sail around the sun under gravity and light pressure
    Fly {
        #[arg(long, default_value = "3600")]
        steps: usize,
        /// Seconds per tick
        #[arg(long, default_value = "0.016666666666666666")]
        dt: f64,
        #[arg(long, value_enum, default_value = "none")]
        steer: Steer,
        /// Print telemetry every N ticks
        #[arg(long, default_value = "60")]
        report: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Steer {
    None,
    Left,
    Right,
}

impl From<Steer> for Steering {
    fn from(steer: Steer) -> Self {
        Steering {
            left: matches!(steer, Steer::Left),
            right: matches!(steer, Steer::Right),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Estimate {
            light,
            craft,
            tilt,
            resolution,
            png,
            json,
        } => {
            if let Some(resolution) = resolution {
                config.radiation.resolution = resolution;
            }
            let light = parse_vec3(&light)?;
            let craft = parse_vec3(&craft)?;

            let (mut scene, mut vehicle) = sail_rig(&config)?;
            let mut renderer = SoftwareRenderer::new(&config.radiation);
            let state = facing_light(craft, light, DVec3::ZERO);

            vehicle.set_tilt(tilt);
            vehicle.pose_sail(&mut scene, &state);
            let sample = vehicle
                .estimator_mut()
                .estimate(&mut scene, &mut renderer, light, craft)?;
            let load = vehicle.load_for(&sample);

            if json {
                println!("{}", serde_json::to_string_pretty(&sample)?);
            } else {
                println!("Light pass ({0}x{0}):", config.radiation.resolution);
                println!("  Distance:     {:.4}", sample.distance);
                println!("  Lit texels:   {}", sample.lit_texels);
                println!("  Force:        ({:.6}, {:.6}, {:.6})", sample.force.x, sample.force.y, sample.force.z);
                println!("  Torque:       ({:.6}, {:.6}, {:.6})", sample.torque.x, sample.torque.y, sample.torque.z);
                println!(
                    "  Light vector: ({:.6}, {:.6}, {:.6})",
                    sample.light_vector.x, sample.light_vector.y, sample.light_vector.z
                );
                println!("\nCraft load:");
                println!("  Force:        ({:.6}, {:.6}, {:.6})", load.force.x, load.force.y, load.force.z);
                println!("  Torque:       ({:.6}, {:.6}, {:.6})", load.torque.x, load.torque.y, load.torque.z);
            }

            if let Some(path) = png {
                save_png(vehicle.estimator().buffer(), &path)?;
                println!("Normal buffer -> {}", path.display());
            }
        }

        Commands::Sweep {
            distance,
            from,
            to,
            steps,
        } => {
            let light = DVec3::ZERO;
            let craft = DVec3::new(distance, 0.0, 0.0);
            let (mut scene, mut vehicle) = sail_rig(&config)?;
            let mut renderer = SoftwareRenderer::new(&config.radiation);
            let state = facing_light(craft, light, DVec3::ZERO);

            println!(
                "{:>8} {:>12} {:>12} {:>12} {:>8}",
                "Tilt", "Force x", "Force y", "Torque z", "Lit"
            );
            for tilt in linspace(from, to, steps) {
                vehicle.set_tilt(tilt);
                vehicle.pose_sail(&mut scene, &state);
                let sample = vehicle
                    .estimator_mut()
                    .estimate(&mut scene, &mut renderer, light, craft)?;
                println!(
                    "{:>8.3} {:>12.6} {:>12.6} {:>12.6} {:>8}",
                    tilt, sample.force.x, sample.force.y, sample.torque.z, sample.lit_texels
                );
            }
        }

        Commands::Camera { from, to, steps } => {
            let camera = sunjammer_render::LightCamera::new(&config.radiation);
            println!("Light camera (craft diameter {}):", camera.diameter());
            println!("{:>10} {:>10} {:>10} {:>10}", "Distance", "FOV (deg)", "Near", "Far");
            for distance in linspace(from, to, steps) {
                let (near, far) = camera.clip_for_distance(distance);
                println!(
                    "{:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                    distance,
                    camera.fov_for_distance(distance).to_degrees(),
                    near,
                    far
                );
            }
        }

        Commands::Fly {
            steps,
            dt,
            steer,
            report,
        } => fly(&config, steps, dt, steer.into(), report)?,
    }

    Ok(())
}

fn fly(config: &SunjammerConfig, steps: usize, dt: f64, steering: Steering, report: usize) -> Result<()> {
    let sun = DVec3::ZERO;
    let mission = &config.mission;
    let (position, velocity) = mission.start_state(sun);
    let mut craft = facing_light(position, sun, velocity);
    let mut spin = 0.0;

    let (mut scene, mut vehicle) = sail_rig(config)?;
    let mut renderer = SoftwareRenderer::new(&config.radiation);
    let mut tilt = TiltController::new(mission.tilt_smoothing);
    let events = (report > 0).then(|| vehicle.observers_mut().channel());

    info!(steps, dt, ?steering, "flight started");

    let mut status = MissionStatus::Flying;
    for tick in 0..steps {
        vehicle.pose_sail(&mut scene, &craft);
        let load = vehicle
            .update(&mut scene, &mut renderer, sun, &craft)?
            .unwrap_or_default();
        vehicle.set_tilt(tilt.update(steering));

        let gravity = gravity_force(sun, mission.sun_mass, craft.position, mission.craft_mass);
        craft.velocity += (gravity + load.force) / mission.craft_mass * dt;
        craft.position += craft.velocity * dt;
        spin += load.torque.z * dt;
        craft.orientation = (DQuat::from_rotation_z(spin * dt) * craft.orientation).normalize();

        status = mission.status(craft.position.distance(sun));
        if let Some((_, rx)) = events.as_ref().filter(|_| tick % report == 0) {
            if let Some(event) = rx.try_iter().last() {
                let readout = Telemetry::from_event(&event);
                println!(
                    "t={:>7.2} r={:>8.3} v={:>6.3} force={:>5.2}{} heading={:>6.1}° light={:>4.2}",
                    tick as f64 * dt,
                    craft.position.distance(sun),
                    craft.velocity.length(),
                    readout.force.level,
                    if readout.overloaded() { "!" } else { " " },
                    readout.force.heading.to_degrees(),
                    readout.light.level
                );
            }
        }
        if status.is_over() {
            break;
        }
    }

    if let Some((handle, _)) = events {
        vehicle.observers_mut().unsubscribe(handle);
    }

    match status {
        MissionStatus::Flying => println!("Still flying at r={:.3}", craft.position.distance(sun)),
        MissionStatus::SunDeath | MissionStatus::Incinerated => {
            println!("The sun may be your source of power, but you got too close.")
        }
        MissionStatus::LostInInterstellarSpace => {
            println!("You entered interstellar space and were never seen again.")
        }
    }
    Ok(())
}

/// Scene holding the sail, a debug plane hidden from the light, and the sun
fn sail_rig(config: &SunjammerConfig) -> Result<(Scene, Vehicle)> {
    let mut scene = Scene::new();
    let sail: EntityId = scene.add("SAIL", LightFlag::PartOfCraft.into(), None);
    scene.add("DEBUGPLANE", LightFlag::ExcludeFromLight.into(), None);
    scene.add("SUN", LightFlags::NONE, None);

    let mut vehicle = Vehicle::new(config.radiation.clone(), config.vehicle.clone())
        .context("invalid radiation settings")?;
    vehicle.attach_sail(sail);
    Ok((scene, vehicle))
}

/// Craft whose local +Z points at the light; sail tilt then turns about world z
fn facing_light(position: DVec3, light: DVec3, velocity: DVec3) -> CraftState {
    let orientation = (light - position)
        .try_normalize()
        .map(|dir| DQuat::from_rotation_arc(DVec3::Z, dir))
        .unwrap_or(DQuat::IDENTITY);
    CraftState {
        position,
        orientation,
        velocity,
    }
}

fn load_config(path: Option<&Path>) -> Result<SunjammerConfig> {
    let Some(path) = path else {
        return Ok(SunjammerConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: SunjammerConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.radiation.validate()?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn parse_vec3(text: &str) -> Result<DVec3> {
    let coords: Vec<f64> = text
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("bad position {text:?}"))?;

    if coords.len() != 3 {
        anyhow::bail!("Position must be x,y,z");
    }
    Ok(DVec3::new(coords[0], coords[1], coords[2]))
}

fn linspace(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        n => (0..n)
            .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
