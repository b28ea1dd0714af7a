use clap::Parser;
use ridgeline::{Peak, ScreenSize, SightingConfig, SightingSystem};
use ridgeline_harness::{
    push_pair, stability_gauge, JitteredSweep, MotionScript, SensorScene, SteadySweep,
};

/// Command line arguments for the sighting demo
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "AR peak-sighting demonstration over synthesized sensors",
    long_about = "Runs a complete sighting session against a simulated device.\n\n\
        The device pans across a small set of Lake District peaks while the \
        harness synthesizes the accelerometer and magnetometer readings the \
        motion implies. Mid-sweep the session performs the two-tap \
        field-of-view calibration, then reports which peaks are in view, \
        where they land on screen, and how steady the smoothed compass is.\n\n\
        Useful for:\n  \
        - Watching the smoothing windows settle after a pan\n  \
        - Checking calibration arithmetic against a known sweep\n  \
        - Demonstrating the persisted calibration profile"
)]
struct Args {
    #[arg(
        long,
        default_value_t = 120.0,
        help = "Bearing at the start of the sweep, degrees",
        long_help = "True bearing of the view axis at step zero, in degrees \
            clockwise from north. The sweep pans west (toward smaller \
            bearings) from here."
    )]
    start_bearing: f64,

    #[arg(
        long,
        default_value_t = 0.25,
        help = "Pan rate, degrees per step",
        long_help = "How far the simulated device pans west between \
            consecutive sensor readings, in degrees. The default sweeps a \
            quarter degree per step, roughly a slow handheld pan at sensor \
            rate."
    )]
    sweep_rate: f64,

    #[arg(
        long,
        default_value_t = 200,
        help = "Number of sensor steps to run",
        long_help = "Total number of synthesized sensor pairs pushed through \
            the system. Calibration taps fire at one quarter and three \
            quarters of the run, so keep this comfortably above the \
            smoothing window length."
    )]
    steps: usize,

    #[arg(
        long,
        default_value_t = 0.0,
        help = "Bearing jitter amplitude, degrees",
        long_help = "Uniform hand-shake noise added to the swept bearing, in \
            degrees either side of the clean value. Zero runs a perfectly \
            steady sweep; 1-3 degrees is typical handheld shake."
    )]
    jitter: f64,

    #[arg(
        long,
        default_value_t = 2.1,
        help = "Magnetic declination, degrees east",
        long_help = "Declination handed to the core, as the host would derive \
            from its location. The synthesized field is offset to match, so \
            reported bearings stay true."
    )]
    declination: f64,

    #[arg(
        long,
        default_value_t = 11,
        help = "Seed for the jitter generator",
        long_help = "Seed for the deterministic jitter stream. Runs with the \
            same seed and parameters reproduce exactly."
    )]
    seed: u64,

    #[arg(
        long,
        default_value_t = 1080,
        help = "Screen width in pixels"
    )]
    screen_width: u32,

    #[arg(
        long,
        default_value_t = 1920,
        help = "Screen height in pixels"
    )]
    screen_height: u32,
}

/// Peaks around a viewpoint on the Catbells ridge, bearings precomputed the
/// way the host's hill database would hand them over.
fn local_peaks() -> Vec<Peak> {
    vec![
        Peak::new(1, "Skiddaw", 17.0, 0.028, 10.9, 931.0),
        Peak::new(2, "Blencathra", 48.0, 0.021, 13.1, 868.0),
        Peak::new(3, "Helvellyn", 123.0, 0.019, 12.4, 950.0),
        Peak::new(4, "Fairfield", 136.0, 0.014, 15.8, 873.0),
        Peak::new(5, "Scafell Pike", 204.0, 0.024, 13.6, 978.0),
        Peak::new(6, "Great Gable", 221.0, 0.026, 11.2, 899.0),
        Peak::new(7, "Grisedale Pike", 291.0, 0.032, 4.7, 791.0),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Ridgeline Sighting Demo");
    println!("=======================");
    println!("Sweep: {}° west at {}°/step, {} steps", args.start_bearing, args.sweep_rate, args.steps);
    println!("Jitter: ±{}°  declination: {}°E  seed: {}", args.jitter, args.declination, args.seed);
    println!();

    let scene = SensorScene {
        declination_deg: args.declination,
        ..SensorScene::default()
    };
    let sweep = SteadySweep {
        start_deg: args.start_bearing,
        rate_deg_per_step: -args.sweep_rate,
        pitch_rad: 0.0,
    };
    let mut script = JitteredSweep::new(sweep, args.jitter, 0.002, args.seed);

    let mut system = SightingSystem::new(SightingConfig::default());
    system.set_declination_degrees(args.declination);

    let screen = ScreenSize::new(args.screen_width, args.screen_height);
    let peaks = local_peaks();

    // Tap at a quarter and three quarters of the run; the bearing swept
    // between the taps becomes the calibrated field of view.
    let first_tap = args.steps / 4;
    let second_tap = 3 * args.steps / 4;

    for step in 0..args.steps {
        let attitude = script.attitude(step);
        push_pair(
            &mut system,
            scene.synthesize(attitude.azimuth_deg, attitude.pitch_rad),
        );

        if step == first_tap {
            system.calibration_tap();
            println!(
                "[step {step:4}] first calibration tap at bearing {:.1}°",
                system.bearing_degrees()
            );
        } else if step == second_tap {
            if let Some(hfov) = system.calibration_tap() {
                println!(
                    "[step {step:4}] second calibration tap at bearing {:.1}°, hfov {hfov:.1}°",
                    system.bearing_degrees()
                );
            }
        } else if step % 25 == 0 {
            println!(
                "[step {step:4}] bearing {:7.2}°  pitch {:+.3} rad  stability {}",
                system.bearing_degrees(),
                system.pitch_radians(),
                stability_gauge(system.bearing_dispersion())
            );
        }
    }

    println!();
    println!(
        "Final attitude: bearing {:.2}°, pitch {:+.3} rad, hfov {:.1}°",
        system.bearing_degrees(),
        system.pitch_radians(),
        system.hfov_degrees()
    );
    println!("Peaks in view on a {}x{} screen:", screen.width_px, screen.height_px);

    let projector = system.projector(screen);
    let placed = projector.project_all(&peaks);
    if placed.is_empty() {
        println!("  (none)");
    }
    for (peak, placement) in &placed {
        println!(
            "  {:<16} {:4.0} m  at ({:6.1}, {:6.1}) px  ratio {:+.3}",
            peak.name, peak.height_m, placement.x_px, placement.y_px, placement.ratio
        );
    }

    let profile = system.calibration_profile();
    println!();
    println!(
        "Calibration profile for the host to persist:\n{}",
        serde_json::to_string_pretty(&profile)?
    );

    Ok(())
}
