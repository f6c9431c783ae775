use clap::{Parser, Subcommand, ValueEnum};
use pf_app::{
    AppResult, MoodySession, PipeInputs, ReportFormat, evaluate_point, prompt_pipe_inputs,
    render_point_table, write_curve_set, write_points, write_trajectory,
};
use pf_friction::{DiagramBounds, MoodyCurveSet};
use pf_sim::{
    DEFAULT_SAMPLE_COUNT, DEFAULT_T_END, IntegratorType, PistonValveParams, PistonValveState,
    SimOptions, simulate_with_options,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PipeFlow CLI - Moody diagram data and piston-valve transients", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the Moody diagram curve set
    Moody {
        /// Output format (csv or json)
        #[arg(long, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate the friction factor for one pipe operating point
    Point {
        /// Pipe inside diameter in inches
        #[arg(long)]
        diameter: f64,
        /// Wall roughness in microinches
        #[arg(long)]
        roughness: f64,
        /// Flow rate in US gallons per minute
        #[arg(long)]
        flow: f64,
        /// Seed for the transitional-regime estimate
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Enter operating points one at a time and collect them on the diagram
    Interactive {
        /// Seed for the transitional-regime estimate
        #[arg(long)]
        seed: Option<u64>,
        /// Write the collected points here on exit
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format of the exported points (csv or json)
        #[arg(long, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
    },
    /// Simulate the hydraulic piston-valve system
    Piston {
        /// End time in seconds
        #[arg(long, default_value_t = DEFAULT_T_END)]
        t_end: f64,
        /// Number of output samples
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        samples: usize,
        /// Valve opening fraction (defaults to the reference opening)
        #[arg(long)]
        valve_opening: Option<f64>,
        /// Integration method
        #[arg(long, value_enum, default_value_t = IntegratorArg::Rk45)]
        integrator: IntegratorArg,
        /// Output format (csv or json)
        #[arg(long, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IntegratorArg {
    /// Dormand-Prince 5(4)
    Rk45,
    /// Bogacki-Shampine 3(2)
    Rk23,
}

impl From<IntegratorArg> for IntegratorType {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Rk45 => IntegratorType::DormandPrince45,
            IntegratorArg::Rk23 => IntegratorType::BogackiShampine23,
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moody { format, output } => cmd_moody(format, output.as_deref()),
        Commands::Point {
            diameter,
            roughness,
            flow,
            seed,
        } => cmd_point(
            PipeInputs {
                diameter_in: diameter,
                roughness_uin: roughness,
                flow_gpm: flow,
            },
            seed,
        ),
        Commands::Interactive {
            seed,
            output,
            format,
        } => cmd_interactive(seed, output.as_deref(), format),
        Commands::Piston {
            t_end,
            samples,
            valve_opening,
            integrator,
            format,
            output,
        } => cmd_piston(
            t_end,
            samples,
            valve_opening,
            integrator.into(),
            format,
            output.as_deref(),
        ),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn open_output(path: Option<&Path>) -> AppResult<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn cmd_moody(format: ReportFormat, output: Option<&Path>) -> AppResult<()> {
    let set = MoodyCurveSet::compute()?;

    let mut out = open_output(output)?;
    write_curve_set(&set, format, &mut out)?;
    out.flush()?;

    if let Some(path) = output {
        println!(
            "✓ Exported {} curves ({} turbulent) to {}",
            set.turbulent.len() + 2,
            set.turbulent.len(),
            path.display()
        );
    }
    Ok(())
}

fn cmd_point(inputs: PipeInputs, seed: Option<u64>) -> AppResult<()> {
    let mut rng = make_rng(seed);
    let point = evaluate_point(inputs, &DiagramBounds::default(), &mut rng)?;

    println!("Reynolds number:    {:.1}", point.sample.reynolds);
    println!("Relative roughness: {:.3e}", point.sample.relative_roughness);
    println!("Regime:             {}", point.result.regime);
    println!("Friction factor:    {:.5}", point.result.friction_factor);
    if !point.in_bounds {
        println!("  (outside the plotted diagram window)");
    }
    Ok(())
}

fn cmd_interactive(seed: Option<u64>, output: Option<&Path>, format: ReportFormat) -> AppResult<()> {
    let mut rng = make_rng(seed);
    let mut session = MoodySession::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stdout();

    println!("Enter pipe data for each point (q to quit).");
    while let Some(inputs) = prompt_pipe_inputs(&mut input, &mut prompts)? {
        match session.add_point(inputs, &mut rng) {
            Ok(point) => {
                if !point.in_bounds {
                    println!("  point is outside the plotted diagram window");
                }
                println!("\n{}", render_point_table(session.points()));
            }
            Err(err) => println!("  ✗ {}", err),
        }
    }

    info!(points = session.len(), "interactive session finished");
    if let Some(path) = output {
        let mut out = open_output(Some(path))?;
        write_points(session.points(), format, &mut out)?;
        out.flush()?;
        println!("✓ Exported {} points to {}", session.len(), path.display());
    }
    Ok(())
}

fn cmd_piston(
    t_end: f64,
    samples: usize,
    valve_opening: Option<f64>,
    integrator: IntegratorType,
    format: ReportFormat,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut params = PistonValveParams::default();
    if let Some(y) = valve_opening {
        params.valve_opening = y;
    }
    let initial = PistonValveState::at_rest(params.ambient_pressure);
    let opts = SimOptions {
        t_start: 0.0,
        t_end,
        sample_count: samples,
        integrator,
        ..SimOptions::default()
    };

    let traj = simulate_with_options(&params, initial, &opts)?;

    let mut out = open_output(output)?;
    write_trajectory(&traj, format, &mut out)?;
    out.flush()?;

    if let Some(path) = output {
        println!("✓ Exported {} samples to {}", traj.len(), path.display());
        println!(
            "  Steps: {} accepted, {} rejected, {} rhs evaluations",
            traj.stats.accepted, traj.stats.rejected, traj.stats.rhs_evals
        );
        if let Some(last) = traj.states.last() {
            println!(
                "  Final: x = {:.4e} m, v = {:.4e} m/s, p1 = {:.4e} Pa, p2 = {:.4e} Pa",
                last.position, last.velocity, last.p1, last.p2
            );
        }
    }
    Ok(())
}
