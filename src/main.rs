use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use dxf2gcode::model::Point;
use dxf2gcode::source::{sample_drawing, Drawing};
use dxf2gcode::validator::Validator;
use dxf2gcode::{convert_file, simulate_file, write_simulation, Error, JobConfig, SimulationOptions};

#[derive(Parser)]
#[command(
    name = "dxf2gcode",
    version,
    about = "Compile drawing geometry into G-code and preview G-code toolpaths"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON drawing into a G-code program
    Convert {
        /// Drawing (.json, {"entities": [...]})
        input: PathBuf,

        /// Program to write (.nc)
        output: PathBuf,

        /// Job config (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        job: JobArgs,

        /// Interpret the written program right away
        #[arg(long)]
        simulate: bool,

        /// Where to put the simulation JSON (default: <OUTPUT>.sim.json)
        #[arg(long, requires = "simulate")]
        simulation_output: Option<PathBuf>,
    },

    /// Interpret a G-code program into preview geometry
    Simulate {
        program: PathBuf,

        /// Simulation JSON (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        placement: PlacementArgs,

        /// Points per reconstructed arc
        #[arg(long, default_value_t = dxf2gcode::interpreter::DEFAULT_ARC_SAMPLES)]
        arc_samples: usize,

        /// Also render a PNG preview
        #[cfg(feature = "viz")]
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Write the built-in test drawing
    Sample { output: PathBuf },
}

#[derive(Args, Default)]
struct JobArgs {
    #[arg(long)]
    feedrate_xy: Option<f64>,

    #[arg(long)]
    feedrate_z: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    safe_z: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    cut_z: Option<f64>,

    #[arg(long)]
    spindle_rpm: Option<f64>,

    #[command(flatten)]
    placement: PlacementArgs,
}

#[derive(Args, Default)]
struct PlacementArgs {
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<f64>,

    /// Start point override (needs --start-y)
    #[arg(long, allow_hyphen_values = true, requires = "start_y")]
    start_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "start_x")]
    start_y: Option<f64>,

    /// End point override (needs --end-y)
    #[arg(long, allow_hyphen_values = true, requires = "end_y")]
    end_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "end_x")]
    end_y: Option<f64>,
}

impl PlacementArgs {
    fn apply(&self, offset: &mut Point, start: &mut Option<Point>, end: &mut Option<Point>) {
        if let Some(x) = self.offset_x {
            offset.x = x;
        }
        if let Some(y) = self.offset_y {
            offset.y = y;
        }
        if let (Some(x), Some(y)) = (self.start_x, self.start_y) {
            *start = Some(Point::new(x, y));
        }
        if let (Some(x), Some(y)) = (self.end_x, self.end_y) {
            *end = Some(Point::new(x, y));
        }
    }
}

impl JobArgs {
    fn apply(&self, job: &mut JobConfig) {
        if let Some(v) = self.feedrate_xy {
            job.feed_xy = v;
        }
        if let Some(v) = self.feedrate_z {
            job.feed_z = v;
        }
        if let Some(v) = self.safe_z {
            job.safe_z = v;
        }
        if let Some(v) = self.cut_z {
            job.cut_z = v;
        }
        if let Some(v) = self.spindle_rpm {
            job.spindle_rpm = v;
        }
        self.placement
            .apply(&mut job.offset, &mut job.start, &mut job.end);
    }
}

fn main() -> Result<()> {
    dxf2gcode::init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input,
            output,
            config,
            job: job_args,
            simulate,
            simulation_output,
        } => {
            let mut job = match &config {
                Some(path) => JobConfig::from_file(path)?,
                None => JobConfig::default(),
            };
            job_args.apply(&mut job);
            validate(&job)?;

            let summary = convert_file(&input, &output, &job)
                .with_context(|| format!("converting {}", input.display()))?;
            println!("Generated: {}", output.display());
            println!(
                "  {} of {} entities, {} lines",
                summary.entities_processed, summary.entities_read, summary.lines_written
            );

            if simulate {
                let sim = simulate_file(&output, &job.simulation_options())?;
                let sim_path =
                    simulation_output.unwrap_or_else(|| output.with_extension("sim.json"));
                write_simulation(&sim, &sim_path)?;
                println!("Simulation: {}", sim_path.display());
            }
        }

        Command::Simulate {
            program,
            output,
            placement,
            arc_samples,
            #[cfg(feature = "viz")]
            png,
        } => {
            let mut options = SimulationOptions {
                arc_samples,
                ..SimulationOptions::default()
            };
            placement.apply(&mut options.offset, &mut options.start, &mut options.end);

            let job = JobConfig {
                offset: options.offset,
                start: options.start,
                end: options.end,
                arc_samples,
                ..JobConfig::default()
            };
            validate(&job)?;

            let sim = simulate_file(&program, &options)?;

            #[cfg(feature = "viz")]
            if let Some(png) = png {
                dxf2gcode::viz::export_png(&sim, &png, 1200, 900)?;
                println!("Preview: {}", png.display());
            }

            match output {
                Some(path) => {
                    write_simulation(&sim, &path)?;
                    eprintln!("Written to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&sim)?),
            }
        }

        Command::Sample { output } => {
            Drawing {
                entities: sample_drawing(),
            }
            .write(&output)?;
            println!("Generated: {}", output.display());
        }
    }

    Ok(())
}

fn validate(job: &JobConfig) -> Result<()> {
    Validator::new()
        .validate_job(job)
        .map_err(Error::Validation)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "dxf2gcode",
            "convert",
            "in.json",
            "out.nc",
            "--cut-z",
            "-1.5",
            "--end-x",
            "0",
            "--end-y",
            "0",
        ]);
        let Command::Convert { job: args, .. } = cli.command else {
            panic!("expected convert");
        };

        let mut job = JobConfig {
            feed_xy: 800.0,
            ..JobConfig::default()
        };
        args.apply(&mut job);

        assert_eq!(job.feed_xy, 800.0);
        assert_eq!(job.cut_z, -1.5);
        assert_eq!(job.start, None);
        assert_eq!(job.end, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_half_an_override_is_rejected() {
        let parsed = Cli::try_parse_from(["dxf2gcode", "simulate", "p.nc", "--start-x", "5"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn test_validation_failure() {
        let job = JobConfig {
            safe_z: -2.0,
            ..JobConfig::default()
        };

        assert!(validate(&job).is_err());
    }
}
