//! geocalc command-line front end
//!
//! - `geocalc eval "[[1,2,3],[4,5,6],'addition']"` evaluates requests given as
//!   arguments, or one request per stdin line when none are given.
//! - `geocalc plane --plane 1,1,1,1 --angle-with 0,0,1,0` runs a plane query.
//!
//! Exit code is 0 when every result is a success and 1 otherwise.

use std::io::{self, BufRead};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use geocalc::{evaluate_batch, plane_report, Plane, PlaneQuery, Point};

#[derive(Parser)]
#[command(name = "geocalc")]
#[command(version)]
#[command(about = "Vector and plane calculations from list-literal requests")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate vector requests such as "[[1,2,3],[4,5,6],'addition']"
    Eval {
        /// Requests to evaluate; read from stdin (one per line) when omitted
        requests: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Query a plane a*x + b*y + c*z = d
    Plane {
        /// Plane coefficients "a,b,c,d"
        #[arg(long, value_parser = parse_plane, allow_hyphen_values = true)]
        plane: Plane,

        #[command(flatten)]
        query: PlaneQueryArgs,

        /// Accept points within this distance of the plane for --contains
        #[arg(long, requires = "contains")]
        tolerance: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PlaneQueryArgs {
    /// Check whether the point "x,y,z" lies on the plane
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    contains: Option<Point>,

    /// Distance from the point "x,y,z" to the plane
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    distance_to: Option<Point>,

    /// Magnitude of the plane's normal
    #[arg(long)]
    origin_distance: bool,

    /// Acute angle to another plane "a,b,c,d", in degrees
    #[arg(long, value_parser = parse_plane, allow_hyphen_values = true)]
    angle_with: Option<Plane>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| format!("expected {} comma-separated numbers, got {}", N, count))
}

fn parse_point(s: &str) -> Result<Point, String> {
    parse_numbers::<3>(s).map(Point::from_array)
}

fn parse_plane(s: &str) -> Result<Plane, String> {
    parse_numbers::<4>(s).map(Plane::from_array)
}

fn emit<T: Serialize>(value: &T, output: &OutputArgs) -> serde_json::Result<()> {
    let text = if output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn read_stdin_requests() -> io::Result<Vec<String>> {
    let mut requests = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        requests.push(line.to_string());
    }
    Ok(requests)
}

fn run_eval(requests: Vec<String>, output: &OutputArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let requests = if requests.is_empty() {
        read_stdin_requests()?
    } else {
        requests
    };
    info!(count = requests.len(), "evaluating requests");

    let records = evaluate_batch(&requests);
    let failures = records.iter().filter(|r| r.is_error()).count();
    for record in &records {
        match output.format {
            Format::Json => emit(record, output)?,
            Format::Text => match record.error_message() {
                Some(err) => println!("{}: error: {}", record.operation_name(), err),
                None => println!("{}: {}", record.operation_name(), record.display_message()),
            },
        }
    }
    info!(total = records.len(), failures, "done");
    Ok(if failures == 0 { 0 } else { 1 })
}

fn run_plane(
    plane: Plane,
    query: PlaneQueryArgs,
    tolerance: Option<f64>,
    output: &OutputArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let query = if let Some(point) = query.contains {
        PlaneQuery::Contains { point, tolerance }
    } else if let Some(point) = query.distance_to {
        PlaneQuery::DistanceToPoint(point)
    } else if let Some(other) = query.angle_with {
        PlaneQuery::AngleWith(other)
    } else {
        PlaneQuery::DistanceFromOrigin
    };

    let report = plane_report(plane, query);
    match output.format {
        Format::Json => emit(&report, output)?,
        Format::Text => match &report.error_message {
            Some(err) => println!("{}: error: {}", report.operation_name, err),
            None => println!("{}: {}", report.operation_name, report.display_message),
        },
    }
    Ok(if report.error_message.is_none() { 0 } else { 1 })
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Eval { requests, output } => run_eval(requests, &output),
        Commands::Plane { plane, query, tolerance, output } => {
            run_plane(plane, query, tolerance, &output)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("geocalc: {}", e);
            1
        }
    };
    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tolerance_requires_contains() {
        let args = ["geocalc", "plane", "--plane", "0,0,1,0", "--origin-distance", "--tolerance", "0.1"];
        let err = Cli::try_parse_from(args).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "geocalc", "plane", "--plane", "0,0,1,0", "--contains", "0,0,0.05", "--tolerance", "0.1",
        ])
        .unwrap();
        match cli.command {
            Commands::Plane { query, tolerance, .. } => {
                assert_eq!(query.contains, Some(Point::new(0.0, 0.0, 0.05)));
                assert_eq!(tolerance, Some(0.1));
            }
            Commands::Eval { .. } => panic!("expected the plane command"),
        }
    }

    #[test]
    fn test_plane_query_is_exclusive() {
        let args = ["geocalc", "plane", "--plane", "0,0,1,0", "--origin-distance", "--angle-with", "1,1,1,1"];
        assert!(Cli::try_parse_from(args).is_err());
        assert!(Cli::try_parse_from(["geocalc", "plane", "--plane", "0,0,1,0"]).is_err());
    }
}
