//! ClassAd CLI
//!
//! Evaluates expressions, normalizes ads and checks whether two ads match.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use classad_eval::{ClassAd, EvalOptions, Evaluator, Value, builtin_names};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// What a command prints and the status it exits with
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    stdout: String,
    code: i32,
}

impl Outcome {
    fn success(stdout: String) -> Self {
        Self { stdout, code: 0 }
    }
}

/// Exit status of `match` when the ads do not match
const NO_MATCH: i32 = 2;

fn cli() -> Command {
    let ad_file = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .value_name("FILE")
            .help(help)
            .num_args(1)
    };

    Command::new("classad")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Evaluate and match HTCondor ClassAds")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .env("CLASSAD_CONFIG")
                .help("TOML file with evaluation options")
                .global(true)
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more; repeat for more detail")
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("eval")
                .about("Evaluate an expression")
                .arg(
                    Arg::new("expression")
                        .value_name("EXPR")
                        .required(true)
                        .index(1),
                )
                .arg(ad_file("my", "Ad to use as MY"))
                .arg(ad_file("target", "Ad to use as TARGET")),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse an ad and print it in canonical form")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .help("Ad file, or - for standard input")
                        .default_value("-")
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the ad as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("old-style")
                        .long("old-style")
                        .help("Print one attribute per line")
                        .conflicts_with("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("match")
                .about("Check whether two ads match each other")
                .arg(Arg::new("left").value_name("LEFT").required(true).index(1))
                .arg(Arg::new("right").value_name("RIGHT").required(true).index(2)),
        )
        .subcommand(Command::new("functions").about("List the built-in functions"))
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(outcome) => {
            print!("{}", outcome.stdout);
            process::exit(outcome.code);
        }
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise each `-v` lowers the threshold one level
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<Outcome> {
    let options = match matches.get_one::<String>("config") {
        Some(path) => load_options(Path::new(path))?,
        None => EvalOptions::default(),
    };

    match matches.subcommand() {
        Some(("eval", args)) => {
            let expression = args
                .get_one::<String>("expression")
                .context("missing expression")?;
            let my = args.get_one::<String>("my").map(|path| read_ad(path)).transpose()?;
            let target = args
                .get_one::<String>("target")
                .map(|path| read_ad(path))
                .transpose()?;
            evaluate(&options, expression, my.as_ref(), target.as_ref())
        }
        Some(("parse", args)) => {
            let path = args.get_one::<String>("file").context("missing file")?;
            let format = if args.get_flag("json") {
                Format::Json
            } else if args.get_flag("old-style") {
                Format::OldStyle
            } else {
                Format::Canonical
            };
            normalize(&read_ad(path)?, format)
        }
        Some(("match", args)) => {
            let left = read_ad(args.get_one::<String>("left").context("missing left ad")?)?;
            let right = read_ad(args.get_one::<String>("right").context("missing right ad")?)?;
            Ok(match_ads(&options, &left, &right))
        }
        Some(("functions", _)) => Ok(Outcome::success(
            builtin_names().iter().map(|name| format!("{name}\n")).collect(),
        )),
        _ => anyhow::bail!("no command given"),
    }
}

fn load_options(path: &Path) -> Result<EvalOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let options = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "loaded evaluation options");
    Ok(options)
}

/// Read and parse an ad; `-` reads standard input
fn read_ad(path: &str) -> Result<ClassAd> {
    let content = if path == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;
        content
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read ad file: {path}"))?
    };
    let filename = if path == "-" { "<stdin>" } else { path };
    let definitions = classad_parser::Parser::new_with_filename(&content, filename)?.parse_classad()?;
    let mut ad = ClassAd::new();
    for (name, expr) in definitions {
        ad.insert(name, expr)?;
    }
    Ok(ad)
}

fn evaluate(
    options: &EvalOptions,
    expression: &str,
    my: Option<&ClassAd>,
    target: Option<&ClassAd>,
) -> Result<Outcome> {
    let expr = classad_parser::parse(expression)?;
    let value = Evaluator::new(options).evaluate(&expr, my, target);
    info!(%expr, %value, "evaluated");
    let code = i32::from(value == Value::Error);
    Ok(Outcome {
        stdout: format!("{value}\n"),
        code,
    })
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Canonical,
    OldStyle,
    Json,
}

fn normalize(ad: &ClassAd, format: Format) -> Result<Outcome> {
    let stdout = match format {
        Format::Canonical => format!("{ad}\n"),
        Format::OldStyle => ad.to_old_style(),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(&ad.to_json())?),
    };
    Ok(Outcome::success(stdout))
}

fn match_ads(options: &EvalOptions, left: &ClassAd, right: &ClassAd) -> Outcome {
    let left_accepts = classad_eval::requirements_met_with(options, left, right);
    let right_accepts = classad_eval::requirements_met_with(options, right, left);
    let stdout = format!(
        "left requirements: {left_accepts}\n\
         right requirements: {right_accepts}\n\
         left rank: {}\n\
         right rank: {}\n\
         {}\n",
        classad_eval::rank_with(options, left, right),
        classad_eval::rank_with(options, right, left),
        if left_accepts && right_accepts { "match" } else { "no match" },
    );
    Outcome {
        stdout,
        code: if left_accepts && right_accepts { 0 } else { NO_MATCH },
    }
}
