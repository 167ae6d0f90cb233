use std::path::PathBuf;
use std::process::ExitCode;

use heart_morph::config::MorphConfig;
use heart_morph::viewer;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: heart-morph [IMAGE] [options]

options:
  --config FILE        load settings from a JSON file
  --grid               ignore any image and morph into a grid
  --count N            particle count for the grid target
  --duration SECS      transition duration
  --seed N             seed the heart sampler
  --save-config FILE   write the effective settings and exit
  -h, --help           show this message";

#[derive(Debug, Default, PartialEq)]
struct Args {
    image: Option<PathBuf>,
    config: Option<PathBuf>,
    grid: bool,
    count: Option<u32>,
    duration: Option<f32>,
    seed: Option<u64>,
    save_config: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--grid" => parsed.grid = true,
                "--config" => parsed.config = Some(value(&arg, args.next())?.into()),
                "--save-config" => parsed.save_config = Some(value(&arg, args.next())?.into()),
                "--count" => parsed.count = Some(number(&arg, args.next())?),
                "--duration" => parsed.duration = Some(seconds(&arg, args.next())?),
                "--seed" => parsed.seed = Some(number(&arg, args.next())?),
                flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
                _ if parsed.image.is_none() => parsed.image = Some(arg.into()),
                _ => return Err(format!("unexpected argument {arg}")),
            }
        }
        Ok(parsed)
    }

    fn into_config(self) -> Result<MorphConfig, String> {
        let mut config = match &self.config {
            Some(path) => MorphConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
            None => MorphConfig::default(),
        };
        if let Some(image) = self.image {
            config = config.with_image(image);
        }
        if self.grid {
            config = config.without_image();
        }
        if let Some(count) = self.count {
            config = config.with_particle_count(count);
        }
        if let Some(duration) = self.duration {
            config = config.with_transition_duration(duration);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String, String> {
    next.ok_or_else(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(flag: &str, next: Option<String>) -> Result<T, String> {
    let raw = value(flag, next)?;
    raw.parse().map_err(|_| format!("{flag}: invalid number {raw:?}"))
}

fn seconds(flag: &str, next: Option<String>) -> Result<f32, String> {
    let secs: f32 = number(flag, next)?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(format!("{flag}: expected a finite, non-negative number of seconds"))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let save_to = args.save_config.clone();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = save_to {
        return match config.save(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "settings written");
                ExitCode::SUCCESS
            }
            Err(error) => {
                tracing::error!(%error, "could not write settings");
                ExitCode::FAILURE
            }
        };
    }

    match viewer::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "viewer failed");
            ExitCode::FAILURE
        }
    }
}
