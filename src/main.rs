//! coffee-shop-env: resolve the frontend environment for a profile.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Resolve log filter (CLI > env > RUST_LOG > info) and init logger
//!   4. Resolve profile (CLI > env > development)
//!   5. Load, override and validate the environment
//!   6. Install it as the process-wide instance
//!   7. Print it as JSON (or just confirm it with `--check`)

use std::env;

use coffee_shop_env::environment::{self, Profile};
use coffee_shop_env::error::AppError;
use coffee_shop_env::{config, logger};
use tracing::{debug, info};

const ENV_PROFILE: &str = "COFFEE_SHOP_PROFILE";
const ENV_LOG_LEVEL: &str = "COFFEE_SHOP_LOG_LEVEL";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args(env::args().skip(1))?;
    if args.help {
        print_help();
        return Ok(());
    }

    let log = logger::LogSelection::resolve(args.log_level, env::var(ENV_LOG_LEVEL).ok());
    logger::init(&log)?;

    let profile = match args.profile {
        Some(p) => p,
        None => match env::var(ENV_PROFILE) {
            Ok(p) => p.parse()?,
            Err(_) => Profile::default(),
        },
    };
    debug!(%profile, config = ?args.config_path, "resolving environment");

    let env = environment::install(config::load(profile, args.config_path.as_deref())?)?;

    info!(
        %profile,
        production = env.production,
        api_server_url = %env.api_server_url,
        auth0_domain = %env.auth0.domain(),
        "environment loaded"
    );

    if args.check {
        println!("✓ environment ok: profile={profile} production={}", env.production);
    } else {
        println!("{}", env.to_json_pretty()?);
    }

    Ok(())
}

// ── CLI arg parsing ────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    profile: Option<Profile>,
    config_path: Option<String>,
    log_level: Option<String>,
    check: bool,
    help: bool,
}

fn parse_cli_args<I>(args: I) -> Result<CliArgs, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = CliArgs::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => out.help = true,
            "--check" => out.check = true,
            "-p" | "--profile" => {
                let value = require_value(&arg, iter.next())?;
                out.profile = Some(value.parse()?);
            }
            "-f" | "--config" => out.config_path = Some(require_value(&arg, iter.next())?),
            "-l" | "--log-level" => out.log_level = Some(require_value(&arg, iter.next())?),
            "--" => break,
            other => {
                return Err(AppError::Config(format!("unexpected argument '{other}' (see --help)")));
            }
        }
    }

    Ok(out)
}

fn require_value(flag: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Config(format!("{flag} requires a value")))
}

fn print_help() {
    println!("Usage: coffee-shop-env [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -p, --profile <NAME>     development | production (default: $COFFEE_SHOP_PROFILE or development)");
    println!("  -f, --config <PATH>      Config file to load instead of config/<profile>.toml");
    println!("  -l, --log-level <FILTER>  Level or filter directives, e.g. debug or coffee_shop_env=trace");
    println!("      --check              Validate only; do not print the environment");
    println!("  -h, --help               Print help");
    println!();
    println!("Field overrides (applied after files):");
    println!("  COFFEE_SHOP_PRODUCTION, COFFEE_SHOP_API_SERVER_URL, COFFEE_SHOP_AUTH0_URL,");
    println!("  COFFEE_SHOP_AUTH0_AUDIENCE, COFFEE_SHOP_AUTH0_CLIENT_ID, COFFEE_SHOP_AUTH0_CALLBACK_URL");
}
