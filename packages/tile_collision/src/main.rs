
#[macro_use]
extern crate tracing;

use tile_collision::{
    logging::init_logging,
    scenario::Scenario,
    settings::{
        Settings,
        SETTINGS_FILE_NAME,
    },
};
use std::{
    env::args,
    process::exit,
};
use anyhow::*;


const CLI_INTRO: &'static str = "Tile grid collision runner.";

const CLI_HELP: &'static str = r#"
Examples:

    [this command] scenario.json
    Simulate a scenario and print where every body ended up.

    [this command] scenario.json --steps=120
    Simulate a specific number of steps.

Steps default to the scenario's "steps", then to "default_steps" in
settings.json. Setting "log_file" there also writes logs to a file.

Env var examples:
    RUST_LOG=tile_collision=trace
    Logs every body on every step, and every blocked movement"#;


fn main() {
    println!("{}", CLI_INTRO);
    let settings = Settings::read(SETTINGS_FILE_NAME);
    if let Err(e) = init_logging(settings.log_file) {
        eprintln!("unable to initialize logging: {:#}", e);
    }

    let args = args().collect::<Vec<_>>();
    if args.get(1).map(String::as_str) == Some("--help") {
        println!("{}", CLI_HELP);
    } else if let Err(e) = run_from_cli(&args, &settings) {
        error!(%e, "error running scenario");
        eprintln!("error: {:?}", e);
        exit(1);
    }
}

// parse CLI args and run the scenario they name
fn run_from_cli(args: &Vec<String>, settings: &Settings) -> Result<()> {
    let path = args.iter()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .ok_or_else(|| anyhow!("no scenario file given, try --help"))?;
    let steps = args.iter()
        .filter_map(|arg| arg.strip_prefix("--steps="))
        .next()
        .map(|steps| steps
            .parse::<u32>()
            .with_context(|| format!("invalid step count {:?}", steps)))
        .transpose()?;

    let scenario = Scenario::load(path)?;
    let steps = steps.unwrap_or_else(|| scenario.steps_or(settings.default_steps));
    info!(%path, steps, "running scenario");

    for body in scenario.run(steps) {
        println!(
            "{}: pos=({}, {}) velocity=({}, {}) {:?}",
            body.name,
            body.pos.x, body.pos.y,
            body.velocity.x, body.velocity.y,
            body.flags,
        );
    }
    Ok(())
}
