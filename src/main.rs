use std::path::PathBuf;
use std::{env, fs};

use anyhow::{bail, Context, Result};

use colscript::config::Config;
use colscript::data::export;
use colscript::preset::PresetLibrary;
use colscript::script::catalogue;
use colscript::state::Session;

const USAGE: &str = "\
Usage: colscript <data-file> [options]
       colscript --functions
       colscript --function NAME

Options:
  --config FILE        JSON settings (limits, presets_path)
  --presets FILE       preset library to read schemes from
  --scheme NAME        replay a saved scheme before any --script
  --script TEXT|@FILE  script to run; pair each with --name
  --name NAME          output column for the preceding --script
  --out FILE           write columns to .csv or derived columns to .json
  --save-scheme NAME   store the resulting derived columns as a scheme";

#[derive(Debug, Default)]
struct Args {
    data_file: Option<PathBuf>,
    config: Option<PathBuf>,
    presets: Option<PathBuf>,
    scheme: Option<String>,
    scripts: Vec<(String, String)>,
    out: Option<PathBuf>,
    save_scheme: Option<String>,
    functions: bool,
    function: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut pending_script: Option<String> = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().with_context(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--functions" => parsed.functions = true,
            "--function" => parsed.function = Some(value("--function")?),
            "--config" => parsed.config = Some(value("--config")?.into()),
            "--presets" => parsed.presets = Some(value("--presets")?.into()),
            "--scheme" => parsed.scheme = Some(value("--scheme")?),
            "--out" => parsed.out = Some(value("--out")?.into()),
            "--save-scheme" => parsed.save_scheme = Some(value("--save-scheme")?),
            "--script" => {
                if pending_script.is_some() {
                    bail!("--script without a following --name");
                }
                pending_script = Some(read_script(&value("--script")?)?);
            }
            "--name" => {
                let name = value("--name")?;
                let script = pending_script.take().context("--name without a preceding --script")?;
                parsed.scripts.push((script, name));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if parsed.data_file.is_none() => parsed.data_file = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }
    if pending_script.is_some() {
        bail!("--script without a following --name");
    }
    Ok(parsed)
}

/// `@path` reads the script from a file.
fn read_script(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading script {path}")),
        None => Ok(arg.to_string()),
    }
}

fn describe_function(name: &str) -> Result<String> {
    let name = name.strip_prefix("math.").unwrap_or(name);
    let f = catalogue::lookup(name)
        .with_context(|| format!("no function named \"{name}\"; see --functions"))?;
    Ok(format!(
        "math.{}({})\n  {}\n\nExample:\n  {}\n",
        f.name, f.params, f.summary, f.example
    ))
}

fn run(args: Args) -> Result<()> {
    if args.functions {
        print!("{}", catalogue::help_document());
        return Ok(());
    }
    if let Some(name) = &args.function {
        print!("{}", describe_function(name)?);
        return Ok(());
    }
    let data_file = args.data_file.context("missing <data-file>")?;

    let config = Config::load_or_default(args.config.as_deref())?;
    let mut session = Session::new(&config);
    session.load_source(&data_file)?;

    let presets_path = args.presets.or_else(|| config.presets_path.clone());
    let mut library = match &presets_path {
        Some(path) => Some(PresetLibrary::load(path)?),
        None => None,
    };

    if let Some(name) = &args.scheme {
        let library = library.as_ref().context("--scheme needs --presets or presets_path")?;
        let scheme = library
            .get(name)
            .with_context(|| format!("no scheme named \"{name}\""))?
            .clone();
        let report = session.apply_scheme(&scheme);
        for failure in &report.failures {
            eprintln!("{}: {}", failure.output_name, failure.error);
        }
    }

    let mut failed = 0;
    for (script, name) in &args.scripts {
        if let Err(e) = session.run_script(script, name) {
            eprintln!("{}: {e}", name.trim());
            failed += 1;
        }
    }

    for column in session.engine.columns() {
        println!("{column}");
    }

    if let Some(out) = &args.out {
        match out.extension().and_then(|e| e.to_str()) {
            Some("json") => export::write_json(out, session.engine.derived_columns())?,
            _ => export::write_csv(out, &session.engine.columns())?,
        }
    }

    if let Some(name) = &args.save_scheme {
        let library = library
            .as_mut()
            .context("--save-scheme needs --presets or presets_path")?;
        let mut scheme = session.capture_scheme(name);
        if let Some(existing) = library.get(name) {
            scheme.canvases = existing.canvases.clone();
        }
        library.save_scheme(scheme);
        library.save()?;
        println!("saved scheme \"{name}\" to {}", library.path().display());
    }

    if failed > 0 {
        log::warn!("{failed} of {} scripts failed", args.scripts.len());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) if args.data_file.is_some() || args.functions || args.function.is_some() => {
            args
        }
        Ok(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{e:#}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        log::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
