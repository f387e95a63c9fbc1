use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use merlin_host::harness::{load_fixture, run_fixture, HarnessOutput};

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("[script-harness] error: {err:?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let opts = parse_args()?;
    let fixture = load_fixture(&opts.fixture)?;
    let output = run_fixture(&fixture, &opts.assets)?;

    if let Some(path) = &opts.write_output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory '{}'", parent.display()))?;
            }
        }
        let file = File::create(path)
            .with_context(|| format!("writing harness output to '{}'", path.display()))?;
        serde_json::to_writer_pretty(file, &output).context("serializing harness output")?;
        println!("[script-harness] wrote {}", path.display());
    }

    if let Some(path) = &opts.check_golden {
        let file =
            File::open(path).with_context(|| format!("opening golden file '{}'", path.display()))?;
        let expected: HarnessOutput =
            serde_json::from_reader(file).context("parsing golden JSON")?;
        if expected != output {
            bail!("harness output diverged from golden '{}'", path.display());
        }
        println!("[script-harness] matches {}", path.display());
    }

    if opts.write_output.is_none() && opts.check_golden.is_none() {
        println!("{}", serde_json::to_string_pretty(&output).context("serializing harness output")?);
    }
    Ok(())
}

struct Options {
    fixture: PathBuf,
    assets: PathBuf,
    write_output: Option<PathBuf>,
    check_golden: Option<PathBuf>,
}

fn parse_args() -> Result<Options> {
    let mut fixture = None;
    let mut assets = PathBuf::from("assets");
    let mut write_output = None;
    let mut check_golden = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--assets" => {
                assets = PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("Expected a value after --assets"))?,
                );
            }
            "--write-output" => {
                write_output = Some(PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("Expected a value after --write-output"))?,
                ));
            }
            "--check-golden" => {
                check_golden = Some(PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("Expected a value after --check-golden"))?,
                ));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag '{flag}'"),
            path => {
                if fixture.is_some() {
                    bail!("Multiple fixture paths given");
                }
                fixture = Some(PathBuf::from(path));
            }
        }
    }
    let fixture = fixture.ok_or_else(|| {
        anyhow!("Usage: script_harness <fixture.json> [--assets DIR] [--write-output PATH] [--check-golden PATH]")
    })?;
    Ok(Options { fixture, assets, write_output, check_golden })
}
