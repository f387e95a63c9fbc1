use crate::config::AppConfigOverrides;
use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub project: Option<PathBuf>,
    pub script: Option<String>,
    pub frames: Option<u64>,
}

impl CliOptions {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = CliOptions::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            // A bare first argument is the project directory, mirroring
            // `host <project-dir>` usage.
            if !flag.starts_with("--") {
                if options.project.is_some() {
                    bail!("Unexpected argument '{flag}'. Use --script/--frames with values.");
                }
                options.project = Some(PathBuf::from(flag));
                continue;
            }
            let key = &flag[2..];
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?
                .as_ref()
                .to_string();
            match key {
                "project" => {
                    options.project = Some(PathBuf::from(value));
                }
                "script" => {
                    options.script = Some(value);
                }
                "frames" => {
                    options.frames = Some(
                        value
                            .parse::<u64>()
                            .map_err(|_| anyhow!("Invalid frame count '{value}'"))?,
                    );
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --project, --script, --frames."),
            }
        }
        Ok(options)
    }

    pub fn into_config_overrides(self) -> (Option<PathBuf>, Option<u64>, AppConfigOverrides) {
        let overrides = AppConfigOverrides { main_script: self.script, ..Default::default() };
        (self.project, self.frames, overrides)
    }
}
