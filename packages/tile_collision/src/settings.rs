
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "settings.json";


/// Settings for the command line runner, read from the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Also write logs to a `log` file.
    pub log_file: bool,
    /// Steps to simulate when neither the scenario nor the command line say.
    pub default_steps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_file: false,
            default_steps: 60,
        }
    }
}

impl Settings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        Self::try_read(path).unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("unable to open {}", path.display()))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }
}


#[test]
fn test_settings_fill_in_defaults() {
    let settings: Settings = serde_json::from_str(r#"{ "log_file": true }"#).unwrap();
    assert_eq!(settings, Settings { log_file: true, default_steps: 60 });

    assert!(Settings::try_read("this/settings/file/does/not/exist.json").is_err());
    assert_eq!(Settings::read("this/settings/file/does/not/exist.json"), Settings::default());
}

#[test]
fn test_settings_write_then_read() {
    let path = std::env::temp_dir()
        .join(format!("tile_collision_settings_{}.json", std::process::id()));
    let settings = Settings {
        log_file: true,
        default_steps: 7,
    };
    settings.write(&path).unwrap();
    let read = Settings::try_read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(read, settings);
}
