use clap::Parser;
use kittenx::tts::espeak;
use kittenx::tts::kitten::{SynthOpts, TtsKitten};
use std::io;
use std::path::Path;
use std::{fs, process};

mod config;
mod report;

use config::{expand_path, AppConfig};
use report::{SynthesisReport, VoiceEntry, VoiceListReport};

/// The eight KittenTTS nano voices, in catalog order.
const VOICE_CATALOG: &[(&str, &str)] = &[
    ("expr-voice-2-m", "Male Voice #2 - Expressive"),
    ("expr-voice-2-f", "Female Voice #2 - Expressive"),
    ("expr-voice-3-m", "Male Voice #3 - Expressive"),
    ("expr-voice-3-f", "Female Voice #3 - Expressive"),
    ("expr-voice-4-m", "Male Voice #4 - Expressive"),
    ("expr-voice-4-f", "Female Voice #4 - Expressive"),
    ("expr-voice-5-m", "Male Voice #5 - Expressive"),
    ("expr-voice-5-f", "Female Voice #5 - Expressive"),
];

const SPEED_MIN: f32 = 0.5;
const SPEED_MAX: f32 = 2.0;

#[derive(Parser, Debug, Clone)]
#[command(name = "purr")]
#[command(version)]
#[command(about = "Single-shot KittenTTS bridge: text in, WAV file out, JSON result")]
#[command(after_help = "Configuration files are loaded from (highest to lowest priority):
  1. --config <file>
  2. Environment variables (PURR_*)
  3. ./config.toml (local)
  4. $XDG_CONFIG_HOME/purr/config.toml (global)

The result is a single JSON object: stdout on success, stderr on failure.")]
struct Cli {
    /// Text to convert to speech
    #[arg(long = "text", value_name = "TEXT")]
    text: Option<String>,

    /// Voice to use
    #[arg(long = "voice", value_name = "VOICE")]
    voice: Option<String>,

    /// Speech speed (0.5-2.0)
    #[arg(long = "speed", value_name = "SPEED")]
    speed: Option<f32>,

    /// Output audio file path
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    output: Option<String>,

    /// List available voices and exit
    #[arg(long = "list-voices")]
    list_voices: bool,

    /// Path to a custom config file (highest priority)
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE")]
    config_file: Option<String>,

    /// Path to a local KittenTTS ONNX model (optional, defaults to the
    /// download cache)
    #[arg(short = 'm', long = "model", value_name = "MODEL_PATH")]
    model_path: Option<String>,

    /// Path to a local voices data file (optional, defaults to the
    /// download cache)
    #[arg(short = 'd', long = "data", value_name = "DATA_PATH")]
    data_path: Option<String>,

    /// Enable diagnostic logs on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Resolved configuration after merging CLI args with the config file.
/// CLI args take priority over config file values.
struct ResolvedConfig {
    voice: String,
    speed: f32,
    model_path: Option<String>,
    data_path: Option<String>,
    verbose: bool,
}

impl ResolvedConfig {
    fn from_cli_and_config(cli: &Cli, config: &AppConfig) -> Self {
        Self {
            voice: cli.voice.clone().unwrap_or_else(|| config.voice.clone()),
            speed: cli.speed.unwrap_or(config.speed),
            model_path: cli
                .model_path
                .clone()
                .or_else(|| config.model_path.clone())
                .map(|p| expand_path(&p)),
            data_path: cli
                .data_path
                .clone()
                .or_else(|| config.data_path.clone())
                .map(|p| expand_path(&p)),
            verbose: cli.verbose || config.verbose,
        }
    }
}

fn catalog_has_voice(voice: &str) -> bool {
    VOICE_CATALOG.iter().any(|&(id, _)| id == voice)
}

fn list_voices() {
    let voices = VOICE_CATALOG
        .iter()
        .map(|&(id, description)| VoiceEntry { id, description })
        .collect();
    report::emit_success(&VoiceListReport {
        success: true,
        voices,
    });
}

fn ensure_parent_dir_exists(file_path: &str) -> io::Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Emit the error report and exit with status 1.
fn fail(message: &str) -> ! {
    report::emit_failure(message);
    process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Panics must not leak backtraces into the JSON protocol.
    std::panic::set_hook(Box::new(|panic_info| {
        report::emit_failure(&format!("internal error: {}", panic_info));
        process::abort();
    }));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cli = Cli::parse();

        // Voice listing is static and must stay instant: no config, no model.
        if cli.list_voices {
            list_voices();
            return Ok(());
        }

        let app_config = match AppConfig::load(cli.config_file.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: failed to load config file: {}", e);
                eprintln!("Using default configuration.");
                AppConfig::default()
            }
        };
        let resolved = ResolvedConfig::from_cli_and_config(&cli, &app_config);

        let (text, output) = match (&cli.text, &cli.output) {
            (Some(text), Some(output)) => (text.clone(), expand_path(output)),
            _ => fail("Both --text and --output are required for TTS generation"),
        };

        if text.trim().is_empty() {
            fail("--text must not be empty");
        }
        if !(SPEED_MIN..=SPEED_MAX).contains(&resolved.speed) {
            fail(&format!(
                "Speed must be between {} and {}, got: {}",
                SPEED_MIN, SPEED_MAX, resolved.speed
            ));
        }
        if !catalog_has_voice(&resolved.voice) {
            let supported: Vec<&str> = VOICE_CATALOG.iter().map(|&(id, _)| id).collect();
            fail(&format!(
                "Unsupported voice: {}. Supported: {}",
                resolved.voice,
                supported.join(", ")
            ));
        }

        // Prefer a bundled espeak install over whatever the system provides.
        // This has to happen before the phonemizer first runs.
        if let Some(install) = espeak::repair_environment() {
            if resolved.verbose {
                eprintln!("Using bundled espeak at {}", install.exe.display());
            }
        }

        if let Err(e) = ensure_parent_dir_exists(&output) {
            fail(&format!("Failed to create output directory: {}", e));
        }

        let tts = match TtsKitten::new(
            resolved.model_path.as_deref(),
            resolved.data_path.as_deref(),
            resolved.verbose,
        )
        .await
        {
            Ok(tts) => tts,
            Err(e) => fail(&format!("Failed to initialize KittenTTS: {}", e)),
        };

        match tts.synth(SynthOpts {
            txt: &text,
            voice: &resolved.voice,
            speed: resolved.speed,
            save_path: &output,
        }) {
            Ok(summary) => {
                report::emit_success(&SynthesisReport {
                    success: true,
                    output_path: output.clone(),
                    file_size: summary.file_size,
                    voice: resolved.voice.clone(),
                    speed: resolved.speed,
                    text_length: text.chars().count(),
                    phoneme_backend: summary.phoneme_source.as_str(),
                });
                Ok(())
            }
            Err(e) => fail(&format!("TTS generation failed: {}", e)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_eight_voices() {
        assert_eq!(VOICE_CATALOG.len(), 8);
        assert!(catalog_has_voice("expr-voice-2-f"));
        assert!(catalog_has_voice("expr-voice-5-m"));
        assert!(!catalog_has_voice("af_heart"));
    }

    #[test]
    fn default_voice_is_in_the_catalog() {
        assert!(catalog_has_voice(&AppConfig::default().voice));
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "purr",
            "--text",
            "hi",
            "--output",
            "out.wav",
            "--voice",
            "expr-voice-3-m",
            "--speed",
            "1.5",
        ]);
        let resolved = ResolvedConfig::from_cli_and_config(&cli, &AppConfig::default());
        assert_eq!(resolved.voice, "expr-voice-3-m");
        assert_eq!(resolved.speed, 1.5);
    }

    #[test]
    fn config_fills_missing_cli_values() {
        let cli = Cli::parse_from(["purr", "--text", "hi", "--output", "out.wav"]);
        let resolved = ResolvedConfig::from_cli_and_config(&cli, &AppConfig::default());
        assert_eq!(resolved.voice, "expr-voice-2-f");
        assert_eq!(resolved.speed, 1.0);
        assert!(!resolved.verbose);
    }

    #[test]
    fn speed_bounds_match_the_model_contract() {
        assert!((SPEED_MIN..=SPEED_MAX).contains(&1.0));
        assert!(!(SPEED_MIN..=SPEED_MAX).contains(&0.1));
        assert!(!(SPEED_MIN..=SPEED_MAX).contains(&2.5));
    }
}
