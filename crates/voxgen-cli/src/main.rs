use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use voxgen_gemini::GeminiClient;
use voxgen_speech::{
    AssetInspector, Speaker, SpeechParams, SpeechSynthesizer, get_asset_info,
};

#[derive(Parser)]
#[command(name = "voxgen")]
#[command(about = "Generate voiceover audio and inspect media assets with Gemini", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate speech audio from text and save it as a WAV file
    Speak {
        /// Narration text; for multi-speaker use "Name: dialogue" lines
        text: String,

        /// Output file (absolute or relative); .wav extension is enforced
        #[arg(short, long)]
        out: Option<String>,

        /// Base directory for auto-generated file names
        #[arg(long, conflicts_with = "out")]
        out_dir: Option<PathBuf>,

        /// Prebuilt voice for single-speaker narration
        #[arg(short, long, default_value = "Kore")]
        voice: String,

        /// Delivery instructions (tone, pacing, accent)
        #[arg(short, long, default_value = "")]
        style: String,

        /// TTS model
        #[arg(short, long, default_value = "gemini-2.5-flash-preview-tts")]
        model: String,

        /// Speaker as NAME or NAME:VOICE; pass twice for dialogue
        #[arg(long = "speaker", value_parser = parse_speaker)]
        speakers: Vec<Speaker>,
    },
    /// Print metadata (size, mime, duration, codecs) for a media file
    Info {
        /// Path to the media file
        path: PathBuf,
    },
    /// Upload a media file to Gemini and analyze it with a prompt
    Inspect {
        /// Path to the media file
        path: PathBuf,

        /// What to analyze; defaults to a voiceover production audit
        #[arg(short, long)]
        prompt: Option<String>,

        /// Analysis model (defaults to GEMINI_MODEL or gemini-2.0-flash)
        #[arg(short, long)]
        model: Option<String>,
    },
}

fn parse_speaker(raw: &str) -> Result<Speaker, String> {
    let (name, voice) = match raw.split_once(':') {
        Some((name, voice)) => (name.trim(), Some(voice.trim().to_string())),
        None => (raw.trim(), None),
    };
    if name.is_empty() {
        return Err("speaker name must not be empty".to_string());
    }
    Ok(Speaker {
        name: name.to_string(),
        voice_name: voice.filter(|v| !v.is_empty()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Speak {
            text,
            out,
            out_dir,
            voice,
            style,
            model,
            speakers,
        } => {
            let params = SpeechParams {
                text,
                output_path: out,
                output_dir: out_dir,
                voice_name: voice,
                style_prompt: style,
                model,
                speakers,
            };
            let synthesizer = SpeechSynthesizer::new(GeminiClient::from_env()?);
            let output = synthesizer.generate(&params).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Info { path } => {
            let info = get_asset_info(&path).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Inspect {
            path,
            prompt,
            model,
        } => {
            let inspector = AssetInspector::new(GeminiClient::from_env()?);
            let analysis = inspector
                .inspect(&path, prompt.as_deref(), model.as_deref())
                .await?;
            println!("{analysis}");
        }
    }

    Ok(())
}
