//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "OceanVisuo")]
#[command(about = "Audio-reactive ocean and sky visualizer", long_about = None)]
pub struct Args {
    /// Audio file to play at startup (files can also be dropped onto the window)
    #[arg(value_name = "AUDIO_FILE")]
    pub audio: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_file_is_optional() {
        let args = Args::try_parse_from(["oceanvisuo"]).unwrap();
        assert!(args.audio.is_none());

        let args = Args::try_parse_from(["oceanvisuo", "track.mp3"]).unwrap();
        assert_eq!(args.audio, Some(PathBuf::from("track.mp3")));
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Args::try_parse_from(["oceanvisuo", "a.mp3", "b.mp3"]).is_err());
    }
}
