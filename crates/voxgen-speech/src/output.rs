//! Output path resolution for generated WAV files.
//!
//! Priority: explicit path (resolved against the working directory, `.wav`
//! extension enforced), then `<output_dir>/tts-<stamp>.wav`, then
//! `<cwd>/tts_output/tts-<stamp>.wav`. The stamp has second granularity, so
//! two calls within the same second can resolve to the same file; that is an
//! accepted limitation of the naming scheme.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Directory used for auto-generated file names when no output dir is given
pub const DEFAULT_OUTPUT_DIR: &str = "tts_output";

const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Resolves the destination for a generated WAV file.
///
/// Pure except for reading the working directory and the clock; see
/// [`resolve_in`] for the testable core.
pub fn resolve_output_path(explicit: Option<&str>, output_dir: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
    resolve_in(&cwd, explicit, output_dir, &stamp)
}

/// Core resolution logic with the working directory and timestamp injected.
pub fn resolve_in(
    cwd: &Path,
    explicit: Option<&str>,
    output_dir: Option<&Path>,
    stamp: &str,
) -> PathBuf {
    if let Some(raw) = explicit {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let path = Path::new(trimmed);
            let mut resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            if !has_wav_extension(&resolved) {
                resolved.set_extension("wav");
            }
            return resolved;
        }
    }

    let base = match output_dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.join(DEFAULT_OUTPUT_DIR),
    };
    base.join(format!("tts-{stamp}.wav"))
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "20260823-120000";

    fn cwd() -> PathBuf {
        PathBuf::from("/work")
    }

    #[test]
    fn test_explicit_absolute_path_kept() {
        let path = resolve_in(&cwd(), Some("/tmp/out/narration.wav"), None, STAMP);
        assert_eq!(path, PathBuf::from("/tmp/out/narration.wav"));
    }

    #[test]
    fn test_explicit_relative_resolved_against_cwd() {
        let path = resolve_in(&cwd(), Some("clips/intro.wav"), None, STAMP);
        assert_eq!(path, PathBuf::from("/work/clips/intro.wav"));
    }

    #[test]
    fn test_explicit_path_extension_replaced() {
        let path = resolve_in(&cwd(), Some("/tmp/narration.mp3"), None, STAMP);
        assert_eq!(path, PathBuf::from("/tmp/narration.wav"));
    }

    #[test]
    fn test_explicit_path_without_extension_gains_wav() {
        let path = resolve_in(&cwd(), Some("narration"), None, STAMP);
        assert_eq!(path, PathBuf::from("/work/narration.wav"));
    }

    #[test]
    fn test_uppercase_wav_extension_accepted() {
        let path = resolve_in(&cwd(), Some("/tmp/OUT.WAV"), None, STAMP);
        assert_eq!(path, PathBuf::from("/tmp/OUT.WAV"));
    }

    #[test]
    fn test_explicit_path_trimmed() {
        let path = resolve_in(&cwd(), Some("  spaced.wav  "), None, STAMP);
        assert_eq!(path, PathBuf::from("/work/spaced.wav"));
    }

    #[test]
    fn test_whitespace_only_explicit_falls_through_to_default() {
        let path = resolve_in(&cwd(), Some("   "), None, STAMP);
        assert_eq!(path, PathBuf::from("/work/tts_output/tts-20260823-120000.wav"));
    }

    #[test]
    fn test_output_dir_used_for_generated_name() {
        let path = resolve_in(&cwd(), None, Some(Path::new("/var/audio")), STAMP);
        assert_eq!(path, PathBuf::from("/var/audio/tts-20260823-120000.wav"));
    }

    #[test]
    fn test_relative_output_dir_resolved_against_cwd() {
        let path = resolve_in(&cwd(), None, Some(Path::new("renders")), STAMP);
        assert_eq!(path, PathBuf::from("/work/renders/tts-20260823-120000.wav"));
    }

    #[test]
    fn test_explicit_path_wins_over_output_dir() {
        let path = resolve_in(
            &cwd(),
            Some("/tmp/direct.wav"),
            Some(Path::new("/var/audio")),
            STAMP,
        );
        assert_eq!(path, PathBuf::from("/tmp/direct.wav"));
    }
}
