//! JSON result protocol: exactly one object per run, on stdout when the
//! bridge succeeds and on stderr when it fails.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SynthesisReport {
    pub success: bool,
    pub output_path: String,
    pub file_size: u64,
    pub voice: String,
    pub speed: f32,
    pub text_length: usize,
    pub phoneme_backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VoiceEntry {
    pub id: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VoiceListReport {
    pub success: bool,
    pub voices: Vec<VoiceEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    success: bool,
    error: &'a str,
}

/// Print a success report on stdout.
pub fn emit_success<T: Serialize>(report: &T) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(err) => emit_failure(&format!("failed to encode result: {}", err)),
    }
}

/// Print an error report on stderr.
pub fn emit_failure(message: &str) {
    let report = ErrorReport {
        success: false,
        error: message,
    };
    match serde_json::to_string(&report) {
        Ok(line) => eprintln!("{}", line),
        Err(_) => eprintln!("{{\"success\":false,\"error\":\"unreportable error\"}}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_report_shape() {
        let report = SynthesisReport {
            success: true,
            output_path: "/tmp/out.wav".to_string(),
            file_size: 4096,
            voice: "expr-voice-2-f".to_string(),
            speed: 1.0,
            text_length: 11,
            phoneme_backend: "espeak-ng",
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["output_path"], "/tmp/out.wav");
        assert_eq!(value["file_size"], 4096);
        assert_eq!(value["phoneme_backend"], "espeak-ng");
    }

    #[test]
    fn voice_list_report_shape() {
        let report = VoiceListReport {
            success: true,
            voices: vec![VoiceEntry {
                id: "expr-voice-2-f",
                description: "Female Voice #2 - Expressive",
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["voices"][0]["id"], "expr-voice-2-f");
    }

    #[test]
    fn error_report_shape() {
        let report = ErrorReport {
            success: false,
            error: "boom",
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
    }
}
