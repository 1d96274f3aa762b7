//! The invocation contract: one JSON argument carrying the request, passed
//! inline or as `@path-to-json-file`.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use terrascan_types::{SegResult, SegmentationError};

fn default_model() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    pub image_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_model")]
    pub model_type: String,
}

impl RequestParams {
    /// Parse the CLI's params argument. A leading `@` redirects to a file.
    pub fn load(argument: &str) -> SegResult<Self> {
        let text = match argument.strip_prefix('@') {
            Some(path) => fs::read_to_string(path).map_err(|err| {
                SegmentationError::invalid_input(format!(
                    "could not read params file {path}: {err}"
                ))
            })?,
            None => argument.to_string(),
        };
        serde_json::from_str(&text).map_err(|err| {
            SegmentationError::invalid_input(format!("malformed request JSON: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_json_parses_with_default_model() {
        let params =
            RequestParams::load(r#"{"imagePath": "in.png", "outputDir": "out"}"#).unwrap();
        assert_eq!(params.image_path, PathBuf::from("in.png"));
        assert_eq!(params.output_dir, PathBuf::from("out"));
        assert_eq!(params.model_type, "general");
    }

    #[test]
    fn explicit_model_type_is_kept() {
        let params = RequestParams::load(
            r#"{"imagePath": "a.jpg", "outputDir": "o", "modelType": "mining"}"#,
        )
        .unwrap();
        assert_eq!(params.model_type, "mining");
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        assert!(matches!(
            RequestParams::load("{not json"),
            Err(SegmentationError::InvalidInput { .. })
        ));
        assert!(matches!(
            RequestParams::load(r#"{"outputDir": "o"}"#),
            Err(SegmentationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn missing_params_file_is_invalid_input() {
        assert!(matches!(
            RequestParams::load("@/definitely/not/here.json"),
            Err(SegmentationError::InvalidInput { .. })
        ));
    }
}
