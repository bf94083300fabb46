use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Shape of the transcription result requested by the client
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseFormat {
    /// `{"text": ...}` object produced by the provider
    #[default]
    Json,
    /// Plain transcript
    Text,
    /// SubRip subtitles
    Srt,
    /// Provider JSON with segments, words and timing
    VerboseJson,
    /// `WebVTT` subtitles
    Vtt,
}

impl ResponseFormat {
    /// Every supported format, in the order a form offers them
    pub const ALL: [Self; 5] = [Self::Json, Self::Text, Self::Srt, Self::VerboseJson, Self::Vtt];

    /// Whether the provider answers with a JSON document for this format
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::VerboseJson)
    }

    /// Key the textual result is wrapped under, `None` for JSON formats
    pub const fn envelope_key(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Srt => Some("srt"),
            Self::Vtt => Some("vtt"),
            Self::Json | Self::VerboseJson => None,
        }
    }

    /// Timestamp granularities are only honored for `verbose_json`
    pub const fn supports_timestamp_granularities(self) -> bool {
        matches!(self, Self::VerboseJson)
    }
}

/// Level of time alignment requested for `verbose_json` results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimestampGranularity {
    Word,
    Segment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("verbose_json".parse::<ResponseFormat>().unwrap(), ResponseFormat::VerboseJson);
        assert_eq!("vtt".parse::<ResponseFormat>().unwrap(), ResponseFormat::Vtt);
        assert!("bogus".parse::<ResponseFormat>().is_err());
        assert!("JSON".parse::<ResponseFormat>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for format in ResponseFormat::ALL {
            assert_eq!(format.to_string().parse::<ResponseFormat>().unwrap(), format);
        }
        assert_eq!(ResponseFormat::VerboseJson.as_ref(), "verbose_json");
    }

    #[test]
    fn envelope_keys() {
        assert_eq!(ResponseFormat::Text.envelope_key(), Some("text"));
        assert_eq!(ResponseFormat::Srt.envelope_key(), Some("srt"));
        assert_eq!(ResponseFormat::Vtt.envelope_key(), Some("vtt"));
        assert_eq!(ResponseFormat::Json.envelope_key(), None);
        assert_eq!(ResponseFormat::VerboseJson.envelope_key(), None);
    }

    #[test]
    fn granularities_deserialize_from_json_array() {
        let parsed: Vec<TimestampGranularity> = serde_json::from_str(r#"["word","segment"]"#).unwrap();
        assert_eq!(parsed, vec![TimestampGranularity::Word, TimestampGranularity::Segment]);
        assert!(serde_json::from_str::<Vec<TimestampGranularity>>(r#"["sentence"]"#).is_err());
    }
}
