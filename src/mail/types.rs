use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Email data scraped from the open message, as sent to the reply endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload {
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub to_address: String,
}

impl EmailPayload {
    pub fn new(subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            content: content.into(),
            from_address: String::new(),
            to_address: String::new(),
        }
    }

    /// Both subject and content are required by the backend.
    pub fn is_complete(&self) -> bool {
        !self.subject.is_empty() && !self.content.is_empty()
    }
}

/// Reply tone requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Formal,
    Courteous,
    Concise,
    Casual,
    Empathetic,
    Rigid,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Formal,
        Tone::Courteous,
        Tone::Concise,
        Tone::Casual,
        Tone::Empathetic,
        Tone::Rigid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Courteous => "Courteous",
            Tone::Concise => "Concise",
            Tone::Casual => "Casual",
            Tone::Empathetic => "Empathetic",
            Tone::Rigid => "Rigid",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption::new("tone", s, Tone::ALL.map(|t| t.as_str())))
    }
}

/// Granularity of a thread summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryStyle {
    #[default]
    Short,
    BulletPoints,
    Detailed,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 3] = [
        SummaryStyle::Short,
        SummaryStyle::BulletPoints,
        SummaryStyle::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Short => "Short",
            SummaryStyle::BulletPoints => "BulletPoints",
            SummaryStyle::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStyle {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_', ' '], "");
        SummaryStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                UnknownOption::new("summary style", s, SummaryStyle::ALL.map(|t| t.as_str()))
            })
    }
}

/// A tone or style name that is not in the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: String,
}

impl UnknownOption {
    fn new<const N: usize>(kind: &'static str, value: &str, expected: [&str; N]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_camel_case() {
        let mut payload = EmailPayload::new("Hello", "Let's meet tomorrow");
        payload.from_address = "ann@example.com".to_string();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "subject": "Hello",
                "content": "Let's meet tomorrow",
                "fromAddress": "ann@example.com",
                "toAddress": "",
            })
        );
    }

    #[test]
    fn test_payload_addresses_default_when_missing() {
        let payload: EmailPayload =
            serde_json::from_str(r#"{"subject":"Hi","content":"Body"}"#).unwrap();
        assert_eq!(payload, EmailPayload::new("Hi", "Body"));
        assert!(payload.is_complete());
        assert!(!EmailPayload::new("", "Body").is_complete());
    }

    #[test]
    fn test_tone_parsing_is_case_insensitive() {
        assert_eq!("formal".parse::<Tone>().unwrap(), Tone::Formal);
        assert_eq!(" Empathetic ".parse::<Tone>().unwrap(), Tone::Empathetic);
        let err = "grumpy".parse::<Tone>().unwrap_err();
        assert!(err.to_string().contains("grumpy"));
        assert!(err.to_string().contains("Courteous"));
    }

    #[test]
    fn test_style_parsing_accepts_separators() {
        assert_eq!(
            "bullet-points".parse::<SummaryStyle>().unwrap(),
            SummaryStyle::BulletPoints
        );
        assert_eq!("Detailed".parse::<SummaryStyle>().unwrap(), SummaryStyle::Detailed);
        assert!("long".parse::<SummaryStyle>().is_err());
    }

    #[test]
    fn test_wire_names_match_backend_params() {
        assert_eq!(serde_json::to_string(&Tone::Concise).unwrap(), r#""Concise""#);
        assert_eq!(
            serde_json::to_string(&SummaryStyle::BulletPoints).unwrap(),
            r#""BulletPoints""#
        );
        assert_eq!(Tone::default(), Tone::Formal);
        assert_eq!(SummaryStyle::default(), SummaryStyle::Short);
    }
}
