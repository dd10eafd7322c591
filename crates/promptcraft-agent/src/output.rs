use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply from a chat backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutput {
    /// Assistant message text, untrimmed
    pub content: String,
    /// Model that produced the reply, when the backend reports it
    pub model: Option<String>,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl ChatOutput {
    pub fn new(content: String, model: Option<String>, duration: Duration) -> Self {
        Self {
            content,
            model,
            duration,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_serializes_as_seconds() {
        let output = ChatOutput::new("hi".into(), None, Duration::from_millis(1500));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["duration"], 1.5);
    }

    #[test]
    fn test_blank_content() {
        assert!(ChatOutput::new(" \n".into(), None, Duration::ZERO).is_blank());
        assert!(!ChatOutput::new("ok".into(), None, Duration::ZERO).is_blank());
    }
}
