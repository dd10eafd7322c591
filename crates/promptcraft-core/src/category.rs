//! Prompt categories and the keyword classifier.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Top-level classification of a prompt, selecting its question list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Chat,
    Coding,
    App,
    Image,
    Video,
    Research,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Chat,
        Category::Coding,
        Category::App,
        Category::Image,
        Category::Video,
        Category::Research,
    ];

    /// Wire tag (`"coding"`, `"image"`, ...)
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Chat => "chat",
            Category::Coding => "coding",
            Category::App => "app",
            Category::Image => "image",
            Category::Video => "video",
            Category::Research => "research",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Chat => "Chat / Writing",
            Category::Coding => "Coding",
            Category::App => "App Building",
            Category::Image => "Image Generation",
            Category::Video => "Video Generation",
            Category::Research => "Research / Analysis",
        }
    }

    /// Parse a tag, falling back to [`Category::Chat`] when unrecognized
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" | "writing" => Ok(Category::Chat),
            "coding" | "code" => Ok(Category::Coding),
            "app" => Ok(Category::App),
            "image" => Ok(Category::Image),
            "video" => Ok(Category::Video),
            "research" => Ok(Category::Research),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Guesses a category from free text.
///
/// A convenience for pre-selecting a category; the wizard itself never
/// depends on it.
pub trait CategoryClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Category;
}

/// Word-boundary keyword matching, first matching category wins
pub struct KeywordClassifier {
    rules: Vec<(Category, Regex)>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        let table: [(Category, &str); 5] = [
            (
                Category::Coding,
                r"\b(code|function|api|script|debug|fix|implement|class|method|algorithm|program|developer|backend|frontend|database|sql|query)\b",
            ),
            (
                Category::App,
                r"\b(app|application|website|platform|system|build|create|develop|clone|dashboard|portal|saas|mobile app|web app)\b",
            ),
            (
                Category::Image,
                r"\b(image|picture|photo|illustration|art|draw|design|visual|portrait|landscape|render|3d|painting|anime|realistic)\b",
            ),
            (
                Category::Video,
                r"\b(video|animation|footage|clip|scene|cinematic|motion|film|movie|trailer|commercial|vfx)\b",
            ),
            (
                Category::Research,
                r"\b(research|analyze|study|report|compare|investigate|explore|explain|understand|review|evaluate|assess)\b",
            ),
        ];

        let rules = table
            .into_iter()
            .filter_map(|(category, pattern)| Regex::new(pattern).ok().map(|re| (category, re)))
            .collect();

        Self { rules }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Category {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Chat)
    }
}
