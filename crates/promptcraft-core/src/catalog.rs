//! Built-in question lists per category.

use async_trait::async_trait;

use crate::{Category, QuestionDefinition, QuestionList};

/// Anything that can produce the question list for a prompt
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Questions for `original_text` in `category`; never fails, implementations
    /// fall back to a usable list instead
    async fn questions_for(&self, original_text: &str, category: Category) -> QuestionList;
}

/// Static mapping from category to its question list
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionCatalog;

impl QuestionCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Look up by tag, using the chat list for unrecognized tags
    pub fn get(&self, category: &str) -> QuestionList {
        self.for_category(Category::from_tag_or_default(category))
    }

    pub fn for_category(&self, category: Category) -> QuestionList {
        let questions = match category {
            Category::Chat => chat(),
            Category::Coding => coding(),
            Category::App => app(),
            Category::Image => image(),
            Category::Video => video(),
            Category::Research => research(),
        };
        QuestionList::new(category, questions)
    }
}

#[async_trait]
impl QuestionSource for QuestionCatalog {
    async fn questions_for(&self, _original_text: &str, category: Category) -> QuestionList {
        self.for_category(category)
    }
}

fn chat() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "tone",
            "What tone should the response have?",
            &[
                "Professional & Formal",
                "Casual & Friendly",
                "Technical & Precise",
                "Creative & Engaging",
                "Educational & Clear",
            ],
        ),
        QuestionDefinition::single_choice(
            "length",
            "How detailed should the response be?",
            &[
                "Brief (1-2 paragraphs)",
                "Moderate (3-5 paragraphs)",
                "Comprehensive (detailed explanation)",
                "Step-by-step guide",
            ],
        ),
        QuestionDefinition::single_choice(
            "audience",
            "Who is the target audience?",
            &[
                "Beginners / General public",
                "Students / Learners",
                "Professionals / Experts",
                "Technical developers",
                "Business executives",
            ],
        ),
        QuestionDefinition::boolean_choice("examples", "Should the response include examples?"),
        QuestionDefinition::multi_choice(
            "format",
            "What format elements would be helpful?",
            &[
                "Bullet points",
                "Numbered steps",
                "Code snippets",
                "Tables",
                "Headings",
                "Comparisons",
                "Analogies",
            ],
            true,
        ),
    ]
}

fn coding() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "language",
            "What programming language?",
            &[
                "Python",
                "JavaScript/TypeScript",
                "Java",
                "C#/.NET",
                "Go",
                "Rust",
                "Other/Multiple",
            ],
        ),
        QuestionDefinition::single_choice(
            "complexity",
            "What complexity level?",
            &[
                "Simple script/function",
                "Moderate (multiple functions)",
                "Complex (classes/modules)",
                "Production-ready architecture",
            ],
        ),
        QuestionDefinition::boolean_choice("comments", "Include detailed code comments?"),
        QuestionDefinition::boolean_choice(
            "errorHandling",
            "Include error handling and validation?",
        ),
        QuestionDefinition::multi_choice(
            "extras",
            "What additional elements to include?",
            &[
                "Unit tests",
                "Documentation",
                "Type hints",
                "Logging",
                "Configuration",
                "CLI interface",
            ],
            true,
        ),
    ]
}

fn app() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "platform",
            "What platform is this for?",
            &[
                "Web Application",
                "Mobile App (iOS/Android)",
                "Desktop Application",
                "Cross-platform",
                "API/Backend Service",
            ],
        ),
        QuestionDefinition::single_choice(
            "stack",
            "Preferred technology stack?",
            &[
                "React/Next.js",
                "Vue/Nuxt",
                "Angular",
                "Flutter/Dart",
                "React Native",
                "Python/Django/FastAPI",
                "Node.js/Express",
                "No preference",
            ],
        ),
        QuestionDefinition::single_choice(
            "scale",
            "Expected scale of the application?",
            &[
                "Personal/Hobby project",
                "Small team/Startup",
                "Medium business",
                "Enterprise scale",
            ],
        ),
        QuestionDefinition::boolean_choice("auth", "Does it need user authentication?"),
        QuestionDefinition::multi_choice(
            "features",
            "Key features to include?",
            &[
                "Database",
                "Real-time updates",
                "File uploads",
                "Payments",
                "Analytics",
                "Admin panel",
                "API integration",
            ],
            true,
        ),
    ]
}

fn image() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "style",
            "What art style do you want?",
            &[
                "Photorealistic",
                "Digital Art / Illustration",
                "Oil Painting / Classical",
                "Anime / Manga",
                "Minimalist / Flat",
                "3D Rendered",
                "Watercolor / Sketch",
            ],
        ),
        QuestionDefinition::single_choice(
            "mood",
            "What mood or atmosphere?",
            &[
                "Bright & Cheerful",
                "Dark & Moody",
                "Calm & Serene",
                "Energetic & Dynamic",
                "Mysterious & Ethereal",
                "Warm & Cozy",
            ],
        ),
        QuestionDefinition::single_choice(
            "composition",
            "What type of composition?",
            &[
                "Portrait / Close-up",
                "Full scene / Landscape",
                "Product shot",
                "Abstract / Pattern",
                "Character design",
                "Environment / Background",
            ],
        ),
        QuestionDefinition::multi_choice(
            "lighting",
            "Select lighting preferences:",
            &[
                "Natural light",
                "Golden hour",
                "Dramatic shadows",
                "Soft diffused",
                "Neon/Cyberpunk",
                "Studio lighting",
                "Backlit",
            ],
            true,
        ),
        QuestionDefinition::multi_choice(
            "quality",
            "Technical quality tags:",
            &[
                "4K",
                "8K",
                "Highly detailed",
                "Sharp focus",
                "Bokeh",
                "HDR",
                "Octane render",
            ],
            true,
        ),
    ]
}

fn video() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "type",
            "What type of video?",
            &[
                "Cinematic scene",
                "Product showcase",
                "Animation / Motion graphics",
                "Tutorial / Explainer",
                "Social media content",
                "Music video style",
            ],
        ),
        QuestionDefinition::single_choice(
            "duration",
            "Approximate duration?",
            &[
                "Short (5-15 seconds)",
                "Medium (30-60 seconds)",
                "Long (1-3 minutes)",
                "Extended (3+ minutes)",
            ],
        ),
        QuestionDefinition::single_choice(
            "motion",
            "Camera movement style?",
            &[
                "Static / Locked",
                "Smooth pan/tilt",
                "Tracking / Follow",
                "Drone / Aerial",
                "Handheld / Dynamic",
                "Time-lapse",
            ],
        ),
        QuestionDefinition::boolean_choice("audio", "Include audio/music suggestions?"),
        QuestionDefinition::multi_choice(
            "elements",
            "Visual elements to include:",
            &[
                "Text overlays",
                "Transitions",
                "Slow motion",
                "Split screen",
                "Color grading",
                "VFX",
            ],
            true,
        ),
    ]
}

fn research() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::single_choice(
            "depth",
            "How deep should the analysis be?",
            &[
                "Quick overview",
                "Moderate summary",
                "In-depth analysis",
                "Comprehensive research paper",
            ],
        ),
        QuestionDefinition::single_choice(
            "perspective",
            "What perspective or approach?",
            &[
                "Objective / Neutral",
                "Critical analysis",
                "Comparative study",
                "Historical context",
                "Future predictions",
                "Practical applications",
            ],
        ),
        QuestionDefinition::boolean_choice("sources", "Should it reference sources/citations?"),
        QuestionDefinition::boolean_choice("data", "Include data, statistics, or metrics?"),
        QuestionDefinition::multi_choice(
            "deliverables",
            "What deliverables do you need?",
            &[
                "Executive summary",
                "Key findings",
                "Recommendations",
                "Charts/graphs",
                "Action items",
                "Bibliography",
            ],
            true,
        ),
    ]
}
