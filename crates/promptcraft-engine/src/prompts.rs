use promptcraft_core::{AnswerStore, Category};

/// Prompt templates for enhancement and question generation
pub struct EnhancementPrompts;

impl EnhancementPrompts {
    /// System prompt instructing the model how to enhance a `category` prompt
    pub fn system_prompt(category: Category) -> &'static str {
        match category {
            Category::Chat => CHAT_SYSTEM_PROMPT,
            Category::Coding => CODING_SYSTEM_PROMPT,
            Category::App => APP_SYSTEM_PROMPT,
            Category::Image => IMAGE_SYSTEM_PROMPT,
            Category::Video => VIDEO_SYSTEM_PROMPT,
            Category::Research => RESEARCH_SYSTEM_PROMPT,
        }
    }

    /// Build the user message carrying the original prompt and the answers.
    ///
    /// Answers appear in the order they were first committed. Explicitly
    /// cleared multi-choice answers are left out.
    pub fn build_enhancement_request(original_text: &str, answers: &AnswerStore) -> String {
        let preferences = answers
            .iter()
            .filter(|(_, answer)| !answer.is_empty())
            .map(|(key, answer)| format!("- {}: {}", Self::format_key(key), answer.to_prompt_string()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Original prompt: "{original_text}"

User preferences:
{preferences}

Please create an enhanced, comprehensive prompt based on these specifications. Output ONLY the enhanced prompt, nothing else."#
        )
    }

    /// Humanize a question id: `errorHandling` becomes `Error Handling`
    pub fn format_key(key: &str) -> String {
        let mut spaced = String::with_capacity(key.len() + 4);
        for c in key.chars() {
            if c.is_ascii_uppercase() {
                spaced.push(' ');
            }
            spaced.push(c);
        }

        let mut chars = spaced.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        capitalized.trim().to_string()
    }

    /// System prompt for generating clarifying questions
    pub fn question_system_prompt() -> &'static str {
        QUESTION_SYSTEM_PROMPT
    }

    /// User message asking for questions about `original_text`
    pub fn build_question_request(original_text: &str, category: Category) -> String {
        format!(
            r#"User's prompt: "{original_text}"
Prompt category: {label}

Generate 4-5 clarifying questions SPECIFIC to this prompt that will help create a comprehensive, detailed version. Focus on what's missing or unclear in their request.

Return ONLY the JSON array, no other text."#,
            label = category.label()
        )
    }
}

const CHAT_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer. Transform the user's simple prompt into a comprehensive, detailed prompt that will get excellent results from AI assistants like ChatGPT or Claude.

Based on the user's preferences, create a prompt that includes:
- Clear role/persona for the AI
- Specific context and background
- Detailed requirements and constraints
- Output format specifications
- Any requested elements (examples, structure, etc.)

Make the enhanced prompt self-contained and ready to copy-paste."#;

const CODING_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer specializing in code generation prompts. Transform the user's simple prompt into a comprehensive prompt that will generate high-quality code.

Based on the user's preferences, create a prompt that includes:
- Specific programming language and version
- Required functionality in detail
- Code structure and organization requirements
- Error handling, validation, and edge cases
- Documentation and commenting style
- Any additional elements requested (tests, types, etc.)

Make the enhanced prompt clear and actionable for code generation."#;

const APP_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer for application development. Transform the user's simple app idea into a comprehensive development prompt.

Based on the user's preferences, create a prompt that includes:
- Detailed application requirements and features
- Technology stack specifications
- Architecture and design patterns
- User authentication and authorization needs
- Database and data model requirements
- API design and integrations
- UI/UX considerations
- Scalability and performance requirements

Make the enhanced prompt suitable for building a complete application."#;

const IMAGE_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer for AI image generation (Midjourney, DALL-E, Stable Diffusion). Transform the user's simple description into a detailed image generation prompt.

Based on the user's preferences, create a prompt that includes:
- Subject description with specific details
- Art style and medium specifications
- Mood, atmosphere, and color palette
- Composition and framing
- Lighting setup and effects
- Technical quality parameters
- Negative prompt suggestions if applicable

Format: Keep the prompt flowing naturally, with technical specs at the end."#;

const VIDEO_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer for AI video generation (Runway, Pika, Sora). Transform the user's simple description into a detailed video generation prompt.

Based on the user's preferences, create a prompt that includes:
- Scene description with specific details
- Camera movement and angles
- Duration and pacing
- Visual style and mood
- Motion and action descriptions
- Transition suggestions
- Audio/music style if applicable
- Technical quality parameters

Make the enhanced prompt suitable for AI video generation tools."#;

const RESEARCH_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer for research and analysis tasks. Transform the user's simple query into a comprehensive research prompt.

Based on the user's preferences, create a prompt that includes:
- Clear research objective and scope
- Specific questions to address
- Required depth and perspective
- Data and evidence requirements
- Analysis methodology
- Output format and structure
- Deliverables and key sections

Make the enhanced prompt suitable for thorough research and analysis."#;

const QUESTION_SYSTEM_PROMPT: &str = r#"You are a prompt engineering expert. Your task is to generate 4-5 clarifying questions that will help create a more detailed and effective prompt.

RULES:
1. Generate questions SPECIFIC to the user's prompt, not generic questions
2. Each question should help uncover important details missing from the prompt
3. Questions should be in JSON format with types: "mcq", "yesno", or "chips"
4. MCQ questions should have 3-5 relevant options based on the context
5. Chips allow multiple selections and should have 4-7 options
6. Make questions easy to answer with clicks, not typing

RESPONSE FORMAT (valid JSON array only, no markdown):
[
  {
    "id": "unique_id",
    "type": "mcq",
    "question": "Your question here?",
    "options": ["Option 1", "Option 2", "Option 3", "Option 4"]
  },
  {
    "id": "unique_id2",
    "type": "yesno",
    "question": "Yes or no question here?"
  },
  {
    "id": "unique_id3",
    "type": "chips",
    "question": "Select multiple options?",
    "options": ["Tag 1", "Tag 2", "Tag 3", "Tag 4", "Tag 5"],
    "multiSelect": true
  }
]"#;
