//! Agent categories, agent names, and the rules that tie form fields to them.
//!
//! The set of names available under each category is supplied from outside
//! (see [`AgentCatalog`]); the display order and field rules are fixed here.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level workflow choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentCategory {
    #[serde(rename = "blog_researcher_ai_agent")]
    Researcher,
    #[serde(rename = "blog_artist_ai_agent")]
    Artist,
}

impl AgentCategory {
    pub const ALL: [AgentCategory; 2] = [AgentCategory::Researcher, AgentCategory::Artist];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Researcher => "blog_researcher_ai_agent",
            AgentCategory::Artist => "blog_artist_ai_agent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentCategory::Researcher => "Blog Researcher AI Agent",
            AgentCategory::Artist => "Blog Artist AI Agent",
        }
    }

    /// The name shown first and selected by default when this category is picked.
    pub fn pinned_default(&self) -> AgentName {
        match self {
            AgentCategory::Researcher => AgentName::TopicResearcher,
            AgentCategory::Artist => AgentName::RandomPromptArtist,
        }
    }

    /// The other category (there are only two).
    pub fn toggled(&self) -> Self {
        match self {
            AgentCategory::Researcher => AgentCategory::Artist,
            AgentCategory::Artist => AgentCategory::Researcher,
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or_else(|| format!("unknown agent type '{}'", s))
    }
}

/// Specific sub-workflow within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    TopicResearcher,
    TopicEngineer,
    PromptArtist,
    RandomPromptArtist,
}

impl AgentName {
    pub const ALL: [AgentName; 4] =
        [AgentName::TopicResearcher, AgentName::TopicEngineer, AgentName::PromptArtist, AgentName::RandomPromptArtist];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::TopicResearcher => "topic_researcher",
            AgentName::TopicEngineer => "topic_engineer",
            AgentName::PromptArtist => "prompt_artist",
            AgentName::RandomPromptArtist => "random_prompt_artist",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentName::TopicResearcher => "Topic Researcher (Provide any Topic)",
            AgentName::TopicEngineer => "Topic Engineer (Provide a Python Engineering Topic)",
            AgentName::PromptArtist => "Prompt Artist (Provide a Image Prompt)",
            AgentName::RandomPromptArtist => "Random Prompt Artist (Let the AI Dream an Image Prompt)",
        }
    }

    pub fn category(&self) -> AgentCategory {
        match self {
            AgentName::TopicResearcher | AgentName::TopicEngineer => AgentCategory::Researcher,
            AgentName::PromptArtist | AgentName::RandomPromptArtist => AgentCategory::Artist,
        }
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|n| n.as_str() == s).ok_or_else(|| format!("unknown agent name '{}'", s))
    }
}

/// Valid agent names per category, in the order the backend supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCatalog {
    names: HashMap<AgentCategory, Vec<AgentName>>,
}

impl AgentCatalog {
    pub fn new(names: HashMap<AgentCategory, Vec<AgentName>>) -> Self {
        Self { names }
    }

    /// Build a catalog from raw string data (`agent_type -> [agent_name]`).
    ///
    /// Unknown categories, unknown names, and names filed under the wrong
    /// category are dropped with a warning.
    pub fn from_raw(raw: &HashMap<String, Vec<String>>) -> Self {
        let mut names: HashMap<AgentCategory, Vec<AgentName>> = HashMap::new();
        for (category_str, raw_names) in raw {
            let Ok(category) = category_str.parse::<AgentCategory>() else {
                tracing::warn!(agent_type = %category_str, "ignoring unknown agent type in catalog");
                continue;
            };
            let entry = names.entry(category).or_default();
            for raw_name in raw_names {
                match raw_name.parse::<AgentName>() {
                    Ok(name) if name.category() == category => entry.push(name),
                    Ok(name) => {
                        tracing::warn!(agent_name = %name, agent_type = %category, "agent name filed under wrong type")
                    }
                    Err(e) => tracing::warn!("ignoring catalog entry: {}", e),
                }
            }
        }
        Self { names }
    }

    /// Raw names for a category, unordered from the UI's point of view.
    pub fn names(&self, category: AgentCategory) -> &[AgentName] {
        self.names.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every valid name for `category` with the pinned default first and the
    /// rest in their original relative order. Duplicates collapse to their
    /// first occurrence.
    pub fn select_category(&self, category: AgentCategory) -> Vec<AgentName> {
        let pinned = category.pinned_default();
        let mut ordered: Vec<AgentName> = Vec::with_capacity(self.names(category).len());
        if self.names(category).contains(&pinned) {
            ordered.push(pinned);
        }
        for name in self.names(category) {
            if !ordered.contains(name) {
                ordered.push(*name);
            }
        }
        ordered
    }
}

impl Default for AgentCatalog {
    fn default() -> Self {
        let mut names = HashMap::new();
        names.insert(AgentCategory::Researcher, vec![AgentName::TopicEngineer, AgentName::TopicResearcher]);
        names.insert(AgentCategory::Artist, vec![AgentName::PromptArtist, AgentName::RandomPromptArtist]);
        Self { names }
    }
}

/// Form fields other than the two selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Topic,
    ImagePrompt,
    WebhookUrl,
    ChaosPercentage,
}

impl InputField {
    pub const ALL: [InputField; 4] =
        [InputField::Topic, InputField::ImagePrompt, InputField::WebhookUrl, InputField::ChaosPercentage];

    pub fn label(&self) -> &'static str {
        match self {
            InputField::Topic => "Topic",
            InputField::ImagePrompt => "Image Prompt",
            InputField::WebhookUrl => "Webhook URL",
            InputField::ChaosPercentage => "Chaos %",
        }
    }
}

/// Visibility and requiredness of every input field for one category/name pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldRules {
    pub topic_visible: bool,
    pub topic_required: bool,
    pub image_visible: bool,
    pub image_required: bool,
    pub webhook_visible: bool,
    pub webhook_required: bool,
    pub chaos_visible: bool,
}

impl FieldRules {
    pub fn visible(&self, field: InputField) -> bool {
        match field {
            InputField::Topic => self.topic_visible,
            InputField::ImagePrompt => self.image_visible,
            InputField::WebhookUrl => self.webhook_visible,
            InputField::ChaosPercentage => self.chaos_visible,
        }
    }

    pub fn required(&self, field: InputField) -> bool {
        match field {
            InputField::Topic => self.topic_required,
            InputField::ImagePrompt => self.image_required,
            InputField::WebhookUrl => self.webhook_required,
            InputField::ChaosPercentage => false,
        }
    }

    /// Visible fields in display order.
    pub fn visible_fields(&self) -> Vec<InputField> {
        InputField::ALL.into_iter().filter(|f| self.visible(*f)).collect()
    }

    /// No field is both hidden and required.
    pub fn is_consistent(&self) -> bool {
        InputField::ALL.into_iter().all(|f| self.visible(f) || !self.required(f))
    }
}

pub fn field_rules(category: AgentCategory, name: AgentName) -> FieldRules {
    match category {
        AgentCategory::Researcher => FieldRules { topic_visible: true, topic_required: true, ..FieldRules::default() },
        AgentCategory::Artist => {
            let needs_prompt = name != AgentName::RandomPromptArtist;
            FieldRules {
                topic_visible: false,
                topic_required: false,
                image_visible: needs_prompt,
                image_required: needs_prompt,
                webhook_visible: true,
                webhook_required: true,
                chaos_visible: true,
            }
        }
    }
}
