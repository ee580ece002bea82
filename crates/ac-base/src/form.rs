//! The form as an explicit state object: current selection, derived name
//! list and field rules, typed values, and the last result.

use crate::agents::{AgentCatalog, AgentCategory, AgentName, FieldRules, InputField, field_rules};
use crate::error::ValidationError;
use crate::request::{self, FormFields, GenerationRequest};
use crate::snapshot::FormSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    category: AgentCategory,
    names: Vec<AgentName>,
    name: AgentName,
    rules: FieldRules,
    pub fields: FormFields,
    last_result: Option<String>,
}

impl FormState {
    pub fn new(catalog: &AgentCatalog) -> Self {
        let category = AgentCategory::Researcher;
        let mut form = Self {
            category,
            names: Vec::new(),
            name: category.pinned_default(),
            rules: FieldRules::default(),
            fields: FormFields::default(),
            last_result: None,
        };
        form.select_category(catalog, category);
        form
    }

    pub fn category(&self) -> AgentCategory {
        self.category
    }

    pub fn name(&self) -> AgentName {
        self.name
    }

    /// Names offered for the current category, in display order.
    pub fn names(&self) -> &[AgentName] {
        &self.names
    }

    pub fn rules(&self) -> FieldRules {
        self.rules
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Switch category: populate the name list, then select its pinned
    /// default (or the first offered name), then recompute rules. Field
    /// values are kept.
    pub fn select_category(&mut self, catalog: &AgentCatalog, category: AgentCategory) {
        self.category = category;
        self.names = catalog.select_category(category);
        self.name = self.names.first().copied().unwrap_or_else(|| category.pinned_default());
        self.refresh_rules();
    }

    /// Select a name from the current list. Returns false (and changes
    /// nothing) if the name is not offered for the current category.
    pub fn select_name(&mut self, name: AgentName) -> bool {
        if !self.names.contains(&name) {
            return false;
        }
        self.name = name;
        self.refresh_rules();
        true
    }

    /// Move the name selection one step, wrapping around.
    pub fn cycle_name(&mut self, forward: bool) {
        if self.names.is_empty() {
            return;
        }
        let len = self.names.len();
        let idx = self.names.iter().position(|n| *n == self.name).unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.name = self.names[next];
        self.refresh_rules();
    }

    fn refresh_rules(&mut self) {
        self.rules = field_rules(self.category, self.name);
    }

    pub fn value(&self, field: InputField) -> &str {
        match field {
            InputField::Topic => &self.fields.topic,
            InputField::ImagePrompt => &self.fields.image_prompt,
            InputField::WebhookUrl => &self.fields.webhook_url,
            InputField::ChaosPercentage => &self.fields.chaos_percentage,
        }
    }

    pub fn value_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::Topic => &mut self.fields.topic,
            InputField::ImagePrompt => &mut self.fields.image_prompt,
            InputField::WebhookUrl => &mut self.fields.webhook_url,
            InputField::ChaosPercentage => &mut self.fields.chaos_percentage,
        }
    }

    pub fn set_value(&mut self, field: InputField, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    /// Explicit user action; category and name changes never clear values.
    pub fn clear_fields(&mut self) {
        self.fields = FormFields::default();
    }

    pub fn set_last_result(&mut self, result: Option<String>) {
        self.last_result = result.filter(|r| !r.trim().is_empty());
    }

    pub fn build_request(&self) -> Result<GenerationRequest, ValidationError> {
        request::build(self.category, self.name, &self.fields)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            agent_type: Some(self.category.as_str().to_string()),
            agent_name: Some(self.name.as_str().to_string()),
            topic: self.fields.topic.clone(),
            image_prompt: self.fields.image_prompt.clone(),
            webhook_url: self.fields.webhook_url.clone(),
            chaos_percentage: self.fields.chaos_percentage.clone(),
            filename: self.last_result.clone(),
        }
    }

    /// Restore a persisted snapshot. Order matters: category first, then the
    /// name list for that category, then the name (if still valid), then the
    /// remaining values, then the rules.
    pub fn rehydrate(catalog: &AgentCatalog, snapshot: &FormSnapshot) -> Self {
        let mut form = Self::new(catalog);

        let category = snapshot
            .agent_type
            .as_deref()
            .and_then(|s| s.parse::<AgentCategory>().ok())
            .unwrap_or(AgentCategory::Researcher);
        form.select_category(catalog, category);

        if let Some(name) = snapshot.agent_name.as_deref().and_then(|s| s.parse::<AgentName>().ok())
            && !form.select_name(name)
        {
            tracing::debug!(agent_name = %name, agent_type = %category, "persisted agent name no longer offered");
        }

        form.fields = FormFields {
            topic: snapshot.topic.clone(),
            image_prompt: snapshot.image_prompt.clone(),
            webhook_url: snapshot.webhook_url.clone(),
            chaos_percentage: snapshot.chaos_percentage.clone(),
        };
        form.set_last_result(snapshot.filename.clone());
        form.refresh_rules();
        form
    }
}
