//! Prompt loader: the built-in grounding prompt and YAML overrides.

use crate::builder::new_registry;
use crate::types::PromptDefinition;
use folio_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in prompt.
pub const DEFAULT_PROMPT_ID: &str = "projects.chat.default";

const DEFAULT_TEMPLATE: &str = "{{#if history}}Previous conversation:
{{#each history}}User: {{this.question}}
Assistant: {{this.answer}}
{{/each}}
{{/if}}Based on the following project information, answer this question: {{question}}

Context:
{{context}}

Please provide a relevant and concise answer based on the project information above.";

/// The built-in grounding prompt.
pub fn default_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_PROMPT_ID.to_string(),
        title: "Project chat".to_string(),
        api_version: "1.0".to_string(),
        created_by: "folio".to_string(),
        system: None,
        template: DEFAULT_TEMPLATE.to_string(),
    }
}

/// Load a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use folio_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts/chat.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the configured prompt file, or fall back to the built-in prompt.
pub fn load_or_default(path: Option<&Path>) -> AppResult<PromptDefinition> {
    match path {
        Some(path) => load_prompt(path),
        None => Ok(default_prompt()),
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if !def.template.contains("{{question}}") {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' never uses {{{{question}}}}",
            def.id
        )));
    }

    // Catch syntax errors at startup rather than on the first request
    new_registry(&def.template)?;
    if let Some(system) = def.system.as_deref() {
        new_registry(system)?;
    }

    Ok(())
}
