//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptVariables};
use folio_core::{AppError, AppResult};
use handlebars::Handlebars;

/// Build a prompt from a definition and input variables.
///
/// Renders the user template (and the system template, if any) with
/// Handlebars and returns a `BuiltPrompt` ready for LLM execution.
///
/// # Example
/// ```no_run
/// use folio_prompt::{build_prompt, default_prompt, PromptVariables};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let vars = PromptVariables {
///     question: "Which projects use Rust?".to_string(),
///     context: "Project: Alpha\nDescription: ...".to_string(),
///     history: Vec::new(),
/// };
///
/// let built = build_prompt(&default_prompt(), &vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: &PromptVariables,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        prompt_id = %definition.id,
        history_turns = variables.history.len(),
        "Building prompt"
    );

    let user = render_template(&definition.template, variables)?;

    let system = match definition.system.as_deref() {
        Some(template) if !template.trim().is_empty() => {
            Some(render_template(template, variables)?)
        }
        _ => None,
    };

    Ok(BuiltPrompt {
        system,
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            history_turns: variables.history.len(),
            context_bytes: variables.context.len(),
        },
    })
}

/// Render a Handlebars template with variables.
pub(crate) fn render_template(template: &str, variables: &PromptVariables) -> AppResult<String> {
    let handlebars = new_registry(template)?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Create a registry holding `template` under the name "prompt".
pub(crate) fn new_registry(template: &str) -> AppResult<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    // Plain text output; project descriptions may contain '&' or '<'
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    Ok(handlebars)
}
