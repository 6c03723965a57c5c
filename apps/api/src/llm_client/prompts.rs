// Shared prompt fragments for provider envelopes.
// Plan-specific prompt text lives in learning_plan::prompts.

/// System message for providers whose envelope carries a separate system role.
pub const COUNSELOR_SYSTEM: &str =
    "You are an expert career counselor and learning path designer.";
