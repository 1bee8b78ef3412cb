//! Scenario prompt.
//!
//! The template is fixed; only the seed changes. Gemini has no seed parameter
//! on `generateContent`, so the number is written into the prompt text where
//! it nudges the model towards a different scenario on each request.

/// Narration prompt template. `{seed}` is replaced by [`scenario_prompt`].
pub const SCENARIO_TEMPLATE: &str = "\
Hook: open with a question of the form \"What would happen if ...?\"

Write an engaging analysis of that hypothetical scenario:
- What are the consequences and effects of this scenario?
- What are the pros and cons of this scenario?
- Who would be affected by this scenario?
- Would a war break out?

Answer in English. Keep the whole response to about 1 minute when read aloud.
Use seed {seed} to vary the scenario you choose.
Make it engaging and thought-provoking for listeners.
Use simple, short sentences.
Put one major keyword of every sentence in parentheses.
";

/// Inclusive range the request handler draws seeds from.
pub const SEED_RANGE: std::ops::RangeInclusive<u32> = 1..=1_000_000_000;

/// Render the scenario prompt for `seed`.
#[must_use]
pub fn scenario_prompt(seed: u32) -> String {
    SCENARIO_TEMPLATE.replace("{seed}", &seed.to_string())
}

/// Draw a fresh seed from [`SEED_RANGE`].
#[must_use]
pub fn random_seed() -> u32 {
    fastrand::u32(SEED_RANGE)
}
