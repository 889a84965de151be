// Resume generation: prompt building, provider call, output normalization.
// All model calls go through llm_client; no module talks to a provider API directly.

pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
