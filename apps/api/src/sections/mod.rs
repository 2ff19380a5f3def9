// Section generation: overview, materials, assembly and procedure.
// All LLM calls go through llm_client, no direct API calls here.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
