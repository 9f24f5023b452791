// Writing feedback: request composition, the model round trip, response normalization.
// All model calls go through llm_client; no direct Gemini calls here.

pub mod audit;
pub mod composer;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod report;
pub mod schema;
pub mod service;
pub mod session;
pub mod word_count;
