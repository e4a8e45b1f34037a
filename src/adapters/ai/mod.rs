//! AI adapter module. Implements AiPort for LLM integration.
//!
//! Provides the Gemini adapter, a mock adapter for offline use, and an opt-in
//! wrapper that falls back to the original text when rephrasing fails.

pub mod fallback;
pub mod gemini_adapter;
pub mod mock_adapter;

pub use fallback::FallbackAi;
pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::MockAiAdapter;
