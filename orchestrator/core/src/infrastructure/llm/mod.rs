// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each provider adapter translates between the uniform ProviderAdapter port
// and one vendor's wire schema. Perplexity, Grok and Groq speak the OpenAI
// chat completions dialect and reuse OpenAIAdapter with their own profile.

pub mod anthropic;
pub mod grok;
pub mod groq;
pub mod openai;
pub mod perplexity;
pub mod registry;

pub use anthropic::AnthropicAdapter;
pub use openai::{ChatCompletionsProfile, OpenAIAdapter};
pub use registry::{ProviderInfo, ProviderRegistry};
