//! Template-based stand-in for a language model

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::CacheResult;
use crate::traits::Generator;
use crate::types::{Generation, GenerationRequest};

/// Token count reported for agent responses
pub const CANNED_RESPONSE_TOKENS: u64 = 156;

/// Token count reported for routed responses
pub const ROUTED_RESPONSE_TOKENS: u64 = 120;

/// Deterministic per-agent responses after an optional simulated latency
#[derive(Debug, Clone, Default)]
pub struct CannedGenerator {
    latency: Duration,
}

impl CannedGenerator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn agent_response(agent: &str, prompt: &str) -> String {
        match agent {
            "js-master" => "// JavaScript/TypeScript Expert Response\n\n\
                import { useState, useEffect } from 'react';\n\n\
                export const Component = () => {\n  const [data, setData] = useState<string>('');\n\n  \
                useEffect(() => {\n    fetch('/api/data').then((r) => r.json()).then(setData);\n  }, []);\n\n  \
                return <div className=\"p-6\">{data}</div>;\n};"
                .to_string(),
            "python-pro" => "# Python Specialist Response\n\n\
                from fastapi import FastAPI\nfrom pydantic import BaseModel\n\n\
                app = FastAPI()\n\nclass Item(BaseModel):\n    id: int\n    name: str\n\n\
                items: list[Item] = []\n\n@app.post(\"/items\")\nasync def create_item(item: Item):\n    \
                items.append(item)\n    return item"
                .to_string(),
            "solidity-auditor" => "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;\n\n\
                contract SecureToken {\n    uint256 public maxSupply = 1000000 * 10**18;\n    \
                mapping(address => uint256) public balanceOf;\n}"
                .to_string(),
            "rust-engineer" => "// Rust Engineer Response\n\n\
                use std::collections::HashMap;\nuse std::sync::Arc;\nuse tokio::sync::RwLock;\n\n\
                #[derive(Clone, Default)]\npub struct Cache {\n    data: Arc<RwLock<HashMap<String, String>>>,\n}"
                .to_string(),
            _ => format!(
                "// AI Response for \"{agent}\":\n\nconsole.log(\"Generated code for: {prompt}\");\n\
                 // Your code implementation here"
            ),
        }
    }

    fn routed_response(model: &str) -> String {
        format!(
            "Response from **{model}**\n\n```\n// Intelligent routing active\nconsole.log(\"Selected: {model}\");\n```"
        )
    }
}

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, request: GenerationRequest) -> CacheResult<Generation> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!(agent = %request.agent, model = ?request.model, "Generated canned response");

        Ok(match request.model.as_deref() {
            Some(model) => Generation {
                response: Self::routed_response(model),
                tokens: ROUTED_RESPONSE_TOKENS,
            },
            None => Generation {
                response: Self::agent_response(&request.agent, &request.prompt),
                tokens: CANNED_RESPONSE_TOKENS,
            },
        })
    }
}
