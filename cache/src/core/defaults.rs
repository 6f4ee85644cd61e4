//! Built-in prewarm seeds and model catalog

use crate::core::engine::CacheEngine;
use crate::types::ModelProfile;

const REACT_COMPONENT: &str = r#"import { useState } from 'react';

export const Component = () => {
  const [state, setState] = useState('');

  return (
    <div className="p-4">
      <h1>Component</h1>
    </div>
  );
};"#;

const FASTAPI_ENDPOINT: &str = r#"from fastapi import FastAPI

app = FastAPI()

@app.get("/")
async def root():
    return {"message": "Hello World"}"#;

const BASIC_CONTRACT: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

contract BasicContract {
    uint256 public value;

    function setValue(uint256 _value) public {
        value = _value;
    }
}"#;

/// (agent, prompt, response) seeds registered at startup
pub const DEFAULT_PREWARM: [(&str, &str, &str); 3] = [
    ("js-master", "create react component", REACT_COMPONENT),
    ("python-pro", "create fastapi endpoint", FASTAPI_ENDPOINT),
    ("solidity-auditor", "create basic contract", BASIC_CONTRACT),
];

/// Register every default seed; returns how many were applied
pub fn seed_default_prewarm(engine: &CacheEngine) -> usize {
    for (agent, prompt, response) in DEFAULT_PREWARM {
        engine.prewarm(agent, prompt, response);
    }
    DEFAULT_PREWARM.len()
}

pub fn default_models() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("gpt-4-turbo", "openai", 0.01, 7, 9, &["general", "reasoning", "code"]),
        ModelProfile::new("claude-3-opus", "anthropic", 0.015, 6, 10, &["reasoning", "creative", "code"]),
        ModelProfile::new("gpt-3.5-turbo", "openai", 0.0015, 10, 7, &["general", "fast"]),
        ModelProfile::new("mistral-large", "mistral", 0.008, 8, 8, &["code", "multilingual"]),
        ModelProfile::new("codellama-70b", "meta", 0.005, 7, 8, &["code", "python", "rust"]),
    ]
}
