// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client identity rotation for outbound web requests
//!
//! Search engines and many authority sites throttle or block requests with a
//! bare library User-Agent. Providers and the content fetcher draw a browser
//! identity from a rotation pool on every request; tests inject a fixed
//! identity for determinism.

use rand::seq::SliceRandom;

/// Strategy for choosing the client identity of the next outbound request
pub trait UserAgentProvider: Send + Sync {
    /// Return the User-Agent string for the next request
    fn next_user_agent(&self) -> String;
}

/// Browser User-Agent strings rotated across requests
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
];

/// Randomly rotating pool over a fixed list of browser identities
pub struct RotatingUserAgentPool {
    agents: Vec<String>,
}

impl RotatingUserAgentPool {
    /// Create a pool from a custom identity list
    ///
    /// An empty list falls back to the built-in browser pool.
    pub fn new(agents: Vec<String>) -> Self {
        if agents.is_empty() {
            return Self::with_defaults();
        }
        Self { agents }
    }

    /// Create a pool over the built-in browser identities
    pub fn with_defaults() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Number of identities in the pool
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the pool is empty (never true for constructed pools)
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for RotatingUserAgentPool {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl UserAgentProvider for RotatingUserAgentPool {
    fn next_user_agent(&self) -> String {
        let mut rng = rand::thread_rng();
        self.agents
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENTS[0].to_string())
    }
}

/// Fixed identity for deterministic tests
pub struct StaticUserAgent(pub String);

impl UserAgentProvider for StaticUserAgent {
    fn next_user_agent(&self) -> String {
        self.0.clone()
    }
}
