// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery correlation ids

use smol_str::SmolStr;

/// Correlates all redelivery attempts of one inbound event in logs.
///
/// Format is `dlv-{nanoid}`: 4-char prefix plus 19 random characters,
/// 23 total, exactly fitting SmolStr inline capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryId(SmolStr);

impl DeliveryId {
    pub const PREFIX: &'static str = "dlv-";

    /// Generate a new random id.
    pub fn new() -> Self {
        Self(SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DeliveryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
