// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::DomainError;

/// Errors produced by the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// An internal invariant failed. Indicates a bug, not bad input.
    Internal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(e) => write!(f, "{e}"),
            Self::Internal(msg) => write!(f, "internal engine error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(e) => Some(e),
            Self::Internal(_) => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(e: DomainError) -> Self {
        Self::DomainViolation(e)
    }
}
