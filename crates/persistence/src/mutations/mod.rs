// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side mutations.
//!
//! Every public function here is one logical mutating operation and
//! runs inside a single `immediate_transaction`, taking the SQLite
//! write lock at BEGIN so check-then-act sequences are serialized
//! against the single writer. Multi-step flows (cancel + promote +
//! re-compact, assign + demote) commit or roll back as a unit.

pub mod instructors;
pub mod participants;
pub mod refs;
pub mod sessions;
pub mod settings;

pub use instructors::AssignOutcome;
pub use participants::CancelParticipantOutcome;
