// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries. Every function takes an explicit connection so it
//! can run standalone or inside a caller's transaction.

pub mod instructors;
pub mod participants;
pub mod refs;
pub mod sessions;
pub mod settings;
