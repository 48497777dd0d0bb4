// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

mod block_signature;
mod block_time;
mod eligibility;
mod rules;
mod validators;
mod voting;

pub use block_signature::*;
pub use block_time::*;
pub use eligibility::*;
pub use rules::*;
pub use validators::*;
pub use voting::*;
