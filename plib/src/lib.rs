//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the lineview project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

pub mod io;
pub mod testing;

pub const PROJECT_NAME: &str = "lineview";

pub const BUFSZ: usize = 8 * 1024;

pub use testing::*;
