//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the lineview project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::BUFSZ;

/// Returns true if `pathname` names standard input rather than a file.
pub fn is_stdin(pathname: &Path, dashed_stdin: bool) -> bool {
    let path_str = pathname.as_os_str();
    (dashed_stdin && path_str == "-") || (!dashed_stdin && path_str.is_empty())
}

pub fn input_stream(pathname: &Path, dashed_stdin: bool) -> io::Result<Box<dyn Read>> {
    // open file, or stdin
    let file: Box<dyn Read> = if is_stdin(pathname, dashed_stdin) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(fs::File::open(pathname)?)
    };

    Ok(file)
}

pub fn input_reader(
    pathname: &Path,
    dashed_stdin: bool,
) -> io::Result<io::BufReader<Box<dyn Read>>> {
    let file = input_stream(pathname, dashed_stdin)?;
    Ok(io::BufReader::with_capacity(BUFSZ, file))
}
