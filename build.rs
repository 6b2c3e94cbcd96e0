// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Outside a git checkout vergen emits placeholders; `version` treats
    // them as absent.
    EmitBuilder::builder()
        .git_sha(true)
        .git_branch()
        .git_commit_date()
        .emit()?;
    Ok(())
}
