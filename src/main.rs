// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Labelcraft: render label jobs from the command line

fn main() -> anyhow::Result<()> {
    labelcraft::run()
}
