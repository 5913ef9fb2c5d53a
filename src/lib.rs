// Copyright (c) 2025 office-mcp contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # office-mcp: MCP servers for spreadsheet workbooks and slide decks.
//!
//! Two independent servers share this library: `AI-Sheets` (workbooks,
//! xlsx/csv files) and `PowerPoint-Creator` (slide decks, pptx files).

// Public modules that can be used by the binary entrypoint.
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod error_ext;
