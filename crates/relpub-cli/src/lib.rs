//! relpub - release publisher
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Publishes a release artifact to a distribution registry.
//!
//! # Overview
//!
//! `relpub dist <path>` checksums the artifact, optionally signs it with an
//! Ed25519 key, upserts the release metadata with the registry and then
//! streams the bytes to the upload target the registry hands back.
//!
//! # Architecture
//!
//! - **Immutable configuration**: flags, environment and defaults are merged
//!   once into a [`config::DistConfig`] and never mutated afterwards.
//! - **Actor Pattern**: the upload progress bar is drawn by a dedicated
//!   render thread fed over a channel, so the upload never blocks on the
//!   terminal.
//! - **Reporter**: commands talk to the operator through
//!   [`relpub_core::Reporter`], implemented by [`ui::Output`].

pub mod cmd;
pub mod config;
pub mod ui;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "relpub")]
#[command(author, version = env!("RELPUB_VERSION"), about = "relpub - publish signed release artifacts")]
pub struct Cli {
    /// Print the release descriptor instead of publishing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish a new release for a product
    Dist(Box<config::DistArgs>),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
