//! # mdm Library
//!
//! Core functionality for managing released dependencies as git
//! submodules. It is used by the `mdm` command-line tool but the pieces
//! are usable on their own.
//!
//! mdm layers a metadata convention on top of git's submodule mechanism:
//! a submodule carrying an `mdm` key in `.gitmodules` is a *managed
//! dependency*, pinned by an `mdm-version` key to a release branch named
//! `mdm/release/<version>`. Because a dependency's remote is restricted
//! to that narrow branch namespace, pulling one never triggers a full
//! clone or unbounded history transfer.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use mdm::gitmodules::Manifest;
//!
//! let manifest = Manifest::parse(
//!     "[submodule \"libfoo\"]\n\
//!      \tpath = libfoo\n\
//!      \turl = https://example.invalid/libfoo.git\n\
//!      \tmdm = dependency\n\
//!      \tmdm-version = 2.0\n",
//!     Path::new(".gitmodules"),
//! ).unwrap();
//!
//! let entry = manifest.managed_by_name("libfoo", Some("dependency")).unwrap();
//! assert_eq!(entry.version(), Some("2.0"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`gitmodules`)**: reader and query layer for
//!   `.gitmodules`, distinguishing an absent manifest from one whose
//!   entries all fail the managed filter.
//! - **Release resolution (`release`)**: enumerates the versions a source
//!   publishes, ordered by a version-aware comparator.
//! - **Lifecycle (`lifecycle`)**: the add / load / remove / update
//!   protocols, each an ordered sequence of git commands with re-runnable
//!   steps and no hidden rollback.
//! - **Git layer (`git`)**: one synchronous wrapper method per git
//!   plumbing command the lifecycle needs, plus the pinned commit
//!   identity used for convergent history.
//!
//! Everything is single-threaded and blocking; concurrent invocations
//! against the same working tree are the caller's problem to serialize.

pub mod defaults;
pub mod error;
pub mod git;
pub mod gitmodules;
pub mod lifecycle;
pub mod release;
