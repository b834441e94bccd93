// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Scene construction and resource lifecycle for molecule / nanoparticle
//! interaction visualization.
//!
//! nanoviz turns a pre-computed JSON payload (a drug molecule, a
//! nanoparticle and their interaction points) into a retained scene graph
//! of three named groups, and drives it frame by frame through a pluggable
//! [`renderer::RenderBackend`]. It computes no chemistry.
//!
//! # Key entry points
//!
//! - [`engine::Visualizer`] - one visualization instance (scene, resource
//!   store, pools, quality, camera, backend)
//! - [`payload::VisualizationPayload`] - the input data model
//! - [`options::Options`] - runtime configuration (camera, lighting,
//!   colors, geometry, quality, animation, network, pool)
//! - [`renderer::headless::HeadlessRenderer`] - backend for tests and the
//!   CLI
//!
//! # Architecture
//!
//! Composition clears the previous groups through the disposal walker,
//! then the builders populate them with clones acquired from the template
//! pools. Every clone is registered in the [`resources::GpuResources`]
//! store, so the live resource count returns to its baseline after each
//! recomposition. The host drives the render loop with generation tokens
//! (`requestAnimationFrame` in the browser, a plain loop in the CLI), and
//! the [`quality::QualityController`] degrades one way on weak devices or
//! a low measured frame rate.

pub mod builders;
pub mod camera;
pub mod engine;
pub mod error;
pub mod net;
pub mod options;
pub mod payload;
pub mod quality;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod ui;
pub mod util;
#[cfg(feature = "web")]
pub mod web;
