//! # Blockpress: Widget Composition & Rendering Engine
//!
//! Blockpress is the content core of a multi-tenant publishing platform:
//! articles are assembled from a library of reusable, independently
//! configurable content blocks ("widgets"), and rendered through a small
//! data-driven template language.
//!
//! ## Core Concepts
//!
//! - **Widget types**: named template + admin-field schema pairs, held in a
//!   process-wide [`registry`](crate::registry)
//! - **Widget instances**: configured, ordered, enable-able occurrences of a
//!   type inside one article's [`composition`](crate::composition)
//! - **Templates**: a logic-less-plus-helpers language with total
//!   evaluation; a missing config field renders as empty output, never an
//!   error
//! - **Defaults**: a pure generator that synthesizes a starter composition
//!   from raw article metadata
//! - **Rendering**: enabled instances in position order, with per-instance
//!   failure containment
//!
//! ## Quick Start
//!
//! ```
//! use blockpress::composition::WidgetInstance;
//! use blockpress::registry::WidgetRegistry;
//! use blockpress::{renderer, seed};
//! use serde_json::json;
//!
//! // Seed the registry once at startup.
//! let registry = WidgetRegistry::new();
//! seed::install(&registry).unwrap();
//!
//! // One configured block inside an article.
//! let hero = WidgetInstance::new(seed::HERO_IMAGE)
//!     .with_config_value("image", json!("https://cdn.example.com/a.jpg"))
//!     .with_config_value("alt", json!("Autumn lookbook"));
//!
//! let output = renderer::render(&[hero], &registry);
//! assert!(output.html.contains("https://cdn.example.com/a.jpg"));
//! assert!(output.is_clean());
//! ```
//!
//! ## Failure Containment
//!
//! The engine is built so that bad data degrades, never crashes:
//!
//! - malformed templates are rejected at registration time
//!   ([`registry::RegistrationError`]), so they cannot reach rendering
//! - a structurally invalid stored composition is a
//!   [`composition::CompositionError::Parse`], answered by regenerating via
//!   [`defaults::generate`]
//! - an instance whose type was retired is skipped with a
//!   [`renderer::RenderWarning`]; sibling blocks render unaffected
//! - template resolution misses render as empty strings by definition
//!
//! ## Module Guide
//!
//! - [`template`] - Template parsing and total evaluation
//! - [`definition`] - Widget type definitions and admin-field schemas
//! - [`registry`] - Process-wide widget type catalog
//! - [`composition`] - Instance model, serialization, and editing operations
//! - [`defaults`] - Default composition generation from article metadata
//! - [`renderer`] - Composition rendering with failure containment
//! - [`seed`] - Built-in widget types installed at startup
//! - [`telemetry`] - Warning formatting and tracing setup

pub mod composition;
pub mod defaults;
pub mod definition;
pub mod registry;
pub mod renderer;
pub mod seed;
pub mod telemetry;
pub mod template;
pub mod utils;
