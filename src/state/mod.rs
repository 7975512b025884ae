/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The sign type catalog, placed signs and imagery layers
///   (catalog.rs, instances.rs, layers.rs)
/// - Mirroring the stores to the session blob store (session.rs, seed.rs)
/// - The top-level state container (app.rs)
/// - Transient view state and form handling (view.rs)

pub mod app;
pub mod catalog;
pub mod data;
pub mod error;
pub mod instances;
pub mod layers;
pub mod seed;
pub mod session;
pub mod view;
