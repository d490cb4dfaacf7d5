//! Showbox host: discovers demo files, catalogs the examples they declare,
//! and runs one at a time next to a clickable sidebar.
//!
//! # Startup
//!
//! ```rust,ignore
//! use showbox_host::{HostConfig, Loader, Registry};
//! use showbox_engine::window::WindowMode;
//!
//! let mut registry = Registry::new();
//! let report = Loader::new(&mut registry).discover_and_load("demos/{*.demo,features/*.demo}");
//! log::info!("{report}");
//! showbox_host::run(registry, HostConfig::default(), WindowMode::Windowed)?;
//! ```
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`registry`] | `Registry`, `ExampleDescriptor`, `DescriptorId` |
//! | [`loader`] | `Loader`, `LoadContext`, `DiagnosticSink`, brace expansion |
//! | [`host`] | `Host`: active instance, event forwarding, reserved keys |
//! | [`sidebar`] | row layout, hit-testing, highlighting |
//! | [`example`] | the `Example` / `ExampleFactory` traits |
//! | [`facade`] | `HostFacade`, the view of the host an example gets |
//! | [`script_example`] | `.demo` declarations as example factories |
//!
//! Examples written in Rust implement [`ExampleFactory`] and go through
//! [`Registry::register`] like the script ones do.

pub mod buttons;
pub mod config;
pub mod example;
pub mod facade;
pub mod host;
pub mod loader;
pub mod painter;
pub mod registry;
pub mod script_example;
pub mod sidebar;
pub mod text_input;

mod app;

pub use app::run;
pub use config::HostConfig;
pub use example::{Example, ExampleError, ExampleFactory, ExampleOptions};
pub use facade::{HostFacade, TextInputId};
pub use host::{Host, HostError};
pub use loader::{DiagnosticSink, LoadContext, LoadError, LoadFailure, LoadReport, Loader, LogSink};
pub use painter::Painter;
pub use registry::{DescriptorId, ExampleDescriptor, Registry, RegistryError};
pub use sidebar::Sidebar;
pub use text_input::TextInput;
