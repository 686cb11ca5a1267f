//! Interactive panel: slash command registry and built-in commands.

pub mod builtins;
pub mod registry;

pub use registry::{CommandOutput, PanelContext, SlashCommandRegistry};
