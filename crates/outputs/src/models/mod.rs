//! Data models for outputs and the agent policies that reference them.

pub mod list;
pub mod output;
pub mod patch;
pub mod policy;

pub use list::ListResult;
pub use output::{
    NewOutput, Output, OutputAttributes, OutputField, OutputType, SavedOutput, ShipperConfig,
    SslConfig,
};
pub use patch::{OutputPatch, Patch};
pub use policy::{AgentPolicy, PolicyFilter};
