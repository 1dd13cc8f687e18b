pub mod defaults;
pub mod explain;
pub mod version;
