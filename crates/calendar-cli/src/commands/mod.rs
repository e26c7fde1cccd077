// CLI command implementations

pub mod events;
