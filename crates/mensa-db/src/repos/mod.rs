//! Repository modules, one per table group.

pub mod dimension;
pub mod hall;
pub mod menu;
