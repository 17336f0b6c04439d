//! Unit tests, one file per source module

mod geometry;
mod layout;
mod orchestrator;
mod tileset;
