//! Keyword co-occurrence network and tag clouds over a bibliography.

pub mod bib;
pub mod config;
pub mod network;
pub mod selectors;
pub mod tags;
mod util;
