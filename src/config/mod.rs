//! Configuration module for Graphite
//!
//! Contains the option structures for the formatting engine and the
//! JSON persistence layer for loading and saving them.

mod persistence;
mod settings;

pub use persistence::{
    get_config_dir, get_config_file_path, load_config, save_config, save_config_silent,
};
pub use settings::{BlockStyles, InsertTexts, Options, TextPair, UnorderedListStyle};
