//! # LSDJ Tools
//!
//! Command-line utilities for [LittleSoundDJ](https://www.littlesounddj.com)
//! save files.
//!
//! LSDJ has a built-in filesystem for managing songs, but backing them up or
//! assembling new saves from exported songs needs tooling outside the Game
//! Boy. Every subcommand lives in its own module:
//!
//! - [`inspect`]: list the songs in saves, `.lsdsng`s and kits
//! - [`export`]: write the songs of a save to `.lsdsng` files
//! - [`import`]: build a new save from `.lsdsng`s and other saves
//! - [`collect`]: group every version of every song found on disk
//!
//! ```console
//! $ lsdj-tools inspect bangers.sav
//! bangers.sav
//! Mem 144/192 [==================      ]
//!   0 | YOKAI    | v027 | f005
//!   1 | ASPHALT  | v019 | f005
//!
//! $ lsdj-tools export -pv bangers.sav
//! 00. YOKAI    => 00_YOKAI_v1B.lsdsng
//! 01. ASPHALT  => 01_ASPHALT_v13.lsdsng
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collect;
pub mod export;
pub mod import;
pub mod inspect;
pub mod utils;

pub use collect::{collect, CollectArgs};
pub use export::{export, ExportArgs, FilenameOptions};
pub use import::{import, ImportArgs};
pub use inspect::{inspect, InspectArgs};

/// Tools version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
