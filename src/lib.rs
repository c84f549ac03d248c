// Library root
// -----------
// A terminal news reader. The binary (`main.rs`) builds an `App` and runs
// its menu loop; everything else lives here so it can be tested without a
// terminal or a network.
//
// Module responsibilities:
// - `paginator`: fixed-size pages over an in-memory result set.
// - `favorites`: saved articles, persisted to a single JSON file.
// - `storage`: whole-document JSON load/save used by `favorites`.
// - `article`: article records and display formatting.
// - `api`: blocking client for the news API.
// - `config`: settings read from the environment.
// - `ui`: terminal rendering and prompts, behind an explicit `Ui` context.
// - `app`: the interactive loop tying the above together.
pub mod api;
pub mod app;
pub mod article;
pub mod config;
pub mod error;
pub mod favorites;
pub mod paginator;
pub mod storage;
pub mod ui;

pub use error::{Error, Result};
