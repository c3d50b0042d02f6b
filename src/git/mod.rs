pub mod blame;
pub mod runner;

pub use blame::{BlameExtractor, LineTimestamps};
pub use runner::{GitRunner, SystemGit};
