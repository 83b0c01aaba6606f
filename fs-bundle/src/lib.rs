mod bundle;
mod encoder;
mod scanner;
mod writer;

pub use bundle::{bundle, collisions, plan, BundleOptions, BundleReport};
pub use encoder::{AssetEncoder, PlannedAsset, DEFAULT_READ_CAPACITY};
pub use scanner::DirectoryScanner;
pub use writer::BufferWriter;
