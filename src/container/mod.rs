pub mod reader;

pub use reader::{ContainerReader, CONTENT_ENTRY};
