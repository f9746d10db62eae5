use std::path::PathBuf;

/// The failures that stop a run before any data is parsed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read config file {}", path.display())]
    MissingConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file named by an `extends` node could not be opened.
    #[error("Could not read {} (extended from {})", path.display(), parent.display())]
    UnreadableRoot {
        path: PathBuf,
        parent: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
