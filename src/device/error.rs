/// Errors that can occur while resolving devices from the run catalog
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The same diode is wired to two different supply channels in the run range
    #[error(
        "Configuration conflict for diode {diode}: run {run} uses {conflicting}, \
         earlier runs use {existing}"
    )]
    ConfigurationConflict {
        /// Diode id with divergent descriptors
        diode: String,
        /// Descriptor seen first
        existing: String,
        /// Descriptor that disagrees
        conflicting: String,
        /// Run where the disagreement was found
        run: String,
    },

    /// Descriptor prefix is missing from the channel-name table
    #[error("Unknown HV unit '{unit}' (descriptor '{descriptor}')")]
    UnknownUnit {
        /// Descriptor prefix
        unit: String,
        /// Full descriptor
        descriptor: String,
    },

    /// I/O error reading the channel-name table
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error in the channel-name table
    #[error("Channel table parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}
