//! Custom error types for controldiff.

#[derive(Debug, thiserror::Error)]
pub enum SortKeyError {
    #[error("Malformed title '{title}': {reason}")]
    MalformedTitle { title: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid XML: {message}")]
    Xml { message: String },

    #[error("Control {id} is missing the '{attribute}' attribute")]
    MissingAttribute { id: String, attribute: String },

    #[error("Invalid control identifier '{value}' in attribute '{attribute}'")]
    InvalidIdentifier { attribute: String, value: String },

    #[error("Duplicate control identifier {id}")]
    DuplicateIdentifier { id: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read config {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not detect config format for {path}")]
    UnknownFormat { path: String },

    #[error("Config lists no documents")]
    NoDocuments,

    #[error("Version '{version}' is listed more than once")]
    DuplicateVersion { version: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ControlDiffError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    SortKey(#[from] SortKeyError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SortKeyError {
    pub fn malformed(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTitle {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

impl ParseError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }

    pub fn missing_attribute(id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            id: id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_identifier(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl OutputError {
    pub fn write_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl ConfigError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }
}
