//! Error type shared by every loader and GPU wrapper in the sandbox.
//!
//! All of these are startup failures. Nothing in the render loop produces an
//! [`Error`]; once the context exists the frame loop never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load model {path}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to compile shader {path}:\n{log}")]
    ShaderCompile { path: PathBuf, log: String },

    #[error("failed to link program:\n{0}")]
    ProgramLink(String),

    #[error("OpenGL error: {0}")]
    Gl(String),

    #[error("invalid config file {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("platform error: {0}")]
    Platform(String),

    #[error("overlay error: {0}")]
    Overlay(String),
}

pub type Result<T> = std::result::Result<T, Error>;
