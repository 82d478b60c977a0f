//! Paramfill Core Library
//!
//! This library synthesizes plausible values for the parameters of OpenAPI /
//! Swagger operations so that every operation can be sent to a target, for
//! example by a web application fuzzer.

pub mod config;
pub mod error;
pub mod filler;
pub mod handler;
pub mod openapi;
pub mod operation;
pub mod repair;
pub mod resolver;
pub mod value;

pub use crate::{
    config::Config,
    error::{Error, Result},
    filler::{FormFiller, SmartFiller},
    handler::{fill_operation, fill_operations, FilledOperation, ParameterHandler},
    openapi::OpenApiContext,
    operation::{Operation, Parameter},
    resolver::{Dereference, ValueResolver},
    value::{FillValue, NamedFile},
};
