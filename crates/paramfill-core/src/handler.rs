//! Entry point: fill the parameters of an operation.
//!
//! # Examples
//!
//! ```
//! use paramfill_core::{OpenApiContext, Operation, Parameter, ParameterHandler};
//! use serde_json::json;
//!
//! # fn main() -> paramfill_core::Result<()> {
//! let spec = OpenApiContext { json: json!({"paths": {}}) };
//! let operation = Operation::new("getPet", "get", "/pet/{petId}").with_param(
//!     Parameter::from_spec(json!({
//!         "name": "petId", "in": "path", "required": true,
//!         "type": "integer", "minimum": 1, "maximum": 3
//!     }))
//!     .unwrap(),
//! );
//!
//! let mut handler = ParameterHandler::new(&spec, operation);
//! let filled = handler.resolve_operation_parameters(false)?;
//! assert!(filled.params["petId"].fill.is_some());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::filler::{FormFiller, SmartFiller};
use crate::operation::Operation;
use crate::repair::fix_common_spec_issues;
use crate::resolver::{Dereference, ValueResolver};
use crate::value::FillValue;

/// Fills the parameters of one operation declared in `spec`.
pub struct ParameterHandler<'a, S: ?Sized, F = SmartFiller> {
    spec: &'a S,
    operation: Operation,
    filler: F,
}

impl<'a, S> ParameterHandler<'a, S, SmartFiller>
where
    S: Dereference + ?Sized,
{
    /// Handler using the default [`SmartFiller`] heuristics.
    pub fn new(spec: &'a S, operation: Operation) -> Self {
        Self::with_filler(spec, operation, SmartFiller)
    }
}

impl<'a, S, F> ParameterHandler<'a, S, F>
where
    S: Dereference + ?Sized,
    F: FormFiller,
{
    pub fn with_filler(spec: &'a S, operation: Operation, filler: F) -> Self {
        Self {
            spec,
            operation,
            filler,
        }
    }

    /// The operation as held by the handler (repaired, never filled).
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Return a copy of the operation with a value in every selected parameter.
    ///
    /// Required parameters are always filled, optional ones only when
    /// `include_optional` is set. A declared default always wins over a
    /// generated value. The handler's own operation only receives the schema
    /// repairs.
    pub fn resolve_operation_parameters(&mut self, include_optional: bool) -> Result<Operation> {
        fix_common_spec_issues(&mut self.operation.params);

        let mut operation = self.operation.clone();
        let mut resolver = ValueResolver::new(self.spec, &self.filler);

        for param in operation.params.values_mut() {
            param.fill = None;

            if !param.required && !include_optional {
                continue;
            }

            let value = match param.default_value() {
                Some(default) => FillValue::Json(default.clone()),
                None => resolver.resolve(&param.param_spec)?,
            };

            log::trace!("{}: {} = {}", operation.id, param.name, value.to_json());
            param.fill = Some(value);
        }

        Ok(operation)
    }

    /// Whether any parameter of the operation is optional.
    pub fn has_optional_parameters(&self) -> bool {
        self.operation.params.values().any(|param| !param.required)
    }
}

/// An operation snapshot together with the mode it was filled in.
#[derive(Debug, Clone)]
pub struct FilledOperation {
    pub operation: Operation,
    /// Whether optional parameters were filled too
    pub include_optional: bool,
}

/// Fill every operation with its required parameters.
///
/// With `include_optional`, operations that have optional parameters are
/// filled a second time with those parameters included. An operation whose
/// resolution fails (for example on a recursive model) is logged and left
/// out, the other operations are still filled.
pub fn fill_operations<S>(
    spec: &S,
    operations: Vec<Operation>,
    include_optional: bool,
) -> Vec<FilledOperation>
where
    S: Dereference + ?Sized,
{
    let mut filled = Vec::with_capacity(operations.len());

    for operation in operations {
        let id = operation.id.clone();
        match fill_operation(spec, operation, include_optional) {
            Ok(variants) => filled.extend(variants),
            Err(e) => log::warn!("Skipping operation {}: {}", id, e),
        }
    }

    filled
}

/// Fill one operation, in both modes when asked and relevant.
///
/// Nothing is returned for the operation unless every variant resolves.
pub fn fill_operation<S>(
    spec: &S,
    operation: Operation,
    include_optional: bool,
) -> Result<Vec<FilledOperation>>
where
    S: Dereference + ?Sized,
{
    let mut handler = ParameterHandler::new(spec, operation);

    let mut variants = vec![FilledOperation {
        operation: handler.resolve_operation_parameters(false)?,
        include_optional: false,
    }];

    if include_optional && handler.has_optional_parameters() {
        variants.push(FilledOperation {
            operation: handler.resolve_operation_parameters(true)?,
            include_optional: true,
        });
    }

    Ok(variants)
}
