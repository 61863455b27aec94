//! Template-rendered string fields

use crate::typemap::TypeMap;
use jsonmap_format::{Context, Error, JsonPointer, MultiValidationError, Result, SchemaError};
use serde::Serialize;
use serde_json::Value;
use tinytemplate::{format_unescaped, TinyTemplate};

const TEMPLATE_NAME: &str = "field";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Scope<'a> {
    context: &'a Value,
    value: Value,
}

/// Marshal-only descriptor rendering a field through a text template
///
/// The template sees the call context as `Context` and the field's
/// current value as `Value`, e.g. `"{Context.foo}:{Value}"`. Output is
/// not HTML-escaped.
///
/// The template is syntax-checked once in [`StringRenderer::new`] and
/// compiled again on every encode: a `TinyTemplate` owns its formatters as
/// non-`Sync` boxed closures, so it cannot live in a shared descriptor.
/// Compilation is a single linear pass over the template source.
#[derive(Debug, Clone)]
pub struct StringRenderer {
    template: String,
}

impl StringRenderer {
    /// Compile-check `template` and build the renderer
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        TinyTemplate::new()
            .add_template(TEMPLATE_NAME, &template)
            .map_err(|e| Error::Template(e.to_string()))?;
        Ok(Self { template })
    }

    /// Template source
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl<X: Serialize> TypeMap<X> for StringRenderer {
    fn decode(
        &self,
        _ctx: &Context,
        _path: &JsonPointer,
        _data: &Value,
        _dst: &mut X,
        _errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        Err(SchemaError::Unsupported {
            what: "decoding a template-rendered field".to_string(),
        })
    }

    fn encode(&self, ctx: &Context, src: &X) -> Result<Value> {
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&format_unescaped);
        tt.add_template(TEMPLATE_NAME, &self.template)
            .map_err(|e| Error::Template(e.to_string()))?;

        let scope = Scope {
            context: ctx.as_value(),
            value: serde_json::to_value(src)?,
        };
        let rendered = tt
            .render(TEMPLATE_NAME, &scope)
            .map_err(|e| Error::Template(e.to_string()))?;
        Ok(Value::String(rendered))
    }
}
