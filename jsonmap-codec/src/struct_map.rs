//! Record descriptors built from ordered field bindings

use crate::typemap::TypeMap;
use crate::variable::VariableType;
use jsonmap_format::{Context, Error, JsonPointer, MultiValidationError, Result, SchemaError, Validator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Getter/mutator pair for one record field
struct Accessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Clone for Accessor<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for Accessor<T, F> {}

/// Behaviour of an ordinary field binding
trait FieldCodec<T>: Send + Sync {
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError>;

    fn encode(&self, ctx: &Context, src: &T) -> Result<Value>;

    /// Reset the field to its empty value
    fn clear(&self, dst: &mut T);
}

/// Behaviour of a field whose shape is chosen by a sibling discriminator
trait VariableCodec<T>: Send + Sync {
    fn discriminator(&self) -> &'static str;

    fn conceals_identifier(&self) -> bool;

    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        identifier: &str,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError>;

    fn encode(&self, ctx: &Context, identifier: &str, src: &T) -> Result<Value>;

    fn clear(&self, dst: &mut T);
}

/// Field checked by a leaf validator and converted through serde
struct ValidatedField<T, F> {
    access: Accessor<T, F>,
    validator: Box<dyn Validator>,
}

impl<T, F> FieldCodec<T> for ValidatedField<T, F>
where
    F: Serialize + DeserializeOwned + Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let converted = match self.validator.validate(ctx, data) {
            Ok(converted) => converted,
            Err(e) => {
                errs.push(path, e.to_string());
                return Ok(());
            }
        };
        match serde_json::from_value::<F>(converted) {
            Ok(value) => *(self.access.get_mut)(dst) = value,
            Err(e) => errs.push(path, e.to_string()),
        }
        Ok(())
    }

    fn encode(&self, _ctx: &Context, src: &T) -> Result<Value> {
        Ok(serde_json::to_value((self.access.get)(src))?)
    }

    fn clear(&self, dst: &mut T) {
        *(self.access.get_mut)(dst) = F::default();
    }
}

/// Field described by a nested descriptor
struct NestedField<T, F> {
    access: Accessor<T, F>,
    map: Box<dyn TypeMap<F>>,
}

impl<T, F> FieldCodec<T> for NestedField<T, F>
where
    F: Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        self.map
            .decode(ctx, path, data, (self.access.get_mut)(dst), errs)
    }

    fn encode(&self, ctx: &Context, src: &T) -> Result<Value> {
        self.map.encode(ctx, (self.access.get)(src))
    }

    fn clear(&self, dst: &mut T) {
        *(self.access.get_mut)(dst) = F::default();
    }
}

/// Field assigned through serde without validation
struct UntouchedField<T, F> {
    access: Accessor<T, F>,
}

impl<T, F> FieldCodec<T> for UntouchedField<T, F>
where
    F: Serialize + DeserializeOwned + Default,
{
    fn decode(
        &self,
        _ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        match F::deserialize(data) {
            Ok(value) => *(self.access.get_mut)(dst) = value,
            Err(e) => errs.push(path, e.to_string()),
        }
        Ok(())
    }

    fn encode(&self, _ctx: &Context, src: &T) -> Result<Value> {
        Ok(serde_json::to_value((self.access.get)(src))?)
    }

    fn clear(&self, dst: &mut T) {
        *(self.access.get_mut)(dst) = F::default();
    }
}

/// Field holding a discriminated union
struct VariableField<T, F> {
    access: Accessor<T, F>,
    variable: VariableType<F>,
}

impl<T, F> VariableCodec<T> for VariableField<T, F>
where
    F: Default,
{
    fn discriminator(&self) -> &'static str {
        self.variable.discriminator()
    }

    fn conceals_identifier(&self) -> bool {
        self.variable.conceals_identifier()
    }

    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        identifier: &str,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        self.variable
            .decode_variant(ctx, path, identifier, data, (self.access.get_mut)(dst), errs)
    }

    fn encode(&self, ctx: &Context, identifier: &str, src: &T) -> Result<Value> {
        self.variable
            .encode_variant(ctx, identifier, (self.access.get)(src))
    }

    fn clear(&self, dst: &mut T) {
        *(self.access.get_mut)(dst) = F::default();
    }
}

enum Binding<T> {
    Plain(Box<dyn FieldCodec<T>>),
    Variable(Box<dyn VariableCodec<T>>),
}

/// One record field bound to a wire name
///
/// Built with [`MappedField::new`] and finished with one of
/// [`FieldBuilder::validator`], [`FieldBuilder::contains`],
/// [`FieldBuilder::variable`] or [`FieldBuilder::untouched`].
pub struct MappedField<T> {
    field_name: &'static str,
    json_name: String,
    optional: bool,
    read_only: bool,
    binding: Binding<T>,
}

impl<T: 'static> MappedField<T> {
    /// Start a binding for the field reached through `get` / `get_mut`
    ///
    /// `field_name` identifies the record field (it is what a
    /// [`VariableType`] discriminator refers to); `json_name` is the key
    /// used on the wire.
    pub fn new<F>(
        field_name: &'static str,
        json_name: impl Into<String>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> FieldBuilder<T, F> {
        FieldBuilder {
            field_name,
            json_name: json_name.into(),
            access: Accessor { get, get_mut },
        }
    }
}

impl<T> MappedField<T> {
    /// Absence on decode leaves the field untouched instead of failing
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Emitted on encode, never written on decode
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Record-field identifier
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Wire key
    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    /// Whether the field may be absent on decode
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the field is skipped on decode
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn clear(&self, dst: &mut T) {
        match &self.binding {
            Binding::Plain(codec) => codec.clear(dst),
            Binding::Variable(codec) => codec.clear(dst),
        }
    }

    /// Current value of this field as a discriminator string
    fn identifier(&self, ctx: &Context, src: &T) -> String {
        let current = match &self.binding {
            Binding::Plain(codec) => codec.encode(ctx, src).ok(),
            Binding::Variable(_) => None,
        };
        match current {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn finish(field_name: &'static str, json_name: String, binding: Binding<T>) -> Self {
        Self {
            field_name,
            json_name,
            optional: false,
            read_only: false,
            binding,
        }
    }
}

/// A field binding awaiting its validator or descriptor
pub struct FieldBuilder<T, F> {
    field_name: &'static str,
    json_name: String,
    access: Accessor<T, F>,
}

impl<T: 'static, F: 'static> FieldBuilder<T, F> {
    /// Check the value with a leaf validator
    pub fn validator<V>(self, validator: V) -> MappedField<T>
    where
        V: Validator + 'static,
        F: Serialize + DeserializeOwned + Default,
    {
        let codec = ValidatedField {
            access: self.access,
            validator: Box::new(validator),
        };
        MappedField::finish(self.field_name, self.json_name, Binding::Plain(Box::new(codec)))
    }

    /// Describe the value with a nested descriptor
    pub fn contains<D>(self, map: D) -> MappedField<T>
    where
        D: TypeMap<F> + 'static,
        F: Default,
    {
        let codec = NestedField {
            access: self.access,
            map: Box::new(map),
        };
        MappedField::finish(self.field_name, self.json_name, Binding::Plain(Box::new(codec)))
    }

    /// Select the value's shape from a sibling discriminator
    pub fn variable(self, variable: VariableType<F>) -> MappedField<T>
    where
        F: Default,
    {
        let codec = VariableField {
            access: self.access,
            variable,
        };
        MappedField::finish(
            self.field_name,
            self.json_name,
            Binding::Variable(Box::new(codec)),
        )
    }

    /// Assign the value as-is, without validation
    pub fn untouched(self) -> MappedField<T>
    where
        F: Serialize + DeserializeOwned + Default,
    {
        let codec = UntouchedField {
            access: self.access,
        };
        MappedField::finish(self.field_name, self.json_name, Binding::Plain(Box::new(codec)))
    }
}

/// Descriptor for a record encoded as a JSON object
///
/// Fields are decoded and encoded in declaration order. Encoding emits
/// every field, read-only ones included, with keys in declaration order.
pub struct StructMap<T> {
    fields: Vec<MappedField<T>>,
    /// Index of the discriminator binding for each variable field
    discriminators: Vec<Option<usize>>,
}

impl<T> StructMap<T> {
    /// Build a record descriptor
    ///
    /// # Panics
    ///
    /// Panics if a variable field names a discriminator that is not a
    /// binding declared before it.
    pub fn new(fields: Vec<MappedField<T>>) -> Self {
        let discriminators = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| match &field.binding {
                Binding::Plain(_) => None,
                Binding::Variable(codec) => {
                    let name = codec.discriminator();
                    match fields.iter().position(|f| f.field_name == name) {
                        Some(pos) if pos < idx => Some(pos),
                        Some(_) => panic!(
                            "discriminator field {} must be declared before {}",
                            name, field.field_name
                        ),
                        None => panic!("no such underlying field: {name}"),
                    }
                }
            })
            .collect();

        Self {
            fields,
            discriminators,
        }
    }

    /// Field bindings in declaration order
    pub fn fields(&self) -> &[MappedField<T>] {
        &self.fields
    }

    fn discriminator_index(&self, idx: usize) -> std::result::Result<usize, SchemaError> {
        self.discriminators[idx].ok_or_else(|| SchemaError::NoSuchField {
            field: self.fields[idx].field_name.to_string(),
        })
    }
}

impl<T> TypeMap<T> for StructMap<T> {
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let object = match data.as_object() {
            Some(object) => object,
            None => {
                errs.push(path, "expected an object");
                return Ok(());
            }
        };

        let mut failed = vec![false; self.fields.len()];
        for (idx, field) in self.fields.iter().enumerate() {
            if field.read_only {
                continue;
            }

            let field_path = path.child(&field.json_name);
            let before = errs.len();

            match object.get(&field.json_name) {
                None if field.optional => {}
                None => errs.push(&field_path, "missing required field"),
                Some(Value::Null) => field.clear(dst),
                Some(value) => match &field.binding {
                    Binding::Plain(codec) => codec.decode(ctx, &field_path, value, dst, errs)?,
                    Binding::Variable(codec) => {
                        let pos = self.discriminator_index(idx)?;
                        let discriminator = &self.fields[pos];
                        if failed[pos] && !codec.conceals_identifier() {
                            errs.push(
                                &field_path,
                                format!(
                                    "cannot validate, invalid input for '{}'",
                                    discriminator.json_name
                                ),
                            );
                        } else {
                            let identifier = discriminator.identifier(ctx, dst);
                            codec.decode(ctx, &field_path, &identifier, value, dst, errs)?;
                        }
                    }
                },
            }

            failed[idx] = errs.len() > before;
        }

        Ok(())
    }

    fn encode(&self, ctx: &Context, src: &T) -> Result<Value> {
        let mut object = Map::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            let value = match &field.binding {
                Binding::Plain(codec) => codec.encode(ctx, src)?,
                Binding::Variable(codec) => {
                    let pos = self.discriminator_index(idx).map_err(Error::Schema)?;
                    let identifier = self.fields[pos].identifier(ctx, src);
                    codec.encode(ctx, &identifier, src)?
                }
            };
            object.insert(field.json_name.clone(), value);
        }
        Ok(Value::Object(object))
    }
}
