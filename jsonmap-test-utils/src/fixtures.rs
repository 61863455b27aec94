//! Fixture records and their schemas

use chrono::{DateTime, Utc};
use jsonmap_codec::{
    nullable, passthrough, Boxed, Lazy, MapOf, MappedField, Primitive, SliceOf, StringRenderer,
    StructMap, Time, TypeMap, VariableType,
};
use jsonmap_format::validator::{boolean, integer, one_of, string, BoxError};
use jsonmap_format::Context;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Three optional scalars
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InnerThing {
    pub foo: String,
    pub an_int: i64,
    pub a_bool: bool,
}

/// Scalars with awkward wire names, a timestamp and an enumerated value
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnotherInnerThing {
    pub foo: String,
    pub an_int: i64,
    pub a_bool: bool,
    pub happened_at: DateTime<Utc>,
    pub thanks: Value,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterThing {
    pub inner_thing: InnerThing,
}

/// Nested under the wire name `another/inner/thing`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnotherOuterThing {
    pub inner_thing: AnotherInnerThing,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterInnerThingMap {
    pub inner_thing_map: BTreeMap<String, InnerThing>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterPointerThing {
    pub inner_thing: Option<InnerThing>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterBoxedThing {
    pub inner_thing: Option<Box<InnerThing>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterSliceThing {
    pub inner_things: Vec<InnerThing>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outer2DSliceThing {
    pub inner_things: Vec<Vec<InnerThing>>,
}

/// At most two elements
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterMaxSliceThing {
    pub inner_things: Vec<InnerThing>,
}

/// At least two elements
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterMinSliceThing {
    pub inner_things: Vec<InnerThing>,
}

/// Between one and two elements
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterRangeSliceThing {
    pub inner_things: Vec<InnerThing>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterBoxSliceThing {
    pub inner_things: Vec<Box<InnerThing>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterPointerToSliceThing {
    pub inner_things: Option<Vec<InnerThing>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OtherInnerThing {
    pub bar: String,
}

/// Payload of the variable-type fixtures
#[derive(Debug, Default, Clone, PartialEq)]
pub enum InnerValue {
    #[default]
    Unset,
    Foo(InnerThing),
    Bar(OtherInnerThing),
    Number(i64),
    Label(String),
}

impl InnerValue {
    fn foo(&self) -> Option<&InnerThing> {
        match self {
            InnerValue::Foo(v) => Some(v),
            _ => None,
        }
    }

    fn bar(&self) -> Option<&OtherInnerThing> {
        match self {
            InnerValue::Bar(v) => Some(v),
            _ => None,
        }
    }

    fn number(&self) -> Option<&i64> {
        match self {
            InnerValue::Number(v) => Some(v),
            _ => None,
        }
    }

    fn label(&self) -> Option<&String> {
        match self {
            InnerValue::Label(v) => Some(v),
            _ => None,
        }
    }
}

/// Discriminator checked as a free-form string
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterVariableThing {
    pub inner_type: String,
    pub inner_value: InnerValue,
}

/// Discriminator restricted to a fixed set
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterVariableThingOneOf {
    pub inner_type: String,
    pub inner_value: InnerValue,
}

/// Discriminator value left out of error messages
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterVariableThingConcealed {
    pub inner_type: String,
    pub inner_value: InnerValue,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadOnlyThing {
    pub primary_key: String,
}

/// Validated by a closure with its own error type
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BrokenThing {
    pub invalid: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TemplatableThing {
    pub some_field: String,
}

/// Always fails to serialize
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NonMarshalableType;

impl Serialize for NonMarshalableType {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("oops"))
    }
}

impl<'de> Deserialize<'de> for NonMarshalableType {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(serde::de::Error::custom("oops"))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InnerNonMarshalableThing {
    pub oops: NonMarshalableType,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterNonMarshalableThing {
    pub inner_thing: InnerNonMarshalableThing,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThingWithSliceOfPrimitives {
    pub strings: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OuterMapThing {
    pub inner_map: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThingWithMapOfInterfaces {
    pub interfaces: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThingWithMapOfStrings {
    pub strings: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThingWithTime {
    pub happened_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThingWithEnumerableInterface {
    pub thanks: Value,
}

/// Self-referential record
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
}

pub fn inner_thing_map() -> Arc<StructMap<InnerThing>> {
    Arc::new(StructMap::new(vec![
        MappedField::new("foo", "foo", |t: &InnerThing| &t.foo, |t| &mut t.foo)
            .validator(string(1, 12))
            .optional(),
        MappedField::new("an_int", "an_int", |t: &InnerThing| &t.an_int, |t| &mut t.an_int)
            .validator(integer(0, 10))
            .optional(),
        MappedField::new("a_bool", "a_bool", |t: &InnerThing| &t.a_bool, |t| &mut t.a_bool)
            .validator(boolean())
            .optional(),
    ]))
}

pub fn another_inner_thing_map() -> Arc<StructMap<AnotherInnerThing>> {
    Arc::new(StructMap::new(vec![
        MappedField::new("foo", "foo", |t: &AnotherInnerThing| &t.foo, |t| &mut t.foo)
            .validator(string(1, 5))
            .optional(),
        MappedField::new(
            "an_int",
            "an~int",
            |t: &AnotherInnerThing| &t.an_int,
            |t| &mut t.an_int,
        )
        .validator(integer(0, 10))
        .optional(),
        MappedField::new(
            "a_bool",
            "a_bool",
            |t: &AnotherInnerThing| &t.a_bool,
            |t| &mut t.a_bool,
        )
        .validator(boolean())
        .optional(),
        MappedField::new(
            "happened_at",
            "happened_at",
            |t: &AnotherInnerThing| &t.happened_at,
            |t| &mut t.happened_at,
        )
        .contains(Time)
        .optional(),
        MappedField::new(
            "thanks",
            "thanks",
            |t: &AnotherInnerThing| &t.thanks,
            |t| &mut t.thanks,
        )
        .validator(one_of(["foo", "bar"]))
        .optional(),
    ]))
}

pub fn outer_thing_map() -> Arc<StructMap<OuterThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing",
        "inner_thing",
        |t: &OuterThing| &t.inner_thing,
        |t| &mut t.inner_thing,
    )
    .contains(inner_thing_map())]))
}

pub fn another_outer_thing_map() -> Arc<StructMap<AnotherOuterThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing",
        "another/inner/thing",
        |t: &AnotherOuterThing| &t.inner_thing,
        |t| &mut t.inner_thing,
    )
    .contains(another_inner_thing_map())]))
}

pub fn map_of_inner_thing_map() -> Arc<StructMap<OuterInnerThingMap>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing_map",
        "inner_thing_map",
        |t: &OuterInnerThingMap| &t.inner_thing_map,
        |t| &mut t.inner_thing_map,
    )
    .contains(MapOf::new(inner_thing_map()))]))
}

pub fn outer_pointer_thing_map() -> Arc<StructMap<OuterPointerThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing",
        "inner_thing",
        |t: &OuterPointerThing| &t.inner_thing,
        |t| &mut t.inner_thing,
    )
    .contains(nullable(inner_thing_map()))]))
}

pub fn outer_boxed_thing_map() -> Arc<StructMap<OuterBoxedThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing",
        "inner_thing",
        |t: &OuterBoxedThing| &t.inner_thing,
        |t| &mut t.inner_thing,
    )
    .contains(nullable(Boxed(inner_thing_map())))]))
}

fn inner_things_field<T: 'static>(
    get: fn(&T) -> &Vec<InnerThing>,
    get_mut: fn(&mut T) -> &mut Vec<InnerThing>,
    map: SliceOf<Arc<StructMap<InnerThing>>>,
) -> MappedField<T> {
    MappedField::new("inner_things", "inner_things", get, get_mut).contains(map)
}

pub fn outer_slice_thing_map() -> Arc<StructMap<OuterSliceThing>> {
    Arc::new(StructMap::new(vec![inner_things_field(
        |t: &OuterSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
        SliceOf::new(inner_thing_map()),
    )]))
}

pub fn outer_2d_slice_thing_map() -> Arc<StructMap<Outer2DSliceThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_things",
        "inner_things",
        |t: &Outer2DSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
    )
    .contains(SliceOf::new(SliceOf::new(inner_thing_map())))]))
}

pub fn max_slice_size_map() -> Arc<StructMap<OuterMaxSliceThing>> {
    Arc::new(StructMap::new(vec![inner_things_field(
        |t: &OuterMaxSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
        SliceOf::max(inner_thing_map(), 2),
    )]))
}

pub fn min_slice_size_map() -> Arc<StructMap<OuterMinSliceThing>> {
    Arc::new(StructMap::new(vec![inner_things_field(
        |t: &OuterMinSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
        SliceOf::min(inner_thing_map(), 2),
    )]))
}

pub fn range_slice_size_map() -> Arc<StructMap<OuterRangeSliceThing>> {
    Arc::new(StructMap::new(vec![inner_things_field(
        |t: &OuterRangeSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
        SliceOf::range(inner_thing_map(), 1, 2),
    )]))
}

pub fn outer_box_slice_thing_map() -> Arc<StructMap<OuterBoxSliceThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_things",
        "inner_things",
        |t: &OuterBoxSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
    )
    .contains(SliceOf::new(Boxed(inner_thing_map())))]))
}

pub fn outer_pointer_to_slice_thing_map() -> Arc<StructMap<OuterPointerToSliceThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_things",
        "inner_things",
        |t: &OuterPointerToSliceThing| &t.inner_things,
        |t| &mut t.inner_things,
    )
    .contains(nullable(SliceOf::new(inner_thing_map())))]))
}

pub fn other_inner_thing_map() -> Arc<StructMap<OtherInnerThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "bar",
        "bar",
        |t: &OtherInnerThing| &t.bar,
        |t| &mut t.bar,
    )
    .validator(string(1, 155))
    .optional()]))
}

fn foo_bar_branches(variable: VariableType<InnerValue>) -> VariableType<InnerValue> {
    variable
        .branch("foo", inner_thing_map(), InnerValue::Foo, InnerValue::foo)
        .branch("bar", other_inner_thing_map(), InnerValue::Bar, InnerValue::bar)
}

pub fn outer_variable_thing_map() -> Arc<StructMap<OuterVariableThing>> {
    Arc::new(StructMap::new(vec![
        MappedField::new(
            "inner_type",
            "inner_type",
            |t: &OuterVariableThing| &t.inner_type,
            |t| &mut t.inner_type,
        )
        .validator(string(1, 255)),
        MappedField::new(
            "inner_value",
            "inner_thing",
            |t: &OuterVariableThing| &t.inner_value,
            |t| &mut t.inner_value,
        )
        .variable(foo_bar_branches(VariableType::new("inner_type"))),
    ]))
}

pub fn outer_variable_thing_one_of_map() -> Arc<StructMap<OuterVariableThingOneOf>> {
    let variable = foo_bar_branches(VariableType::new("inner_type"))
        .branch(
            "these",
            Primitive::new(integer(-5, 10)),
            InnerValue::Number,
            InnerValue::number,
        )
        .branch(
            "are",
            Primitive::new(string(1, 5)),
            InnerValue::Label,
            InnerValue::label,
        )
        .branch("allowed", inner_thing_map(), InnerValue::Foo, InnerValue::foo);

    Arc::new(StructMap::new(vec![
        MappedField::new(
            "inner_type",
            "inner_type",
            |t: &OuterVariableThingOneOf| &t.inner_type,
            |t| &mut t.inner_type,
        )
        .validator(one_of(["these", "are", "allowed"])),
        MappedField::new(
            "inner_value",
            "inner_thing",
            |t: &OuterVariableThingOneOf| &t.inner_value,
            |t| &mut t.inner_value,
        )
        .variable(variable),
    ]))
}

pub fn outer_variable_thing_concealed_map() -> Arc<StructMap<OuterVariableThingConcealed>> {
    Arc::new(StructMap::new(vec![
        MappedField::new(
            "inner_type",
            "inner_type",
            |t: &OuterVariableThingConcealed| &t.inner_type,
            |t| &mut t.inner_type,
        )
        .validator(one_of(["these", "are", "allowed"])),
        MappedField::new(
            "inner_value",
            "inner_thing",
            |t: &OuterVariableThingConcealed| &t.inner_value,
            |t| &mut t.inner_value,
        )
        .variable(foo_bar_branches(VariableType::new("inner_type")).conceal_identifier()),
    ]))
}

pub fn read_only_thing_map() -> Arc<StructMap<ReadOnlyThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "primary_key",
        "primary_key",
        |t: &ReadOnlyThing| &t.primary_key,
        |t| &mut t.primary_key,
    )
    .untouched()
    .read_only()]))
}

fn broken_validator(_ctx: &Context, _value: &Value) -> Result<Value, BoxError> {
    Err("this should be a ValidationError".into())
}

pub fn broken_thing_map() -> Arc<StructMap<BrokenThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "invalid",
        "invalid",
        |t: &BrokenThing| &t.invalid,
        |t| &mut t.invalid,
    )
    .validator(broken_validator)]))
}

pub fn templatable_thing_map() -> Arc<StructMap<TemplatableThing>> {
    let renderer = StringRenderer::new("{Context.foo}:{Value}").expect("fixture template compiles");
    Arc::new(StructMap::new(vec![MappedField::new(
        "some_field",
        "some_field",
        |t: &TemplatableThing| &t.some_field,
        |t| &mut t.some_field,
    )
    .contains(renderer)]))
}

pub fn inner_non_marshalable_thing_map() -> Arc<StructMap<InnerNonMarshalableThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "oops",
        "oops",
        |t: &InnerNonMarshalableThing| &t.oops,
        |t| &mut t.oops,
    )
    .untouched()]))
}

pub fn outer_non_marshalable_thing_map() -> Arc<StructMap<OuterNonMarshalableThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_thing",
        "inner_thing",
        |t: &OuterNonMarshalableThing| &t.inner_thing,
        |t| &mut t.inner_thing,
    )
    .contains(inner_non_marshalable_thing_map())]))
}

pub fn thing_with_slice_of_primitives_map() -> Arc<StructMap<ThingWithSliceOfPrimitives>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "strings",
        "strings",
        |t: &ThingWithSliceOfPrimitives| &t.strings,
        |t| &mut t.strings,
    )
    .contains(nullable(SliceOf::new(Primitive::new(string(1, 16)))))]))
}

pub fn thing_with_inner_map_map() -> Arc<StructMap<OuterMapThing>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "inner_map",
        "inner_map",
        |t: &OuterMapThing| &t.inner_map,
        |t| &mut t.inner_map,
    )
    .contains(MapOf::new(passthrough()))]))
}

pub fn thing_with_map_of_interfaces_map() -> Arc<StructMap<ThingWithMapOfInterfaces>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "interfaces",
        "interfaces",
        |t: &ThingWithMapOfInterfaces| &t.interfaces,
        |t| &mut t.interfaces,
    )
    .contains(MapOf::new(passthrough()))]))
}

pub fn thing_with_map_of_strings_map() -> Arc<StructMap<ThingWithMapOfStrings>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "strings",
        "strings",
        |t: &ThingWithMapOfStrings| &t.strings,
        |t| &mut t.strings,
    )
    .contains(MapOf::new(Primitive::new(string(0, 5))))]))
}

pub fn thing_with_time_map() -> Arc<StructMap<ThingWithTime>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "happened_at",
        "happened_at",
        |t: &ThingWithTime| &t.happened_at,
        |t| &mut t.happened_at,
    )
    .contains(Time)]))
}

pub fn thing_with_enumerable_interface_map() -> Arc<StructMap<ThingWithEnumerableInterface>> {
    Arc::new(StructMap::new(vec![MappedField::new(
        "thanks",
        "thanks",
        |t: &ThingWithEnumerableInterface| &t.thanks,
        |t| &mut t.thanks,
    )
    .validator(one_of(["foo", "bar"]))]))
}

static TREE_NODE_MAP: OnceLock<Arc<StructMap<TreeNode>>> = OnceLock::new();
static TREE_NODE_MAP_BUILDS: AtomicUsize = AtomicUsize::new(0);

fn tree_node_dyn() -> Arc<dyn TypeMap<TreeNode>> {
    tree_node_map()
}

/// Shared self-referential schema; every call returns the same instance
pub fn tree_node_map() -> Arc<StructMap<TreeNode>> {
    TREE_NODE_MAP.get_or_init(build_tree_node_map).clone()
}

/// How many times the tree schema has been constructed in this process
pub fn tree_node_map_builds() -> usize {
    TREE_NODE_MAP_BUILDS.load(Ordering::SeqCst)
}

fn build_tree_node_map() -> Arc<StructMap<TreeNode>> {
    TREE_NODE_MAP_BUILDS.fetch_add(1, Ordering::SeqCst);
    Arc::new(StructMap::new(vec![
        MappedField::new("name", "name", |t: &TreeNode| &t.name, |t| &mut t.name)
            .validator(string(1, 32)),
        MappedField::new(
            "children",
            "children",
            |t: &TreeNode| &t.children,
            |t| &mut t.children,
        )
        .contains(SliceOf::new(Lazy::new(tree_node_dyn)))
        .optional(),
    ]))
}
