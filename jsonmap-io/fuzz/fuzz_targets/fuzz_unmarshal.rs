#![no_main]

use jsonmap_format::{Context, Error};
use jsonmap_test_utils::{
    test_mapper, AnotherOuterThing, OuterInnerThingMap, OuterVariableThingOneOf, TreeNode,
};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn mapper() -> &'static jsonmap_io::TypeMapper {
    static MAPPER: OnceLock<jsonmap_io::TypeMapper> = OnceLock::new();
    MAPPER.get_or_init(test_mapper)
}

fn check<T: Default + 'static>(data: &[u8]) {
    let mut dst = T::default();
    // Schemas are fixed, so arbitrary input must never surface a schema fault
    if let Err(Error::Schema(e)) = mapper().unmarshal(&Context::empty(), data, &mut dst) {
        panic!("schema fault on input data: {e}");
    }
}

fuzz_target!(|data: &[u8]| {
    check::<AnotherOuterThing>(data);
    check::<OuterInnerThingMap>(data);
    check::<OuterVariableThingOneOf>(data);
    check::<TreeNode>(data);
});
