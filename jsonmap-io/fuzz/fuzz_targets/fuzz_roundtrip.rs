#![no_main]

use jsonmap_format::Context;
use jsonmap_test_utils::{test_mapper, OuterSliceThing};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mapper = test_mapper();
    let ctx = Context::empty();

    let mut first = OuterSliceThing::default();
    if mapper.unmarshal(&ctx, data, &mut first).is_err() {
        return;
    }

    let encoded = mapper.marshal(&ctx, &first).expect("accepted record must encode");
    let mut second = OuterSliceThing::default();
    mapper
        .unmarshal(&ctx, &encoded, &mut second)
        .expect("encoded record must decode");
    assert_eq!(first, second);
});
