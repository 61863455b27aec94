//! A single registry shared by many threads

use jsonmap_format::{Context, Error};
use jsonmap_io::TypeMapper;
use jsonmap_test_utils::*;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ITERATIONS: usize = 200;

#[test]
fn test_registry_is_shared_across_threads() {
    init_tracing();
    let mapper = Arc::new(test_mapper());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mapper = Arc::clone(&mapper);
            thread::spawn(move || {
                let ctx = Context::empty();
                for i in 0..ITERATIONS {
                    let src = OuterSliceThing {
                        inner_things: vec![InnerThing {
                            foo: format!("t{t}i{i}"),
                            an_int: (i % 11) as i64,
                            a_bool: i % 2 == 0,
                        }],
                    };
                    let data = mapper.marshal(&ctx, &src).unwrap();
                    let mut dst = OuterSliceThing::default();
                    mapper.unmarshal(&ctx, &data, &mut dst).unwrap();
                    assert_eq!(dst, src);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_failures_are_isolated() {
    let mapper: Arc<TypeMapper> = Arc::new(test_mapper());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mapper = Arc::clone(&mapper);
            thread::spawn(move || {
                let ctx = Context::empty();
                for _ in 0..ITERATIONS {
                    let mut dst = InnerThing::default();
                    if t % 2 == 0 {
                        mapper
                            .unmarshal(&ctx, br#"{"an_int": 4}"#, &mut dst)
                            .unwrap();
                        assert_eq!(dst.an_int, 4);
                    } else {
                        let err = mapper
                            .unmarshal(&ctx, br#"{"an_int": 40}"#, &mut dst)
                            .unwrap_err();
                        match err {
                            Error::Validation(errs) => assert_eq!(errs.len(), 1),
                            other => panic!("unexpected error: {other}"),
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TypeMapper>();
}
