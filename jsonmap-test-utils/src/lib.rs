//! jsonmap Test Utilities
//!
//! Shared fixture records, their schemas and a pre-built registry for the
//! jsonmap crates' tests and benchmarks.

pub mod fixtures;

pub use fixtures::*;

use jsonmap_io::TypeMapper;
use std::sync::Once;

/// Registry holding every fixture schema
pub fn test_mapper() -> TypeMapper {
    TypeMapper::new()
        .register(inner_thing_map())
        .register(another_inner_thing_map())
        .register(outer_thing_map())
        .register(another_outer_thing_map())
        .register(map_of_inner_thing_map())
        .register(outer_pointer_thing_map())
        .register(outer_boxed_thing_map())
        .register(outer_slice_thing_map())
        .register(outer_2d_slice_thing_map())
        .register(max_slice_size_map())
        .register(min_slice_size_map())
        .register(range_slice_size_map())
        .register(outer_box_slice_thing_map())
        .register(outer_pointer_to_slice_thing_map())
        .register(other_inner_thing_map())
        .register(outer_variable_thing_map())
        .register(outer_variable_thing_one_of_map())
        .register(outer_variable_thing_concealed_map())
        .register(read_only_thing_map())
        .register(broken_thing_map())
        .register(templatable_thing_map())
        .register(inner_non_marshalable_thing_map())
        .register(outer_non_marshalable_thing_map())
        .register(thing_with_slice_of_primitives_map())
        .register(thing_with_inner_map_map())
        .register(thing_with_map_of_interfaces_map())
        .register(thing_with_map_of_strings_map())
        .register(thing_with_time_map())
        .register(thing_with_enumerable_interface_map())
        .register(tree_node_map())
}

/// Install a fmt subscriber writing through the test harness
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
            .try_init();
    });
}

/// Render a validation listing the way `MultiValidationError` displays it
pub fn validation_listing(lines: &[&str]) -> String {
    let mut out = String::from("Validation Errors: \n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapper_registers_fixtures() {
        let mapper = test_mapper();
        assert_eq!(mapper.len(), 30);
        assert!(mapper.contains::<InnerThing>());
        assert!(mapper.contains::<TreeNode>());
    }

    #[test]
    fn test_validation_listing() {
        assert_eq!(
            validation_listing(&["/foo: not a string"]),
            "Validation Errors: \n/foo: not a string\n"
        );
    }
}
