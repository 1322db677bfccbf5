#![no_main]

use avl_multiset::model::CursorEquivalenceInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: CursorEquivalenceInput| {
    avl_multiset::model::run_cursor_equivalence(input.values, input.ops);
});
