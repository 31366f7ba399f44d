#![no_main]

use libfuzzer_sys::fuzz_target;
use mcellrel::container::ContainerReader;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail with an error, never panic or
    // allocate from unchecked header counts
    let header = ContainerReader::read_header(Cursor::new(data));

    if let Ok(trace) = ContainerReader::read_trace(Cursor::new(data)) {
        let header = header.expect("full decode succeeded but header failed");
        assert_eq!(trace.block_count(), header.block_count());
        assert_eq!(trace.api(), header.api);
        for (_, values) in trace.blocks() {
            assert_eq!(values.len() as u64, trace.metadata().iteration_count);
        }
    }
});
