#![no_main]
use libfuzzer_sys::fuzz_target;

use worldnbt::{parse_uncompressed_with_opts, write_uncompressed, ReadOpts};

fuzz_target!(|data: &[u8]| {
    let archive = parse_uncompressed_with_opts(data, ReadOpts::new().max_seq_len(100));
    if let Ok(archive) = archive {
        // Can fail for four byte UTF-8 that no longer fits once written as
        // surrogate pairs.
        if let Ok(bs) = write_uncompressed(&archive) {
            assert!(parse_uncompressed_with_opts(&bs, ReadOpts::new()).is_ok());
        }
    }
});
