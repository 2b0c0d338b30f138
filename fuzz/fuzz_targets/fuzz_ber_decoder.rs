#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use asn1_ber::{DecodeOptions, Decoder, decode, decode_all, decode_from};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Slice and reader sources must agree
    let from_slice = decode(bytes.clone());
    let from_reader = decode_from(data);
    assert_eq!(from_slice.is_ok(), from_reader.is_ok());

    if let Ok(value) = from_slice {
        assert_eq!(from_reader.ok().as_ref(), Some(&value));

        // Anything decoded re-encodes, and the re-encoding decodes back
        let encoded = value.encode().expect("decoded value must encode");
        assert_eq!(encoded.len(), value.encoded_len().expect("length of decoded value"));
        assert_eq!(decode(encoded).ok(), Some(value));
    }

    // Tight limits must fail cleanly
    let options = DecodeOptions::new().max_depth(4).max_length(64);
    let _ = Decoder::new(bytes.clone()).with_options(options).read_value();

    let _ = decode_all(bytes);
});
