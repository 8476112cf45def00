//! Property tests for the frame parser and message decoder

use neptune_protocol::{Frame, FrameParser, Message, MessageError, HEADER_BYTE_1, HEADER_BYTE_2};
use proptest::prelude::*;

fn parse_all(parser: &mut FrameParser, bytes: &[u8]) -> Vec<Frame> {
    parser.feed_bytes(bytes).collect()
}

fn encode(payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![HEADER_BYTE_1, HEADER_BYTE_2, payload.len() as u8];
    bytes.extend_from_slice(payload);
    bytes
}

proptest! {
    #[test]
    fn chunk_boundaries_do_not_change_frames(
        bytes in proptest::collection::vec(any::<u8>(), 0..600),
        chunk in 1usize..64,
    ) {
        let whole = parse_all(&mut FrameParser::new(), &bytes);

        let mut bytewise = FrameParser::new();
        let mut one_at_a_time = Vec::new();
        for byte in &bytes {
            one_at_a_time.extend(parse_all(&mut bytewise, core::slice::from_ref(byte)));
        }

        let mut chunked_parser = FrameParser::new();
        let mut chunked = Vec::new();
        for piece in bytes.chunks(chunk) {
            chunked.extend(parse_all(&mut chunked_parser, piece));
        }

        prop_assert_eq!(&whole, &one_at_a_time);
        prop_assert_eq!(&whole, &chunked);
    }

    #[test]
    fn framed_payload_is_recovered_across_any_split(
        payload in proptest::collection::vec(any::<u8>(), 0..=255),
        split in any::<prop::sample::Index>(),
    ) {
        let bytes = encode(&payload);
        let at = split.index(bytes.len() + 1);

        let mut parser = FrameParser::new();
        let mut frames = parse_all(&mut parser, &bytes[..at]);
        frames.extend(parse_all(&mut parser, &bytes[at..]));

        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(&frames[0].payload[..], &payload[..]);
        prop_assert!(!parser.is_mid_frame());
    }

    #[test]
    fn spurious_header_byte_before_frame_is_tolerated(
        garbage in proptest::collection::vec(any::<u8>().prop_filter("no header bytes", |b| *b != HEADER_BYTE_1 && *b != HEADER_BYTE_2), 0..32),
        at in any::<prop::sample::Index>(),
        payload in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut bytes = garbage.clone();
        bytes.insert(at.index(garbage.len() + 1), HEADER_BYTE_1);
        bytes.extend(encode(&payload));

        let frames = parse_all(&mut FrameParser::new(), &bytes);
        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(&frames[0].payload[..], &payload[..]);
    }

    #[test]
    fn consecutive_frames_are_all_recovered(
        payloads in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..40), 1..8),
    ) {
        let mut bytes = Vec::new();
        for payload in &payloads {
            bytes.extend(encode(payload));
        }

        let frames = parse_all(&mut FrameParser::new(), &bytes);
        prop_assert_eq!(frames.len(), payloads.len());
        for (frame, payload) in frames.iter().zip(&payloads) {
            prop_assert_eq!(&frame.payload[..], &payload[..]);
        }
    }

    #[test]
    fn decode_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..=255)) {
        match Message::decode(&payload) {
            Ok(msg) => {
                prop_assert!(payload.len() >= 4);
                prop_assert_eq!(msg.data.len() * 2, payload.len() - 4);
                prop_assert_eq!(msg.address, u16::from_be_bytes([payload[1], payload[2]]));
            }
            Err(MessageError::TooShort { len }) => prop_assert!(len < 4),
            Err(MessageError::OddDataLength { len }) => prop_assert!(len % 2 == 1),
        }
    }

    #[test]
    fn even_data_regions_decode_to_big_endian_words(words in proptest::collection::vec(any::<u16>(), 0..100)) {
        let mut payload = vec![0x83, 0x10, 0x30, words.len() as u8];
        for word in &words {
            payload.extend_from_slice(&word.to_be_bytes());
        }

        let msg = Message::decode(&payload).unwrap();
        prop_assert_eq!(&msg.data[..], &words[..]);
        prop_assert!(msg.declared_length_matches());
    }
}

#[test]
fn frame_encode_matches_manual_layout() {
    let frame = Frame::new(&[0x83, 0x10, 0x02, 0x01, 0x00, 0x01]).unwrap();
    let encoded = frame.encode_to_vec().unwrap();
    assert_eq!(&encoded[..], &encode(&[0x83, 0x10, 0x02, 0x01, 0x00, 0x01])[..]);
}
