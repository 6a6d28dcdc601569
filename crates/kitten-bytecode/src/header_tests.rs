use crate::error::DecodeError;
use crate::header::{UnitHeader, validate_unit};

#[test]
fn header_roundtrip() {
    let header = UnitHeader { length: 0x1234 };
    let bytes = header.to_bytes();
    assert_eq!(bytes, [0x34, 0x12, 0, 0]);
    assert_eq!(UnitHeader::from_bytes(&bytes), Ok(header));
    assert_eq!(header.body_len(), 0x1234 - 5);
}

#[test]
fn empty_unit_is_valid() {
    let header = validate_unit(&[5, 0, 0, 0, 0]).unwrap();
    assert_eq!(header.length, 5);
    assert_eq!(header.body_len(), 0);
}

#[test]
fn declared_length_longer_than_buffer() {
    let err = validate_unit(&[9, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::LengthMismatch {
            offset: 0,
            declared: 9,
            actual: 5
        }
    );
}

#[test]
fn declared_length_shorter_than_buffer() {
    let err = validate_unit(&[5, 0, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, DecodeError::LengthMismatch { declared: 5, actual: 6, .. }));
}

#[test]
fn truncated_header() {
    let err = validate_unit(&[5, 0]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnexpectedEnd {
            offset: 0,
            required: 4,
            remaining: 2
        }
    );
}

#[test]
fn unit_without_room_for_terminator() {
    let err = validate_unit(&[4, 0, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnitTooShort {
            offset: 0,
            declared: 4
        }
    );
}

#[test]
fn missing_terminator() {
    let err = validate_unit(&[6, 0, 0, 0, 0x04, 0x01]).unwrap_err();
    assert_eq!(err, DecodeError::MissingTerminator { offset: 5 });
    assert_eq!(err.offset(), 5);
}
