use core::fmt::Display;

use bytes::Buf;
use flex_error::{define_error, DisplayOnly, TraceError};
use prost::{DecodeError, EncodeError, Message};

define_error! {
    Error {
        TryFromProtobuf
            { reason: String }
            | e | {
                format_args!("error converting message type into domain type: {}",
                    e.reason)
            },

        EncodeMessage
            [ TraceError<EncodeError> ]
            | _ | { "error encoding message into buffer" },

        DecodeMessage
            [ TraceError<DecodeError> ]
            | _ | { "error decoding buffer into message" },

        ParseLength
            [ DisplayOnly<core::num::TryFromIntError> ]
            | _ | { "error parsing encoded length" },
    }
}

impl Error {
    pub fn try_from<Raw, T, E>(e: E) -> Error
    where
        E: Display,
        T: TryFrom<Raw, Error = E>,
    {
        Error::try_from_protobuf(format!("{e}"))
    }
}

/// Allows for easy Google Protocol Buffers encoding and decoding of domain
/// types with validation.
///
/// A domain type `T` is paired with its raw prost counterpart `Raw`: decoding
/// goes through `TryFrom<Raw>` so that invalid wire data never produces a
/// domain value, and encoding goes through `Into<Raw>`.
pub trait Protobuf<Raw: Message + Default>
where
    Self: Sized + Clone + TryFrom<Raw>,
    Raw: From<Self>,
    <Self as TryFrom<Raw>>::Error: Display,
{
    /// Encode into a buffer in Protobuf format.
    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        Raw::from(self.clone())
            .encode(buf)
            .map_err(Error::encode_message)
    }

    /// Constructor that attempts to decode an instance from a buffer.
    ///
    /// Similar to [`prost::Message::decode`] but with additional validation
    /// prior to constructing the destination type.
    fn decode<B: Buf>(buf: B) -> Result<Self, Error> {
        let raw = Raw::decode(buf).map_err(Error::decode_message)?;

        Self::try_from(raw).map_err(Error::try_from::<Raw, Self, _>)
    }

    /// Returns the encoded length of the message without a length delimiter.
    fn encoded_len(&self) -> usize {
        Raw::from(self.clone()).encoded_len()
    }

    /// Encodes into a Protobuf-encoded `Vec<u8>`.
    fn encode_vec(&self) -> Vec<u8> {
        Raw::from(self.clone()).encode_to_vec()
    }

    /// Constructor that attempts to decode a Protobuf-encoded instance from a
    /// `Vec<u8>` (or equivalent).
    fn decode_vec(v: &[u8]) -> Result<Self, Error> {
        Self::decode(v)
    }

    /// Encode with a length-delimiter to a `Vec<u8>` Protobuf-encoded message.
    fn encode_length_delimited_vec(&self) -> Result<Vec<u8>, Error> {
        let raw = Raw::from(self.clone());
        let len = raw.encoded_len();
        let _: u64 = len.try_into().map_err(Error::parse_length)?;
        Ok(raw.encode_length_delimited_to_vec())
    }
}
