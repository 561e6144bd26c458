use ibc_engine_proto::google::protobuf::Any;
use prost::Message;

use crate::core::ics24_host::error::ValidationError;

/// A message that can be packed into an `Any` envelope and routed by ICS26.
pub trait Msg: Clone {
    type Raw: From<Self> + Message;

    /// Name of the module handling this message.
    fn route(&self) -> String;

    /// Unique type identifier for this message, used as the `type_url` of the envelope.
    fn type_url(&self) -> String;

    fn validate_basic(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn get_sign_bytes(&self) -> Vec<u8> {
        let raw_msg: Self::Raw = self.clone().into();
        raw_msg.encode_to_vec()
    }

    fn to_any(&self) -> Any {
        Any {
            type_url: self.type_url(),
            value: self.get_sign_bytes(),
        }
    }
}
