use ibc_engine_proto::google::protobuf::Any;

use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::client_state::AnyClientState;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::events::IbcEvent;
use crate::relayer::ics18_relayer::error::Error;
use crate::signer::Signer;
use crate::Height;

/// Trait capturing all dependencies (i.e., the context) which algorithms in ICS18 require to
/// relay packets between chains. This trait comprises the dependencies towards a single chain.
pub trait Ics18Context {
    /// Returns the latest height of the chain.
    fn query_latest_height(&self) -> Height;

    /// Returns this client state for the given `client_id` on this chain.
    fn query_client_full_state(&self, client_id: &ClientId) -> Option<AnyClientState>;

    /// Returns the most advanced header of this chain.
    fn query_latest_header(&self) -> Option<AnyClientMessage>;

    /// Proof of the value stored under `path`, or of its absence, in the store committed to
    /// by the block at `height`.
    fn query_proof(&self, path: &Path, height: Height) -> Option<CommitmentProofBytes>;

    /// Interface that the relayer uses to submit a datagram to this chain.
    /// One can think of this as wrapping around the `/broadcast_tx_commit` ABCI endpoint.
    fn send(&mut self, msgs: Vec<Any>) -> Result<Vec<IbcEvent>, Error>;

    /// The account signing the datagrams submitted to this chain.
    fn signer(&self) -> Signer;
}
