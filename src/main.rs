use anyhow::{anyhow, Context, Result};
use ark_ed25519::{EdwardsProjective, Fr};
use rand::RngCore;
use tracing::{debug, info, trace, warn};

use rlnc::{
    codec, committer::Committer, destination::DestinationNode, source::SourceNode, RlncError,
};

type Source = SourceNode<Fr, EdwardsProjective>;
type Destination = DestinationNode<Fr, EdwardsProjective>;

fn parse_args() -> (Vec<u8>, usize, usize) {
    let bytes_path = std::env::args()
        .nth(1)
        .expect("expected path to bytes as first positional argument");
    let num_chunks: usize = std::env::args()
        .nth(2)
        .expect("expected num_chunks as second positional argument")
        .parse()
        .expect("could not parse num_chunks as an int");
    let max_packets: usize = std::env::args()
        .nth(3)
        .unwrap_or_else(|| format!("{}", 4 * num_chunks))
        .parse()
        .expect("could not parse max_packets as an int");

    let bytes = if bytes_path.is_empty() {
        let mut bytes = vec![0u8; num_chunks * 31 * 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    } else {
        std::fs::read(&bytes_path).unwrap_or_else(|_| panic!("could not read {}", bytes_path))
    };

    (bytes, num_chunks, max_packets)
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|x| format!("{:02x}", x))
        .collect::<Vec<_>>()
        .join("")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::try_init().expect("cannot init logger");

    let (bytes, num_chunks, max_packets) = parse_args();
    let rng = &mut rand::thread_rng();

    let chunk_size = codec::chunk_size(bytes.len(), num_chunks)?;
    info!(
        "{} bytes, {} chunks of {} bytes",
        bytes.len(),
        num_chunks,
        chunk_size
    );

    let committer = Committer::for_message(bytes.len(), num_chunks)?;
    let source = Source::new(committer.clone(), &bytes, num_chunks)?;
    info!("message id: {}", hex(&source.commitments_hash()?));

    // the other nodes rebuild the committer from its serialized form
    let shipped = committer.to_bytes()?;
    let mut relay = Destination::new(Committer::from_bytes(&shipped)?, bytes.len(), num_chunks)?;
    let mut destination =
        Destination::new(Committer::from_bytes(&shipped)?, bytes.len(), num_chunks)?;

    let mut nb_packets = 0;
    while !destination.is_full() {
        if nb_packets >= max_packets {
            return Err(anyhow!(
                "could not decode after {} packets, rank is {}/{}",
                nb_packets,
                destination.rank(),
                num_chunks
            ));
        }
        nb_packets += 1;

        let packet = source.chunk_to_send(rng);
        trace!("sending {}", packet);
        match relay.receive_bytes(&packet.to_bytes()?) {
            Ok(()) => debug!("relay rank: {}/{}", relay.rank(), num_chunks),
            Err(RlncError::LinearlyDependentChunk) => warn!("relay dropped a redundant packet"),
            Err(e) => return Err(e).context("relay rejected a packet"),
        }

        let recoded = match relay.recode(rng) {
            Some(packet) => packet,
            None => continue,
        };
        match destination.receive_bytes(&recoded.to_bytes()?) {
            Ok(()) => debug!("destination rank: {}/{}", destination.rank(), num_chunks),
            Err(RlncError::LinearlyDependentChunk) => {
                warn!("destination dropped a redundant packet")
            }
            Err(e) => return Err(e).context("destination rejected a packet"),
        }
    }

    let decoded = destination.decode()?;
    if decoded != bytes {
        return Err(anyhow!("decoded message differs from the original one"));
    }
    info!("decoded {} bytes after {} packets", decoded.len(), nb_packets);

    println!(
        "{{id: {:?}, bytes: {}, chunks: {}, packets: {}}}",
        hex(&source.commitments_hash()?),
        decoded.len(),
        num_chunks,
        nb_packets
    );

    Ok(())
}
