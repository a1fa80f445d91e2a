use crate::error::{KnapsackError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Slice of a block's last row, keyed by the chunk's first column.
    Boundary(usize),
    /// Traceback token addressed to the given block.
    Traceback(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackToken {
    pub value: u64,
    pub remaining: usize,
    /// Picked item indices, decreasing.
    pub picked: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Boundary(Vec<u64>),
    Traceback(TracebackToken),
}

type Envelope = (Tag, Message);

/// One rank's view of a fully connected point-to-point network.
///
/// Every ordered pair of ranks has its own unbounded channel, so sends never
/// block and a receive from `source` can only be matched by `source`.
/// Messages with a different tag are parked until someone asks for them.
pub struct Endpoint {
    rank: usize,
    outgoing: Vec<Sender<Envelope>>,
    incoming: Vec<Receiver<Envelope>>,
    parked: Vec<VecDeque<Envelope>>,
}

impl Endpoint {
    pub fn world(size: usize) -> Vec<Endpoint> {
        let mut senders: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        let mut receivers: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        for source in 0..size {
            for dest in 0..size {
                let (tx, rx) = unbounded();
                senders[source].push(tx);
                receivers[dest].push(rx);
            }
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| Endpoint {
                rank,
                outgoing,
                incoming,
                parked: (0..size).map(|_| VecDeque::new()).collect(),
            })
            .collect()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.outgoing.len()
    }

    pub fn send(&self, dest: usize, tag: Tag, message: Message) -> Result<()> {
        let channel = self.outgoing.get(dest).ok_or_else(|| {
            KnapsackError::communication(self.rank, format!("no such rank {}", dest))
        })?;
        channel.send((tag, message)).map_err(|_| {
            KnapsackError::communication(self.rank, format!("rank {} has gone away", dest))
        })
    }

    /// Blocks until `source` delivers a message tagged `tag`.
    pub fn recv(&mut self, source: usize, tag: Tag) -> Result<Message> {
        let rank = self.rank;
        let parked = self.parked.get_mut(source).ok_or_else(|| {
            KnapsackError::communication(rank, format!("no such rank {}", source))
        })?;
        if let Some(pos) = parked.iter().position(|(t, _)| *t == tag) {
            if let Some((_, message)) = parked.remove(pos) {
                return Ok(message);
            }
        }
        loop {
            let (t, message) = self.incoming[source].recv().map_err(|_| {
                KnapsackError::communication(
                    rank,
                    format!("rank {} disconnected while waiting for {:?}", source, tag),
                )
            })?;
            if t == tag {
                return Ok(message);
            }
            parked.push_back((t, message));
        }
    }
}
