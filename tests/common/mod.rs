#![allow(dead_code)]

use std::collections::VecDeque;

use gomoku_lib::{
    channel::ChannelEvent,
    game::{Coord, MoveError},
    protocol::{Message, Peer, Session},
};

pub const ROOM: &str = "test-room";

/// Which of the two peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn id(self) -> &'static str {
        match self {
            Side::A => "peer-a",
            Side::B => "peer-b",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Two peers and the messages in flight between them. Nothing moves until a
/// test says how it should be delivered.
pub struct FakeNet {
    pub a: Peer,
    pub b: Peer,
    in_flight: VecDeque<(Side, String)>,
}

impl FakeNet {
    /// Two peers that have not met yet.
    pub fn new() -> Self {
        Self {
            a: Peer::new(Session::new(Side::A.id(), ROOM)),
            b: Peer::new(Session::new(Side::B.id(), ROOM)),
            in_flight: VecDeque::new(),
        }
    }

    /// A is in the room, B arrives and receives A's game.
    pub fn connected() -> Self {
        let mut net = Self::new();
        net.member_joined(Side::A, Side::B);
        net.deliver_all();
        net
    }

    pub fn peer(&mut self, side: Side) -> &mut Peer {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// `observer` sees `arrival` join and answers over the network.
    pub fn member_joined(&mut self, observer: Side, arrival: Side) {
        let reply = self.peer(observer).handle_event(ChannelEvent::MemberJoined {
            peer: arrival.id().into(),
        });
        if let Some(reply) = reply {
            self.send(observer, &reply);
        }
    }

    pub fn member_left(&mut self, observer: Side, departed: Side) {
        let reply = self.peer(observer).handle_event(ChannelEvent::MemberLeft {
            peer: departed.id().into(),
        });
        assert!(reply.is_none());
    }

    /// Propose and confirm in one go, queueing the resulting message.
    pub fn play(&mut self, side: Side, x: u8, y: u8) -> Result<(), MoveError> {
        let peer = self.peer(side);
        peer.propose(Coord::new(x, y))?;
        let message = peer.confirm()?;
        self.send(side, &message);
        Ok(())
    }

    pub fn restart(&mut self, side: Side) {
        let message = self.peer(side).restart();
        self.send(side, &message);
    }

    pub fn send(&mut self, from: Side, message: &Message) {
        let text = message.encode().expect("messages always encode");
        self.in_flight.push_back((from, text));
    }

    /// Put a raw payload on the wire as if `from` had sent it.
    pub fn send_raw(&mut self, from: Side, text: &str) {
        self.in_flight.push_back((from, text.to_string()));
    }

    pub fn deliver_all(&mut self) {
        while let Some((from, text)) = self.in_flight.pop_front() {
            self.deliver(from, &text);
        }
    }

    pub fn deliver_reversed(&mut self) {
        while let Some((from, text)) = self.in_flight.pop_back() {
            self.deliver(from, &text);
        }
    }

    /// Deliver everything twice, each copy back to back.
    pub fn deliver_duplicated(&mut self) {
        while let Some((from, text)) = self.in_flight.pop_front() {
            self.deliver(from, &text);
            self.deliver(from, &text);
        }
    }

    pub fn drop_all(&mut self) {
        self.in_flight.clear();
    }

    /// Every broadcast also reaches its sender, which must ignore it.
    fn deliver(&mut self, from: Side, text: &str) {
        let event = |text: &str| ChannelEvent::Message {
            from: from.id().into(),
            text: text.into(),
        };
        for side in [from, from.other()] {
            let reply = self.peer(side).handle_event(event(text));
            assert!(reply.is_none(), "messages never trigger replies");
        }
    }

    pub fn assert_in_sync(&self) {
        assert_eq!(self.a.game().board(), self.b.game().board());
        assert_eq!(self.a.game().is_finished(), self.b.game().is_finished());
    }
}
